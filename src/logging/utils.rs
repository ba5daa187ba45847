//! Run-log location, timestamps, and plain-text rendering for the file log.
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

/// Subdirectory of the user cache directory holding run logs.
const LOG_DIR_NAME: &str = "apk-provisioner";

/// CSI escape sequences (colours, cursor movement, erase).
#[allow(clippy::expect_used)]
static ESCAPE_SEQUENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-?]*[ -/]*[@-~]").expect("escape sequence pattern is valid")
});

/// Drop terminal escape sequences so file lines stay plain text.
pub(super) fn plain_text(s: &str) -> String {
    ESCAPE_SEQUENCE.replace_all(s, "").into_owned()
}

/// `$XDG_CACHE_HOME/apk-provisioner`, else `~/.cache/apk-provisioner`.
///
/// Created on demand; `None` when no base directory is known or it cannot
/// be created.
fn log_dir() -> Option<PathBuf> {
    let cache = std::env::var_os("XDG_CACHE_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var_os("HOME")
                .or_else(|| std::env::var_os("USERPROFILE"))
                .map(|home| PathBuf::from(home).join(".cache"))
        })?;
    let dir = cache.join(LOG_DIR_NAME);
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// Log file for runs of `command`; each run replaces the previous log.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    log_dir().map(|dir| dir.join(format!("{command}.log")))
}

/// Which timestamp a file-log line carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Stamp {
    /// Full date and time, for the run header.
    Header,
    /// Time of day, for each event line.
    Line,
}

/// The current UTC time in the layout for `stamp`.
pub(super) fn utc_stamp(stamp: Stamp) -> String {
    let layout = match stamp {
        Stamp::Header => "%Y-%m-%d %H:%M:%S UTC",
        Stamp::Line => "%H:%M:%S",
    };
    chrono::Utc::now().format(layout).to_string()
}
