//! Structured logger with dry-run awareness and summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::{DRY_RUN_TARGET, ITEM_TARGET, STAGE_TARGET};
use super::types::{ItemEntry, ItemStatus, Log};
use super::utils::log_file_path;

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
///
/// `record_item` is not included because its signature differs from the
/// `fn(&self, &str)` pattern shared by the display methods.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger with dry-run awareness and summary collection.
///
/// All messages are always written to a persistent log file at
/// `$XDG_CACHE_HOME/apk-provisioner/<command>.log` with timestamps and ANSI
/// codes stripped, regardless of the verbose flag.
#[derive(Debug)]
pub struct Logger {
    items: Mutex<Vec<ItemEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger.
    ///
    /// Stores the log file path for display in the run summary.  The file
    /// itself is created by [`init_subscriber`](super::subscriber::init_subscriber).
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Return a clone of all recorded item entries.
    #[must_use]
    pub fn item_entries(&self) -> Vec<ItemEntry> {
        self.items.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Record an item result for the summary and as a structured line in
    /// the run log.
    pub fn record_item(&self, name: &str, status: ItemStatus, message: Option<&str>) {
        tracing::info!(
            target: ITEM_TARGET,
            item = name,
            status = status.label(),
            detail = message,
            "item recorded"
        );
        if let Ok(mut guard) = self.items.lock() {
            guard.push(ItemEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Print the summary of all recorded items.
    #[allow(clippy::print_stdout)]
    pub fn print_summary(&self) {
        let items = match self.items.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => return,
        };

        println!();
        self.stage("Summary");

        if items.is_empty() {
            self.info("nothing to process");
        }

        let mut ok = 0u32;
        let mut skipped = 0u32;
        let mut dry_run = 0u32;
        let mut failed = 0u32;

        for item in &items {
            let (icon, color) = match item.status {
                ItemStatus::Ok => {
                    ok += 1;
                    ("✓", "\x1b[32m")
                }
                ItemStatus::Skipped => {
                    skipped += 1;
                    ("○", "\x1b[33m")
                }
                ItemStatus::DryRun => {
                    dry_run += 1;
                    ("~", "\x1b[37m")
                }
                ItemStatus::Failed => {
                    failed += 1;
                    ("✗", "\x1b[31m")
                }
            };

            let suffix = item
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));

            self.info(&format!("{color}{icon} {}{suffix}\x1b[0m", item.name));
        }

        println!();
        let total = ok + skipped + dry_run + failed;
        self.info(&format!(
            "{total} items: \x1b[32m{ok} ok\x1b[0m, \x1b[33m{skipped} skipped\x1b[0m, \x1b[37m{dry_run} dry-run\x1b[0m, \x1b[31m{failed} failed\x1b[0m"
        ));
        if skipped == 0 {
            self.info("\x1b[32mnothing skipped\x1b[0m");
        }

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record_item(&self, name: &str, status: ItemStatus, message: Option<&str>) {
        self.record_item(name, status, message);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::isolated_logger;
    use std::fs;

    #[test]
    fn logger_new() {
        let (log, _tmp, _guard) = isolated_logger();
        assert!(log.item_entries().is_empty(), "expected empty item list");
    }

    #[test]
    fn record_item_with_message() {
        let (log, _tmp, _guard) = isolated_logger();
        log.record_item("randomfile.apk", ItemStatus::Skipped, Some("no configuration"));
        let items = log.item_entries();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "randomfile.apk");
        assert_eq!(items[0].message.as_deref(), Some("no configuration"));
    }

    #[test]
    fn recorded_items_become_structured_log_lines() {
        let (log, _tmp, _guard) = isolated_logger();
        log.record_item("randomfile.apk", ItemStatus::Skipped, Some("no configuration"));
        log.record_item("MyApp_v1.2.apk", ItemStatus::Failed, Some("failed: pm grant android.permission.BOGUS"));
        log.record_item("Other.apk", ItemStatus::Ok, None);
        let contents = fs::read_to_string(log.log_path().expect("log path")).unwrap();
        assert!(contents.contains("[item] skipped randomfile.apk: no configuration\n"));
        assert!(contents.contains(
            "[item] failed MyApp_v1.2.apk: failed: pm grant android.permission.BOGUS\n"
        ));
        assert!(contents.contains("[item] ok Other.apk\n"));
    }

    #[test]
    fn log_file_starts_with_run_header() {
        let (log, _tmp, _guard) = isolated_logger();
        log.info("first line");
        let contents = fs::read_to_string(log.log_path().expect("log path")).unwrap();
        assert!(contents.starts_with("# apk-provisioner "));
        assert!(contents.contains("# config: permissions.json\n"));
        assert!(contents.contains("# mode: live\n"));
    }

    #[test]
    fn log_trait_delegates_to_logger() {
        let (log, _tmp, _guard) = isolated_logger();
        let log_ref: &dyn Log = &log;
        log_ref.record_item("via-trait", ItemStatus::Ok, None);
        assert_eq!(log.item_entries().len(), 1);
    }

    #[test]
    fn debug_always_written_to_file() {
        let (log, _tmp, _guard) = isolated_logger();
        let marker = format!("debug-marker-{}", std::process::id());
        log.debug(&marker);
        let path = log.log_path().expect("log path should exist");
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains(&marker));
    }

    #[test]
    fn warn_written_to_file_with_tag() {
        let (log, _tmp, _guard) = isolated_logger();
        let marker = format!("warn-marker-{}", std::process::id());
        log.warn(&marker);
        let contents = fs::read_to_string(log.log_path().expect("log path")).unwrap();
        assert!(contents.contains("[warn]"));
        assert!(contents.contains(&marker));
    }

    #[test]
    fn stage_and_dry_run_tags_in_file() {
        let (log, _tmp, _guard) = isolated_logger();
        log.stage("Installing");
        log.dry_run("would run: adb install");
        let contents = fs::read_to_string(log.log_path().expect("log path")).unwrap();
        assert!(contents.contains("==> Installing"));
        assert!(contents.contains("[dry run] would run: adb install"));
    }

    #[test]
    fn summary_lists_items_and_strips_ansi_in_file() {
        let (log, _tmp, _guard) = isolated_logger();
        log.record_item("MyApp_v1.2.apk", ItemStatus::Ok, None);
        log.record_item("randomfile.apk", ItemStatus::Skipped, Some("no configuration"));
        log.print_summary();
        let contents = fs::read_to_string(log.log_path().expect("log path")).unwrap();
        assert!(contents.contains("✓ MyApp_v1.2.apk"));
        assert!(contents.contains("○ randomfile.apk (no configuration)"));
        assert!(contents.contains("2 items: 1 ok, 1 skipped, 0 dry-run, 0 failed"));
        assert!(!contents.contains('\x1b'));
    }

    #[test]
    fn empty_skip_list_is_reported() {
        let (log, _tmp, _guard) = isolated_logger();
        log.record_item("MyApp_v1.2.apk", ItemStatus::Ok, None);
        log.print_summary();
        let contents = fs::read_to_string(log.log_path().expect("log path")).unwrap();
        assert!(contents.contains("nothing skipped"));
    }
}
