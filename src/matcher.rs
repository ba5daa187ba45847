//! Fuzzy association of artifact filenames with configuration keys.
//!
//! Both sides are normalized the same way (lower-cased, separators removed,
//! version tokens removed) and compared by symmetric containment.  The first
//! configuration entry in document order that matches wins.
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::{GrantBundle, Permissions};

#[allow(clippy::expect_used)]
static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_\-.]").expect("separator pattern is valid"));

#[allow(clippy::expect_used)]
static VERSION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"v?\d+(\.\d+)*").expect("version pattern is valid"));

/// Normalize a filename stem or configuration key for comparison.
///
/// Separators are removed before version tokens, so `v2.1.4` has already
/// become `v214` when the version pattern runs.
#[must_use]
pub fn normalize(name: &str) -> String {
    let lower = name.to_lowercase();
    let joined = SEPARATORS.replace_all(&lower, "");
    VERSION_TOKEN.replace_all(&joined, "").into_owned()
}

/// Whether a configuration `key` and an artifact stem name the same app.
#[must_use]
pub fn matches(key: &str, artifact: &str) -> bool {
    let key = normalize(key);
    let artifact = normalize(artifact);
    artifact.contains(&key) || key.contains(&artifact)
}

/// The artifact's filename without its extension.
#[must_use]
pub fn artifact_stem(artifact: &Path) -> String {
    artifact
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Resolve an artifact to its configuration entry.
///
/// Returns the first `(logical name, bundle)` in document order whose key
/// matches, or `None`.
#[must_use]
pub fn find_bundle<'a>(
    artifact: &Path,
    permissions: &'a Permissions,
) -> Option<(&'a str, &'a GrantBundle)> {
    let stem = artifact_stem(artifact);
    permissions.iter().find(|(key, _)| matches(key, &stem))
}
