//! Permissions configuration: model, loader, and validation.
//!
//! The file maps logical application names to [`GrantBundle`]s.  Entry order
//! is the document order and is preserved, because artifact matching is
//! first-match-wins.
pub mod bundle;
pub mod validation;

use std::fmt;
use std::path::Path;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};

pub use bundle::{DEFAULT_INSTALL_FLAGS, GrantBundle};
pub use validation::ValidationWarning;

use crate::error::ConfigError;

/// Ordered mapping from logical name to grant bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Permissions {
    entries: Vec<(String, GrantBundle)>,
}

impl Permissions {
    /// Iterate entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &GrantBundle)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the configuration has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validate the configuration and return any warnings found.
    #[must_use]
    pub fn validate(&self) -> Vec<ValidationWarning> {
        validation::validate_all(self)
    }
}

impl FromIterator<(String, GrantBundle)> for Permissions {
    fn from_iter<I: IntoIterator<Item = (String, GrantBundle)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

struct PermissionsVisitor;

impl<'de> Visitor<'de> for PermissionsVisitor {
    type Value = Permissions;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map from application name to grant bundle")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Permissions, A::Error> {
        let mut entries: Vec<(String, GrantBundle)> = Vec::new();
        while let Some((key, bundle)) = map.next_entry::<String, GrantBundle>()? {
            // A repeated key replaces the earlier value but keeps its position.
            if let Some(slot) = entries.iter_mut().find(|(k, _)| *k == key) {
                slot.1 = bundle;
            } else {
                entries.push((key, bundle));
            }
        }
        Ok(Permissions { entries })
    }
}

impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PermissionsVisitor)
    }
}

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `permissions.json`
    Json,
    /// `permissions.toml`
    Toml,
}

impl Format {
    /// Select the format from the file extension (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.display().to_string(),
                extension,
            }),
        }
    }
}

/// Parse configuration text in the given format.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidSyntax`] if the text does not parse.
pub fn parse(content: &str, format: Format, file: &str) -> Result<Permissions, ConfigError> {
    let parsed = match format {
        Format::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        Format::Toml => toml::from_str(content).map_err(|e| e.to_string()),
    };
    parsed.map_err(|message| ConfigError::InvalidSyntax {
        file: file.to_string(),
        message,
    })
}

/// Load the permissions file at `path`.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable, has an unsupported
/// extension, or does not parse.
pub fn load(path: &Path) -> Result<Permissions, ConfigError> {
    let file = path.display().to_string();
    if !path.exists() {
        return Err(ConfigError::NotFound(file));
    }
    let format = Format::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: file.clone(),
        source,
    })?;
    parse(&content, format, &file)
}
