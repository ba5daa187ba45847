//! Non-fatal checks run after the permissions file is loaded.
use crate::matcher;

use super::Permissions;

/// A validation warning detected during configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The configuration entry that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    #[must_use]
    pub fn new(item: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            message: message.into(),
        }
    }
}

/// Trait for configuration validators.
pub trait ConfigValidator {
    /// Validate the configuration and return any warnings found.
    fn validate(&self, permissions: &Permissions) -> Vec<ValidationWarning>;
}

/// Checks each entry's package identifier and install flags.
#[derive(Debug)]
pub struct BundleValidator;

impl ConfigValidator for BundleValidator {
    fn validate(&self, permissions: &Permissions) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        for (name, bundle) in permissions.iter() {
            match bundle.package_id() {
                None => warnings.push(ValidationWarning::new(
                    name,
                    "no package identifier; entry will be skipped",
                )),
                Some(package) if package.contains(char::is_whitespace) => {
                    warnings.push(ValidationWarning::new(
                        name,
                        format!("package identifier '{package}' contains whitespace"),
                    ));
                }
                Some(_) => {}
            }

            if bundle.install_flags.split_whitespace().any(|f| f == "-s") {
                warnings.push(ValidationWarning::new(
                    name,
                    "install_flags selects a device with -s; the selected device is used instead",
                ));
            }
        }

        warnings
    }
}

/// Checks keys against the first-match-wins artifact lookup.
#[derive(Debug)]
pub struct KeyValidator;

impl ConfigValidator for KeyValidator {
    fn validate(&self, permissions: &Permissions) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let mut seen: Vec<(&str, String)> = Vec::new();

        for (name, _) in permissions.iter() {
            let normalized = matcher::normalize(name);
            if normalized.is_empty() {
                warnings.push(ValidationWarning::new(
                    name,
                    "name normalizes to an empty string and matches every artifact",
                ));
            } else if let Some((earlier, _)) = seen
                .iter()
                .find(|(_, prior)| !prior.is_empty() && normalized.contains(prior.as_str()))
            {
                warnings.push(ValidationWarning::new(
                    name,
                    format!("artifacts containing this name are claimed by earlier entry '{earlier}'"),
                ));
            }
            seen.push((name, normalized));
        }

        warnings
    }
}

/// Validate all configuration and return collected warnings.
#[must_use]
pub fn validate_all(permissions: &Permissions) -> Vec<ValidationWarning> {
    let validators: Vec<Box<dyn ConfigValidator>> =
        vec![Box::new(BundleValidator), Box::new(KeyValidator)];

    validators
        .iter()
        .flat_map(|v| v.validate(permissions))
        .collect()
}
