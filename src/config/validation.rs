//! Configuration validation
//!
//! Validates notmuch-rs configuration for correctness:
//! - Database path is set and absolute
//! - Exclude tags are non-empty and free of whitespace

use super::notmuch_config::Config;
use crate::Error;
use std::collections::HashSet;

/// Validation error details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result
pub type ValidationResult = std::result::Result<(), Vec<ValidationError>>;

/// Validate a configuration, collecting every problem
pub fn validate_config(config: &Config) -> ValidationResult {
    let mut errors = Vec::new();

    let path = &config.database.path;
    if path.as_os_str().is_empty() {
        errors.push(ValidationError::new(
            "database.path",
            "Database path cannot be empty",
        ));
    } else if !path.is_absolute() {
        errors.push(ValidationError::new(
            "database.path",
            format!("Database path must be absolute: {}", path.display()),
        ));
    }

    let mut seen = HashSet::new();
    for tag in &config.exclude_tags {
        if tag.trim().is_empty() {
            errors.push(ValidationError::new(
                "exclude_tags",
                "Exclude tags cannot be empty",
            ));
        } else if tag.chars().any(char::is_whitespace) {
            errors.push(ValidationError::new(
                "exclude_tags",
                format!("Exclude tag contains whitespace: '{}'", tag),
            ));
        } else if !seen.insert(tag.as_str()) {
            tracing::warn!(tag = %tag, "Duplicate exclude tag");
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate and convert the error list into a single [`Error::Config`]
pub fn validate_config_result(config: &Config) -> crate::Result<()> {
    validate_config(config).map_err(|errors| {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        Error::Config(format!(
            "Configuration validation failed:\n  - {}",
            messages.join("\n  - ")
        ))
    })
}
