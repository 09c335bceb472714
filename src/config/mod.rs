//! Configuration system
//!
//! Loads ~/.config/notmuch-rs/config.yaml with support for:
//! - The mail root to open and its access mode
//! - Default result ordering for queries
//! - Tags whose messages are excluded from query results

mod notmuch_config;
pub mod validation;

pub use notmuch_config::{Config, DatabaseConfig};
pub use validation::{validate_config, validate_config_result, ValidationError, ValidationResult};
