//! Configuration file handling
//!
//! Loads and saves the YAML file describing which database to open and how
//! queries built through it should behave.

use super::validation::{validate_config, validate_config_result, ValidationResult};
use crate::database::{Database, Mode};
use crate::query::{Exclude, Query, Sort};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Database location and access mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Mail root containing the `.notmuch` index
    #[serde(default = "default_mail_root")]
    pub path: PathBuf,

    /// Open mode (read_only, read_write)
    #[serde(default)]
    pub mode: Mode,
}

fn default_mail_root() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("mail");
    path
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_mail_root(),
            mode: Mode::default(),
        }
    }
}

/// notmuch-rs configuration
///
/// Represents the complete ~/.config/notmuch-rs/config.yaml file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Database to open
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Ordering applied to queries built with [`Config::create_query`]
    #[serde(default)]
    pub sort: Sort,

    /// Tags excluded from query results
    #[serde(default)]
    pub exclude_tags: Vec<String>,

    /// What exclusion does to matching messages
    #[serde(default)]
    pub omit_excluded: Exclude,
}

impl Config {
    /// Create a configuration for the mail root at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            database: DatabaseConfig {
                path: path.into(),
                mode: Mode::default(),
            },
            ..Self::default()
        }
    }

    /// Load configuration from the default path (~/.config/notmuch-rs/config.yaml)
    pub fn load_default() -> Result<Self> {
        let path = Self::default_path();
        Self::load(&path)
    }

    /// Load configuration from a specific path
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(crate::Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        tracing::info!(path = %path.display(), "Loading notmuch configuration");

        let content = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;

        tracing::debug!(
            database = %config.database.path.display(),
            mode = %config.database.mode,
            exclude_tags = config.exclude_tags.len(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        tracing::info!(path = %path.display(), "Saving notmuch configuration");

        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;

        Ok(())
    }

    /// Get the default config path (~/.config/notmuch-rs/config.yaml)
    pub fn default_path() -> PathBuf {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".config");
        path.push("notmuch-rs");
        path.push("config.yaml");
        path
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.database.mode = mode;
        self
    }

    pub fn with_exclude_tag(mut self, tag: impl Into<String>) -> Self {
        self.exclude_tags.push(tag.into());
        self
    }

    /// Check the configuration, reporting every problem found
    pub fn validate(&self) -> ValidationResult {
        validate_config(self)
    }

    /// Validate, then open the configured database in the configured mode
    pub fn open_database(&self) -> Result<Database> {
        validate_config_result(self)?;
        Database::open(&self.database.path, self.database.mode)
    }

    /// Build a query with the configured sort and exclusions applied
    pub fn create_query<'db>(&self, db: &'db Database, query_string: &str) -> Result<Query<'db>> {
        let mut query = db.create_query(query_string)?;
        query.set_sort(self.sort);
        query.set_omit_excluded(self.omit_excluded);
        for tag in &self.exclude_tags {
            query.add_tag_exclude(tag)?;
        }
        Ok(query)
    }
}
