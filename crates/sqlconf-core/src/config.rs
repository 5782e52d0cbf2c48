//! Configuration types and parsing for sqlconf.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File names probed by [`Config::load_from_dir`], in order
pub const CONFIG_FILE_NAMES: &[&str] = &["sqlconf.yml", "sqlconf.yaml"];

/// Settings shared by the filesystem layer and the CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Path prefix routed to the database-backed filesystem
    #[serde(default = "default_scheme")]
    pub scheme: String,

    /// Default number of bytes handed out per read
    #[serde(default = "default_read_capacity")]
    pub read_capacity: usize,

    /// Database backend settings
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Database type selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    /// DuckDB (default)
    #[default]
    DuckDb,
}

impl std::fmt::Display for DbType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbType::DuckDb => write!(f, "duckdb"),
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database type
    #[serde(rename = "type", default)]
    pub db_type: DbType,

    /// Directory that relative `?db=` names are resolved against
    #[serde(default)]
    pub base_dir: Option<String>,
}

fn default_scheme() -> String {
    "sql://".to_string()
}

fn default_read_capacity() -> usize {
    4096
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            read_capacity: default_read_capacity(),
            database: DatabaseConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory
    /// Looks for sqlconf.yml or sqlconf.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if path.exists() {
                return Self::load(&path);
            }
        }
        Err(CoreError::ConfigNotFound {
            path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        let Some(name) = self.scheme.strip_suffix("://") else {
            return Err(CoreError::ConfigInvalid {
                message: format!("scheme '{}' must end with '://'", self.scheme),
            });
        };
        if name.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "scheme name cannot be empty".to_string(),
            });
        }
        if self.read_capacity == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "read_capacity must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Base directory for database files, resolved against `root`
    pub fn base_dir_absolute(&self, root: &Path) -> Option<PathBuf> {
        self.database.base_dir.as_ref().map(|dir| root.join(dir))
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
