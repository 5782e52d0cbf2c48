//! Shared helpers for CLI commands

use anyhow::{Context, Result};
use sqlconf_core::{Config, CoreError, DbType};
use sqlconf_db::{Connector, DuckDbConnector};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::cli::GlobalArgs;

/// Settings plus the directory they were loaded from
#[derive(Debug)]
pub(crate) struct Settings {
    pub config: Config,
    pub root: PathBuf,
}

/// Route `log` records from the library crates to stderr.
///
/// `RUST_LOG` wins over `--verbose` when set.
pub(crate) fn init_logging(global: &GlobalArgs) {
    let default_level = if global.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // Fails only if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load settings from `--config`, or from `sqlconf.yml` in the current
/// directory, falling back to defaults when neither exists.
pub(crate) fn load_settings(global: &GlobalArgs) -> Result<Settings> {
    if let Some(path) = &global.config {
        let path = Path::new(path);
        let config = Config::load(path).context("Failed to load config")?;
        let root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        return Ok(Settings { config, root });
    }

    let root = std::env::current_dir().context("Failed to resolve current directory")?;
    match Config::load_from_dir(&root) {
        Ok(config) => Ok(Settings { config, root }),
        Err(CoreError::ConfigNotFound { .. }) => {
            if global.verbose {
                eprintln!("[verbose] No sqlconf.yml found, using defaults");
            }
            Ok(Settings {
                config: Config::default(),
                root,
            })
        }
        Err(e) => Err(anyhow::Error::new(e).context("Failed to load config")),
    }
}

/// Build the connector for the configured database type.
///
/// `--data-dir` overrides `database.base_dir`.
pub(crate) fn build_connector(global: &GlobalArgs, settings: &Settings) -> Arc<dyn Connector> {
    let base_dir = global
        .data_dir
        .as_ref()
        .map(PathBuf::from)
        .or_else(|| settings.config.base_dir_absolute(&settings.root));

    match settings.config.database.db_type {
        DbType::DuckDb => {
            if global.verbose {
                match &base_dir {
                    Some(dir) => eprintln!("[verbose] Resolving duckdb files under {}", dir.display()),
                    None => eprintln!("[verbose] Resolving duckdb files from the working directory"),
                }
            }
            let connector = match base_dir {
                Some(dir) => DuckDbConnector::with_base_dir(dir),
                None => DuckDbConnector::new(),
            };
            Arc::new(connector)
        }
    }
}
