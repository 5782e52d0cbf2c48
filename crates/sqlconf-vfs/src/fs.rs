//! Routing between descriptor paths and regular files

use crate::error::{VfsError, VfsResult};
use crate::session::SqlConfFile;
use sqlconf_core::Config;
use sqlconf_db::Connector;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;

/// What an opened path turned out to be
#[derive(Debug)]
pub enum ConfigSource {
    /// A descriptor served from the database
    Sql(SqlConfFile),
    /// A regular file on disk
    Disk(File),
}

impl ConfigSource {
    pub fn kind(&self) -> SourceKind {
        match self {
            ConfigSource::Sql(_) => SourceKind::Virtual,
            ConfigSource::Disk(_) => SourceKind::Disk,
        }
    }
}

impl Read for ConfigSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            ConfigSource::Sql(file) => file.read(buf),
            ConfigSource::Disk(file) => file.read(buf),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Virtual,
    Disk,
}

/// Result of [`SqlConfFs::stat`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceStat {
    pub kind: SourceKind,
    /// Size in bytes; unknown for descriptors until they are read
    pub len: Option<u64>,
}

/// Filesystem that claims every path starting with its scheme.
///
/// While registered, matching paths open as [`ConfigSource::Sql`]. After
/// [`unregister`](Self::unregister) every path falls through to the disk,
/// which is how a configuration loader stops re-entering the database once
/// parsing is done. [`register`](Self::register) claims the scheme again,
/// for example after a restart, so the next open parses afresh.
pub struct SqlConfFs {
    scheme: String,
    connector: Arc<dyn Connector>,
    registered: bool,
}

impl SqlConfFs {
    /// A registered filesystem for `scheme`
    pub fn new(scheme: impl Into<String>, connector: Arc<dyn Connector>) -> Self {
        let scheme = scheme.into();
        log::debug!("registering filesystem for '{}'", scheme);
        Self {
            scheme,
            connector,
            registered: true,
        }
    }

    pub fn from_config(config: &Config, connector: Arc<dyn Connector>) -> Self {
        Self::new(config.scheme.clone(), connector)
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub fn register(&mut self) {
        if !self.registered {
            log::debug!("registering filesystem for '{}'", self.scheme);
            self.registered = true;
        }
    }

    pub fn unregister(&mut self) {
        if self.registered {
            log::debug!("unregistering filesystem for '{}'", self.scheme);
            self.registered = false;
        }
    }

    /// Whether `path` would be served from the database
    pub fn claims(&self, path: &str) -> bool {
        self.registered && path.starts_with(&self.scheme)
    }

    /// Open `path` as a descriptor session or a regular file.
    pub fn open(&self, path: &str) -> VfsResult<ConfigSource> {
        if self.claims(path) {
            let file = SqlConfFile::open(path, &self.scheme, Arc::clone(&self.connector))?;
            return Ok(ConfigSource::Sql(file));
        }

        let file = File::open(path).map_err(|e| VfsError::Io {
            path: path.to_string(),
            source: e,
        })?;
        Ok(ConfigSource::Disk(file))
    }

    /// Descriptor paths always exist; other paths are looked up on disk.
    pub fn stat(&self, path: &str) -> VfsResult<SourceStat> {
        if self.claims(path) {
            return Ok(SourceStat {
                kind: SourceKind::Virtual,
                len: None,
            });
        }

        let metadata = Path::new(path).metadata().map_err(|e| VfsError::Io {
            path: path.to_string(),
            source: e,
        })?;
        Ok(SourceStat {
            kind: SourceKind::Disk,
            len: Some(metadata.len()),
        })
    }
}

#[cfg(test)]
#[path = "fs_test.rs"]
mod tests;
