//! Error types for sqlconf-vfs

use sqlconf_core::SyntaxError;
use sqlconf_db::DbError;
use sqlconf_materialize::MaterializeError;
use thiserror::Error;

/// Virtual file errors
#[derive(Error, Debug)]
pub enum VfsError {
    /// Path is not a descriptor for this filesystem (V001)
    #[error("[V001] Path '{path}' does not start with '{scheme}'")]
    SourceMismatch { path: String, scheme: String },

    /// Read with an empty buffer (V002)
    #[error("[V002] Read capacity must be greater than zero")]
    ZeroCapacity,

    /// Opening the database behind a descriptor failed (V003)
    #[error("[V003] Failed to connect: {0}")]
    Connect(#[source] DbError),

    /// Regular file access failed (V004)
    #[error("[V004] Failed to open '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Materialize(#[from] MaterializeError),
}

/// Result type alias for VfsError
pub type VfsResult<T> = Result<T, VfsError>;
