//! Error types for sqlconf-materialize

use sqlconf_db::DbError;
use thiserror::Error;

/// Materialization errors
///
/// Every variant except `Backend` reports data that does not have the shape
/// the context tree requires. Any of them aborts the whole pass.
#[derive(Error, Debug)]
pub enum MaterializeError {
    /// No root context matched (M001)
    #[error("[M001] No {which} context found")]
    RootNotFound { which: &'static str },

    /// More than one candidate root context (M002)
    #[error("[M002] Retrieving {which} context failed: {rows} rows matched, expected exactly one")]
    AmbiguousRoot { which: &'static str, rows: usize },

    /// More than one key/value row for one context id (M003)
    #[error("[M003] Multiple key/values returned for context id {id} ({rows} rows)")]
    AmbiguousContext { id: String, rows: usize },

    /// A query returned a different number of columns than requested (M004)
    #[error("[M004] {query} query returned {found} columns, expected {expected}")]
    UnexpectedColumns {
        query: &'static str,
        expected: usize,
        found: usize,
    },

    /// A column that must identify something was NULL (M005)
    #[error("[M005] NULL {what} under context {context}")]
    NullValue { what: &'static str, context: String },

    /// A context is its own ancestor (M006)
    #[error("[M006] Context id {id} is its own ancestor: {path}")]
    Cycle { id: String, path: String },

    /// The query gateway failed (M007)
    #[error("[M007] Query failed: {0}")]
    Backend(#[from] DbError),
}

impl MaterializeError {
    /// True for errors caused by the shape of the stored data rather than
    /// the backend
    pub fn is_schema_error(&self) -> bool {
        !matches!(self, MaterializeError::Backend(_))
    }
}

/// Result type alias for MaterializeError
pub type MaterializeResult<T> = Result<T, MaterializeError>;
