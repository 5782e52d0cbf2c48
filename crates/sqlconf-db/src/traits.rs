//! Query gateway trait definitions

use crate::error::DbResult;
use sqlconf_core::ConnectionSpec;
use std::sync::Arc;

/// Tabular query result with every cell as text
///
/// SQL NULL is `None`; numeric and boolean cells are stringified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSet {
    /// Number of columns the statement produced, known even when no rows
    /// matched
    pub column_count: usize,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RowSet {
    pub fn new(column_count: usize, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { column_count, rows }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at (`row`, `column`); `None` for out-of-range or NULL cells
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column)?.as_deref()
    }
}

/// Synchronous "run a query, get rows of strings" capability
///
/// Calls are blocking round-trips. Implementations must be Send + Sync so a
/// gateway can be shared behind an `Arc`.
pub trait QueryGateway: Send + Sync {
    /// Execute a SELECT statement and return all rows
    fn select(&self, sql: &str) -> DbResult<RowSet>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}

/// Opens a [`QueryGateway`] for a descriptor's connection parameters
///
/// Dropping the returned gateway closes the connection.
pub trait Connector: Send + Sync {
    fn connect(&self, connection: &ConnectionSpec) -> DbResult<Arc<dyn QueryGateway>>;
}

/// Connector that hands out one pre-built gateway regardless of the
/// connection parameters
///
/// Used when the surrounding system already owns the database handle.
#[derive(Clone)]
pub struct SharedConnector {
    gateway: Arc<dyn QueryGateway>,
}

impl SharedConnector {
    pub fn new(gateway: Arc<dyn QueryGateway>) -> Self {
        Self { gateway }
    }
}

impl Connector for SharedConnector {
    fn connect(&self, connection: &ConnectionSpec) -> DbResult<Arc<dyn QueryGateway>> {
        log::debug!(
            "reusing shared {} gateway for server '{}'",
            self.gateway.db_type(),
            connection.server
        );
        Ok(Arc::clone(&self.gateway))
    }
}
