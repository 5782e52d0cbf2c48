//! DuckDB query gateway implementation

use crate::error::{DbError, DbResult};
use crate::row_helpers::execute_and_collect;
use crate::traits::{Connector, QueryGateway, RowSet};
use duckdb::Connection;
use sqlconf_core::ConnectionSpec;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

const MEMORY_DATABASE: &str = ":memory:";

/// DuckDB query gateway
pub struct DuckDbGateway {
    conn: Mutex<Connection>,
}

impl DuckDbGateway {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == MEMORY_DATABASE {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Execute multiple SQL statements (schema setup, seeding)
    pub fn execute_batch(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    /// Execute a SELECT synchronously
    fn select_sync(&self, sql: &str) -> DbResult<RowSet> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))?;
        execute_and_collect(&mut stmt)
    }
}

impl QueryGateway for DuckDbGateway {
    fn select(&self, sql: &str) -> DbResult<RowSet> {
        log::debug!("duckdb select: {}", sql);
        self.select_sync(sql)
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

/// Opens DuckDB databases named by a descriptor's `?db=` parameter
///
/// The database name is a file path, resolved against `base_dir` when
/// relative. A missing name or `:memory:` opens a fresh in-memory database.
/// DuckDB is embedded, so user, password and server are not used.
#[derive(Debug, Clone, Default)]
pub struct DuckDbConnector {
    base_dir: Option<PathBuf>,
}

impl DuckDbConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    /// Where `database` would be opened; `None` means in-memory
    pub fn resolve(&self, database: Option<&str>) -> Option<PathBuf> {
        let name = database.filter(|d| *d != MEMORY_DATABASE)?;
        let path = Path::new(name);
        match &self.base_dir {
            Some(base) if path.is_relative() => Some(base.join(path)),
            _ => Some(path.to_path_buf()),
        }
    }
}

impl Connector for DuckDbConnector {
    fn connect(&self, connection: &ConnectionSpec) -> DbResult<Arc<dyn QueryGateway>> {
        if !connection.server.is_empty() {
            log::debug!(
                "duckdb is embedded; ignoring server '{}'",
                connection.server
            );
        }
        let gateway = match self.resolve(connection.database.as_deref()) {
            Some(path) => {
                log::debug!("opening duckdb database {}", path.display());
                DuckDbGateway::from_path(&path)?
            }
            None => {
                log::debug!("opening in-memory duckdb database");
                DuckDbGateway::in_memory()?
            }
        };
        Ok(Arc::new(gateway))
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
