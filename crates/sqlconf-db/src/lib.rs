//! sqlconf-db - Query gateway for sqlconf
//!
//! This crate provides the `QueryGateway` capability the materializer reads
//! through, the `Connector` that opens one from a descriptor's connection
//! parameters, and a DuckDB implementation of both.

pub mod duckdb;
pub mod error;
pub(crate) mod row_helpers;
pub mod traits;

pub use crate::duckdb::{DuckDbConnector, DuckDbGateway};
pub use error::{DbError, DbResult};
pub use traits::{Connector, QueryGateway, RowSet, SharedConnector};
