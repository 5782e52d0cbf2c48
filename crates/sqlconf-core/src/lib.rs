//! sqlconf-core - Core library for sqlconf
//!
//! This crate provides the descriptor grammar (the `sql://` path that names a
//! database-backed configuration), the rendered line buffer produced by
//! materialization, and the `sqlconf.yml` settings shared by the other crates.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod rendered;

pub use config::{Config, DatabaseConfig, DbType};
pub use descriptor::{
    ConnectionSpec, ContextTableSpec, DescriptorSpec, DirectiveTableSpec, MappingTableSpec,
};
pub use error::{CoreError, CoreResult, Segment, SyntaxCause, SyntaxError};
pub use rendered::RenderedConfig;
