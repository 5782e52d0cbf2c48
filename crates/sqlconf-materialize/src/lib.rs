//! sqlconf-materialize - Tree materializer for sqlconf
//!
//! Walks the context hierarchy described by a [`DescriptorSpec`], issuing one
//! query at a time through a [`QueryGateway`], and renders nested block
//! markup and directive lines in depth-first document order.
//!
//! [`DescriptorSpec`]: sqlconf_core::DescriptorSpec
//! [`QueryGateway`]: sqlconf_db::QueryGateway

pub mod error;
pub mod materializer;
pub mod query;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

pub use error::{MaterializeError, MaterializeResult};
pub use materializer::{materialize, MaterializeStats, Materialized, TreeMaterializer};
