//! CLI command implementations

pub(crate) mod cat;
pub(crate) mod common;
pub(crate) mod parse;
pub(crate) mod render;
