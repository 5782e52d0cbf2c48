//! sqlconf-vfs - Virtual file layer for sqlconf
//!
//! Paths carrying the configured scheme (`sql://` by default) open as a
//! [`SqlConfFile`]: the descriptor is parsed on open, the context tree is
//! materialized on the first read, and reads drain the rendered lines.
//! Every other path opens as a regular file.

pub mod error;
pub mod fs;
pub mod session;

pub use error::{VfsError, VfsResult};
pub use fs::{ConfigSource, SourceKind, SourceStat, SqlConfFs};
pub use session::{ReadChunk, SqlConfFile};
