//! One open descriptor path and its read cursor

use crate::error::{VfsError, VfsResult};
use sqlconf_core::{DescriptorSpec, RenderedConfig};
use sqlconf_db::Connector;
use sqlconf_materialize::TreeMaterializer;
use std::io;
use std::sync::Arc;

/// Result of one [`SqlConfFile::read_next`] call
#[derive(Debug, PartialEq, Eq)]
pub enum ReadChunk<'a> {
    /// Bytes of the current line, never empty
    Data(&'a [u8]),
    /// Every line has been delivered
    EndOfData,
}

/// An opened `sql://` path.
///
/// The descriptor is parsed on [`open`](Self::open). The database is only
/// contacted on the first read, which materializes the whole tree; later
/// reads drain the cached lines and never query again.
///
/// Each read hands out at most one line. A line longer than the caller's
/// capacity is split across consecutive reads, and the cursor moves to the
/// next line only after the last byte of the current one went out.
pub struct SqlConfFile {
    descriptor: DescriptorSpec,
    connector: Arc<dyn Connector>,
    lines: Option<RenderedConfig>,
    /// Index of the line being delivered
    cursor: usize,
    /// Bytes of that line already delivered
    offset: usize,
}

impl std::fmt::Debug for SqlConfFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlConfFile")
            .field("descriptor", &self.descriptor.to_string())
            .field("materialized", &self.lines.is_some())
            .field("cursor", &self.cursor)
            .field("offset", &self.offset)
            .finish()
    }
}

impl SqlConfFile {
    /// Parse `path` into a session without touching the database.
    ///
    /// Paths not starting with `scheme` are rejected before any parsing.
    pub fn open(path: &str, scheme: &str, connector: Arc<dyn Connector>) -> VfsResult<Self> {
        if !path.starts_with(scheme) {
            return Err(VfsError::SourceMismatch {
                path: path.to_string(),
                scheme: scheme.to_string(),
            });
        }

        let descriptor = DescriptorSpec::parse(path)?;
        log::debug!("opened {}", descriptor);
        Ok(Self {
            descriptor,
            connector,
            lines: None,
            cursor: 0,
            offset: 0,
        })
    }

    pub fn descriptor(&self) -> &DescriptorSpec {
        &self.descriptor
    }

    /// Whether the first read already ran
    pub fn is_materialized(&self) -> bool {
        self.lines.is_some()
    }

    /// Lines fully delivered so far
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Return the next chunk of at most `max_bytes` bytes.
    ///
    /// The first call connects and materializes. A failure there is
    /// returned and leaves the session unmaterialized.
    pub fn read_next(&mut self, max_bytes: usize) -> VfsResult<ReadChunk<'_>> {
        if max_bytes == 0 {
            return Err(VfsError::ZeroCapacity);
        }

        let lines = match self.lines.take() {
            Some(lines) => lines,
            None => self.materialize()?,
        };
        let lines = self.lines.insert(lines);

        let Some(line) = lines.line(self.cursor) else {
            return Ok(ReadChunk::EndOfData);
        };

        let pending = &line.as_bytes()[self.offset..];
        let take = pending.len().min(max_bytes);
        log::trace!(
            "line {}: delivering bytes {}..{}",
            self.cursor,
            self.offset,
            self.offset + take
        );
        if take == pending.len() {
            self.cursor += 1;
            self.offset = 0;
        } else {
            self.offset += take;
        }
        Ok(ReadChunk::Data(&pending[..take]))
    }

    fn materialize(&self) -> VfsResult<RenderedConfig> {
        let gateway = self
            .connector
            .connect(&self.descriptor.connection)
            .map_err(VfsError::Connect)?;
        let result = TreeMaterializer::new(&self.descriptor, gateway.as_ref()).run()?;

        log::info!(
            "materialized {} lines ({} bytes) from {} contexts using {} queries",
            result.lines.len(),
            result.lines.byte_len(),
            result.stats.contexts,
            result.stats.queries
        );
        Ok(result.lines)
    }
}

impl io::Read for SqlConfFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        match self.read_next(buf.len()).map_err(io::Error::other)? {
            ReadChunk::Data(data) => {
                buf[..data.len()].copy_from_slice(data);
                Ok(data.len())
            }
            ReadChunk::EndOfData => Ok(0),
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
