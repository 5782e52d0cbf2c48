//! Cat command implementation

use anyhow::{Context, Result};
use sqlconf_vfs::SqlConfFs;
use std::io::{self, Read, Write};

use crate::cli::{CatArgs, GlobalArgs};
use crate::commands::common::{build_connector, load_settings};

/// Execute the cat command
pub fn execute(args: &CatArgs, global: &GlobalArgs) -> Result<()> {
    let settings = load_settings(global)?;
    let buffer_size = args.buffer_size.unwrap_or(settings.config.read_capacity);
    if buffer_size == 0 {
        anyhow::bail!("--buffer-size must be greater than zero");
    }

    let fs = SqlConfFs::from_config(&settings.config, build_connector(global, &settings));
    let mut source = fs
        .open(&args.path)
        .with_context(|| format!("Failed to open {}", args.path))?;

    if global.verbose {
        eprintln!(
            "[verbose] Reading {:?} source in {} byte chunks",
            source.kind(),
            buffer_size
        );
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let (reads, bytes) = copy_chunked(&mut source, &mut out, buffer_size)
        .with_context(|| format!("Failed to read {}", args.path))?;
    out.flush()?;

    if global.verbose {
        eprintln!("[verbose] {} reads, {} bytes", reads, bytes);
    }

    Ok(())
}

/// Copy `reader` to `writer` using reads of at most `buffer_size` bytes.
///
/// Returns the number of non-empty reads and the bytes copied.
pub(crate) fn copy_chunked<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    buffer_size: usize,
) -> io::Result<(usize, usize)> {
    let mut buf = vec![0u8; buffer_size];
    let mut reads = 0;
    let mut bytes = 0;
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            return Ok((reads, bytes));
        }
        writer.write_all(&buf[..n])?;
        reads += 1;
        bytes += n;
    }
}

#[cfg(test)]
#[path = "cat_test.rs"]
mod tests;
