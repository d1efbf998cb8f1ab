#![warn(missing_docs)]
//! Deterministic testing surfaces: arena fixtures, event traces, run metrics
//! and small statistics helpers.

mod fixtures;
mod metrics;
mod snapshot;
mod stats;

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

pub use fixtures::*;
pub use metrics::*;
pub use snapshot::*;
pub use stats::*;

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    file: BufWriter<File>,
    lines: usize,
}

impl JsonlSink {
    /// Create a new sink at `path`, creating parent directories if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating trace directory {}", parent.display()))?;
        }
        let file = File::create(path)
            .with_context(|| format!("creating trace file {}", path.display()))?;
        debug!(path = %path.display(), "trace sink opened");
        Ok(Self {
            file: BufWriter::new(file),
            lines: 0,
        })
    }

    /// Append one record.
    pub fn write<T: Serialize>(&mut self, record: &T) -> Result<()> {
        let line = serde_json::to_string(record)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        self.lines += 1;
        Ok(())
    }

    /// Append every record of a batch.
    pub fn write_all<'a, T: Serialize + 'a>(&mut self, records: impl IntoIterator<Item = &'a T>) -> Result<()> {
        for record in records {
            self.write(record)?;
        }
        Ok(())
    }

    /// Records written so far.
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Flush buffered lines to disk.
    pub fn flush(&mut self) -> Result<()> {
        self.file.flush()?;
        Ok(())
    }
}
