//! Record sinks.
//!
//! A sink with a `limit` stops accepting records once that many have been
//! written; callers check [`Sink::is_full`] to stop pulling upstream.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::core::errors::{FocalcovError, Result};

/// Append-only record destination.
pub trait Sink<T>: Send {
    /// Append `record`. Returns `false` without writing when the sink is full.
    fn write(&mut self, record: &T) -> Result<bool>;

    /// Records written so far
    fn written(&self) -> usize;

    /// Maximum number of records, if bounded
    fn limit(&self) -> Option<usize>;

    /// Flush buffered records.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// Whether the limit has been reached
    fn is_full(&self) -> bool {
        self.limit().map_or(false, |limit| self.written() >= limit)
    }
}

/// Writes one JSON record per line.
pub struct JsonLinesSink {
    path: PathBuf,
    writer: BufWriter<File>,
    limit: Option<usize>,
    written: usize,
}

impl JsonLinesSink {
    /// Create (truncating) the file at `path`, creating parent directories.
    pub fn create(path: impl Into<PathBuf>, limit: Option<usize>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                FocalcovError::io(format!("Failed to create {}", parent.display()), e)
            })?;
        }
        let file = File::create(&path)
            .map_err(|e| FocalcovError::io(format!("Failed to create {}", path.display()), e))?;
        debug!("Writing records to {}", path.display());

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            limit,
            written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T: Serialize> Sink<T> for JsonLinesSink {
    fn write(&mut self, record: &T) -> Result<bool> {
        if Sink::<T>::is_full(self) {
            return Ok(false);
        }
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(true)
    }

    fn written(&self) -> usize {
        self.written
    }

    fn limit(&self) -> Option<usize> {
        self.limit
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

impl Drop for JsonLinesSink {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

/// Collects records in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink<T> {
    records: Vec<T>,
    limit: Option<usize>,
}

impl<T> MemorySink<T> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            limit: None,
        }
    }

    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            records: Vec::new(),
            limit,
        }
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn into_records(self) -> Vec<T> {
        self.records
    }
}

impl<T: Clone + Send> Sink<T> for MemorySink<T> {
    fn write(&mut self, record: &T) -> Result<bool> {
        if self.is_full() {
            return Ok(false);
        }
        self.records.push(record.clone());
        Ok(true)
    }

    fn written(&self) -> usize {
        self.records.len()
    }

    fn limit(&self) -> Option<usize> {
        self.limit
    }
}
