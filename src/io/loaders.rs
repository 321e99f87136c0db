//! Record loaders.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::core::errors::{FocalcovError, FocalcovResultExt, Result};

/// Lazy, single-pass stream of records.
pub type RecordStream<'a, T> = Box<dyn Iterator<Item = Result<T>> + Send + 'a>;

/// Source of input records.
pub trait Loader<T>: Send + Sync {
    /// Open a fresh stream over the records.
    fn load(&self) -> Result<RecordStream<'_, T>>;
}

/// Reads one JSON record per non-blank line of a file.
#[derive(Debug, Clone)]
pub struct JsonLinesLoader<T> {
    path: PathBuf,
    _record: PhantomData<fn() -> T>,
}

impl<T> JsonLinesLoader<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T: DeserializeOwned + Send> Loader<T> for JsonLinesLoader<T> {
    fn load(&self) -> Result<RecordStream<'_, T>> {
        let file = File::open(&self.path).map_err(|e| {
            FocalcovError::io(format!("Failed to open {}", self.path.display()), e)
        })?;
        let path = self.path.display().to_string();

        let records = BufReader::new(file)
            .lines()
            .enumerate()
            .filter(|(_, line)| !matches!(line, Ok(text) if text.trim().is_empty()))
            .map(move |(index, line)| {
                let line = line.map_err(|e| {
                    FocalcovError::io(format!("Failed to read {}:{}", path, index + 1), e)
                })?;
                serde_json::from_str(&line)
                    .map_json_err(&format!("parsing record at {}:{}", path, index + 1))
            });
        Ok(Box::new(records))
    }
}

/// Serves records from memory, cloning them on every load.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader<T> {
    records: Vec<T>,
}

impl<T> MemoryLoader<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self { records }
    }
}

impl<T: Clone + Send + Sync> Loader<T> for MemoryLoader<T> {
    fn load(&self) -> Result<RecordStream<'_, T>> {
        Ok(Box::new(self.records.iter().cloned().map(Ok)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Row {
        max_stars_repo_name: String,
    }

    #[test]
    fn test_jsonl_skips_blank_lines() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"max_stars_repo_name":"user1/repo1","size":10}}"#).unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"max_stars_repo_name":"user2/repo2"}}"#).unwrap();

        let loader = JsonLinesLoader::<Row>::new(file.path());
        let rows: Vec<Row> = loader.load().unwrap().map(|r| r.unwrap()).collect();
        assert_eq!(
            rows.iter().map(|r| r.max_stars_repo_name.as_str()).collect::<Vec<_>>(),
            vec!["user1/repo1", "user2/repo2"]
        );
    }

    #[test]
    fn test_jsonl_bad_line_reports_position() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"max_stars_repo_name":"user1/repo1"}}"#).unwrap();
        writeln!(file, "not json").unwrap();

        let loader = JsonLinesLoader::<Row>::new(file.path());
        let results: Vec<_> = loader.load().unwrap().collect();
        assert!(results[0].is_ok());
        let err = results[1].as_ref().unwrap_err();
        assert!(matches!(err, FocalcovError::Serialization { .. }));
        assert!(err.to_string().contains(":2"));
    }

    #[test]
    fn test_jsonl_missing_file() {
        let loader = JsonLinesLoader::<Row>::new("/nonexistent/input.jsonl");
        assert!(matches!(loader.load(), Err(FocalcovError::Io { .. })));
    }

    #[test]
    fn test_memory_loader_reloads() {
        let loader = MemoryLoader::new(vec![1, 2, 3]);
        let first: Vec<i32> = loader.load().unwrap().map(|r| r.unwrap()).collect();
        let second: Vec<i32> = loader.load().unwrap().map(|r| r.unwrap()).collect();
        assert_eq!(first, vec![1, 2, 3]);
        assert_eq!(first, second);
    }
}
