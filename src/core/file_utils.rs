//! File utilities for reading source files and walking repository trees.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::core::errors::{FocalcovError, Result};

/// Directories never descended into while enumerating sources.
const SKIPPED_DIRS: &[&str] = &[".git", ".gradle", ".idea", "node_modules"];

/// Safe file reading with UTF-8 validation and fallback handling
pub struct FileReader;

impl FileReader {
    /// Read a file to string, handling non-UTF-8 files gracefully
    pub fn read_to_string(file_path: &Path) -> Result<String> {
        match fs::read_to_string(file_path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                let bytes = fs::read(file_path)
                    .map_err(|err| FocalcovError::io("Failed to read file as bytes", err))?;

                let content = String::from_utf8_lossy(&bytes).to_string();
                warn!(
                    "File contained invalid UTF-8, converted with lossy encoding: {}",
                    file_path.display()
                );
                Ok(content)
            }
            Err(e) => Err(FocalcovError::io(
                format!("Failed to read file: {}", file_path.display()),
                e,
            )),
        }
    }

    /// Whether the file's text contains `token`. Unreadable files never do.
    pub fn contains_token(file_path: &Path, token: &str) -> bool {
        match Self::read_to_string(file_path) {
            Ok(content) => content.contains(token),
            Err(e) => {
                debug!("Skipping unreadable file {}: {}", file_path.display(), e);
                false
            }
        }
    }
}

/// Enumerate files under `root` with the given extension (no dot), as
/// `/`-separated paths relative to `root`, sorted.
pub fn list_source_files(root: &Path, extension: &str) -> Result<Vec<String>> {
    list_source_files_excluding(root, extension, &[])
}

/// Like [`list_source_files`], without descending into any directory in
/// `excluded` (nested modules owned by another project).
pub fn list_source_files_excluding(
    root: &Path,
    extension: &str,
    excluded: &[PathBuf],
) -> Result<Vec<String>> {
    if !root.is_dir() {
        return Err(FocalcovError::validation_field(
            format!("Not a directory: {}", root.display()),
            "root",
        ));
    }

    let mut files: Vec<String> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !is_skipped_dir(entry) && !is_excluded_dir(entry, excluded))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Error walking {}: {}", root.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext == extension)
        })
        .filter_map(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .ok()
                .map(to_slash_path)
        })
        .collect();

    files.sort();
    Ok(files)
}

/// Render a relative path with `/` separators regardless of platform.
pub fn to_slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Join a `/`-separated relative path onto `root`.
pub fn resolve_relative(root: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .filter(|segment| !segment.is_empty())
        .fold(root.to_path_buf(), |acc, segment| acc.join(segment))
}

fn is_excluded_dir(entry: &DirEntry, excluded: &[PathBuf]) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && excluded.iter().any(|dir| dir.as_path() == entry.path())
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}
