//! Repository cloning.

use std::fs;
use std::path::{Path, PathBuf};

use git2::Repository;
use tempfile::TempDir;
use tracing::info;

use crate::core::errors::{FocalcovError, FocalcovResultExt, Result};
use crate::curation::RepositoryRef;

/// A repository cloned into a temporary directory, removed on drop.
#[derive(Debug)]
pub struct ClonedRepository {
    dir: TempDir,
    url: String,
    revision: String,
}

impl ClonedRepository {
    /// Working tree of the clone
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// URL the clone was made from
    pub fn url(&self) -> &str {
        &self.url
    }

    /// HEAD commit of the clone
    pub fn revision(&self) -> &str {
        &self.revision
    }

    /// URL and revision as stamped on training samples
    pub fn reference(&self) -> RepositoryRef {
        RepositoryRef {
            url: self.url.clone(),
            revision: self.revision.clone(),
        }
    }
}

/// Clone `url` into a fresh directory under `work_dir` (system temp dir when `None`).
pub async fn clone_repository(url: &str, work_dir: Option<&Path>) -> Result<ClonedRepository> {
    let url = url.to_string();
    let work_dir: Option<PathBuf> = work_dir.map(Path::to_path_buf);
    tokio::task::spawn_blocking(move || clone_blocking(&url, work_dir.as_deref()))
        .await
        .map_generic_err("joining clone task")?
}

fn clone_blocking(url: &str, work_dir: Option<&Path>) -> Result<ClonedRepository> {
    let builder = {
        let mut builder = tempfile::Builder::new();
        builder.prefix("focalcov-");
        builder
    };
    let dir = match work_dir {
        Some(parent) => {
            fs::create_dir_all(parent).map_err(|e| {
                FocalcovError::io(format!("Failed to create {}", parent.display()), e)
            })?;
            builder.tempdir_in(parent)?
        }
        None => builder.tempdir()?,
    };

    info!("Cloning {} into {}", url, dir.path().display());
    let repository = Repository::clone(url, dir.path())
        .map_err(|e| FocalcovError::from(e).for_url(url).with_context("clone failed"))?;
    let revision = head_revision(&repository).map_err(|e| e.for_url(url))?;

    Ok(ClonedRepository {
        dir,
        url: url.to_string(),
        revision,
    })
}

/// Hex id of the commit HEAD points at.
pub fn head_revision(repository: &Repository) -> Result<String> {
    let commit = repository.head()?.peel_to_commit()?;
    Ok(commit.id().to_string())
}

/// GitHub URL for an `owner/name` repository identifier.
pub fn github_url(repository_name: &str) -> String {
    format!("https://github.com/{repository_name}")
}
