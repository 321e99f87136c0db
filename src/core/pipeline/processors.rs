//! Record-level processors that need no collaborators.

use std::marker::PhantomData;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Processor, RunContext};
use crate::core::errors::Result;
use crate::curation::TrainingSample;
use crate::io::Sink;
use crate::project::github_url;

/// Dataset row naming a repository; other columns are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRow {
    pub max_stars_repo_name: String,
}

/// A repository to mine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    /// `owner/name`
    #[serde(default)]
    pub repository_name: String,
    pub repository_url: String,
}

impl RepositoryRecord {
    /// Record for a GitHub `owner/name`.
    pub fn from_name(repository_name: impl Into<String>) -> Self {
        let repository_name = repository_name.into();
        Self {
            repository_url: github_url(&repository_name),
            repository_name,
        }
    }
}

/// Emits each repository named by the dataset once.
#[derive(Debug, Clone, Copy, Default)]
pub struct RepositoryNameProcessor;

#[async_trait]
impl Processor for RepositoryNameProcessor {
    type Input = RepositoryRow;
    type Output = RepositoryRecord;

    fn name(&self) -> &'static str {
        "repositories"
    }

    async fn process(
        &self,
        record: RepositoryRow,
        ctx: &RunContext,
        sink: &mut dyn Sink<RepositoryRecord>,
    ) -> Result<()> {
        if !ctx.admit_repository(&record.max_stars_repo_name) {
            debug!("Duplicate repository {}", record.max_stars_repo_name);
            return Ok(());
        }
        sink.write(&RepositoryRecord::from_name(record.max_stars_repo_name))?;
        Ok(())
    }
}

/// Drops training samples whose body triplet was already emitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniqueSamplesProcessor;

#[async_trait]
impl Processor for UniqueSamplesProcessor {
    type Input = TrainingSample;
    type Output = TrainingSample;

    fn name(&self) -> &'static str {
        "unique-samples"
    }

    async fn process(
        &self,
        record: TrainingSample,
        ctx: &RunContext,
        sink: &mut dyn Sink<TrainingSample>,
    ) -> Result<()> {
        if ctx.admit_sample(&record) {
            sink.write(&record)?;
        }
        Ok(())
    }
}

/// Copies records unchanged.
pub struct IdentityProcessor<T> {
    _record: PhantomData<fn() -> T>,
}

impl<T> Default for IdentityProcessor<T> {
    fn default() -> Self {
        Self {
            _record: PhantomData,
        }
    }
}

impl<T> IdentityProcessor<T> {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl<T: Send + 'static> Processor for IdentityProcessor<T> {
    type Input = T;
    type Output = T;

    fn name(&self) -> &'static str {
        "copy"
    }

    async fn process(&self, record: T, _ctx: &RunContext, sink: &mut dyn Sink<T>) -> Result<()> {
        sink.write(&record)?;
        Ok(())
    }
}
