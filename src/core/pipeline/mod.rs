//! Record-processing pipelines.
//!
//! A run pulls records from a [`Loader`], hands each to a [`Processor`],
//! and lets the processor append its outputs to a [`Sink`]. Records are
//! processed one at a time; a failure on one record is logged and the run
//! moves on to the next.
//!
//! ## Processors
//!
//! - [`RepositoryNameProcessor`]: dataset rows → unique repository records
//! - [`CoverageSamplesProcessor`]: repository records → training samples
//! - [`UniqueSamplesProcessor`]: training samples → deduplicated samples
//! - [`IdentityProcessor`]: copies records unchanged
//!
//! ## Usage
//!
//! ```ignore
//! use focalcov_rs::core::pipeline::{run_processor, RepositoryNameProcessor, RunContext};
//! use focalcov_rs::io::{JsonLinesLoader, JsonLinesSink};
//!
//! let loader = JsonLinesLoader::new("the-stack.jsonl");
//! let mut sink = JsonLinesSink::create("repositories.jsonl", None)?;
//! let stats = run_processor(&RepositoryNameProcessor, &loader, &mut sink, &RunContext::default()).await?;
//! ```

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use crate::core::config::FocalcovConfig;
use crate::core::errors::Result;
use crate::curation::{RepositoryNameFilter, SampleTripletFilter, TrainingSample};
use crate::io::{Loader, Sink};

mod coverage_stage;
mod processors;

pub use coverage_stage::CoverageSamplesProcessor;
pub use processors::{
    IdentityProcessor, RepositoryNameProcessor, RepositoryRecord, RepositoryRow,
    UniqueSamplesProcessor,
};

/// State shared by every record of one run.
#[derive(Debug)]
pub struct RunContext {
    repository_names: RepositoryNameFilter,
    sample_triplets: SampleTripletFilter,
    deduplicate: bool,
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new(true)
    }
}

impl RunContext {
    /// Create a context; with `deduplicate` unset every sample is admitted.
    pub fn new(deduplicate: bool) -> Self {
        Self {
            repository_names: RepositoryNameFilter::new(),
            sample_triplets: SampleTripletFilter::new(),
            deduplicate,
        }
    }

    /// Create a context honouring `pipeline.deduplicate`.
    pub fn from_config(config: &FocalcovConfig) -> Self {
        Self::new(config.pipeline.deduplicate)
    }

    /// `true` the first time a repository name is seen.
    pub fn admit_repository(&self, name: &str) -> bool {
        self.repository_names.admit(name.to_string())
    }

    /// `true` unless an identical body triplet was already admitted.
    pub fn admit_sample(&self, sample: &TrainingSample) -> bool {
        !self.deduplicate || self.sample_triplets.admit(sample)
    }

    /// Distinct repository names seen
    pub fn repository_count(&self) -> usize {
        self.repository_names.len()
    }

    /// Distinct sample triplets seen
    pub fn sample_count(&self) -> usize {
        self.sample_triplets.len()
    }
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Records pulled from the loader
    pub loaded: usize,
    /// Records processed without error
    pub processed: usize,
    /// Records that failed to load or process
    pub failed: usize,
    /// Records appended to the sink
    pub written: usize,
}

/// Turns one input record into zero or more output records.
#[async_trait]
pub trait Processor: Send + Sync {
    type Input: Send;
    type Output: Send;

    /// Name used in log lines
    fn name(&self) -> &'static str;

    /// Process `record`, writing outputs to `sink`.
    async fn process(
        &self,
        record: Self::Input,
        ctx: &RunContext,
        sink: &mut dyn Sink<Self::Output>,
    ) -> Result<()>;
}

/// Drive `processor` over every record of `loader` until the loader is
/// exhausted or `sink` is full.
pub async fn run_processor<P: Processor>(
    processor: &P,
    loader: &dyn Loader<P::Input>,
    sink: &mut dyn Sink<P::Output>,
    ctx: &RunContext,
) -> Result<RunStats> {
    let mut stats = RunStats::default();
    let written_before = sink.written();

    for record in loader.load()? {
        if sink.is_full() {
            info!("{}: sink limit reached, stopping", processor.name());
            break;
        }
        stats.loaded += 1;

        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!("{}: skipping unreadable record: {}", processor.name(), e);
                stats.failed += 1;
                continue;
            }
        };

        match processor.process(record, ctx, sink).await {
            Ok(()) => stats.processed += 1,
            Err(e) => {
                warn!("{}: record failed: {}", processor.name(), e);
                stats.failed += 1;
            }
        }
    }

    sink.flush()?;
    stats.written = sink.written() - written_before;
    info!(
        "{}: loaded {}, processed {}, failed {}, wrote {}",
        processor.name(),
        stats.loaded,
        stats.processed,
        stats.failed,
        stats.written
    );
    Ok(stats)
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
