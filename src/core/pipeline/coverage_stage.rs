//! Coverage sampling stage: repository → projects → focal-method samples →
//! oracle coverage → training samples.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::processors::RepositoryRecord;
use super::{Processor, RunContext};
use crate::core::config::FocalcovConfig;
use crate::core::errors::Result;
use crate::curation::coverage::class_context;
use crate::curation::{
    generate_samples, CoveredFocalMethodSample, FocalMethodFinder, FocalMethodSample,
    RepositoryRef, TrainingSample,
};
use crate::io::Sink;
use crate::oracle::{create_oracle, CoverageOracle, CreateCoverageRequest};
use crate::project::{clone_repository, discover_projects, nested_module_dirs, Project};

/// Mines training samples from each repository record.
///
/// A repository that cannot be cloned, or a project that fails to build or
/// resolve its classpath, is skipped with a warning.
pub struct CoverageSamplesProcessor {
    config: FocalcovConfig,
    oracle: Arc<dyn CoverageOracle>,
}

impl CoverageSamplesProcessor {
    /// Create a processor asking `oracle` for coverage.
    pub fn new(config: FocalcovConfig, oracle: Arc<dyn CoverageOracle>) -> Self {
        Self { config, oracle }
    }

    /// Build the processor with the oracle backend named by `config`.
    pub fn from_config(config: FocalcovConfig) -> Result<Self> {
        let oracle = create_oracle(&config.oracle)?;
        Ok(Self::new(config, oracle))
    }

    /// Compile `project`, find its focal-method samples, and write the
    /// resulting training samples. Returns how many were written.
    pub async fn process_project(
        &self,
        project: &dyn Project,
        repository: &RepositoryRef,
        ctx: &RunContext,
        sink: &mut dyn Sink<TrainingSample>,
    ) -> Result<usize> {
        self.process_project_excluding(project, &[], repository, ctx, sink)
            .await
    }

    /// [`Self::process_project`] for one module of a multi-module build.
    /// Sources under `excluded` belong to other modules and are not mined.
    pub async fn process_project_excluding(
        &self,
        project: &dyn Project,
        excluded: &[PathBuf],
        repository: &RepositoryRef,
        ctx: &RunContext,
        sink: &mut dyn Sink<TrainingSample>,
    ) -> Result<usize> {
        let project_dir = project.project_dir().display().to_string();
        if self.config.pipeline.compile {
            info!("Compiling {} project {}", project.tool(), project_dir);
            project.compile().await?;
        }
        let classpath = project.find_classpath_pathnames().await?;
        let focal_classpath = project.find_focal_classpath().await?;
        debug!(
            "{}: {} classpath entries, focal classes in {}",
            project_dir,
            classpath.len(),
            focal_classpath
        );

        let samples = {
            let mut finder = FocalMethodFinder::from_config(&self.config)?;
            finder.find_focal_method_samples_excluding(project.project_dir(), excluded)
        };
        info!("{}: {} focal-method samples", project_dir, samples.len());

        let mut written = 0;
        for sample in &samples {
            let covered = self.cover_sample(sample, &classpath, &focal_classpath).await;
            for training in generate_samples(repository.clone(), covered) {
                if !ctx.admit_sample(&training) {
                    continue;
                }
                if !sink.write(&training)? {
                    return Ok(written);
                }
                written += 1;
            }
        }
        Ok(written)
    }

    /// Ask the oracle for the coverage of every test in `sample`.
    ///
    /// Tests whose request fails are left out of the result.
    pub async fn cover_sample(
        &self,
        sample: &FocalMethodSample,
        classpath: &[String],
        focal_classpath: &str,
    ) -> CoveredFocalMethodSample {
        let focal = &sample.focal_method;
        let mut covered = CoveredFocalMethodSample::for_focal(focal);
        let focal_class_name = covered.focal_class.qualified();

        for test in &sample.test_methods {
            let (_, test_class) = class_context(test);
            let request = CreateCoverageRequest {
                classpath_pathnames: classpath.to_vec(),
                focal_classpath: focal_classpath.to_string(),
                focal_class_name: focal_class_name.clone(),
                test_class_name: test_class.qualified(),
                test_method_name: test.identifier.clone(),
            };

            match self.oracle.create_coverage(&request).await {
                Ok(coverage) => covered.push_test(focal, test, &coverage.covered_line_numbers),
                Err(e) => warn!(
                    "Coverage of {}#{} failed ({}): {}",
                    request.test_class_name,
                    request.test_method_name,
                    self.oracle.backend(),
                    e
                ),
            }
        }
        covered
    }
}

#[async_trait]
impl Processor for CoverageSamplesProcessor {
    type Input = RepositoryRecord;
    type Output = TrainingSample;

    fn name(&self) -> &'static str {
        "coverage-samples"
    }

    async fn process(
        &self,
        record: RepositoryRecord,
        ctx: &RunContext,
        sink: &mut dyn Sink<TrainingSample>,
    ) -> Result<()> {
        let clone = clone_repository(
            &record.repository_url,
            self.config.pipeline.work_dir.as_deref(),
        )
        .await?;
        let repository = clone.reference();
        let projects = discover_projects(clone.path())?;
        info!(
            "{} at {}: {} project(s)",
            repository.url,
            repository.revision,
            projects.len()
        );

        let module_dirs: Vec<PathBuf> = projects
            .iter()
            .map(|project| project.project_dir().to_path_buf())
            .collect();

        for project in &projects {
            if sink.is_full() {
                break;
            }
            let excluded = nested_module_dirs(project.project_dir(), &module_dirs);
            match self
                .process_project_excluding(project.as_ref(), &excluded, &repository, ctx, sink)
                .await
            {
                Ok(written) => debug!(
                    "{}: wrote {} samples",
                    project.project_dir().display(),
                    written
                ),
                Err(e) => warn!(
                    "Skipping project {} of {}: {}",
                    project.project_dir().display(),
                    repository.url,
                    e
                ),
            }
        }
        Ok(())
    }
}
