//! Maven projects, driven through `mvn` goals.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{as_directory_entry, run_build_tool, split_classpath, BuildTool, Project};
use crate::core::errors::Result;

/// Build directories appended after the dependency classpath, in order.
const BUILD_DIRECTORY_EXPRESSIONS: &[&str] = &[
    "project.build.outputDirectory",
    "project.build.testOutputDirectory",
    "project.build.resources[0].directory",
    "project.build.testResources[0].directory",
];

#[derive(Debug, Clone)]
pub struct MavenProject {
    root_dir: PathBuf,
    project_dir: PathBuf,
}

impl MavenProject {
    pub fn new(root_dir: impl Into<PathBuf>, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            project_dir: project_dir.into(),
        }
    }

    async fn mvn(&self, args: &[&str], capture: bool) -> Result<String> {
        let args: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
        run_build_tool(BuildTool::Maven, &args, &self.project_dir, capture).await
    }

    /// Evaluate a POM expression, e.g. `project.build.outputDirectory`.
    pub async fn evaluate(&self, expression: &str) -> Result<String> {
        let expression = format!("-Dexpression={expression}");
        let stdout = self
            .mvn(&["help:evaluate", &expression, "-q", "-DforceStdout"], true)
            .await?;
        Ok(stdout.trim().to_string())
    }
}

/// Arguments printing the dependency classpath on stdout.
pub fn build_classpath_args() -> [&'static str; 3] {
    [
        "dependency:build-classpath",
        "-Dmdep.outputFile=/dev/stdout",
        "-q",
    ]
}

#[async_trait]
impl Project for MavenProject {
    fn tool(&self) -> BuildTool {
        BuildTool::Maven
    }

    fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    async fn compile(&self) -> Result<()> {
        self.mvn(&["clean", "test-compile"], false).await?;
        Ok(())
    }

    async fn find_classpath_pathnames(&self) -> Result<Vec<String>> {
        let stdout = self.mvn(&build_classpath_args(), true).await?;
        let mut pathnames = split_classpath(&stdout);
        for expression in BUILD_DIRECTORY_EXPRESSIONS {
            let dir = self.evaluate(expression).await?;
            pathnames.push(as_directory_entry(&dir));
        }
        Ok(pathnames)
    }

    async fn find_focal_classpath(&self) -> Result<String> {
        let dir = self.evaluate(BUILD_DIRECTORY_EXPRESSIONS[0]).await?;
        Ok(as_directory_entry(&dir))
    }
}
