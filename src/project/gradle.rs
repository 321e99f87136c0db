//! Gradle projects, queried through an init script registering helper tasks.

use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::sync::OnceCell;

use super::{as_directory_entry, run_build_tool, split_classpath, BuildTool, Project};
use crate::core::errors::{FocalcovError, Result};

/// Registered on every project of the build.
pub const INIT_SCRIPT: &str = r#"allprojects {
    tasks.register("findProjectDir") {
        println(projectDir)
    }
    tasks.register("listSubprojectPaths") {
        for (subproject in project.subprojects) {
            println(subproject.path)
        }
    }
    tasks.register("buildMainRuntimeClasspath") {
        println(project.the<SourceSetContainer>()["main"].runtimeClasspath.asPath)
    }
    tasks.register("buildTestRuntimeClasspath") {
        println(project.the<SourceSetContainer>()["test"].runtimeClasspath.asPath)
    }
}
"#;

/// The init script written to a temporary `.gradle.kts` file.
#[derive(Debug)]
pub struct GradleInitScript {
    file: NamedTempFile,
}

impl GradleInitScript {
    pub fn write() -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("focalcov-init-")
            .suffix(".gradle.kts")
            .tempfile()?;
        file.write_all(INIT_SCRIPT.as_bytes())?;
        file.flush()?;
        Ok(Self { file })
    }

    /// Write a script that several projects can hold on to.
    pub fn shared() -> Result<Arc<Self>> {
        Ok(Arc::new(Self::write()?))
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[derive(Debug)]
pub struct GradleProject {
    root_dir: PathBuf,
    project_dir: PathBuf,
    project_path: String,
    init_script: Arc<GradleInitScript>,
    test_classpath: OnceCell<Vec<String>>,
}

impl GradleProject {
    /// Create a project with its own init script.
    pub fn new(root_dir: impl Into<PathBuf>, project_dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::with_init_script(
            root_dir,
            project_dir,
            GradleInitScript::shared()?,
        ))
    }

    pub fn with_init_script(
        root_dir: impl Into<PathBuf>,
        project_dir: impl Into<PathBuf>,
        init_script: Arc<GradleInitScript>,
    ) -> Self {
        let root_dir = root_dir.into();
        let project_dir = project_dir.into();
        let project_path = gradle_project_path(&root_dir, &project_dir);
        Self {
            root_dir,
            project_dir,
            project_path,
            init_script,
            test_classpath: OnceCell::new(),
        }
    }

    /// Gradle path of the project, `""` for the root project.
    pub fn project_path(&self) -> &str {
        &self.project_path
    }

    fn task(&self, name: &str) -> String {
        format!("{}:{name}", self.project_path)
    }

    async fn gradle(&self, args: Vec<String>, capture: bool) -> Result<String> {
        run_build_tool(BuildTool::Gradle, &args, &self.root_dir, capture).await
    }

    async fn query(&self, task: &str) -> Result<String> {
        let script = self.init_script.path().display().to_string();
        self.gradle(
            vec!["-q".to_string(), "--init-script".to_string(), script, self.task(task)],
            true,
        )
        .await
    }

    async fn test_classpath(&self) -> Result<&Vec<String>> {
        self.test_classpath
            .get_or_try_init(|| async {
                let stdout = self.query("buildTestRuntimeClasspath").await?;
                Ok::<_, FocalcovError>(parse_classpath_output(&stdout))
            })
            .await
    }
}

/// Gradle path of `project_dir` relative to the build root: `app/core`
/// maps to `:app:core`, the root itself to `""`.
pub fn gradle_project_path(root_dir: &Path, project_dir: &Path) -> String {
    project_dir
        .strip_prefix(root_dir)
        .map(|relative| {
            relative
                .components()
                .filter_map(|component| match component {
                    Component::Normal(name) => Some(format!(":{}", name.to_string_lossy())),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// First line of a classpath task's output; directory entries get a
/// trailing separator, jars are kept as is.
pub fn parse_classpath_output(stdout: &str) -> Vec<String> {
    let line = stdout.lines().next().unwrap_or_default();
    split_classpath(line)
        .into_iter()
        .map(|entry| {
            if entry.ends_with(".jar") {
                entry
            } else {
                as_directory_entry(&entry)
            }
        })
        .collect()
}

/// First entry that looks like compiled production classes.
pub fn select_focal_classpath(pathnames: &[String]) -> Option<String> {
    pathnames
        .iter()
        .find(|pathname| pathname.contains("main") && pathname.contains("classes"))
        .map(|pathname| as_directory_entry(pathname))
}

#[async_trait]
impl Project for GradleProject {
    fn tool(&self) -> BuildTool {
        BuildTool::Gradle
    }

    fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    async fn compile(&self) -> Result<()> {
        self.gradle(vec![self.task("clean"), self.task("testClasses")], false)
            .await?;
        Ok(())
    }

    async fn find_classpath_pathnames(&self) -> Result<Vec<String>> {
        Ok(self.test_classpath().await?.clone())
    }

    async fn find_focal_classpath(&self) -> Result<String> {
        let pathnames = self.test_classpath().await?;
        select_focal_classpath(pathnames).ok_or_else(|| {
            FocalcovError::project(
                BuildTool::Gradle.as_str(),
                format!("no main classes directory on the test classpath of `{}`", self.project_path),
            )
            .in_project_dir(self.project_dir.display().to_string())
        })
    }
}
