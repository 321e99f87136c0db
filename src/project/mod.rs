//! Build-tool collaborators: cloning repositories and resolving the
//! classpaths of the Maven or Gradle projects inside them.

pub mod gradle;
pub mod maven;
pub mod repository;

use std::fmt;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;
use walkdir::WalkDir;

use crate::core::errors::{FocalcovError, Result};

pub use gradle::{GradleInitScript, GradleProject};
pub use maven::MavenProject;
pub use repository::{clone_repository, github_url, ClonedRepository};

/// Directories never searched for module build files.
const SKIPPED_DIRS: &[&str] = &[
    ".git",
    ".gradle",
    ".idea",
    ".mvn",
    "build",
    "node_modules",
    "out",
    "src",
    "target",
];

/// Supported build tools
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildTool {
    Maven,
    Gradle,
}

impl BuildTool {
    /// Executable name
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildTool::Maven => "mvn",
            BuildTool::Gradle => "gradle",
        }
    }

    /// Build file names marking a module directory.
    pub fn build_files(&self) -> &'static [&'static str] {
        match self {
            BuildTool::Maven => &["pom.xml"],
            BuildTool::Gradle => &["build.gradle", "build.gradle.kts"],
        }
    }

    fn marks(&self, dir: &Path) -> bool {
        self.build_files().iter().any(|name| dir.join(name).is_file())
    }
}

impl fmt::Display for BuildTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One independently buildable module of a repository.
#[async_trait]
pub trait Project: Send + Sync + fmt::Debug {
    /// Build tool driving this project
    fn tool(&self) -> BuildTool;

    /// Root of the build the project belongs to
    fn root_dir(&self) -> &Path;

    /// Directory of the module itself
    fn project_dir(&self) -> &Path;

    /// Compile production and test sources.
    async fn compile(&self) -> Result<()>;

    /// Every classpath entry needed to run the module's tests.
    async fn find_classpath_pathnames(&self) -> Result<Vec<String>>;

    /// Output directory of the module's production classes.
    async fn find_focal_classpath(&self) -> Result<String>;
}

/// Decide which build tool a checkout uses.
///
/// A root `pom.xml` wins; otherwise any `build.gradle(.kts)` at or below
/// the root means Gradle.
pub fn detect_build_tool(root: &Path) -> Result<BuildTool> {
    if BuildTool::Maven.marks(root) {
        return Ok(BuildTool::Maven);
    }
    if BuildTool::Gradle.marks(root) {
        return Ok(BuildTool::Gradle);
    }

    let nested_gradle = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| !is_skipped(entry))
        .filter_map(|entry| entry.ok())
        .any(|entry| {
            entry.file_type().is_file()
                && BuildTool::Gradle
                    .build_files()
                    .iter()
                    .any(|name| entry.file_name() == *name)
        });
    if nested_gradle {
        return Ok(BuildTool::Gradle);
    }

    Err(FocalcovError::unsupported(format!(
        "no Maven or Gradle build file under {}",
        root.display()
    )))
}

/// Build a project for `project_dir` inside the build rooted at `root`.
pub fn create_project(root: &Path, project_dir: &Path) -> Result<Box<dyn Project>> {
    Ok(match detect_build_tool(root)? {
        BuildTool::Maven => Box::new(MavenProject::new(root, project_dir)),
        BuildTool::Gradle => Box::new(GradleProject::new(root, project_dir)?),
    })
}

/// Module directories of a build, shallowest first and sorted by path
/// within a depth. The root is always first.
pub fn find_subproject_dirs(root: &Path, tool: BuildTool) -> Vec<PathBuf> {
    let mut dirs: Vec<(usize, PathBuf)> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| !is_skipped(entry))
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_dir() && entry.depth() > 0)
        .filter(|entry| tool.marks(entry.path()))
        .map(|entry| (entry.depth(), entry.into_path()))
        .collect();
    dirs.sort();

    std::iter::once(root.to_path_buf())
        .chain(dirs.into_iter().map(|(_, dir)| dir))
        .collect()
}

/// Module directories strictly inside `project_dir`. Their sources belong
/// to those modules rather than to `project_dir`.
pub fn nested_module_dirs(project_dir: &Path, module_dirs: &[PathBuf]) -> Vec<PathBuf> {
    module_dirs
        .iter()
        .filter(|dir| dir.as_path() != project_dir && dir.starts_with(project_dir))
        .cloned()
        .collect()
}

/// One project per module directory of the checkout at `root`.
pub fn discover_projects(root: &Path) -> Result<Vec<Box<dyn Project>>> {
    let tool = detect_build_tool(root)?;
    let dirs = find_subproject_dirs(root, tool);
    debug!("Found {} {} module(s) under {}", dirs.len(), tool, root.display());

    match tool {
        BuildTool::Maven => Ok(dirs
            .iter()
            .map(|dir| Box::new(MavenProject::new(root, dir)) as Box<dyn Project>)
            .collect()),
        BuildTool::Gradle => {
            let script = GradleInitScript::shared()?;
            Ok(dirs
                .iter()
                .map(|dir| {
                    Box::new(GradleProject::with_init_script(root, dir, script.clone()))
                        as Box<dyn Project>
                })
                .collect())
        }
    }
}

fn is_skipped(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| SKIPPED_DIRS.contains(&name))
            .unwrap_or(false)
}

/// Split a `:`-separated classpath, dropping empty entries.
pub fn split_classpath(classpath: &str) -> Vec<String> {
    classpath
        .trim()
        .split(':')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Terminate a directory entry with a path separator.
pub fn as_directory_entry(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.ends_with(MAIN_SEPARATOR) {
        trimmed.to_string()
    } else {
        format!("{trimmed}{MAIN_SEPARATOR}")
    }
}

/// Run a build tool in `dir`, returning its stdout.
///
/// With `capture` unset stdout is discarded, as compiles are noisy.
pub(crate) async fn run_build_tool(
    tool: BuildTool,
    args: &[String],
    dir: &Path,
    capture: bool,
) -> Result<String> {
    debug!("Running {} {} in {}", tool, args.join(" "), dir.display());
    let output = Command::new(tool.as_str())
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(if capture { Stdio::piped() } else { Stdio::null() })
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| FocalcovError::io(format!("Failed to run {tool}"), e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let tail: Vec<&str> = stderr.lines().rev().take(5).collect();
        let tail: Vec<&str> = tail.into_iter().rev().collect();
        return Err(FocalcovError::project(
            tool.as_str(),
            format!("`{} {}` exited with {}: {}", tool, args.join(" "), output.status, tail.join("\n")),
        )
        .in_project_dir(dir.display().to_string()));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
