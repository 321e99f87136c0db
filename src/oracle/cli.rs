//! Subprocess binding: one coverage CLI invocation per request.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use super::types::{Coverage, CreateCoverageRequest};
use super::CoverageOracle;
use crate::core::config::PayloadMode;
use crate::core::errors::{FocalcovError, FocalcovResultExt, Result};

const BACKEND: &str = "cli";

/// Runs the coverage CLI with the request JSON and parses its stdout.
pub struct CodeCovCli {
    script: PathBuf,
    timeout: Duration,
    payload: PayloadMode,
}

impl CodeCovCli {
    /// Create a binding for the executable at `script`.
    pub fn new(script: impl Into<PathBuf>, timeout: Duration, payload: PayloadMode) -> Self {
        Self {
            script: script.into(),
            timeout,
            payload,
        }
    }

    async fn run(&self, payload: String) -> Result<Coverage> {
        let mut command = Command::new(&self.script);
        command
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        match self.payload {
            PayloadMode::Argument => {
                command.arg(&payload).stdin(Stdio::null());
            }
            PayloadMode::Stdin => {
                command.stdin(Stdio::piped());
            }
        }

        let mut child = command.spawn().map_err(|e| {
            FocalcovError::io(format!("Failed to spawn {}", self.script.display()), e)
        })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(payload.as_bytes()).await?;
            stdin.write_all(b"\n").await?;
            stdin.shutdown().await?;
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FocalcovError::oracle_status(
                BACKEND,
                format!(
                    "{} exited with {}: {}",
                    self.script.display(),
                    output.status,
                    stderr.trim()
                ),
                output.status.code().unwrap_or(-1),
            ));
        }

        parse_stdout(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parse the CLI's stdout. Diagnostic lines before the JSON document are ignored.
fn parse_stdout(stdout: &str) -> Result<Coverage> {
    let trimmed = stdout.trim();
    if let Ok(coverage) = serde_json::from_str::<Coverage>(trimmed) {
        return Ok(coverage);
    }
    let last_line = trimmed
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .unwrap_or_default();
    serde_json::from_str::<Coverage>(last_line).map_json_err("parsing coverage CLI output")
}

#[async_trait]
impl CoverageOracle for CodeCovCli {
    async fn create_coverage(&self, request: &CreateCoverageRequest) -> Result<Coverage> {
        let payload = serde_json::to_string(request)?;
        debug!(
            "Running {} for {}#{}",
            self.script.display(),
            request.test_class_name,
            request.test_method_name
        );
        tokio::time::timeout(self.timeout, self.run(payload))
            .await
            .map_err(|_| {
                FocalcovError::oracle(
                    BACKEND,
                    format!("{} timed out after {:?}", self.script.display(), self.timeout),
                )
            })?
    }

    fn backend(&self) -> &'static str {
        BACKEND
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let coverage = parse_stdout("{\"coveredLineNumbers\":[4,5,7]}\n").unwrap();
        assert_eq!(coverage.covered_line_numbers, vec![4, 5, 7]);
    }

    #[test]
    fn test_parse_skips_leading_diagnostics() {
        let stdout = "Picked up JAVA_TOOL_OPTIONS: -Xmx1g\n{\"coveredLineNumbers\":[]}\n\n";
        assert!(parse_stdout(stdout).unwrap().covered_line_numbers.is_empty());
    }

    #[test]
    fn test_parse_garbage_is_serialization_error() {
        let err = parse_stdout("Exception in thread main").unwrap_err();
        assert!(matches!(err, FocalcovError::Serialization { .. }));
    }
}
