//! Coverage oracle bindings.
//!
//! The oracle runs one test method against compiled classes and reports the
//! focal lines it executed. Two interchangeable bindings exist: an HTTP
//! coverage service ([`CodeCovApi`]) and a command-line tool spawned per
//! request ([`CodeCovCli`]). Callers hold an `Arc<dyn CoverageOracle>` built
//! by [`create_oracle`].

pub mod cli;
pub mod http;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::core::config::{OracleBackend, OracleConfig};
use crate::core::errors::Result;

pub use cli::CodeCovCli;
pub use http::CodeCovApi;
pub use types::{Coverage, CreateCoverageRequest};

/// Source of per-test line coverage.
#[async_trait]
pub trait CoverageOracle: Send + Sync {
    /// Run one test and report the focal lines it covered.
    async fn create_coverage(&self, request: &CreateCoverageRequest) -> Result<Coverage>;

    /// Short backend name for logs
    fn backend(&self) -> &'static str;
}

/// Build the oracle selected by `config.backend`.
pub fn create_oracle(config: &OracleConfig) -> Result<Arc<dyn CoverageOracle>> {
    let timeout = Duration::from_secs(config.timeout_secs);
    Ok(match config.backend {
        OracleBackend::Http => Arc::new(CodeCovApi::new(config.base_url.clone(), timeout)?),
        OracleBackend::Cli => Arc::new(CodeCovCli::new(
            config.script_path.clone(),
            timeout,
            config.payload,
        )),
    })
}

#[cfg(test)]
mod tests;
