//! HTTP binding: `POST {base_url}/coverages`.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::types::{Coverage, CreateCoverageRequest};
use super::CoverageOracle;
use crate::core::errors::{FocalcovError, FocalcovResultExt, Result};

const BACKEND: &str = "http";

/// Client for a running coverage service.
pub struct CodeCovApi {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl CodeCovApi {
    /// Create a client for the service at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_generic_err("building coverage service client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Endpoint requests are posted to
    pub fn endpoint(&self) -> String {
        format!("{}/coverages", self.base_url)
    }

    async fn post(&self, request: &CreateCoverageRequest) -> Result<Coverage> {
        let response = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(FocalcovError::oracle_status(
                BACKEND,
                format!("coverage service returned {status}: {error_text}"),
                i32::from(status.as_u16()),
            ));
        }

        let coverage: Coverage = response.json().await?;
        Ok(coverage)
    }
}

#[async_trait]
impl CoverageOracle for CodeCovApi {
    async fn create_coverage(&self, request: &CreateCoverageRequest) -> Result<Coverage> {
        debug!(
            "Requesting coverage of {}#{} from {}",
            request.test_class_name,
            request.test_method_name,
            self.endpoint()
        );
        tokio::time::timeout(self.timeout, self.post(request))
            .await
            .map_err(|_| {
                FocalcovError::oracle(
                    BACKEND,
                    format!("request timed out after {:?}", self.timeout),
                )
            })?
    }

    fn backend(&self) -> &'static str {
        BACKEND
    }
}
