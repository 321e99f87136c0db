//! Configuration types and management for focalcov-rs.
//!
//! A run is described by one YAML document. Every section carries serde
//! defaults, so a file only needs to name the settings it changes.

pub mod validation;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::errors::{FocalcovError, Result};

pub use validation::{
    validate_http_url, validate_non_empty, validate_optional_limit, validate_positive_u64,
};

/// Top-level configuration for a curation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FocalcovConfig {
    /// Source parsing settings
    #[serde(default)]
    pub parser: ParserConfig,

    /// Test/focal file pairing settings
    #[serde(default)]
    pub pairing: PairingConfig,

    /// Coverage oracle binding
    #[serde(default)]
    pub oracle: OracleConfig,

    /// Processor behaviour
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Input records
    #[serde(default)]
    pub loader: LoaderConfig,

    /// Output records
    #[serde(default)]
    pub sink: SinkConfig,
}

impl FocalcovConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            FocalcovError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        serde_yaml::from_str(&content).map_err(Into::into)
    }

    /// Save configuration to a YAML file
    pub fn to_yaml_file(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&path, content).map_err(|e| {
            FocalcovError::io(
                format!("Failed to write config file: {}", path.display()),
                e,
            )
        })
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        self.parser.validate()?;
        self.pairing.validate()?;
        self.oracle.validate()?;
        self.sink.validate()?;
        Ok(())
    }
}

/// Structural parser settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Annotation token that marks a method (and its file) as a test
    #[serde(default = "ParserConfig::default_test_annotation")]
    pub test_annotation: String,

    /// Extension of source files considered during discovery, without the dot
    #[serde(default = "ParserConfig::default_file_extension")]
    pub file_extension: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            test_annotation: Self::default_test_annotation(),
            file_extension: Self::default_file_extension(),
        }
    }
}

impl ParserConfig {
    fn default_test_annotation() -> String {
        "@Test".to_string()
    }

    fn default_file_extension() -> String {
        "java".to_string()
    }

    /// Validate parser settings
    pub fn validate(&self) -> Result<()> {
        validate_non_empty(&self.test_annotation, "parser.test_annotation")?;
        validate_non_empty(&self.file_extension, "parser.file_extension")?;
        if self.file_extension.starts_with('.') {
            return Err(FocalcovError::validation_field(
                "parser.file_extension must not start with a dot",
                "parser.file_extension",
            ));
        }
        Ok(())
    }
}

/// Path-rewrite rules used to pair test files with focal files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairingConfig {
    /// Path fragment identifying the test source root
    #[serde(default = "PairingConfig::default_test_source_root")]
    pub test_source_root: String,

    /// Path fragment identifying the main source root
    #[serde(default = "PairingConfig::default_main_source_root")]
    pub main_source_root: String,

    /// Literal removed from lower-cased test paths and method names
    #[serde(default = "PairingConfig::default_test_token")]
    pub test_token: String,
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            test_source_root: Self::default_test_source_root(),
            main_source_root: Self::default_main_source_root(),
            test_token: Self::default_test_token(),
        }
    }
}

impl PairingConfig {
    fn default_test_source_root() -> String {
        "src/test/".to_string()
    }

    fn default_main_source_root() -> String {
        "src/main/".to_string()
    }

    fn default_test_token() -> String {
        "test".to_string()
    }

    /// Test-root fragment without its trailing separator, used to exclude
    /// test directories from focal candidates.
    pub fn test_root_fragment(&self) -> &str {
        self.test_source_root.trim_end_matches('/')
    }

    /// Validate pairing settings
    pub fn validate(&self) -> Result<()> {
        validate_non_empty(&self.test_source_root, "pairing.test_source_root")?;
        validate_non_empty(&self.main_source_root, "pairing.main_source_root")?;
        validate_non_empty(&self.test_token, "pairing.test_token")?;
        Ok(())
    }
}

/// Which coverage oracle binding to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OracleBackend {
    /// POST to a running coverage service
    #[default]
    Http,
    /// Spawn the coverage CLI per request
    Cli,
}

/// How the CLI binding hands its JSON request to the subprocess.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadMode {
    /// Pass the request as the single positional argument
    #[default]
    Argument,
    /// Write the request as one line on stdin
    Stdin,
}

/// Coverage oracle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Backend selection
    #[serde(default)]
    pub backend: OracleBackend,

    /// Base URL of the coverage service (HTTP backend)
    #[serde(default = "OracleConfig::default_base_url")]
    pub base_url: String,

    /// Executable of the coverage CLI (CLI backend)
    #[serde(default = "OracleConfig::default_script_path")]
    pub script_path: PathBuf,

    /// Per-request timeout in seconds
    #[serde(default = "OracleConfig::default_timeout_secs")]
    pub timeout_secs: u64,

    /// Request transport for the CLI backend
    #[serde(default)]
    pub payload: PayloadMode,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            backend: OracleBackend::default(),
            base_url: Self::default_base_url(),
            script_path: Self::default_script_path(),
            timeout_secs: Self::default_timeout_secs(),
            payload: PayloadMode::default(),
        }
    }
}

impl OracleConfig {
    fn default_base_url() -> String {
        "http://localhost:8080".to_string()
    }

    fn default_script_path() -> PathBuf {
        PathBuf::from("code-cov-cli")
    }

    const fn default_timeout_secs() -> u64 {
        60
    }

    /// Validate oracle settings for the selected backend
    pub fn validate(&self) -> Result<()> {
        validate_positive_u64(self.timeout_secs, "oracle.timeout_secs")?;
        match self.backend {
            OracleBackend::Http => validate_http_url(&self.base_url, "oracle.base_url"),
            OracleBackend::Cli => {
                validate_non_empty(&self.script_path.to_string_lossy(), "oracle.script_path")
            }
        }
    }
}

/// Processor behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Parent directory for repository clones; system temp dir when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_dir: Option<PathBuf>,

    /// Drop repeated (focal, input, target) body triplets while streaming
    #[serde(default = "PipelineConfig::default_true")]
    pub deduplicate: bool,

    /// Compile each project before requesting coverage
    #[serde(default = "PipelineConfig::default_true")]
    pub compile: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            work_dir: None,
            deduplicate: true,
            compile: true,
        }
    }
}

impl PipelineConfig {
    const fn default_true() -> bool {
        true
    }
}

/// Input location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// JSON-lines file to read records from
    #[serde(default = "LoaderConfig::default_path")]
    pub path: PathBuf,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
        }
    }
}

impl LoaderConfig {
    fn default_path() -> PathBuf {
        PathBuf::from("input.jsonl")
    }
}

/// Output location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// JSON-lines file to append records to
    #[serde(default = "SinkConfig::default_path")]
    pub path: PathBuf,

    /// Stop after this many records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
            limit: None,
        }
    }
}

impl SinkConfig {
    fn default_path() -> PathBuf {
        PathBuf::from("output.jsonl")
    }

    /// Validate sink settings
    pub fn validate(&self) -> Result<()> {
        validate_optional_limit(self.limit, "sink.limit")
    }
}
