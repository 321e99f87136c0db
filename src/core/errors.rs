//! Error types for the focalcov-rs library.
//!
//! Every fallible operation in the crate returns [`Result`], whose error side
//! is a structured [`FocalcovError`]. Most of the curation pipeline recovers
//! from these locally (a file, a test method or a repository is skipped), so
//! the variants carry enough context to produce a useful warning.

use std::io;

use thiserror::Error;

/// Main result type for focalcov operations.
pub type Result<T> = std::result::Result<T, FocalcovError>;

/// Error type for all focalcov operations.
#[derive(Error, Debug)]
pub enum FocalcovError {
    /// I/O related errors (file operations, subprocess pipes, etc.)
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message
        message: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error description
        message: String,
        /// Configuration field that caused the error
        field: Option<String>,
    },

    /// Parsing and language processing errors
    #[error("Parse error in {language}: {message}")]
    Parse {
        /// Programming language being parsed
        language: String,
        /// Error description
        message: String,
        /// File path where error occurred
        file_path: Option<String>,
    },

    /// Coverage oracle failures (transport, status, timeout, payload)
    #[error("Coverage oracle error: {message}")]
    Oracle {
        /// Error description
        message: String,
        /// Backend that produced the error (`http`, `cli`)
        backend: Option<String>,
        /// HTTP status or process exit code, when one was observed
        status: Option<i32>,
    },

    /// Build tool errors (compile, classpath resolution)
    #[error("Project error in {tool}: {message}")]
    Project {
        /// Build tool that failed (`mvn`, `gradle`)
        tool: String,
        /// Error description
        message: String,
        /// Project directory
        project_dir: Option<String>,
    },

    /// Repository cloning and revision lookup errors
    #[error("Repository error: {message}")]
    Repository {
        /// Error description
        message: String,
        /// Repository URL
        url: Option<String>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error description
        message: String,
        /// Data type being serialized
        data_type: Option<String>,
        /// Underlying serialization error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors for input data
    #[error("Validation error: {message}")]
    Validation {
        /// Error description
        message: String,
        /// Field or input that failed validation
        field: Option<String>,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal {
        /// Error description
        message: String,
        /// Additional context
        context: Option<String>,
    },

    /// Unsupported operation or feature
    #[error("Unsupported: {message}")]
    Unsupported {
        /// Error description
        message: String,
    },
}

impl FocalcovError {
    /// Create a new I/O error with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new parse error
    pub fn parse(language: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            language: language.into(),
            message: message.into(),
            file_path: None,
        }
    }

    /// Create a new parse error tied to a file
    pub fn parse_in_file(
        language: impl Into<String>,
        message: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Self {
        Self::Parse {
            language: language.into(),
            message: message.into(),
            file_path: Some(file_path.into()),
        }
    }

    /// Create a new oracle error
    pub fn oracle(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Oracle {
            message: message.into(),
            backend: Some(backend.into()),
            status: None,
        }
    }

    /// Create a new oracle error carrying a status or exit code
    pub fn oracle_status(backend: impl Into<String>, message: impl Into<String>, status: i32) -> Self {
        Self::Oracle {
            message: message.into(),
            backend: Some(backend.into()),
            status: Some(status),
        }
    }

    /// Create a new build tool error
    pub fn project(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Project {
            tool: tool.into(),
            message: message.into(),
            project_dir: None,
        }
    }

    /// Create a new repository error
    pub fn repository(message: impl Into<String>) -> Self {
        Self::Repository {
            message: message.into(),
            url: None,
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new validation error with field context
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            context: None,
        }
    }

    /// Create a new unsupported error
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }

    /// Attach a project directory to a build tool error.
    pub fn in_project_dir(mut self, dir: impl Into<String>) -> Self {
        if let Self::Project { project_dir, .. } = &mut self {
            *project_dir = Some(dir.into());
        }
        self
    }

    /// Attach a URL to a repository error.
    pub fn for_url(mut self, repository_url: impl Into<String>) -> Self {
        if let Self::Repository { url, .. } = &mut self {
            *url = Some(repository_url.into());
        }
        self
    }

    /// Add context to an existing error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        match &mut self {
            Self::Internal { context: ctx, .. } => {
                *ctx = Some(context.into());
            }
            Self::Io { message, .. }
            | Self::Repository { message, .. }
            | Self::Oracle { message, .. } => {
                *message = format!("{}: {message}", context.into());
            }
            _ => {}
        }
        self
    }
}

impl From<io::Error> for FocalcovError {
    fn from(err: io::Error) -> Self {
        Self::io("I/O operation failed", err)
    }
}

impl From<serde_json::Error> for FocalcovError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: format!("JSON serialization failed: {err}"),
            data_type: Some("JSON".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_yaml::Error> for FocalcovError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization {
            message: format!("YAML serialization failed: {err}"),
            data_type: Some("YAML".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<git2::Error> for FocalcovError {
    fn from(err: git2::Error) -> Self {
        Self::repository(err.message().to_string())
    }
}

impl From<reqwest::Error> for FocalcovError {
    fn from(err: reqwest::Error) -> Self {
        Self::Oracle {
            message: err.to_string(),
            backend: Some("http".to_string()),
            status: err.status().map(|s| i32::from(s.as_u16())),
        }
    }
}

/// Conversions for foreign errors that have no dedicated `From` impl.
pub trait FocalcovResultExt<T> {
    /// Wrap any displayable error as an internal error prefixed with `context`.
    fn map_generic_err(self, context: &str) -> Result<T>;

    /// Wrap a JSON error as a serialization error prefixed with `context`.
    fn map_json_err(self, context: &str) -> Result<T>;
}

impl<T, E> FocalcovResultExt<T> for std::result::Result<T, E>
where
    E: std::fmt::Display,
{
    fn map_generic_err(self, context: &str) -> Result<T> {
        self.map_err(|e| FocalcovError::internal(format!("{context}: {e}")))
    }

    fn map_json_err(self, context: &str) -> Result<T> {
        self.map_err(|e| FocalcovError::Serialization {
            message: format!("{context}: {e}"),
            data_type: Some("JSON".to_string()),
            source: None,
        })
    }
}
