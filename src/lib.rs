//! # focalcov-rs: Focal Method Coverage Dataset Curation
//!
//! Mines Java repositories for training examples that pair a production
//! ("focal") method with the tests exercising it, annotated with the lines
//! each test covers. The library provides:
//!
//! - **Structural Parsing**: tree-sitter based Java class and method extraction
//!   with exact text spans
//! - **Test/Focal Pairing**: file-level pairing by source-root conventions and
//!   method-level mapping by name and unique invocation
//! - **Coverage Differencing**: pairwise contrasts of per-test line coverage
//! - **Collaborators**: coverage oracle bindings (HTTP, CLI), git cloning,
//!   Maven/Gradle classpath resolution, JSON Lines loaders and sinks
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                     Pipeline (processors)                     │
//! ├───────────────────────────────────────────────────────────────┤
//! │  Lang      │  Curation     │  Oracle       │  Project / IO    │
//! │            │               │               │                  │
//! │ • Java     │ • Pairing     │ • HTTP        │ • git clone      │
//! │ • Spans    │ • Mapping     │ • CLI         │ • Maven, Gradle  │
//! │            │ • Coverage    │               │ • Loaders, Sinks │
//! │            │ • Dedupe      │               │                  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use focalcov_rs::{FocalMethodFinder, FocalcovConfig};
//!
//! fn main() -> focalcov_rs::Result<()> {
//!     let config = FocalcovConfig::default();
//!     let mut finder = FocalMethodFinder::from_config(&config)?;
//!     for sample in finder.find_focal_method_samples(Path::new("./guess-the-number")) {
//!         println!(
//!             "{} <- {} tests",
//!             sample.focal_method.class_method_signature,
//!             sample.test_methods.len()
//!         );
//!     }
//!     Ok(())
//! }
//! ```

#![warn(unsafe_code)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Core infrastructure modules
pub mod core {
    //! Configuration, errors, file helpers, and the record pipeline.

    pub mod config;
    pub mod errors;
    pub mod file_utils;
    pub mod pipeline;
}

// Java parsing
pub mod lang;

// Pairing, mapping, coverage differencing, deduplication
pub mod curation;

// Coverage oracle bindings
pub mod oracle;

// Repository cloning and build-tool resolution
pub mod project;

// Record loaders and sinks
pub mod io;

// Re-export primary types for convenience
pub use crate::core::config::FocalcovConfig;
pub use crate::core::errors::{FocalcovError, FocalcovResultExt, Result};
pub use crate::core::pipeline::{run_processor, Processor, RunContext, RunStats};
pub use curation::{FocalMethodFinder, FocalMethodSample, TrainingSample};
pub use lang::{JavaParser, ParsedClass, ParsedMethod};
pub use oracle::{create_oracle, CoverageOracle};
