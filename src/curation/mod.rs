//! Turning a cloned repository into focal/test training pairs.
//!
//! ```text
//! files ─► pairing ─► parse ─► mapping ─► oracle ─► coverage ─► dedupe ─► sink
//! ```

pub mod coverage;
pub mod dedupe;
pub mod mapping;
pub mod pairing;

pub use coverage::{
    annotate_coverage, generate_samples, CoveredFocalMethodSample, RepositoryRef, TrainingSample,
    TrainingSamples,
};
pub use dedupe::{RepositoryNameFilter, SampleTripletFilter};
pub use mapping::{map_methods, FocalMethodFinder, FocalMethodSample, MethodMapper};
pub use pairing::{FilePairer, FilePairs};
