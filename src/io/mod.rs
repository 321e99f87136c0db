//! Record sources and destinations for pipeline runs.
//!
//! Records travel as JSON Lines: one serialized record per line.
//!
//! - **loaders**: lazy record streams ([`Loader`])
//! - **sinks**: append-only destinations with an optional record limit ([`Sink`])

pub mod loaders;
pub mod sinks;

pub use loaders::{JsonLinesLoader, Loader, MemoryLoader, RecordStream};
pub use sinks::{JsonLinesSink, MemorySink, Sink};
