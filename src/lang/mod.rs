//! Language-specific parsing.

pub mod common;
pub mod java;
pub mod registry;

pub use common::{
    match_from_span, ClassHeader, ParsedClass, ParsedField, ParsedMethod, SourcePosition,
};
pub use java::{JavaParser, DEFAULT_TEST_ANNOTATION};
pub use registry::{create_parser_for_language, get_tree_sitter_language};
