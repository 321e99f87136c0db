//! Grammar lookup and parser construction.

use tree_sitter::{Language, Parser};

use crate::core::errors::{FocalcovError, Result};

/// Get the tree-sitter grammar for a language key.
pub fn get_tree_sitter_language(language_key: &str) -> Result<Language> {
    match language_key.to_ascii_lowercase().as_str() {
        "java" => Ok(tree_sitter_java::LANGUAGE.into()),
        other => Err(FocalcovError::unsupported(format!(
            "No grammar registered for language '{other}'"
        ))),
    }
}

/// Create a parser configured for a language key.
pub fn create_parser_for_language(language_key: &str) -> Result<Parser> {
    let mut parser = Parser::new();
    let language = get_tree_sitter_language(language_key)?;
    parser.set_language(&language).map_err(|e| {
        FocalcovError::parse(
            language_key,
            format!("Failed to set tree-sitter language: {e}"),
        )
    })?;
    Ok(parser)
}
