//! Java structural parser built on tree-sitter.
//!
//! Turns one compilation unit into [`ParsedClass`] records: top-level
//! classes, their fields, and their methods and constructors with exact
//! source spans. Reading or parsing failures never escape [`JavaParser::parse_file`];
//! the file simply contributes no classes.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};
use tree_sitter::{Node, Parser, Tree};

use super::common::{
    children_of_kind, collect_nodes_of_kind, node_text, ClassHeader, ParsedClass, ParsedField,
    ParsedMethod,
};
use super::registry::create_parser_for_language;
use crate::core::config::ParserConfig;
use crate::core::errors::{FocalcovError, Result};
use crate::core::file_utils::{resolve_relative, FileReader};

/// Annotation marking JUnit test methods.
pub const DEFAULT_TEST_ANNOTATION: &str = "@Test";

/// Java source parser
pub struct JavaParser {
    /// Tree-sitter parser for Java
    parser: Parser,

    /// Token whose presence in a method's modifiers marks a test case
    test_annotation: String,
}

impl JavaParser {
    /// Create a parser recognizing `@Test` methods
    pub fn new() -> Result<Self> {
        Self::with_test_annotation(DEFAULT_TEST_ANNOTATION)
    }

    /// Create a parser recognizing a custom test annotation
    pub fn with_test_annotation(test_annotation: impl Into<String>) -> Result<Self> {
        Ok(Self {
            parser: create_parser_for_language("java")?,
            test_annotation: test_annotation.into(),
        })
    }

    /// Create a parser from configuration
    pub fn from_config(config: &ParserConfig) -> Result<Self> {
        Self::with_test_annotation(config.test_annotation.clone())
    }

    /// The annotation token this parser treats as a test marker
    pub fn test_annotation(&self) -> &str {
        &self.test_annotation
    }

    /// Parse a file into its top-level classes. Empty when the file cannot
    /// be read or parsed.
    pub fn parse_file(&mut self, path: &Path) -> Vec<ParsedClass> {
        self.parse_path(path, &path.to_string_lossy())
    }

    /// Parse `relative` under `root`, recording the relative path as the
    /// classes' source file.
    pub fn parse_file_in(&mut self, root: &Path, relative: &str) -> Vec<ParsedClass> {
        self.parse_path(&resolve_relative(root, relative), relative)
    }

    fn parse_path(&mut self, path: &Path, source_file: &str) -> Vec<ParsedClass> {
        let source = match FileReader::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                warn!("Skipping unreadable source {}: {}", path.display(), e);
                return Vec::new();
            }
        };

        match self.parse_source(&source, source_file) {
            Ok(classes) => classes,
            Err(e) => {
                warn!("Skipping unparsable source {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }

    /// Parse source text. `source_file` is recorded on every class.
    pub fn parse_source(&mut self, source: &str, source_file: &str) -> Result<Vec<ParsedClass>> {
        let tree = self.parse_tree(source, source_file)?;
        let root = tree.root_node();

        let package = Self::package_name(root, source).ok_or_else(|| {
            FocalcovError::parse_in_file("java", "missing package declaration", source_file)
        })?;

        let classes: Vec<ParsedClass> = children_of_kind(root, "class_declaration")
            .into_iter()
            .map(|class_node| self.parse_class(class_node, source, &package, source_file))
            .collect();

        debug!(
            "Parsed {} classes from {} (package {})",
            classes.len(),
            source_file,
            package
        );
        Ok(classes)
    }

    /// Names of methods with a non-empty (multi-line) body, declaration order.
    pub fn method_names(&mut self, path: &Path) -> Result<Vec<String>> {
        let source = FileReader::read_to_string(path)?;
        let tree = self.parse_tree(&source, &path.to_string_lossy())?;

        let mut names = Vec::new();
        for class_node in children_of_kind(tree.root_node(), "class_declaration") {
            let Some(body) = class_node.child_by_field_name("body") else {
                continue;
            };
            for method in children_of_kind(body, "method_declaration") {
                if Self::is_body_empty(method) {
                    continue;
                }
                let (identifier, _) = Self::declarator_parts(method, &source);
                names.push(identifier);
            }
        }
        Ok(names)
    }

    fn parse_tree(&mut self, source: &str, source_file: &str) -> Result<Tree> {
        self.parser.parse(source, None).ok_or_else(|| {
            FocalcovError::parse_in_file("java", "Failed to parse Java source", source_file)
        })
    }

    fn package_name(root: Node, source: &str) -> Option<String> {
        let declaration = children_of_kind(root, "package_declaration")
            .into_iter()
            .next()?;
        let mut cursor = declaration.walk();
        let name = declaration
            .children(&mut cursor)
            .find(|child| matches!(child.kind(), "scoped_identifier" | "identifier"))?;
        let package = node_text(&name, source).trim().to_string();
        (!package.is_empty()).then_some(package)
    }

    fn parse_class(
        &self,
        class_node: Node,
        source: &str,
        package: &str,
        source_file: &str,
    ) -> ParsedClass {
        let (identifier, argument_list) = Self::class_identifier(class_node, source);

        let header = Arc::new(ClassHeader {
            package: package.to_string(),
            identifier,
            superclass: class_node
                .child_by_field_name("superclass")
                .map(|n| node_text(&n, source)),
            interfaces: class_node
                .child_by_field_name("interfaces")
                .map(|n| node_text(&n, source)),
            argument_list,
            fields: Self::class_fields(class_node, source),
            start: class_node.start_position().into(),
            end: class_node.end_position().into(),
            source_file: source_file.to_string(),
        });

        let methods: Vec<ParsedMethod> = class_node
            .child_by_field_name("body")
            .map(|body| {
                let mut cursor = body.walk();
                body.children(&mut cursor)
                    .filter(|child| {
                        matches!(child.kind(), "method_declaration" | "constructor_declaration")
                    })
                    .map(|child| {
                        self.parse_method(child, source, &header.identifier)
                            .with_class(Arc::clone(&header))
                    })
                    .collect()
            })
            .unwrap_or_default();

        ParsedClass { header, methods }
    }

    /// Identifier and optional argument list following the `class` keyword.
    fn class_identifier(class_node: Node, source: &str) -> (String, Option<String>) {
        let mut identifier = String::new();
        let mut argument_list = None;
        let mut in_header = false;

        let mut cursor = class_node.walk();
        for child in class_node.children(&mut cursor) {
            if in_header {
                match child.kind() {
                    "identifier" if identifier.is_empty() => {
                        identifier = node_text(&child, source)
                            .trim_matches(|c| c == '(' || c == ':')
                            .to_string();
                    }
                    "argument_list" => argument_list = Some(node_text(&child, source)),
                    _ => {}
                }
            }
            match child.kind() {
                "class" => in_header = true,
                ":" => break,
                _ => {}
            }
        }
        (identifier, argument_list)
    }

    fn class_fields(class_node: Node, source: &str) -> Vec<ParsedField> {
        let Some(body) = class_node.child_by_field_name("body") else {
            return Vec::new();
        };

        children_of_kind(body, "field_declaration")
            .into_iter()
            .map(|field| {
                let declarator = field.child_by_field_name("declarator");
                ParsedField {
                    modifiers: children_of_kind(field, "modifiers")
                        .first()
                        .map(|m| node_text(m, source))
                        .unwrap_or_default(),
                    field_type: field
                        .child_by_field_name("type")
                        .map(|n| node_text(&n, source))
                        .unwrap_or_default(),
                    declarator: declarator
                        .map(|n| node_text(&n, source))
                        .unwrap_or_default(),
                    variable_name: declarator
                        .and_then(|n| n.child_by_field_name("name"))
                        .map(|n| node_text(&n, source))
                        .unwrap_or_default(),
                    raw_text: node_text(&field, source),
                }
            })
            .collect()
    }

    fn parse_method(&self, node: Node, source: &str, class_identifier: &str) -> ParsedMethod {
        let (identifier, parameters) = Self::declarator_parts(node, source);

        let modifier_nodes = children_of_kind(node, "modifiers");
        let modifiers = modifier_nodes
            .first()
            .map(|m| {
                node_text(m, source)
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default();
        let is_test_case = modifier_nodes
            .iter()
            .any(|m| node_text(m, source).contains(self.test_annotation.as_str()));

        let return_type = node
            .child_by_field_name("type")
            .map(|n| node_text(&n, source))
            .unwrap_or_default();

        let invoked_names = collect_nodes_of_kind(node, "method_invocation")
            .into_iter()
            .filter_map(|invocation| invocation.child_by_field_name("name"))
            .map(|name| node_text(&name, source))
            .collect();

        ParsedMethod {
            signature: format!("{return_type} {identifier}{parameters}"),
            full_signature: format!("{modifiers} {return_type} {identifier}{parameters}"),
            class_method_signature: format!("{class_identifier}.{identifier}{parameters}"),
            identifier,
            parameters,
            modifiers,
            return_type,
            start: node.start_position().into(),
            end: node.end_position().into(),
            body: node_text(&node, source),
            is_constructor: node.kind() == "constructor_declaration",
            is_test_case,
            invoked_names,
            class_identifier: class_identifier.to_string(),
            class: None,
        }
    }

    /// Identifier and formal parameter text of a method or constructor,
    /// read from the first declaration node of the same root kind.
    fn declarator_parts(node: Node, source: &str) -> (String, String) {
        let root_kind = node.kind().split('_').next().unwrap_or_default();
        let declaration_kind = format!("{root_kind}_declaration");
        let declaration = collect_nodes_of_kind(node, &declaration_kind)
            .into_iter()
            .next()
            .unwrap_or(node);

        let mut identifier = String::new();
        let mut parameters = Vec::new();
        let mut cursor = declaration.walk();
        for child in declaration.children(&mut cursor) {
            match child.kind() {
                "identifier" => {
                    identifier = node_text(&child, source).trim_matches('(').to_string();
                }
                "formal_parameters" => parameters.push(node_text(&child, source)),
                _ => {}
            }
        }
        (identifier, parameters.join(" "))
    }

    fn is_body_empty(node: Node) -> bool {
        node.child_by_field_name("body")
            .is_some_and(|body| body.start_position().row == body.end_position().row)
    }
}

#[cfg(test)]
#[path = "java_tests.rs"]
mod tests;
