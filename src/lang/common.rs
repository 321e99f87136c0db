//! Parsed class/method/field records shared by the parser and curation stages.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tree_sitter::{Node, Point};

/// A point in a file's text. Zero-based; `column` is a byte offset into the line.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SourcePosition {
    /// Zero-based line
    pub line: usize,
    /// Zero-based byte column
    pub column: usize,
}

impl SourcePosition {
    /// Create a position
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl From<Point> for SourcePosition {
    fn from(point: Point) -> Self {
        Self::new(point.row, point.column)
    }
}

/// A field declared in a class body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedField {
    /// Modifier text, empty when the field has none
    pub modifiers: String,
    /// Declared type
    #[serde(rename = "type")]
    pub field_type: String,
    /// First declarator, including any initializer
    pub declarator: String,
    /// Variable name of the first declarator
    pub variable_name: String,
    /// The complete declaration
    pub raw_text: String,
}

/// Class-level metadata, shared between a class and the methods parsed from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassHeader {
    /// Package of the compilation unit
    pub package: String,
    /// Simple class name
    pub identifier: String,
    /// `extends` clause text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superclass: Option<String>,
    /// `implements` clause text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interfaces: Option<String>,
    /// Argument list following the identifier, if the grammar produced one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argument_list: Option<String>,
    /// Field declarations
    pub fields: Vec<ParsedField>,
    /// Start of the declaration
    pub start: SourcePosition,
    /// End of the declaration
    pub end: SourcePosition,
    /// Path the class was parsed from
    pub source_file: String,
}

/// A top-level class and its methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedClass {
    /// Class-level metadata
    #[serde(flatten)]
    pub header: Arc<ClassHeader>,
    /// Methods and constructors in declaration order
    pub methods: Vec<ParsedMethod>,
}

impl ParsedClass {
    /// Fully qualified class name
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.header.package, self.header.identifier)
    }
}

/// A method or constructor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedMethod {
    /// Simple name
    pub identifier: String,
    /// Formal parameter list text, parentheses included
    pub parameters: String,
    /// Whitespace-normalized modifier text, annotations included
    pub modifiers: String,
    /// Return type text, empty for constructors
    pub return_type: String,
    /// Start of the declaration
    pub start: SourcePosition,
    /// End of the declaration
    pub end: SourcePosition,
    /// Exact declaration text
    pub body: String,
    /// Declared as a constructor
    pub is_constructor: bool,
    /// Carries the test annotation
    pub is_test_case: bool,
    /// Callee names of every method invocation in the body, in source order
    pub invoked_names: Vec<String>,
    /// Simple name of the declaring class
    pub class_identifier: String,
    /// `{return} {name}{params}`
    pub signature: String,
    /// `{modifiers} {return} {name}{params}`
    pub full_signature: String,
    /// `{class}.{name}{params}`
    pub class_method_signature: String,
    /// Declaring class, attached while parsing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<Arc<ClassHeader>>,
}

impl ParsedMethod {
    /// Attach the declaring class.
    pub fn with_class(mut self, class: Arc<ClassHeader>) -> Self {
        self.class = Some(class);
        self
    }

    /// Drop the class back-reference before the method leaves the parsing stages.
    pub fn detach_class(mut self) -> Self {
        self.class = None;
        self
    }

    /// Body split on line breaks; index 0 is `start.line`.
    pub fn body_lines(&self) -> Vec<&str> {
        self.body.split('\n').collect()
    }

    /// Inclusive zero-based line range of the declaration.
    pub fn line_range(&self) -> std::ops::RangeInclusive<usize> {
        self.start.line..=self.end.line
    }
}

/// Exact source text between `start` and `end`.
///
/// Lines are split on `\n` only, so a `\r` preceding a line break stays part
/// of the line it ends, matching how tree-sitter counts rows and columns.
/// Positions past the end of the text are clamped.
pub fn match_from_span(start: SourcePosition, end: SourcePosition, source: &str) -> String {
    let lines: Vec<&str> = source.split('\n').collect();
    let line = |index: usize| lines.get(index).copied().unwrap_or("");

    if start.line == end.line {
        return byte_slice(line(start.line), start.column, end.column);
    }

    let first = line(start.line);
    let mut parts = Vec::with_capacity(end.line - start.line + 1);
    parts.push(byte_slice(first, start.column, first.len()));
    for index in (start.line + 1)..end.line {
        parts.push(line(index).to_string());
    }
    parts.push(byte_slice(line(end.line), 0, end.column));
    parts.join("\n")
}

/// Source text of a syntax node.
pub fn node_text(node: &Node, source: &str) -> String {
    match_from_span(node.start_position().into(), node.end_position().into(), source)
}

/// Every node of `kind` in the subtree rooted at `node`, pre-order, `node` included.
pub fn collect_nodes_of_kind<'tree>(node: Node<'tree>, kind: &str) -> Vec<Node<'tree>> {
    let mut found = Vec::new();
    walk_tree(node, &mut |candidate| {
        if candidate.kind() == kind {
            found.push(candidate);
        }
    });
    found
}

/// Direct children of `node` with the given kind.
pub fn children_of_kind<'tree>(node: Node<'tree>, kind: &str) -> Vec<Node<'tree>> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|child| child.kind() == kind)
        .collect()
}

/// Pre-order traversal.
pub fn walk_tree<'tree, F>(node: Node<'tree>, callback: &mut F)
where
    F: FnMut(Node<'tree>),
{
    callback(node);
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk_tree(child, callback);
    }
}

fn byte_slice(line: &str, from: usize, to: usize) -> String {
    let bytes = line.as_bytes();
    let to = to.min(bytes.len());
    let from = from.min(to);
    String::from_utf8_lossy(&bytes[from..to]).into_owned()
}
