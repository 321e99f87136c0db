//! Records exchanged between coverage annotation, differencing, and sinks.

use serde::{Deserialize, Serialize};

use crate::lang::{ClassHeader, ParsedMethod, SourcePosition};

/// Repository a sample was mined from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRef {
    /// Clone URL
    pub url: String,
    /// Commit the clone was at
    pub revision: String,
}

/// Package-qualified class name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassName {
    /// Package
    pub package: String,
    /// Simple name
    pub identifier: String,
}

impl ClassName {
    /// `package.Identifier`
    pub fn qualified(&self) -> String {
        if self.package.is_empty() {
            self.identifier.clone()
        } else {
            format!("{}.{}", self.package, self.identifier)
        }
    }
}

impl From<&ClassHeader> for ClassName {
    fn from(header: &ClassHeader) -> Self {
        Self {
            package: header.package.clone(),
            identifier: header.identifier.clone(),
        }
    }
}

/// Start and end of a method declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSpan {
    /// Declaration start
    pub start: SourcePosition,
    /// Declaration end
    pub end: SourcePosition,
}

/// The focal method as exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocalMethodRecord {
    /// Simple name
    pub identifier: String,
    /// Declaration span
    pub span: MethodSpan,
    /// Declaration text
    pub body: String,
}

impl From<&ParsedMethod> for FocalMethodRecord {
    fn from(method: &ParsedMethod) -> Self {
        Self {
            identifier: method.identifier.clone(),
            span: MethodSpan {
                start: method.start,
                end: method.end,
            },
            body: method.body.clone(),
        }
    }
}

/// A test method with the focal lines it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestMethodRecord {
    /// Simple name
    pub identifier: String,
    /// Declaration span
    pub span: MethodSpan,
    /// Declaration text
    pub body: String,
    /// Sorted 0-based indices into the focal body's lines
    pub covered_line_indices: Vec<usize>,
    /// Focal body lines at `covered_line_indices`
    pub covered_line_texts: Vec<String>,
}

/// A covered test method with the file and class it was declared in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoveredTestMethod {
    /// Test file, relative to the project root
    pub file: String,
    /// Declaring class
    pub class: ClassName,
    /// Method and coverage
    pub method: TestMethodRecord,
}

/// A focal method whose mapped tests all carry coverage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoveredFocalMethodSample {
    /// Focal file, relative to the project root
    pub focal_file: String,
    /// Declaring class
    pub focal_class: ClassName,
    /// The focal method
    pub focal_method: FocalMethodRecord,
    /// Tests with coverage; failed oracle calls are already excluded
    pub test_methods: Vec<CoveredTestMethod>,
}

/// One training instance: the lines `test_target_method` covers that
/// `test_input_method` does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingSample {
    /// Source repository
    pub repository: RepositoryRef,
    /// Focal file, relative to the project root
    pub focal_file: String,
    /// Focal class
    pub focal_class: ClassName,
    /// Focal method
    pub focal_method: FocalMethodRecord,
    /// Sorted 0-based indices into the focal body covered only by the target
    pub focal_uncovered_lines: Vec<usize>,
    /// Focal body lines at `focal_uncovered_lines`
    pub focal_uncovered_line_texts: Vec<String>,
    /// Test file, relative to the project root
    pub test_file: String,
    /// Test class
    pub test_class: ClassName,
    /// Test whose coverage is given
    pub test_input_method: TestMethodRecord,
    /// Test whose additional coverage is the training signal
    pub test_target_method: TestMethodRecord,
}

impl TrainingSample {
    /// Key identifying semantically identical samples.
    pub fn body_triplet(&self) -> (&str, &str, &str) {
        (
            self.focal_method.body.as_str(),
            self.test_input_method.body.as_str(),
            self.test_target_method.body.as_str(),
        )
    }
}
