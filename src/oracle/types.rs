//! Wire types shared by every coverage oracle binding.

use serde::{Deserialize, Serialize};

/// One coverage request: run `test_method_name` of `test_class_name` and
/// report the lines of `focal_class_name` it executes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCoverageRequest {
    /// Every classpath entry needed to run the test
    pub classpath_pathnames: Vec<String>,
    /// Output directory of the focal (production) classes
    pub focal_classpath: String,
    /// Fully qualified focal class
    pub focal_class_name: String,
    /// Fully qualified test class
    pub test_class_name: String,
    /// Test method to run
    pub test_method_name: String,
}

/// Lines of the focal compilation unit executed by one test.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coverage {
    /// One-based line numbers
    pub covered_line_numbers: Vec<usize>,
}
