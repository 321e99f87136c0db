//! Coverage annotation and differencing.
//!
//! The oracle reports 1-based line numbers for a whole compilation unit.
//! [`annotate_coverage`] keeps only the lines inside the focal method's span
//! and re-expresses them as offsets into the focal body, and
//! [`generate_samples`] contrasts the tests of one focal method pairwise.

mod differ;
mod types;

use std::collections::BTreeSet;

pub use differ::{generate_samples, TrainingSamples};
pub use types::{
    ClassName, CoveredFocalMethodSample, CoveredTestMethod, FocalMethodRecord, MethodSpan,
    RepositoryRef, TestMethodRecord, TrainingSample,
};

use crate::lang::ParsedMethod;

/// Focal lines covered by one test, as body offsets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoveredLines {
    /// Sorted, unique 0-based offsets into the focal body's lines
    pub indices: Vec<usize>,
    /// Body line text for each offset
    pub texts: Vec<String>,
}

/// Intersect oracle line numbers with `focal`'s span.
///
/// Line numbers are 1-based; zero and anything outside
/// `[start.line, end.line]` (0-based) is discarded.
pub fn annotate_coverage(focal: &ParsedMethod, covered_line_numbers: &[usize]) -> CoveredLines {
    let body_lines = focal.body_lines();
    let span = focal.line_range();

    let indices: BTreeSet<usize> = covered_line_numbers
        .iter()
        .filter_map(|number| number.checked_sub(1))
        .filter(|line| span.contains(line))
        .map(|line| line - focal.start.line)
        .filter(|offset| *offset < body_lines.len())
        .collect();

    let texts = indices
        .iter()
        .map(|offset| body_lines[*offset].to_string())
        .collect();
    CoveredLines {
        indices: indices.into_iter().collect(),
        texts,
    }
}

impl CoveredFocalMethodSample {
    /// Start a sample for `focal`, taking file and class from its attached class.
    pub fn for_focal(focal: &ParsedMethod) -> Self {
        let (focal_file, focal_class) = class_context(focal);
        Self {
            focal_file,
            focal_class,
            focal_method: FocalMethodRecord::from(focal),
            test_methods: Vec::new(),
        }
    }

    /// Add a test with its oracle coverage, annotated against `focal`.
    pub fn push_test(&mut self, focal: &ParsedMethod, test: &ParsedMethod, covered_line_numbers: &[usize]) {
        let covered = annotate_coverage(focal, covered_line_numbers);
        let (file, class) = class_context(test);
        self.test_methods.push(CoveredTestMethod {
            file,
            class,
            method: TestMethodRecord {
                identifier: test.identifier.clone(),
                span: MethodSpan {
                    start: test.start,
                    end: test.end,
                },
                body: test.body.clone(),
                covered_line_indices: covered.indices,
                covered_line_texts: covered.texts,
            },
        });
    }
}

/// Source file and class name of the class `method` belongs to.
pub(crate) fn class_context(method: &ParsedMethod) -> (String, ClassName) {
    match &method.class {
        Some(header) => (header.source_file.clone(), ClassName::from(header.as_ref())),
        None => (
            String::new(),
            ClassName {
                package: String::new(),
                identifier: method.class_identifier.clone(),
            },
        ),
    }
}

#[cfg(test)]
mod tests;
