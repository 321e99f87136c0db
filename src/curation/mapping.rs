//! Test method → focal method mapping.
//!
//! Two heuristics, tried in order per test method:
//!
//! 1. **Name match**: the lower-cased test name with every `test` token
//!    removed equals a lower-cased focal method name.
//! 2. **Unique invocation**: the test invokes exactly one focal method name.
//!
//! Anything else leaves the test unmapped.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::pairing::FilePairer;
use crate::core::config::FocalcovConfig;
use crate::core::errors::Result;
use crate::lang::{JavaParser, ParsedMethod};

/// A focal method and the test methods mapped to it. `test_methods` is never empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocalMethodSample {
    /// The production method
    pub focal_method: ParsedMethod,
    /// Tests mapped to it, in encounter order
    pub test_methods: Vec<ParsedMethod>,
}

impl FocalMethodSample {
    /// Drop the class back-reference from every method before export.
    pub fn detach_classes(self) -> Self {
        Self {
            focal_method: self.focal_method.detach_class(),
            test_methods: self
                .test_methods
                .into_iter()
                .map(ParsedMethod::detach_class)
                .collect(),
        }
    }
}

/// Maps test methods to focal methods.
#[derive(Debug, Clone)]
pub struct MethodMapper {
    test_token: String,
}

impl Default for MethodMapper {
    fn default() -> Self {
        Self::new("test")
    }
}

impl MethodMapper {
    /// Create a mapper removing `test_token` from test names
    pub fn new(test_token: impl Into<String>) -> Self {
        Self {
            test_token: test_token.into().to_lowercase(),
        }
    }

    /// Group `tests` by the focal method each maps to.
    ///
    /// Groups are ordered by their first mapped test; focal methods without
    /// a mapped test are not emitted.
    pub fn map_methods(&self, focal: &[ParsedMethod], tests: &[ParsedMethod]) -> Vec<FocalMethodSample> {
        let normalized_focal: Vec<String> =
            focal.iter().map(|m| m.identifier.to_lowercase()).collect();
        let focal_names: HashSet<&str> = normalized_focal.iter().map(String::as_str).collect();

        let mut groups: IndexMap<usize, Vec<ParsedMethod>> = IndexMap::new();
        for test in tests {
            let Some(index) = self.match_focal(test, &normalized_focal, &focal_names) else {
                debug!("No focal method for test {}", test.identifier);
                continue;
            };
            groups.entry(index).or_default().push(test.clone());
        }

        groups
            .into_iter()
            .map(|(index, test_methods)| FocalMethodSample {
                focal_method: focal[index].clone(),
                test_methods,
            })
            .collect()
    }

    fn match_focal(
        &self,
        test: &ParsedMethod,
        normalized_focal: &[String],
        focal_names: &HashSet<&str>,
    ) -> Option<usize> {
        let normalized_test = test.identifier.to_lowercase().replace(&self.test_token, "");
        if let Some(index) = normalized_focal.iter().position(|f| *f == normalized_test) {
            return Some(index);
        }

        let invoked: HashSet<String> = test
            .invoked_names
            .iter()
            .map(|name| name.to_lowercase())
            .collect();
        let mut overlap = invoked
            .iter()
            .filter(|name| focal_names.contains(name.as_str()));

        match (overlap.next(), overlap.next()) {
            (Some(only), None) => normalized_focal.iter().position(|f| f == only),
            _ => None,
        }
    }
}

/// Map test methods to focal methods with the default `test` token.
pub fn map_methods(focal: &[ParsedMethod], tests: &[ParsedMethod]) -> Vec<FocalMethodSample> {
    MethodMapper::default().map_methods(focal, tests)
}

/// Test-case methods of `test_file` (relative to `root`), with their class attached.
pub fn parse_test_cases(parser: &mut JavaParser, root: &Path, test_file: &str) -> Vec<ParsedMethod> {
    parser
        .parse_file_in(root, test_file)
        .into_iter()
        .flat_map(|class| class.methods)
        .filter(|method| method.is_test_case)
        .collect()
}

/// Every non-test method of `focal_file` (relative to `root`), constructors included.
pub fn parse_potential_focal_methods(
    parser: &mut JavaParser,
    root: &Path,
    focal_file: &str,
) -> Vec<ParsedMethod> {
    parser
        .parse_file_in(root, focal_file)
        .into_iter()
        .flat_map(|class| class.methods)
        .filter(|method| !method.is_test_case)
        .collect()
}

/// Finds focal-method samples across a whole repository or subproject.
pub struct FocalMethodFinder {
    parser: JavaParser,
    pairer: FilePairer,
    mapper: MethodMapper,
}

impl FocalMethodFinder {
    /// Assemble a finder from its parts
    pub fn new(parser: JavaParser, pairer: FilePairer, mapper: MethodMapper) -> Self {
        Self {
            parser,
            pairer,
            mapper,
        }
    }

    /// Build a finder from a run configuration
    pub fn from_config(config: &FocalcovConfig) -> Result<Self> {
        Ok(Self::new(
            JavaParser::from_config(&config.parser)?,
            FilePairer::from_config(config),
            MethodMapper::new(config.pairing.test_token.clone()),
        ))
    }

    /// Pair files under `root`, parse both sides, and map methods.
    ///
    /// Returns an empty list when `root` is missing or cannot be enumerated.
    pub fn find_focal_method_samples(&mut self, root: &Path) -> Vec<FocalMethodSample> {
        self.find_focal_method_samples_excluding(root, &[])
    }

    /// Same as [`Self::find_focal_method_samples`], leaving out sources in
    /// the `excluded` module directories.
    pub fn find_focal_method_samples_excluding(
        &mut self,
        root: &Path,
        excluded: &[PathBuf],
    ) -> Vec<FocalMethodSample> {
        if !root.exists() {
            return Vec::new();
        }
        let pairs = match self.pairer.pair_files_excluding(root, excluded) {
            Ok(pairs) => pairs,
            Err(e) => {
                warn!("Cannot enumerate sources under {}: {}", root.display(), e);
                return Vec::new();
            }
        };

        let mut samples = Vec::new();
        for (test_file, focal_file) in &pairs {
            let tests = parse_test_cases(&mut self.parser, root, test_file);
            let focal = parse_potential_focal_methods(&mut self.parser, root, focal_file);
            let mapped = self.mapper.map_methods(&focal, &tests);
            debug!(
                "{} -> {}: {} tests, {} focal methods, {} samples",
                test_file,
                focal_file,
                tests.len(),
                focal.len(),
                mapped.len()
            );
            samples.extend(mapped);
        }
        samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::lang::ClassHeader;

    fn method(identifier: &str, invoked: &[&str]) -> ParsedMethod {
        ParsedMethod {
            identifier: identifier.to_string(),
            invoked_names: invoked.iter().map(|s| s.to_string()).collect(),
            ..ParsedMethod::default()
        }
    }

    fn grouping(samples: &[FocalMethodSample]) -> Vec<(&str, Vec<&str>)> {
        samples
            .iter()
            .map(|s| {
                (
                    s.focal_method.identifier.as_str(),
                    s.test_methods.iter().map(|t| t.identifier.as_str()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_name_match_and_unique_invocation_grouping() {
        let focal = vec![method("doSomething0", &[]), method("doSomething1", &[])];
        let tests = vec![
            method("testDoSomething0", &["doSomething0", "doSomething1"]),
            method("shouldDoSomething0", &["doSomething0"]),
            method("shouldDoSomething1", &["doSomething0", "doSomething1"]),
            method("shouldDoSomething1Alone", &["doSomething1"]),
        ];

        let samples = map_methods(&focal, &tests);
        assert_eq!(
            grouping(&samples),
            vec![
                ("doSomething0", vec!["testDoSomething0", "shouldDoSomething0"]),
                ("doSomething1", vec!["shouldDoSomething1Alone"]),
            ]
        );
    }

    #[test]
    fn test_name_match_wins_over_invocations() {
        let focal = vec![method("foo", &[]), method("bar", &[])];
        let tests = vec![method("testFoo", &["bar"])];

        let samples = map_methods(&focal, &tests);
        assert_eq!(grouping(&samples), vec![("foo", vec!["testFoo"])]);
    }

    #[test]
    fn test_unmapped_when_no_or_ambiguous_invocations() {
        let focal = vec![method("open", &[]), method("close", &[])];
        let tests = vec![
            method("shouldRoundTrip", &["open", "close"]),
            method("shouldDoNothing", &["println"]),
        ];
        assert!(map_methods(&focal, &tests).is_empty());
    }

    #[test]
    fn test_repeated_invocation_counts_once() {
        let focal = vec![method("open", &[]), method("close", &[])];
        let tests = vec![method("opensTwice", &["open", "OPEN", "assertTrue"])];

        let samples = map_methods(&focal, &tests);
        assert_eq!(grouping(&samples), vec![("open", vec!["opensTwice"])]);
    }

    #[test]
    fn test_groups_follow_first_mapped_test() {
        let focal = vec![method("alpha", &[]), method("beta", &[])];
        let tests = vec![method("testBeta", &[]), method("testAlpha", &[]), method("betaEdge", &["beta"])];

        let samples = map_methods(&focal, &tests);
        assert_eq!(
            grouping(&samples),
            vec![("beta", vec!["testBeta", "betaEdge"]), ("alpha", vec!["testAlpha"])]
        );
    }

    #[test]
    fn test_overloads_map_to_first_declaration() {
        let mut first = method("add", &[]);
        first.parameters = "(int a)".to_string();
        let mut second = method("add", &[]);
        second.parameters = "(int a, int b)".to_string();

        let samples = map_methods(&[first, second], &[method("testAdd", &[])]);
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].focal_method.parameters, "(int a)");
    }

    #[test]
    fn test_detach_classes_clears_every_method() {
        let header = Arc::new(ClassHeader {
            identifier: "Stock".to_string(),
            ..ClassHeader::default()
        });
        let sample = FocalMethodSample {
            focal_method: method("add", &[]).with_class(Arc::clone(&header)),
            test_methods: vec![
                method("testAdd", &["add"]).with_class(Arc::clone(&header)),
                method("testAddTwice", &["add"]).with_class(header),
            ],
        };

        let detached = sample.detach_classes();
        assert!(detached.focal_method.class.is_none());
        assert!(detached.test_methods.iter().all(|t| t.class.is_none()));
        assert_eq!(detached.test_methods.len(), 2);
    }
}
