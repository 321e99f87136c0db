use std::sync::Arc;

use proptest::prelude::*;

use super::*;
use crate::lang::{ClassHeader, SourcePosition};

fn focal_method() -> ParsedMethod {
    ParsedMethod {
        identifier: "guess".to_string(),
        start: SourcePosition::new(10, 4),
        end: SourcePosition::new(13, 5),
        body: "int guess(int n) {\n        if (n > secret) return 1;\n        if (n < secret) return -1;\n    }"
            .to_string(),
        ..ParsedMethod::default()
    }
}

fn covered_test(name: &str, lines: &[usize]) -> CoveredTestMethod {
    CoveredTestMethod {
        file: "src/test/java/GameTest.java".to_string(),
        class: ClassName {
            package: "com.acme".to_string(),
            identifier: "GameTest".to_string(),
        },
        method: TestMethodRecord {
            identifier: name.to_string(),
            span: MethodSpan {
                start: SourcePosition::default(),
                end: SourcePosition::default(),
            },
            body: format!("@Test void {name}() {{}}"),
            covered_line_indices: lines.to_vec(),
            covered_line_texts: Vec::new(),
        },
    }
}

fn sample_with(tests: Vec<CoveredTestMethod>) -> CoveredFocalMethodSample {
    let focal = focal_method();
    let mut sample = CoveredFocalMethodSample::for_focal(&focal);
    sample.test_methods = tests;
    sample
}

fn repository() -> RepositoryRef {
    RepositoryRef {
        url: "https://github.com/acme/game".to_string(),
        revision: "3f2a9c1".to_string(),
    }
}

#[test]
fn annotate_keeps_lines_inside_span() {
    let focal = focal_method();
    assert_eq!(focal.body_lines().len(), 4);

    let covered = annotate_coverage(&focal, &[0, 1, 11, 12, 12, 14, 15]);
    assert_eq!(covered.indices, vec![0, 1, 3]);
    assert_eq!(
        covered.texts,
        vec![
            "int guess(int n) {".to_string(),
            "        if (n > secret) return 1;".to_string(),
            "    }".to_string(),
        ]
    );
}

#[test]
fn annotate_without_overlap_is_empty() {
    let covered = annotate_coverage(&focal_method(), &[1, 2, 3, 40]);
    assert_eq!(covered, CoveredLines::default());
}

#[test]
fn push_test_records_class_context() {
    let header = Arc::new(ClassHeader {
        package: "com.acme".to_string(),
        identifier: "GameTest".to_string(),
        source_file: "src/test/java/com/acme/GameTest.java".to_string(),
        ..ClassHeader::default()
    });
    let test = ParsedMethod {
        identifier: "testGuess".to_string(),
        body: "@Test void testGuess() {}".to_string(),
        ..ParsedMethod::default()
    }
    .with_class(header);

    let focal = focal_method();
    let mut sample = CoveredFocalMethodSample::for_focal(&focal);
    sample.push_test(&focal, &test, &[12]);

    let pushed = &sample.test_methods[0];
    assert_eq!(pushed.file, "src/test/java/com/acme/GameTest.java");
    assert_eq!(pushed.class.qualified(), "com.acme.GameTest");
    assert_eq!(pushed.method.covered_line_indices, vec![1]);
    assert_eq!(sample.focal_file, "");
    assert_eq!(sample.focal_method.identifier, "guess");
}

#[test]
fn three_tests_yield_four_contrasts() {
    let sample = sample_with(vec![
        covered_test("a", &[1, 2]),
        covered_test("b", &[2, 3]),
        covered_test("c", &[]),
    ]);

    let samples: Vec<_> = generate_samples(repository(), sample).collect();
    let pairs: Vec<_> = samples
        .iter()
        .map(|s| {
            (
                s.test_input_method.identifier.as_str(),
                s.test_target_method.identifier.as_str(),
                s.focal_uncovered_lines.clone(),
            )
        })
        .collect();

    assert_eq!(
        pairs,
        vec![
            ("a", "b", vec![3]),
            ("b", "a", vec![1]),
            ("c", "a", vec![1, 2]),
            ("c", "b", vec![2, 3]),
        ]
    );
    assert_eq!(samples[0].focal_uncovered_line_texts, vec!["    }".to_string()]);
    assert_eq!(samples[0].repository, repository());
    assert_eq!(samples[0].test_class.identifier, "GameTest");
}

#[test]
fn superset_input_contrasts_one_way() {
    let sample = sample_with(vec![covered_test("wide", &[0, 1, 2]), covered_test("narrow", &[1])]);
    let samples: Vec<_> = generate_samples(repository(), sample).collect();

    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].test_input_method.identifier, "narrow");
    assert_eq!(samples[0].test_target_method.identifier, "wide");
    assert_eq!(samples[0].focal_uncovered_lines, vec![0, 2]);
}

#[test]
fn single_test_yields_nothing() {
    let sample = sample_with(vec![covered_test("only", &[1, 2])]);
    assert_eq!(generate_samples(repository(), sample).count(), 0);
}

#[test]
fn samples_serialize_with_snake_case_keys() {
    let sample = sample_with(vec![covered_test("a", &[1]), covered_test("b", &[2])]);
    let first = generate_samples(repository(), sample).next().unwrap();
    let json = serde_json::to_value(&first).unwrap();

    assert_eq!(json["focal_method"]["identifier"], "guess");
    assert_eq!(json["test_input_method"]["covered_line_indices"][0], 1);
    assert_eq!(json["focal_uncovered_lines"][0], 2);
    assert_eq!(json["repository"]["revision"], "3f2a9c1");
}

proptest! {
    #[test]
    fn contrasts_match_pairwise_set_difference(
        coverage in proptest::collection::vec(
            proptest::collection::btree_set(0usize..6, 0..5),
            0..6,
        )
    ) {
        let tests: Vec<_> = coverage
            .iter()
            .enumerate()
            .map(|(i, lines)| covered_test(&format!("t{i}"), &lines.iter().copied().collect::<Vec<_>>()))
            .collect();
        let samples: Vec<_> = generate_samples(repository(), sample_with(tests)).collect();

        let mut expected = Vec::new();
        for (i, input) in coverage.iter().enumerate() {
            for (j, target) in coverage.iter().enumerate() {
                if i == j {
                    continue;
                }
                let uncovered: Vec<usize> = target.difference(input).copied().collect();
                if !uncovered.is_empty() {
                    expected.push((format!("t{i}"), format!("t{j}"), uncovered));
                }
            }
        }

        let actual: Vec<_> = samples
            .iter()
            .map(|s| (
                s.test_input_method.identifier.clone(),
                s.test_target_method.identifier.clone(),
                s.focal_uncovered_lines.clone(),
            ))
            .collect();
        for (input, target, _) in &actual {
            prop_assert_ne!(input, target);
        }
        prop_assert_eq!(actual, expected);
    }
}
