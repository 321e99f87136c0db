//! Pairwise coverage differencing.

use super::types::{CoveredFocalMethodSample, RepositoryRef, TrainingSample};

/// Lazy sequence of training samples for one focal method.
///
/// Visits every ordered pair `(input, target)` of distinct tests, input
/// outer, and yields a sample when the target covers a focal line the input
/// does not.
#[derive(Debug)]
pub struct TrainingSamples {
    repository: RepositoryRef,
    sample: CoveredFocalMethodSample,
    focal_lines: Vec<String>,
    input: usize,
    target: usize,
}

/// Contrast every ordered pair of tests in `sample`.
pub fn generate_samples(repository: RepositoryRef, sample: CoveredFocalMethodSample) -> TrainingSamples {
    let focal_lines = sample
        .focal_method
        .body
        .split('\n')
        .map(str::to_string)
        .collect();
    TrainingSamples {
        repository,
        sample,
        focal_lines,
        input: 0,
        target: 0,
    }
}

impl TrainingSamples {
    fn build(&self, input: usize, target: usize, uncovered: Vec<usize>) -> TrainingSample {
        let input_test = &self.sample.test_methods[input];
        let target_test = &self.sample.test_methods[target];
        let texts = uncovered
            .iter()
            .map(|line| self.focal_lines.get(*line).cloned().unwrap_or_default())
            .collect();

        TrainingSample {
            repository: self.repository.clone(),
            focal_file: self.sample.focal_file.clone(),
            focal_class: self.sample.focal_class.clone(),
            focal_method: self.sample.focal_method.clone(),
            focal_uncovered_lines: uncovered,
            focal_uncovered_line_texts: texts,
            test_file: input_test.file.clone(),
            test_class: input_test.class.clone(),
            test_input_method: input_test.method.clone(),
            test_target_method: target_test.method.clone(),
        }
    }
}

impl Iterator for TrainingSamples {
    type Item = TrainingSample;

    fn next(&mut self) -> Option<Self::Item> {
        let count = self.sample.test_methods.len();
        while self.input < count {
            if self.target >= count {
                self.input += 1;
                self.target = 0;
                continue;
            }

            let (input, target) = (self.input, self.target);
            self.target += 1;
            if input == target {
                continue;
            }

            let covered_by_input = &self.sample.test_methods[input].method.covered_line_indices;
            let mut uncovered: Vec<usize> = self.sample.test_methods[target]
                .method
                .covered_line_indices
                .iter()
                .copied()
                .filter(|line| !covered_by_input.contains(line))
                .collect();
            if uncovered.is_empty() {
                continue;
            }
            uncovered.sort_unstable();
            uncovered.dedup();
            return Some(self.build(input, target, uncovered));
        }
        None
    }
}
