//! Streaming set-membership filters scoped to one run.

use std::collections::HashSet;
use std::hash::Hash;

use parking_lot::Mutex;

use super::coverage::TrainingSample;

/// Admits each key the first time it is offered.
#[derive(Debug)]
pub struct SeenFilter<K> {
    seen: Mutex<HashSet<K>>,
}

impl<K> Default for SeenFilter<K> {
    fn default() -> Self {
        Self {
            seen: Mutex::new(HashSet::new()),
        }
    }
}

impl<K: Eq + Hash> SeenFilter<K> {
    /// Create an empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` the first time `key` is offered, `false` afterwards.
    pub fn admit(&self, key: K) -> bool {
        self.seen.lock().insert(key)
    }

    /// Number of distinct keys admitted so far
    pub fn len(&self) -> usize {
        self.seen.lock().len()
    }

    /// Whether nothing has been admitted yet
    pub fn is_empty(&self) -> bool {
        self.seen.lock().is_empty()
    }
}

/// First record per repository name wins.
pub type RepositoryNameFilter = SeenFilter<String>;

/// Drops training samples whose (focal, input, target) bodies were already emitted.
#[derive(Debug, Default)]
pub struct SampleTripletFilter {
    inner: SeenFilter<(String, String, String)>,
}

impl SampleTripletFilter {
    /// Create an empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` unless an identical body triplet was admitted before.
    pub fn admit(&self, sample: &TrainingSample) -> bool {
        let (focal, input, target) = sample.body_triplet();
        self.inner
            .admit((focal.to_string(), input.to_string(), target.to_string()))
    }

    /// Number of distinct triplets admitted so far
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether nothing has been admitted yet
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
