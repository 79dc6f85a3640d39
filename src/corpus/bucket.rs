//! Project-to-bucket assignment for cross-validation.

use std::collections::HashMap;

/// Spreads projects over a fixed number of buckets, round-robin in order of
/// first sight. Every record of a project lands in the same bucket, so no
/// project leaks between a training and a test fold.
#[derive(Debug, Clone)]
pub struct BucketAssigner {
    buckets: usize,
    assignments: HashMap<String, usize>,
}

impl BucketAssigner {
    /// `buckets` is clamped to at least one
    pub fn new(buckets: usize) -> Self {
        Self {
            buckets: buckets.max(1),
            assignments: HashMap::new(),
        }
    }

    pub fn assign(&mut self, project: &str) -> usize {
        if let Some(&bucket) = self.assignments.get(project) {
            return bucket;
        }
        let bucket = self.assignments.len() % self.buckets;
        self.assignments.insert(project.to_string(), bucket);
        bucket
    }

    pub fn get(&self, project: &str) -> Option<usize> {
        self.assignments.get(project).copied()
    }

    pub fn projects(&self) -> usize {
        self.assignments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_robin_and_stable() {
        let mut assigner = BucketAssigner::new(2);
        assert_eq!(assigner.assign("a"), 0);
        assert_eq!(assigner.assign("b"), 1);
        assert_eq!(assigner.assign("c"), 0);
        assert_eq!(assigner.assign("a"), 0);
        assert_eq!(assigner.assign("b"), 1);
        assert_eq!(assigner.projects(), 3);
        assert_eq!(assigner.get("c"), Some(0));
        assert_eq!(assigner.get("d"), None);
    }

    #[test]
    fn test_zero_buckets_is_clamped() {
        let mut assigner = BucketAssigner::new(0);
        assert_eq!(assigner.assign("a"), 0);
        assert_eq!(assigner.assign("b"), 0);
    }
}
