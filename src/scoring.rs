//! Consensus scoring: inlier classification against a candidate transform.

use crate::transform::Transform;
use crate::types::{FeatureSet, Match};

/// Matches consistent with a transform under a distance threshold.
///
/// Indices point into the match list that produced the set, in original
/// match order. Every scoring pass produces a fresh set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlierSet {
    indices: Vec<usize>,
}

impl InlierSet {
    pub(crate) fn from_indices(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    /// Number of inlier matches.
    pub fn count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Indices into the scored match list, ascending.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }
}

/// Classify every match as inlier or outlier under `threshold` pixels.
///
/// Each match's first-image location is mapped through `transform` and
/// compared to its second-image location; the match is an inlier iff the
/// Euclidean distance is at most `threshold`. A match whose location cannot
/// be mapped (vanishing homogeneous weight) scores as a non-inlier rather
/// than propagating the failure. Pure function of its inputs.
pub(crate) fn classify_matches(
    f1: &FeatureSet,
    f2: &FeatureSet,
    matches: &[Match],
    transform: &Transform,
    threshold: f64,
) -> InlierSet {
    let mut indices = Vec::new();
    for (i, m) in matches.iter().enumerate() {
        let mapped = match transform.apply(&f1[m.idx1].position()) {
            Ok(p) => p,
            Err(_) => continue,
        };
        if (mapped - f2[m.idx2].position()).norm() <= threshold {
            indices.push(i);
        }
    }
    InlierSet::from_indices(indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Feature;
    use nalgebra::Matrix3;

    fn sets() -> (FeatureSet, FeatureSet, Vec<Match>) {
        let f1: FeatureSet = (0..6)
            .map(|i| Feature::new(i as f64 * 10.0, i as f64 * 3.0))
            .collect();
        // First four follow a (5, -3) shift; the last two do not.
        let f2: FeatureSet = f1
            .iter()
            .enumerate()
            .map(|(i, f)| {
                if i < 4 {
                    Feature::new(f.x + 5.0, f.y - 3.0)
                } else {
                    Feature::new(f.x + 40.0, f.y + 25.0)
                }
            })
            .collect();
        let matches = (0..6).map(|i| Match::new(i, i)).collect();
        (f1, f2, matches)
    }

    #[test]
    fn counts_matches_within_threshold() {
        let (f1, f2, matches) = sets();
        let t = Transform::translation(5.0, -3.0);

        let inliers = classify_matches(&f1, &f2, &matches, &t, 0.5);
        assert_eq!(inliers.count(), 4);
        assert_eq!(inliers.indices(), &[0, 1, 2, 3]);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let (f1, f2, matches) = sets();
        let t = Transform::translation(5.0, -3.0);

        let a = classify_matches(&f1, &f2, &matches, &t, 0.5);
        let b = classify_matches(&f1, &f2, &matches, &t, 0.5);
        assert_eq!(a, b);
    }

    #[test]
    fn unmappable_matches_score_as_outliers() {
        let (f1, f2, matches) = sets();
        // w vanishes at x = 10, i.e. for match index 1.
        let t = Transform::from_matrix(Matrix3::new(
            1.0, 0.0, 5.0, 0.0, 1.0, -3.0, -0.1, 0.0, 1.0,
        ));

        let inliers = classify_matches(&f1, &f2, &matches, &t, 1e9);
        assert!(!inliers.indices().contains(&1));
    }
}
