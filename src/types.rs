//! Feature, match, and image-extent input types.
//!
//! These are constructed by the upstream detection/matching pipeline and
//! passed in read-only; nothing in this crate mutates them.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::error::{AlignError, Result};

/// A detected 2D point feature in one image.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Pixel x coordinate.
    pub x: f64,
    /// Pixel y coordinate.
    pub y: f64,
    /// Opaque descriptor payload carried along from the detector; never
    /// inspected by the alignment core.
    pub descriptor: Option<Vec<f32>>,
}

impl Feature {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            descriptor: None,
        }
    }

    pub fn with_descriptor(x: f64, y: f64, descriptor: Vec<f32>) -> Self {
        Self {
            x,
            y,
            descriptor: Some(descriptor),
        }
    }

    /// Pixel location as a point.
    pub fn position(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }
}

/// Ordered features of one image.
///
/// The position in the sequence is the feature's identity within matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureSet {
    features: Vec<Feature>,
}

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Feature> {
        self.features.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }
}

impl std::ops::Index<usize> for FeatureSet {
    type Output = Feature;

    fn index(&self, index: usize) -> &Feature {
        &self.features[index]
    }
}

impl FromIterator<Feature> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Feature>> for FeatureSet {
    fn from(features: Vec<Feature>) -> Self {
        Self { features }
    }
}

/// A tentative correspondence between two feature sets, by index.
///
/// Order within a match list is irrelevant; duplicates are tolerated and
/// not deduplicated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Index into the first image's feature set.
    pub idx1: usize,
    /// Index into the second image's feature set.
    pub idx2: usize,
}

impl Match {
    pub fn new(idx1: usize, idx2: usize) -> Self {
        Self { idx1, idx2 }
    }
}

/// Image bounds in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Pixel coordinates of the image center.
    pub fn center(&self) -> Point2<f64> {
        Point2::new(self.width as f64 / 2.0, self.height as f64 / 2.0)
    }
}

/// A match resolved to its two pixel locations.
pub(crate) type PointPair = (Point2<f64>, Point2<f64>);

/// Check every match index against both feature sets.
pub(crate) fn validate_matches(
    f1: &FeatureSet,
    f2: &FeatureSet,
    matches: &[Match],
) -> Result<()> {
    for (i, m) in matches.iter().enumerate() {
        if m.idx1 >= f1.len() {
            return Err(AlignError::MatchOutOfBounds {
                match_index: i,
                image: 1,
                feature_index: m.idx1,
                len: f1.len(),
            });
        }
        if m.idx2 >= f2.len() {
            return Err(AlignError::MatchOutOfBounds {
                match_index: i,
                image: 2,
                feature_index: m.idx2,
                len: f2.len(),
            });
        }
    }
    Ok(())
}

/// Resolve a subset of matches (by index) into paired pixel locations.
///
/// Callers validate match indices beforehand; see [`validate_matches`].
pub(crate) fn resolve_pairs(
    f1: &FeatureSet,
    f2: &FeatureSet,
    matches: &[Match],
    indices: &[usize],
) -> Vec<PointPair> {
    indices
        .iter()
        .map(|&i| {
            let m = &matches[i];
            (f1[m.idx1].position(), f2[m.idx2].position())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_matches_flags_out_of_bounds() {
        let f1: FeatureSet = vec![Feature::new(0.0, 0.0)].into();
        let f2: FeatureSet = vec![Feature::new(1.0, 1.0)].into();

        assert!(validate_matches(&f1, &f2, &[Match::new(0, 0)]).is_ok());

        let err = validate_matches(&f1, &f2, &[Match::new(0, 0), Match::new(1, 0)]);
        assert_eq!(
            err,
            Err(AlignError::MatchOutOfBounds {
                match_index: 1,
                image: 1,
                feature_index: 1,
                len: 1,
            })
        );
    }

    #[test]
    fn resolve_pairs_follows_index_order() {
        let f1: FeatureSet = vec![Feature::new(0.0, 0.0), Feature::new(2.0, 3.0)].into();
        let f2: FeatureSet = vec![Feature::new(1.0, 1.0), Feature::new(5.0, 7.0)].into();
        let matches = [Match::new(0, 1), Match::new(1, 0)];

        let pairs = resolve_pairs(&f1, &f2, &matches, &[1, 0]);
        assert_eq!(pairs[0].0, Point2::new(2.0, 3.0));
        assert_eq!(pairs[0].1, Point2::new(1.0, 1.0));
        assert_eq!(pairs[1].0, Point2::new(0.0, 0.0));
        assert_eq!(pairs[1].1, Point2::new(5.0, 7.0));
    }
}
