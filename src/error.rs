//! Error types for featalign.

use crate::models::MotionModel;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AlignError>;

/// Failure modes of the alignment pipeline.
///
/// `DegenerateSample` and `DegenerateTransform` are surfaced by the fitting
/// and transform layers but consumed internally by the RANSAC driver (a
/// degenerate sample is redrawn, an unmappable point scores as a non-inlier).
/// Callers of [`align_pair`](crate::align_pair) only ever observe the
/// remaining variants.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AlignError {
    /// A minimal sample cannot determine a unique transform.
    #[error("degenerate minimal sample for {model:?}")]
    DegenerateSample {
        /// Motion family whose fit degenerated.
        model: MotionModel,
    },

    /// A transform maps a point to a vanishing homogeneous weight, or has
    /// no inverse.
    #[error("transform has no valid mapping (vanishing homogeneous weight)")]
    DegenerateTransform,

    /// Too few correspondences for the requested model.
    #[error("{model:?} needs at least {required} correspondences, got {supplied}")]
    UnderdeterminedSystem {
        model: MotionModel,
        required: usize,
        supplied: usize,
    },

    /// RANSAC never found enough consensus to refine.
    #[error(
        "no consensus for {model:?} after {iterations} iterations at threshold \
         {threshold}: best support {best_support}, {required} required"
    )]
    InsufficientInliers {
        model: MotionModel,
        iterations: usize,
        threshold: f64,
        best_support: usize,
        required: usize,
    },

    /// The rotation model was requested without a usable focal length.
    #[error("the rotation model requires a positive, finite focal length")]
    MissingFocalLength,

    /// A match references a feature index outside its feature set.
    #[error(
        "match {match_index} references feature {feature_index} in image \
         {image}, which has {len} features"
    )]
    MatchOutOfBounds {
        match_index: usize,
        /// 1 or 2, for the first or second feature set.
        image: u8,
        feature_index: usize,
        len: usize,
    },

    /// An inlier index is outside the match list.
    #[error("inlier index {index} is outside the match list of length {len}")]
    InlierOutOfBounds { index: usize, len: usize },
}
