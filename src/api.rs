//! High-level entry points for pairwise alignment.

use log::debug;

use crate::error::{AlignError, Result};
use crate::fitters;
use crate::models::MotionConfig;
use crate::ransac::RansacDriver;
use crate::scoring::{classify_matches, InlierSet};
use crate::settings::RansacParams;
use crate::transform::Transform;
use crate::types::{resolve_pairs, validate_matches, FeatureSet, Match};

/// Result of a successful pairwise alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    /// Transform mapping first-image pixel coordinates into the second
    /// image.
    pub transform: Transform,
    /// Matches supporting the transform, in match order.
    pub inliers: InlierSet,
}

/// Estimate the transform aligning two images from tentative feature
/// matches, a minority of which may be wrong.
///
/// Runs `params.iterations` RANSAC iterations: each draws a distinct
/// random minimal sample (size per `motion.model`), fits a candidate
/// transform, and counts the matches it explains within
/// `params.threshold` pixels. The best-supported candidate is refined by
/// a least-squares fit over its full consensus set.
///
/// Fails with [`AlignError::InsufficientInliers`] when no candidate ever
/// gathers enough support to refine, and with
/// [`AlignError::UnderdeterminedSystem`] when the match list cannot even
/// seat a minimal sample.
pub fn align_pair(
    features1: &FeatureSet,
    features2: &FeatureSet,
    matches: &[Match],
    motion: &MotionConfig,
    params: &RansacParams,
) -> Result<Alignment> {
    validate_matches(features1, features2, matches)?;
    let fitter = fitters::fitter_for(motion)?;

    debug!(
        "aligning {} matches with {:?}, {} iterations at threshold {}",
        matches.len(),
        motion.model,
        params.iterations,
        params.threshold
    );

    let driver = RansacDriver::new(features1, features2, matches, fitter.as_ref(), params);
    let (transform, inliers) = driver.run()?;
    Ok(Alignment { transform, inliers })
}

/// Count the matches consistent with a candidate transform under
/// `threshold` pixels.
///
/// Diagnostics entry point for callers that already hold a transform.
/// Pure and deterministic; matches whose location cannot be mapped score
/// as non-inliers.
pub fn count_inliers(
    features1: &FeatureSet,
    features2: &FeatureSet,
    matches: &[Match],
    transform: &Transform,
    threshold: f64,
) -> Result<InlierSet> {
    validate_matches(features1, features2, matches)?;
    Ok(classify_matches(
        features1, features2, matches, transform, threshold,
    ))
}

/// Least-squares fit over a trusted subset of matches.
///
/// `inliers` indexes into `matches` (for example a curated subset, or the
/// indices returned by [`align_pair`]). Fails with
/// [`AlignError::UnderdeterminedSystem`] when the subset is smaller than
/// the model's minimal correspondence count.
pub fn least_squares_fit(
    features1: &FeatureSet,
    features2: &FeatureSet,
    matches: &[Match],
    motion: &MotionConfig,
    inliers: &[usize],
) -> Result<Transform> {
    validate_matches(features1, features2, matches)?;
    for &index in inliers {
        if index >= matches.len() {
            return Err(AlignError::InlierOutOfBounds {
                index,
                len: matches.len(),
            });
        }
    }

    let fitter = fitters::fitter_for(motion)?;
    let pairs = resolve_pairs(features1, features2, matches, inliers);
    fitter.fit_least_squares(&pairs)
}
