//! Per-model transform fitters.
//!
//! Each motion family implements the same two-mode contract: an exact
//! solve from a minimal sample and an over-determined least-squares solve
//! from an arbitrary correspondence set. The family set is closed, so the
//! fitter is selected once per call and never registered dynamically.

mod homography;
mod rotation;
mod translation;

pub(crate) use homography::HomographyFitter;
pub(crate) use rotation::RotationFitter;
pub(crate) use translation::TranslationFitter;

use crate::error::{AlignError, Result};
use crate::models::{MotionConfig, MotionModel};
use crate::transform::Transform;
use crate::types::PointPair;

/// Two-mode fitting contract shared by all motion families.
pub(crate) trait ModelFitter {
    /// The family this fitter solves for.
    fn model(&self) -> MotionModel;

    /// Correspondences in a minimal sample.
    fn sample_size(&self) -> usize {
        self.model().sample_size()
    }

    /// Exact solve from a minimal sample.
    ///
    /// `pairs` holds exactly [`sample_size`](ModelFitter::sample_size)
    /// correspondences. A geometrically degenerate sample yields
    /// [`AlignError::DegenerateSample`], which the driver answers by
    /// redrawing.
    fn fit_minimal(&self, pairs: &[PointPair]) -> Result<Transform>;

    /// Least-squares solve over `pairs.len() >= sample_size()`
    /// correspondences, minimizing total squared reprojection error.
    ///
    /// Fails with [`AlignError::UnderdeterminedSystem`] below the minimum.
    fn fit_least_squares(&self, pairs: &[PointPair]) -> Result<Transform>;

    /// Shared argument check for the least-squares mode.
    fn require_determined(&self, supplied: usize) -> Result<()> {
        let required = self.sample_size();
        if supplied < required {
            return Err(AlignError::UnderdeterminedSystem {
                model: self.model(),
                required,
                supplied,
            });
        }
        Ok(())
    }
}

/// Select the fitter for a motion configuration.
pub(crate) fn fitter_for(config: &MotionConfig) -> Result<Box<dyn ModelFitter>> {
    match config.model {
        MotionModel::Translation => Ok(Box::new(TranslationFitter)),
        MotionModel::Rotation => {
            let focal = config.focal_length.ok_or(AlignError::MissingFocalLength)?;
            if !focal.is_finite() || focal <= 0.0 {
                return Err(AlignError::MissingFocalLength);
            }
            Ok(Box::new(RotationFitter::new(
                focal,
                config.extent1,
                config.extent2,
            )))
        }
        MotionModel::Homography => Ok(Box::new(HomographyFitter)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Extent;

    #[test]
    fn rotation_requires_a_usable_focal_length() {
        let extent = Extent::new(640, 480);
        let config = MotionConfig::new(MotionModel::Rotation, extent, extent);
        assert!(matches!(
            fitter_for(&config),
            Err(AlignError::MissingFocalLength)
        ));

        let config = config.with_focal_length(0.0);
        assert!(matches!(
            fitter_for(&config),
            Err(AlignError::MissingFocalLength)
        ));

        let config = config.with_focal_length(500.0);
        assert!(fitter_for(&config).is_ok());
    }
}
