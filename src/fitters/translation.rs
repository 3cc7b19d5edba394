//! Translation fitter: mean displacement over the correspondence set.

use nalgebra::Vector2;

use super::ModelFitter;
use crate::error::{AlignError, Result};
use crate::models::MotionModel;
use crate::transform::Transform;
use crate::types::PointPair;

/// Squared distance below which two sample points count as coincident.
const COINCIDENT_EPS_SQ: f64 = 1e-16;

pub(crate) struct TranslationFitter;

impl ModelFitter for TranslationFitter {
    fn model(&self) -> MotionModel {
        MotionModel::Translation
    }

    fn fit_minimal(&self, pairs: &[PointPair]) -> Result<Transform> {
        debug_assert_eq!(pairs.len(), self.sample_size());
        // Coincident source points carry a single displacement and cannot
        // corroborate each other.
        if (pairs[0].0 - pairs[1].0).norm_squared() < COINCIDENT_EPS_SQ {
            return Err(AlignError::DegenerateSample {
                model: self.model(),
            });
        }
        // The determined solve is the same closed form as least squares.
        self.fit_least_squares(pairs)
    }

    fn fit_least_squares(&self, pairs: &[PointPair]) -> Result<Transform> {
        self.require_determined(pairs.len())?;

        let mut displacement = Vector2::zeros();
        for (p1, p2) in pairs {
            displacement += p2 - p1;
        }
        displacement /= pairs.len() as f64;

        Ok(Transform::translation(displacement.x, displacement.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    #[test]
    fn minimal_fit_averages_the_two_displacements() {
        let pairs = [
            (Point2::new(0.0, 0.0), Point2::new(5.0, -3.0)),
            (Point2::new(10.0, 4.0), Point2::new(15.2, 0.8)),
        ];
        let t = TranslationFitter.fit_minimal(&pairs).unwrap();
        let m = t.matrix();
        assert!((m[(0, 2)] - 5.1).abs() < 1e-12);
        assert!((m[(1, 2)] - (-3.1)).abs() < 1e-12);
    }

    #[test]
    fn coincident_source_points_are_degenerate() {
        let pairs = [
            (Point2::new(1.0, 1.0), Point2::new(6.0, -2.0)),
            (Point2::new(1.0, 1.0), Point2::new(6.0, -2.0)),
        ];
        assert!(matches!(
            TranslationFitter.fit_minimal(&pairs),
            Err(AlignError::DegenerateSample { .. })
        ));
    }

    #[test]
    fn least_squares_requires_two_pairs() {
        let pairs = [(Point2::new(0.0, 0.0), Point2::new(5.0, -3.0))];
        assert!(matches!(
            TranslationFitter.fit_least_squares(&pairs),
            Err(AlignError::UnderdeterminedSystem {
                required: 2,
                supplied: 1,
                ..
            })
        ));
    }

    #[test]
    fn least_squares_matches_minimal_on_the_determined_system() {
        let pairs = [
            (Point2::new(2.0, 7.0), Point2::new(7.0, 4.0)),
            (Point2::new(-3.0, 1.0), Point2::new(2.0, -2.0)),
        ];
        let minimal = TranslationFitter.fit_minimal(&pairs).unwrap();
        let lsq = TranslationFitter.fit_least_squares(&pairs).unwrap();
        assert_eq!(minimal.matrix(), lsq.matrix());
    }
}
