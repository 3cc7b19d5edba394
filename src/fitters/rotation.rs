//! Rotation fitter: 2D rigid motion in a focal-length-normalized frame.
//!
//! Pixel coordinates are first mapped into a centered frame scaled by the
//! focal length (the images are assumed to share a viewpoint), a rotation
//! plus translation is fit there by orthogonal Procrustes, and the result
//! is conjugated back into pixel space.

use nalgebra::{Matrix2, Matrix3, Point2, Vector2};

use super::ModelFitter;
use crate::error::{AlignError, Result};
use crate::models::MotionModel;
use crate::transform::Transform;
use crate::types::{Extent, PointPair};

/// Squared normalized-frame distance below which points coincide.
const COINCIDENT_EPS_SQ: f64 = 1e-20;

pub(crate) struct RotationFitter {
    k2: Matrix3<f64>,
    k1_inv: Matrix3<f64>,
    k2_inv: Matrix3<f64>,
}

impl RotationFitter {
    pub(crate) fn new(focal_length: f64, extent1: Extent, extent2: Extent) -> Self {
        Self {
            k2: intrinsics(focal_length, extent2),
            k1_inv: inverse_intrinsics(focal_length, extent1),
            k2_inv: inverse_intrinsics(focal_length, extent2),
        }
    }

    fn degenerate(&self) -> AlignError {
        AlignError::DegenerateSample {
            model: self.model(),
        }
    }

    /// Fit the rigid motion `q2 = R q1 + t` over normalized coordinates
    /// and return the pixel-space transform `K2 (R|t) K1^-1`.
    fn fit_rigid(&self, pairs: &[PointPair]) -> Result<Transform> {
        let normalized: Vec<(Vector2<f64>, Vector2<f64>)> = pairs
            .iter()
            .map(|(p1, p2)| {
                (
                    apply_affine(&self.k1_inv, p1),
                    apply_affine(&self.k2_inv, p2),
                )
            })
            .collect();

        let n = normalized.len() as f64;
        let mut c1 = Vector2::zeros();
        let mut c2 = Vector2::zeros();
        for (q1, q2) in &normalized {
            c1 += q1;
            c2 += q2;
        }
        c1 /= n;
        c2 /= n;

        // 2x2 cross-covariance of the centered point sets.
        let mut h = Matrix2::zeros();
        let mut spread = 0.0;
        for (q1, q2) in &normalized {
            let d1 = q1 - c1;
            let d2 = q2 - c2;
            spread += d1.norm_squared();
            h += d2 * d1.transpose();
        }
        if spread < COINCIDENT_EPS_SQ {
            return Err(self.degenerate());
        }

        // Orthogonal Procrustes: R = U diag(1, det(U V^T)) V^T.
        let svd = h.svd(true, true);
        let u = svd.u.ok_or_else(|| self.degenerate())?;
        let v_t = svd.v_t.ok_or_else(|| self.degenerate())?;
        let mut r = u * v_t;
        if r.determinant() < 0.0 {
            let reflect = Matrix2::new(1.0, 0.0, 0.0, -1.0);
            r = u * reflect * v_t;
        }

        let t = c2 - r * c1;
        let e = Matrix3::new(
            r[(0, 0)],
            r[(0, 1)],
            t.x,
            r[(1, 0)],
            r[(1, 1)],
            t.y,
            0.0,
            0.0,
            1.0,
        );

        Ok(Transform::from_matrix(self.k2 * e * self.k1_inv))
    }
}

impl ModelFitter for RotationFitter {
    fn model(&self) -> MotionModel {
        MotionModel::Rotation
    }

    fn fit_minimal(&self, pairs: &[PointPair]) -> Result<Transform> {
        debug_assert_eq!(pairs.len(), self.sample_size());
        // The rotation angle is only observable from a nonzero baseline in
        // both images.
        let b1 = apply_affine(&self.k1_inv, &pairs[0].0) - apply_affine(&self.k1_inv, &pairs[1].0);
        let b2 = apply_affine(&self.k2_inv, &pairs[0].1) - apply_affine(&self.k2_inv, &pairs[1].1);
        if b1.norm_squared() < COINCIDENT_EPS_SQ || b2.norm_squared() < COINCIDENT_EPS_SQ {
            return Err(self.degenerate());
        }
        self.fit_rigid(pairs)
    }

    fn fit_least_squares(&self, pairs: &[PointPair]) -> Result<Transform> {
        self.require_determined(pairs.len())?;
        self.fit_rigid(pairs)
    }
}

fn intrinsics(f: f64, extent: Extent) -> Matrix3<f64> {
    let c = extent.center();
    Matrix3::new(f, 0.0, c.x, 0.0, f, c.y, 0.0, 0.0, 1.0)
}

fn inverse_intrinsics(f: f64, extent: Extent) -> Matrix3<f64> {
    let c = extent.center();
    Matrix3::new(
        1.0 / f,
        0.0,
        -c.x / f,
        0.0,
        1.0 / f,
        -c.y / f,
        0.0,
        0.0,
        1.0,
    )
}

/// Apply the affine rows of `m` to a point; `m` has bottom row (0, 0, 1).
fn apply_affine(m: &Matrix3<f64>, p: &Point2<f64>) -> Vector2<f64> {
    Vector2::new(
        m[(0, 0)] * p.x + m[(0, 1)] * p.y + m[(0, 2)],
        m[(1, 0)] * p.x + m[(1, 1)] * p.y + m[(1, 2)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitter() -> RotationFitter {
        RotationFitter::new(500.0, Extent::new(640, 480), Extent::new(640, 480))
    }

    /// Ground-truth pixel transform for a rigid motion in the normalized
    /// frame, built with the same intrinsic convention the fitter uses.
    fn ground_truth(theta: f64, tx: f64, ty: f64) -> Transform {
        let (s, c) = theta.sin_cos();
        let e = Matrix3::new(c, -s, tx, s, c, ty, 0.0, 0.0, 1.0);
        let k = intrinsics(500.0, Extent::new(640, 480));
        let k_inv = inverse_intrinsics(500.0, Extent::new(640, 480));
        Transform::from_matrix(k * e * k_inv)
    }

    fn pairs_from(truth: &Transform, sources: &[(f64, f64)]) -> Vec<PointPair> {
        sources
            .iter()
            .map(|&(x, y)| {
                let p1 = Point2::new(x, y);
                (p1, truth.apply(&p1).unwrap())
            })
            .collect()
    }

    fn max_entry_diff(a: &Transform, b: &Transform) -> f64 {
        let mut worst: f64 = 0.0;
        for i in 0..3 {
            for j in 0..3 {
                worst = worst.max((a.matrix()[(i, j)] - b.matrix()[(i, j)]).abs());
            }
        }
        worst
    }

    #[test]
    fn minimal_fit_recovers_a_rigid_motion() {
        let truth = ground_truth(0.05, 0.01, -0.02);
        let pairs = pairs_from(&truth, &[(120.0, 90.0), (500.0, 380.0)]);

        let fitted = fitter().fit_minimal(&pairs).unwrap();
        assert!(max_entry_diff(&fitted, &truth) < 1e-8);
    }

    #[test]
    fn least_squares_recovers_a_rigid_motion_from_many_points() {
        let truth = ground_truth(-0.12, -0.03, 0.015);
        let pairs = pairs_from(
            &truth,
            &[
                (50.0, 60.0),
                (600.0, 70.0),
                (320.0, 240.0),
                (100.0, 400.0),
                (550.0, 430.0),
                (250.0, 130.0),
            ],
        );

        let fitted = fitter().fit_least_squares(&pairs).unwrap();
        assert!(max_entry_diff(&fitted, &truth) < 1e-8);
    }

    #[test]
    fn coincident_sample_points_are_degenerate() {
        let p = Point2::new(100.0, 100.0);
        let q = Point2::new(140.0, 90.0);
        let pairs = [(p, q), (p, q)];
        assert!(matches!(
            fitter().fit_minimal(&pairs),
            Err(AlignError::DegenerateSample { .. })
        ));
    }

    #[test]
    fn least_squares_requires_two_pairs() {
        let pairs = [(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0))];
        assert!(matches!(
            fitter().fit_least_squares(&pairs),
            Err(AlignError::UnderdeterminedSystem { .. })
        ));
    }
}
