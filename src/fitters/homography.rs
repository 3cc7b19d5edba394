//! Homography fitter: conditioned inhomogeneous DLT.
//!
//! The projective scale is fixed by pinning the bottom-right matrix entry
//! to 1, which turns the minimal 4-point case into a determined 8x8 solve
//! and the general case into an over-determined 2Nx8 least-squares system.
//! Both point sets are Hartley-conditioned (zero centroid, mean distance
//! sqrt(2)) before solving; with raw image-scale coordinates the system is
//! badly scaled and the solve unreliable.

use nalgebra::{DMatrix, DVector, Matrix3, Point2};

use super::ModelFitter;
use crate::error::{AlignError, Result};
use crate::models::MotionModel;
use crate::transform::Transform;
use crate::types::PointPair;
use crate::utils::gauss_elimination;

/// Twice-the-triangle-area bound for the collinearity test, in the
/// conditioned frame where point spread is O(1).
const COLLINEAR_EPS: f64 = 1e-9;

/// Mean point spread below this is a collapsed configuration.
const SPREAD_EPS: f64 = 1e-12;

/// Bottom-right entries below this cannot fix the projective scale.
const SCALE_EPS: f64 = 1e-12;

pub(crate) struct HomographyFitter;

impl HomographyFitter {
    fn degenerate(&self) -> AlignError {
        AlignError::DegenerateSample {
            model: self.model(),
        }
    }

    fn solve(&self, pairs: &[PointPair], minimal: bool) -> Result<Transform> {
        let pts1: Vec<Point2<f64>> = pairs.iter().map(|(p1, _)| *p1).collect();
        let pts2: Vec<Point2<f64>> = pairs.iter().map(|(_, p2)| *p2).collect();

        let t1 = conditioner(&pts1).ok_or_else(|| self.degenerate())?;
        let t2 = conditioner(&pts2).ok_or_else(|| self.degenerate())?;
        let q1: Vec<Point2<f64>> = pts1.iter().map(|p| apply_similarity(&t1, p)).collect();
        let q2: Vec<Point2<f64>> = pts2.iter().map(|p| apply_similarity(&t2, p)).collect();

        if minimal && (has_collinear_triple(&q1) || has_collinear_triple(&q2)) {
            return Err(self.degenerate());
        }

        let h_conditioned = if minimal {
            self.solve_exact(&q1, &q2)?
        } else {
            self.solve_least_squares(&q1, &q2)?
        };

        // Unwind the conditioning and re-fix the projective scale.
        let t2_inv = t2.try_inverse().ok_or_else(|| self.degenerate())?;
        let mut h = t2_inv * h_conditioned * t1;
        let scale = h[(2, 2)];
        if !scale.is_finite() || scale.abs() < SCALE_EPS {
            return Err(self.degenerate());
        }
        h /= scale;

        if minimal {
            // Near-singular candidates waste scoring passes; discard them
            // with the rest of the degenerate samples.
            let det = h.determinant().abs();
            if !(1e-6..=1e6).contains(&det) {
                return Err(self.degenerate());
            }
        }

        Ok(Transform::from_matrix(h))
    }

    /// Determined 8x8 solve from four conditioned correspondences.
    fn solve_exact(&self, q1: &[Point2<f64>], q2: &[Point2<f64>]) -> Result<Matrix3<f64>> {
        let mut augmented = DMatrix::<f64>::zeros(8, 9);
        for i in 0..4 {
            fill_rows(&mut augmented, i, &q1[i], &q2[i]);
            augmented[(2 * i, 8)] = -q2[i].x;
            augmented[(2 * i + 1, 8)] = -q2[i].y;
        }

        let h = gauss_elimination(augmented).ok_or_else(|| self.degenerate())?;
        reshape(&h).ok_or_else(|| self.degenerate())
    }

    /// Over-determined 2Nx8 least-squares solve via SVD.
    fn solve_least_squares(
        &self,
        q1: &[Point2<f64>],
        q2: &[Point2<f64>],
    ) -> Result<Matrix3<f64>> {
        let n = q1.len();
        let mut coefficients = DMatrix::<f64>::zeros(2 * n, 8);
        let mut rhs = DVector::<f64>::zeros(2 * n);
        for i in 0..n {
            fill_rows(&mut coefficients, i, &q1[i], &q2[i]);
            rhs[2 * i] = -q2[i].x;
            rhs[2 * i + 1] = -q2[i].y;
        }

        let svd = coefficients.svd(true, true);
        let h = svd.solve(&rhs, 1e-12).map_err(|_| self.degenerate())?;
        reshape(&h).ok_or_else(|| self.degenerate())
    }
}

impl ModelFitter for HomographyFitter {
    fn model(&self) -> MotionModel {
        MotionModel::Homography
    }

    fn fit_minimal(&self, pairs: &[PointPair]) -> Result<Transform> {
        debug_assert_eq!(pairs.len(), self.sample_size());
        self.solve(pairs, true)
    }

    fn fit_least_squares(&self, pairs: &[PointPair]) -> Result<Transform> {
        self.require_determined(pairs.len())?;
        self.solve(pairs, false)
    }
}

/// Two DLT rows for correspondence `i`, with h[8] fixed to 1. The
/// inhomogeneous part (-x2, -y2) goes into column 8 or a separate
/// right-hand side, whichever the caller provides.
fn fill_rows(m: &mut DMatrix<f64>, i: usize, q1: &Point2<f64>, q2: &Point2<f64>) {
    let (x1, y1) = (q1.x, q1.y);
    let (x2, y2) = (q2.x, q2.y);

    m[(2 * i, 0)] = -x1;
    m[(2 * i, 1)] = -y1;
    m[(2 * i, 2)] = -1.0;
    m[(2 * i, 6)] = x2 * x1;
    m[(2 * i, 7)] = x2 * y1;

    m[(2 * i + 1, 3)] = -x1;
    m[(2 * i + 1, 4)] = -y1;
    m[(2 * i + 1, 5)] = -1.0;
    m[(2 * i + 1, 6)] = y2 * x1;
    m[(2 * i + 1, 7)] = y2 * y1;
}

/// Assemble the eight solved parameters into a 3x3 matrix with h[8] = 1,
/// rejecting non-finite solutions.
fn reshape(h: &DVector<f64>) -> Option<Matrix3<f64>> {
    if h.iter().any(|v| !v.is_finite()) {
        return None;
    }
    Some(Matrix3::new(
        h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0,
    ))
}

/// Similarity taking `points` to zero centroid and mean distance sqrt(2).
fn conditioner(points: &[Point2<f64>]) -> Option<Matrix3<f64>> {
    let n = points.len() as f64;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for p in points {
        cx += p.x;
        cy += p.y;
    }
    cx /= n;
    cy /= n;

    let mut mean_dist = 0.0;
    for p in points {
        mean_dist += (p.x - cx).hypot(p.y - cy);
    }
    mean_dist /= n;
    if mean_dist < SPREAD_EPS {
        return None;
    }

    let s = std::f64::consts::SQRT_2 / mean_dist;
    Some(Matrix3::new(s, 0.0, -s * cx, 0.0, s, -s * cy, 0.0, 0.0, 1.0))
}

/// Apply the affine rows of a similarity; its bottom row is (0, 0, 1).
fn apply_similarity(t: &Matrix3<f64>, p: &Point2<f64>) -> Point2<f64> {
    Point2::new(
        t[(0, 0)] * p.x + t[(0, 1)] * p.y + t[(0, 2)],
        t[(1, 0)] * p.x + t[(1, 1)] * p.y + t[(1, 2)],
    )
}

/// Any three points spanning (numerically) zero area.
fn has_collinear_triple(points: &[Point2<f64>]) -> bool {
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            for k in (j + 1)..points.len() {
                let ab = points[j] - points[i];
                let ac = points[k] - points[i];
                if (ab.x * ac.y - ab.y * ac.x).abs() < COLLINEAR_EPS {
                    return true;
                }
            }
        }
    }
    false
}
