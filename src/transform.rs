//! 3x3 homogeneous transform representation.

use nalgebra::{Matrix3, Point2, Vector3};

use crate::error::{AlignError, Result};

/// Homogeneous weights below this magnitude have no valid mapping.
const W_EPS: f64 = 1e-12;

/// A homogeneous 2D projective map stored as a 3x3 matrix.
///
/// Application order is fixed: [`apply`](Transform::apply) computes `T * p`,
/// so `a.compose(&b)` is the map that applies `b` first, then `a`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    m: Matrix3<f64>,
}

impl Transform {
    /// The identity map.
    pub fn identity() -> Self {
        Self {
            m: Matrix3::identity(),
        }
    }

    pub fn from_matrix(m: Matrix3<f64>) -> Self {
        Self { m }
    }

    /// Pure translation by `(dx, dy)`.
    pub fn translation(dx: f64, dy: f64) -> Self {
        Self {
            m: Matrix3::new(1.0, 0.0, dx, 0.0, 1.0, dy, 0.0, 0.0, 1.0),
        }
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.m
    }

    /// Matrix product `self * other`: the composite applies `other` first.
    pub fn compose(&self, other: &Transform) -> Transform {
        Transform {
            m: self.m * other.m,
        }
    }

    /// Inverse map, failing on a singular matrix.
    pub fn invert(&self) -> Result<Transform> {
        self.m
            .try_inverse()
            .map(|m| Transform { m })
            .ok_or(AlignError::DegenerateTransform)
    }

    /// Map a 2D point through the transform and renormalize by the
    /// homogeneous weight.
    ///
    /// Fails with [`AlignError::DegenerateTransform`] when the weight is
    /// numerically indistinguishable from zero or the result is not finite.
    pub fn apply(&self, p: &Point2<f64>) -> Result<Point2<f64>> {
        let v = self.m * Vector3::new(p.x, p.y, 1.0);
        let w = v.z;
        if !w.is_finite() || w.abs() <= W_EPS || !v.x.is_finite() || !v.y.is_finite() {
            return Err(AlignError::DegenerateTransform);
        }
        Ok(Point2::new(v.x / w, v.y / w))
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: &Point2<f64>, b: &Point2<f64>) -> bool {
        (a - b).norm() < 1e-9
    }

    #[test]
    fn identity_is_a_fixed_point() {
        let t = Transform::identity();
        for p in [
            Point2::new(0.0, 0.0),
            Point2::new(-3.5, 12.25),
            Point2::new(1e6, -1e6),
        ] {
            assert!(close(&t.apply(&p).unwrap(), &p));
        }
    }

    #[test]
    fn composition_matches_sequential_application() {
        let a = Transform::from_matrix(Matrix3::new(
            0.9, 0.1, 4.0, -0.2, 1.1, -2.0, 1e-4, -2e-4, 1.0,
        ));
        let b = Transform::translation(7.0, -3.0);
        let p = Point2::new(5.0, 11.0);

        let chained = a.apply(&b.apply(&p).unwrap()).unwrap();
        let composed = a.compose(&b).apply(&p).unwrap();
        assert!(close(&chained, &composed));
    }

    #[test]
    fn apply_fails_on_vanishing_weight() {
        // Bottom row sends x = 10 to w = 0.
        let t = Transform::from_matrix(Matrix3::new(
            1.0, 0.0, 0.0, 0.0, 1.0, 0.0, -0.1, 0.0, 1.0,
        ));
        let err = t.apply(&Point2::new(10.0, 2.0));
        assert_eq!(err, Err(AlignError::DegenerateTransform));
    }

    #[test]
    fn invert_round_trips() {
        let t = Transform::from_matrix(Matrix3::new(
            1.2, 0.05, 10.0, -0.03, 0.8, -5.0, 2e-4, 1e-4, 1.0,
        ));
        let inv = t.invert().unwrap();
        let p = Point2::new(42.0, 17.0);
        let back = inv.apply(&t.apply(&p).unwrap()).unwrap();
        assert!(close(&back, &p));
    }

    #[test]
    fn invert_fails_on_singular_matrix() {
        let t = Transform::from_matrix(Matrix3::zeros());
        assert_eq!(t.invert(), Err(AlignError::DegenerateTransform));
    }
}
