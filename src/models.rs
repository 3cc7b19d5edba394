//! Motion model families and their camera context.

use serde::{Deserialize, Serialize};

use crate::types::Extent;

/// Closed set of supported motion families.
///
/// The tag determines both the minimal sample size needed to generate a
/// candidate transform and the fitting procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotionModel {
    /// Pure translation: 2 DOF (dx, dy).
    Translation,
    /// Translation plus in-plane rotation resolved in a centered,
    /// focal-length-normalized frame: 3 DOF. Assumes both images were
    /// taken from a common viewpoint and a focal length is supplied.
    Rotation,
    /// Full projective transform: 8 DOF. No focal length needed.
    Homography,
}

impl MotionModel {
    /// Independent parameters of the family.
    pub fn dof(&self) -> usize {
        match self {
            MotionModel::Translation => 2,
            MotionModel::Rotation => 3,
            MotionModel::Homography => 8,
        }
    }

    /// Correspondences in a minimal sample.
    pub fn sample_size(&self) -> usize {
        match self {
            MotionModel::Translation => 2,
            MotionModel::Rotation => 2,
            MotionModel::Homography => 4,
        }
    }
}

/// A motion family plus the camera context needed to resolve it.
///
/// The focal length and image extents are only consumed by
/// [`MotionModel::Rotation`]; the other families ignore them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionConfig {
    pub model: MotionModel,
    /// Camera focal length in pixels; required by `Rotation`.
    pub focal_length: Option<f64>,
    /// Bounds of the first image.
    pub extent1: Extent,
    /// Bounds of the second image.
    pub extent2: Extent,
}

impl MotionConfig {
    pub fn new(model: MotionModel, extent1: Extent, extent2: Extent) -> Self {
        Self {
            model,
            focal_length: None,
            extent1,
            extent2,
        }
    }

    pub fn with_focal_length(mut self, focal_length: f64) -> Self {
        self.focal_length = Some(focal_length);
        self
    }
}
