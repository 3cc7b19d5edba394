//! # featalign: robust feature-based image alignment
//!
//! `featalign` estimates the geometric transformation aligning two images
//! from detected point features and tentative correspondences, some of
//! which are wrong. Candidate transforms are generated from random minimal
//! samples, scored by consensus against the full match list, and the
//! best-supported candidate is refined by least squares (RANSAC).
//!
//! Feature detection, descriptor matching, and pixel warping live
//! upstream and downstream of this crate; it consumes [`FeatureSet`] and
//! [`Match`] data and produces a [`Transform`].
//!
//! ## Quick start
//!
//! ```rust
//! use featalign::{
//!     align_pair, Extent, Feature, FeatureSet, Match, MotionConfig, MotionModel,
//!     RansacParams,
//! };
//!
//! // Two feature sets related by a pure translation of (5, -3).
//! let f1: FeatureSet = (0..12)
//!     .map(|i| Feature::new(i as f64 * 9.0, i as f64 * 4.0))
//!     .collect();
//! let f2: FeatureSet = (0..12)
//!     .map(|i| Feature::new(i as f64 * 9.0 + 5.0, i as f64 * 4.0 - 3.0))
//!     .collect();
//! let matches: Vec<Match> = (0..12).map(|i| Match::new(i, i)).collect();
//!
//! let extent = Extent::new(640, 480);
//! let motion = MotionConfig::new(MotionModel::Translation, extent, extent);
//! let params = RansacParams::new(100, 0.5).with_seed(7);
//!
//! let alignment = align_pair(&f1, &f2, &matches, &motion, &params).unwrap();
//! assert_eq!(alignment.inliers.count(), 12);
//! ```
//!
//! ## Motion models
//!
//! Three families are supported, selected by [`MotionModel`]:
//! - `Translation`: 2 DOF, minimal sample of 2 matches.
//! - `Rotation`: 3 DOF rigid motion in a focal-length-normalized frame,
//!   for images taken from a common viewpoint; needs a focal length and
//!   the image extents.
//! - `Homography`: full 8 DOF projective warp.
//!
//! ## Entry points
//!
//! - [`align_pair`]: the RANSAC search, the main entry point.
//! - [`count_inliers`]: score an existing transform (diagnostics).
//! - [`least_squares_fit`]: refit over a trusted correspondence subset.

pub mod api;
pub mod error;
pub mod models;
pub mod scoring;
pub mod settings;
pub mod transform;
pub mod types;

mod fitters;
mod ransac;
mod sampling;
mod utils;

pub use api::{align_pair, count_inliers, least_squares_fit, Alignment};
pub use error::{AlignError, Result};
pub use models::{MotionConfig, MotionModel};
pub use scoring::InlierSet;
pub use settings::RansacParams;
pub use transform::Transform;
pub use types::{Extent, Feature, FeatureSet, Match};
