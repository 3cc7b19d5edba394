//! RANSAC run parameters.

use serde::{Deserialize, Serialize};

/// Parameters of a RANSAC run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RansacParams {
    /// Fixed iteration budget. Degenerate samples consume iterations; there
    /// is no confidence-based early exit.
    pub iterations: usize,
    /// Inlier distance threshold in pixels.
    pub threshold: f64,
    /// Seed for the sample-drawing RNG. `None` seeds from the thread RNG;
    /// a fixed seed makes runs reproducible.
    pub seed: Option<u64>,
}

impl RansacParams {
    pub fn new(iterations: usize, threshold: f64) -> Self {
        Self {
            iterations,
            threshold,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for RansacParams {
    fn default() -> Self {
        Self {
            iterations: 500,
            threshold: 1.5,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_a_sensible_budget() {
        let params = RansacParams::default();
        assert_eq!(params.iterations, 500);
        assert!((params.threshold - 1.5).abs() < 1e-12);
        assert_eq!(params.seed, None);
    }
}
