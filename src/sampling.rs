//! Random index sampling for minimal sets.

use rand::distributions::{Distribution, Uniform};
use rand::prelude::*;

/// Draws minimal samples of distinct match indices.
///
/// The random state is an explicit, seedable handle so runs are
/// reproducible; an unseeded sampler draws its seed from the thread RNG.
pub(crate) struct IndexSampler {
    rng: StdRng,
}

impl IndexSampler {
    pub(crate) fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(thread_rng()).expect("failed to seed StdRng"),
        };
        Self { rng }
    }

    /// Fill `out` with distinct indices drawn uniformly from `[0, n)`,
    /// without replacement.
    ///
    /// Rejection sampling; fine for the small sample sizes of minimal
    /// solvers. Returns `false` when `n` cannot seat the sample.
    pub(crate) fn draw_unique(&mut self, out: &mut [usize], n: usize) -> bool {
        if n == 0 || out.len() > n {
            return false;
        }
        let dist = Uniform::from(0..n);
        for i in 0..out.len() {
            loop {
                let candidate = dist.sample(&mut self.rng);
                if out[..i].iter().all(|&v| v != candidate) {
                    out[i] = candidate;
                    break;
                }
            }
        }
        true
    }
}
