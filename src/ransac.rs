//! Fixed-budget RANSAC driver.
//!
//! Each iteration draws a distinct minimal sample, fits a candidate
//! transform, and scores it against the full match list. The best-supported
//! candidate survives the loop and is refined by a full least-squares fit
//! over its consensus set.

use log::{debug, trace};

use crate::error::{AlignError, Result};
use crate::fitters::ModelFitter;
use crate::sampling::IndexSampler;
use crate::scoring::{classify_matches, InlierSet};
use crate::settings::RansacParams;
use crate::transform::Transform;
use crate::types::{resolve_pairs, FeatureSet, Match};

/// Best candidate retained across the loop.
struct Retained {
    transform: Transform,
    inliers: InlierSet,
}

pub(crate) struct RansacDriver<'a> {
    f1: &'a FeatureSet,
    f2: &'a FeatureSet,
    matches: &'a [Match],
    fitter: &'a dyn ModelFitter,
    params: &'a RansacParams,
}

impl<'a> RansacDriver<'a> {
    pub(crate) fn new(
        f1: &'a FeatureSet,
        f2: &'a FeatureSet,
        matches: &'a [Match],
        fitter: &'a dyn ModelFitter,
        params: &'a RansacParams,
    ) -> Self {
        Self {
            f1,
            f2,
            matches,
            fitter,
            params,
        }
    }

    /// Run the search and return the refined transform with the consensus
    /// set that selected it.
    pub(crate) fn run(&self) -> Result<(Transform, InlierSet)> {
        let model = self.fitter.model();
        let sample_size = self.fitter.sample_size();
        if self.matches.len() < sample_size {
            return Err(AlignError::UnderdeterminedSystem {
                model,
                required: sample_size,
                supplied: self.matches.len(),
            });
        }

        let mut sampler = IndexSampler::new(self.params.seed);
        let mut sample = vec![0usize; sample_size];
        let mut best: Option<Retained> = None;
        let mut degenerate_samples = 0usize;

        for iteration in 0..self.params.iterations {
            if !sampler.draw_unique(&mut sample, self.matches.len()) {
                break;
            }

            let pairs = resolve_pairs(self.f1, self.f2, self.matches, &sample);
            let candidate = match self.fitter.fit_minimal(&pairs) {
                Ok(transform) => transform,
                Err(AlignError::DegenerateSample { .. }) => {
                    // Expected, high-frequency: the sample is discarded and
                    // the iteration budget still ticks down.
                    degenerate_samples += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let inliers = classify_matches(
                self.f1,
                self.f2,
                self.matches,
                &candidate,
                self.params.threshold,
            );
            trace!(
                "iteration {iteration}: candidate supported by {} of {} matches",
                inliers.count(),
                self.matches.len()
            );

            // Strictly greater support replaces the retained candidate, so
            // ties keep the first-found one and a fixed seed reproduces the
            // same winner.
            let improved = match &best {
                None => true,
                Some(retained) => inliers.count() > retained.inliers.count(),
            };
            if improved {
                debug!(
                    "iteration {iteration}: new best candidate, {} inliers",
                    inliers.count()
                );
                best = Some(Retained {
                    transform: candidate,
                    inliers,
                });
            }
        }

        if degenerate_samples > 0 {
            debug!(
                "{degenerate_samples} of {} samples were degenerate",
                self.params.iterations
            );
        }

        let insufficient = |best_support: usize| AlignError::InsufficientInliers {
            model,
            iterations: self.params.iterations,
            threshold: self.params.threshold,
            best_support,
            required: sample_size,
        };

        let best = match best {
            Some(retained) => retained,
            None => return Err(insufficient(0)),
        };
        if best.inliers.count() < sample_size {
            return Err(insufficient(best.inliers.count()));
        }

        // Finalize on the full consensus set. A degenerate refit falls back
        // to the retained candidate, which already carries a scored
        // consensus.
        let pairs = resolve_pairs(self.f1, self.f2, self.matches, best.inliers.indices());
        let transform = match self.fitter.fit_least_squares(&pairs) {
            Ok(refined) => refined,
            Err(e) => {
                debug!("final refinement failed ({e}); keeping the sampled candidate");
                best.transform
            }
        };

        Ok((transform, best.inliers))
    }
}
