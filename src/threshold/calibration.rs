//! Initial temperature calibration.
//!
//! Finds a temperature at which a chain of proposals started from the
//! current solution is accepted at a target rate. The acceptance ratio
//! grows with temperature, so the search brackets the target by doubling
//! or halving and then bisects the bracket.

use rand::Rng;
use tracing::{debug, trace, warn};

use super::config::{AcceptanceBaseline, ThresholdConfig};
use crate::types::Solution;

/// Bisection search on temperature for a target acceptance ratio.
#[derive(Debug, Clone, Copy)]
pub struct TemperatureCalibrator<'c> {
    config: &'c ThresholdConfig,
}

impl<'c> TemperatureCalibrator<'c> {
    /// Creates a calibrator driven by `config`.
    pub fn new(config: &'c ThresholdConfig) -> Self {
        Self { config }
    }

    /// Fraction of `calibration_samples` proposals accepted at `temperature`.
    ///
    /// Proposals form a chain: an accepted neighbor becomes the point the
    /// next one is drawn from. `start` itself is not modified.
    pub fn acceptance_ratio<S: Solution, R: Rng>(
        &self,
        start: &S,
        temperature: f64,
        rng: &mut R,
    ) -> f64 {
        let samples = self.config.calibration_samples;
        let initial_cost = start.cost();
        let mut chain = start.clone();
        let mut accepted = 0usize;

        for _ in 0..samples {
            let neighbor = self.config.neighbor_move.propose(&chain, rng);
            let reference = match self.config.baseline {
                AcceptanceBaseline::Initial => initial_cost,
                AcceptanceBaseline::Chain => chain.cost(),
            };
            if neighbor.cost() <= reference + temperature {
                chain = neighbor;
                accepted += 1;
            }
        }

        accepted as f64 / samples as f64
    }

    /// Returns a temperature whose acceptance ratio is within
    /// `acceptance_epsilon` of `target_acceptance`, starting the search
    /// from `temperature`.
    pub fn calibrate<S: Solution, R: Rng>(&self, start: &S, temperature: f64, rng: &mut R) -> f64 {
        let target = self.config.target_acceptance;
        let mut t = temperature;
        let mut p = self.acceptance_ratio(start, t, rng);
        if (target - p).abs() < self.config.acceptance_epsilon {
            debug!(temperature = t, ratio = p, "starting temperature already on target");
            return t;
        }

        let mut steps = 0;
        let (low, high) = if p < target {
            while p < target && steps < self.config.max_bracket_steps {
                t *= 2.0;
                p = self.acceptance_ratio(start, t, rng);
                steps += 1;
            }
            (t / 2.0, t)
        } else {
            while p > target && steps < self.config.max_bracket_steps {
                t /= 2.0;
                p = self.acceptance_ratio(start, t, rng);
                steps += 1;
            }
            (t, t * 2.0)
        };
        if steps == self.config.max_bracket_steps {
            warn!(
                temperature = t,
                ratio = p,
                target_ratio = target,
                "acceptance ratio never crossed the target while bracketing"
            );
        }
        trace!(low, high, steps, "bracketed target acceptance");

        self.bisect(start, low, high, rng)
    }

    fn bisect<S: Solution, R: Rng>(&self, start: &S, low: f64, high: f64, rng: &mut R) -> f64 {
        let target = self.config.target_acceptance;
        let (mut low, mut high) = (low, high);

        for _ in 0..self.config.max_bisection_steps {
            let mid = (low + high) / 2.0;
            if high - low < self.config.epsilon {
                return mid;
            }
            let p = self.acceptance_ratio(start, mid, rng);
            if (target - p).abs() < self.config.acceptance_epsilon {
                return mid;
            }
            if p > target {
                high = mid;
            } else {
                low = mid;
            }
        }

        warn!(low, high, "bisection step cap reached");
        (low + high) / 2.0
    }
}
