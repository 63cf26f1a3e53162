//! Threshold Accepting configuration.

use rand::Rng;

use crate::error::{Result, SearchError};
use crate::types::Solution;

/// Reference cost used when sampling the acceptance ratio during
/// temperature calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AcceptanceBaseline {
    /// Compare every sample against the cost of the solution the
    /// calibration started from, even as the sample chain moves away.
    #[default]
    Initial,

    /// Compare every sample against the cost of the chain's current link.
    Chain,
}

/// Divisor for the mean accepted cost of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BatchMean {
    /// Divide by the configured batch size, even when the trial cap ends
    /// the batch with fewer accepted moves.
    #[default]
    Target,

    /// Divide by the number of moves actually accepted.
    Accepted,
}

/// Move used to propose neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NeighborMove {
    /// Swap neighbors only.
    #[default]
    Swap,

    /// Swap or shift with equal probability.
    SwapOrShift,
}

impl NeighborMove {
    /// Proposes one neighbor of `solution`.
    pub fn propose<S: Solution, R: Rng>(self, solution: &S, rng: &mut R) -> S {
        match self {
            NeighborMove::Swap => solution.swap_neighbor(rng),
            NeighborMove::SwapOrShift => {
                if rng.random_bool(0.5) {
                    solution.swap_neighbor(rng)
                } else {
                    solution.shift_neighbor(rng)
                }
            }
        }
    }
}

/// Configuration for Threshold Accepting.
///
/// # Examples
///
/// ```
/// use gap_search::threshold::{BatchMean, ThresholdConfig};
///
/// let config = ThresholdConfig::default()
///     .with_batch_size(500)
///     .with_cooling_factor(0.9)
///     .with_batch_mean(BatchMean::Accepted);
/// assert_eq!(config.max_trials(), 500 * 21);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThresholdConfig {
    /// Starting temperature, or the starting point of calibration.
    pub initial_temperature: f64,
    /// Whether to calibrate the initial temperature before cooling.
    pub calibrate: bool,
    /// Acceptance ratio the calibration aims for.
    pub target_acceptance: f64,
    /// Proposals sampled per acceptance-ratio estimate.
    pub calibration_samples: usize,
    /// Tolerance on the acceptance ratio during calibration.
    pub acceptance_epsilon: f64,
    /// Maximum doublings or halvings while bracketing the target.
    pub max_bracket_steps: usize,
    /// Maximum bisection steps after bracketing.
    pub max_bisection_steps: usize,
    /// Accepted moves per batch.
    pub batch_size: usize,
    /// Trial cap per batch, as a multiple of `batch_size`.
    pub trial_factor: usize,
    /// Temperature below which cooling stops. Also the bisection width.
    pub epsilon: f64,
    /// Multiplier applied to the temperature after each equilibrium.
    pub cooling_factor: f64,
    /// Maximum batches run at a single temperature.
    pub max_batches_per_temperature: usize,
    /// Calibration reference cost.
    pub baseline: AcceptanceBaseline,
    /// Batch mean divisor.
    pub batch_mean: BatchMean,
    /// Neighbor move.
    pub neighbor_move: NeighborMove,
    /// Random seed (None for the default seed).
    pub seed: Option<u64>,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 8.0,
            calibrate: true,
            target_acceptance: 0.9,
            calibration_samples: 2000,
            acceptance_epsilon: 1e-5,
            max_bracket_steps: 64,
            max_bisection_steps: 128,
            batch_size: 2000,
            trial_factor: 21,
            epsilon: 1e-5,
            cooling_factor: 0.95,
            max_batches_per_temperature: 50,
            baseline: AcceptanceBaseline::default(),
            batch_mean: BatchMean::default(),
            neighbor_move: NeighborMove::default(),
            seed: None,
        }
    }
}

impl ThresholdConfig {
    /// Sets the starting temperature (the calibration start when calibrating).
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    /// Sets whether the initial temperature is calibrated before cooling.
    pub fn with_calibration(mut self, calibrate: bool) -> Self {
        self.calibrate = calibrate;
        self
    }

    /// Sets the acceptance ratio calibration aims for.
    pub fn with_target_acceptance(mut self, p: f64) -> Self {
        self.target_acceptance = p;
        self
    }

    /// Sets the number of proposals per acceptance ratio estimate.
    pub fn with_calibration_samples(mut self, n: usize) -> Self {
        self.calibration_samples = n;
        self
    }

    /// Sets the tolerance on the calibrated acceptance ratio.
    pub fn with_acceptance_epsilon(mut self, eps: f64) -> Self {
        self.acceptance_epsilon = eps;
        self
    }

    /// Sets the number of accepted moves per batch.
    pub fn with_batch_size(mut self, n: usize) -> Self {
        self.batch_size = n;
        self
    }

    /// Sets the trial cap per batch as a multiple of the batch size.
    pub fn with_trial_factor(mut self, factor: usize) -> Self {
        self.trial_factor = factor;
        self
    }

    /// Sets the stopping temperature and the bisection width tolerance.
    pub fn with_epsilon(mut self, eps: f64) -> Self {
        self.epsilon = eps;
        self
    }

    /// Sets the geometric cooling factor.
    pub fn with_cooling_factor(mut self, phi: f64) -> Self {
        self.cooling_factor = phi;
        self
    }

    /// Sets the batch cap at a single temperature.
    pub fn with_max_batches_per_temperature(mut self, n: usize) -> Self {
        self.max_batches_per_temperature = n;
        self
    }

    /// Sets the cost calibration samples are compared against.
    pub fn with_baseline(mut self, baseline: AcceptanceBaseline) -> Self {
        self.baseline = baseline;
        self
    }

    /// Sets the divisor of the batch mean cost.
    pub fn with_batch_mean(mut self, batch_mean: BatchMean) -> Self {
        self.batch_mean = batch_mean;
        self
    }

    /// Sets the move used to propose neighbors.
    pub fn with_neighbor_move(mut self, neighbor_move: NeighborMove) -> Self {
        self.neighbor_move = neighbor_move;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Trial cap for a single batch.
    pub fn max_trials(&self) -> usize {
        self.batch_size.saturating_mul(self.trial_factor)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(SearchError::InvalidConfig(msg));

        if !(self.initial_temperature.is_finite() && self.initial_temperature > 0.0) {
            return invalid(format!(
                "initial_temperature must be positive, got {}",
                self.initial_temperature
            ));
        }
        if !(self.target_acceptance > 0.0 && self.target_acceptance < 1.0) {
            return invalid(format!(
                "target_acceptance must be in (0, 1), got {}",
                self.target_acceptance
            ));
        }
        if !(self.cooling_factor > 0.0 && self.cooling_factor < 1.0) {
            return invalid(format!(
                "cooling_factor must be in (0, 1), got {}",
                self.cooling_factor
            ));
        }
        if !(self.epsilon > 0.0) || !(self.acceptance_epsilon > 0.0) {
            return invalid("epsilon and acceptance_epsilon must be positive".into());
        }
        if self.batch_size == 0 || self.trial_factor == 0 || self.calibration_samples == 0 {
            return invalid(
                "batch_size, trial_factor and calibration_samples must be at least 1".into(),
            );
        }
        if self.max_batches_per_temperature == 0 {
            return invalid("max_batches_per_temperature must be at least 1".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ThresholdConfig::default();
        assert_eq!(config.batch_size, 2000);
        assert_eq!(config.max_trials(), 42_000);
        assert_eq!(config.calibration_samples, 2000);
        assert_eq!(config.max_batches_per_temperature, 50);
        assert!((config.epsilon - 1e-5).abs() < 1e-15);
        assert!((config.cooling_factor - 0.95).abs() < 1e-12);
        assert!((config.target_acceptance - 0.9).abs() < 1e-12);
        assert_eq!(config.baseline, AcceptanceBaseline::Initial);
        assert_eq!(config.batch_mean, BatchMean::Target);
        assert_eq!(config.neighbor_move, NeighborMove::Swap);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bad_cooling() {
        assert!(ThresholdConfig::default()
            .with_cooling_factor(1.0)
            .validate()
            .is_err());
        assert!(ThresholdConfig::default()
            .with_cooling_factor(0.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_bad_temperature() {
        assert!(ThresholdConfig::default()
            .with_initial_temperature(0.0)
            .validate()
            .is_err());
        assert!(ThresholdConfig::default()
            .with_initial_temperature(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_bad_target() {
        assert!(ThresholdConfig::default()
            .with_target_acceptance(1.2)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_zero_batch() {
        assert!(ThresholdConfig::default()
            .with_batch_size(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_nan_epsilon() {
        assert!(ThresholdConfig::default()
            .with_epsilon(f64::NAN)
            .validate()
            .is_err());
    }
}
