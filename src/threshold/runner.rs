//! Threshold Accepting execution loop.
//!
//! Three nested levels, each taking the search state by value and handing
//! it back:
//!
//! - [`run_batch`]: propose neighbors until `batch_size` are accepted or
//!   the trial cap is hit; a neighbor is accepted when its cost is within
//!   `temperature` of the current cost.
//! - [`reach_equilibrium`]: repeat batches at one temperature while the
//!   batch mean keeps falling.
//! - [`cool`]: multiply the temperature by `cooling_factor` after each
//!   equilibrium until it drops to `epsilon`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace, warn};

use super::calibration::TemperatureCalibrator;
use super::config::{BatchMean, ThresholdConfig};
use crate::error::Result;
use crate::strategy::{LocalSearch, SearchReport};
use crate::types::{ProblemInstance, Solution};

const DEFAULT_SEED: u64 = 42;

/// Current and best solution of a Threshold Accepting run.
#[derive(Debug, Clone)]
pub struct AnnealState<S> {
    pub current: S,
    pub best: S,
}

impl<S: Solution> AnnealState<S> {
    /// State with `initial` as both current and best.
    pub fn new(initial: S) -> Self {
        Self {
            best: initial.clone(),
            current: initial,
        }
    }
}

/// Result of one batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchOutcome {
    /// Mean accepted cost, divided as configured by [`BatchMean`].
    pub mean: f64,
    /// Moves accepted.
    pub accepted: usize,
    /// Proposals evaluated.
    pub trials: usize,
}

/// Result of one equilibrium phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equilibrium {
    /// Batches run at this temperature.
    pub batches: usize,
    /// Mean of the last batch.
    pub mean: f64,
    /// Whether `max_batches_per_temperature` ended the phase.
    pub capped: bool,
}

/// Temperatures visited by the cooling loop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoolingTrace {
    /// Temperature of each equilibrium phase, in order.
    pub temperatures: Vec<f64>,
    /// Best cost after each phase.
    pub best_costs: Vec<f64>,
    /// Total batches over all phases.
    pub batches: usize,
    /// Temperature after the last cooling step.
    pub final_temperature: f64,
}

/// Runs one batch at `temperature`.
pub fn run_batch<S: Solution, R: Rng>(
    mut state: AnnealState<S>,
    temperature: f64,
    config: &ThresholdConfig,
    rng: &mut R,
) -> (AnnealState<S>, BatchOutcome) {
    let max_trials = config.max_trials();
    let mut accepted = 0usize;
    let mut trials = 0usize;
    let mut sum = 0.0;

    while accepted < config.batch_size && trials < max_trials {
        trials += 1;
        let neighbor = config.neighbor_move.propose(&state.current, rng);
        let cost = neighbor.cost();
        if cost <= state.current.cost() + temperature {
            if cost <= state.best.cost() {
                state.best = neighbor.clone();
            }
            state.current = neighbor;
            accepted += 1;
            sum += cost;
        }
    }

    let divisor = match config.batch_mean {
        BatchMean::Target => config.batch_size,
        BatchMean::Accepted => accepted.max(1),
    };
    let outcome = BatchOutcome {
        mean: sum / divisor as f64,
        accepted,
        trials,
    };
    (state, outcome)
}

/// Runs batches at `temperature` until thermal equilibrium.
///
/// Starting with `q = +inf`, batches repeat while the new mean `p`
/// satisfies `p <= q` and `q >= epsilon`; each repetition shifts `p`
/// into `q`.
pub fn reach_equilibrium<S: Solution, R: Rng>(
    state: AnnealState<S>,
    temperature: f64,
    config: &ThresholdConfig,
    rng: &mut R,
) -> (AnnealState<S>, Equilibrium) {
    let mut q = f64::INFINITY;
    let (mut state, outcome) = run_batch(state, temperature, config, rng);
    let mut p = outcome.mean;
    let mut batches = 1;

    while p <= q && q >= config.epsilon {
        if batches >= config.max_batches_per_temperature {
            return (
                state,
                Equilibrium {
                    batches,
                    mean: p,
                    capped: true,
                },
            );
        }
        q = p;
        let (next, outcome) = run_batch(state, temperature, config, rng);
        state = next;
        p = outcome.mean;
        batches += 1;
    }

    (
        state,
        Equilibrium {
            batches,
            mean: p,
            capped: false,
        },
    )
}

/// Cools from `temperature` down to `epsilon`.
pub fn cool<S: Solution, R: Rng>(
    mut state: AnnealState<S>,
    temperature: f64,
    config: &ThresholdConfig,
    rng: &mut R,
) -> (AnnealState<S>, CoolingTrace) {
    let mut cooling = CoolingTrace::default();
    let mut temperature = temperature;
    let mut capped = 0usize;

    while temperature > config.epsilon {
        let (next, equilibrium) = reach_equilibrium(state, temperature, config, rng);
        state = next;

        cooling.batches += equilibrium.batches;
        cooling.temperatures.push(temperature);
        cooling.best_costs.push(state.best.cost());
        if equilibrium.capped {
            capped += 1;
        }
        trace!(
            temperature,
            batches = equilibrium.batches,
            mean = equilibrium.mean,
            best = state.best.cost(),
            "equilibrium reached"
        );

        temperature *= config.cooling_factor;
    }

    if capped > 0 {
        warn!(
            phases = capped,
            cap = config.max_batches_per_temperature,
            "batch cap ended some equilibrium phases"
        );
    }
    cooling.final_temperature = temperature;
    (state, cooling)
}

/// Threshold Accepting over a borrowed problem instance.
///
/// # Examples
///
/// ```
/// use gap_search::gap::{GapInstance, GapSolution};
/// use gap_search::threshold::{NeighborMove, ThresholdAccepting, ThresholdConfig};
/// use gap_search::LocalSearch;
///
/// let instance = GapInstance::new(
///     vec![vec![4.0, 6.0], vec![3.0, 5.0], vec![8.0, 2.0]],
///     vec![2.0, 2.0],
/// )
/// .unwrap();
/// let seed = GapSolution::uniform(&instance, 0).unwrap();
/// let config = ThresholdConfig::default()
///     .with_batch_size(20)
///     .with_calibration_samples(100)
///     .with_epsilon(1e-3)
///     .with_max_batches_per_temperature(5)
///     .with_neighbor_move(NeighborMove::SwapOrShift)
///     .with_seed(3);
///
/// let mut search = ThresholdAccepting::new(&instance, seed, config).unwrap();
/// let report = search.run();
/// assert!(report.best_cost <= 15.0);
/// ```
pub struct ThresholdAccepting<'a, G, S> {
    graph: &'a G,
    config: ThresholdConfig,
    rng: StdRng,
    state: AnnealState<S>,
    temperature: f64,
    finished: bool,
    trace: CoolingTrace,
}

impl<'a, G: ProblemInstance, S: Solution> ThresholdAccepting<'a, G, S> {
    /// Creates an engine starting from `initial`.
    pub fn new(graph: &'a G, initial: S, config: ThresholdConfig) -> Result<Self> {
        config.validate()?;
        let rng = StdRng::seed_from_u64(config.seed.unwrap_or(DEFAULT_SEED));
        let temperature = config.initial_temperature;

        Ok(Self {
            graph,
            config,
            rng,
            state: AnnealState::new(initial),
            temperature,
            finished: false,
            trace: CoolingTrace::default(),
        })
    }

    /// Calibrates a starting temperature from the current solution,
    /// beginning the search at `temperature`.
    pub fn initial_temperature(&mut self, temperature: f64) -> f64 {
        TemperatureCalibrator::new(&self.config).calibrate(
            &self.state.current,
            temperature,
            &mut self.rng,
        )
    }

    /// Acceptance ratio of proposals from the current solution at `temperature`.
    pub fn acceptance_ratio(&mut self, temperature: f64) -> f64 {
        TemperatureCalibrator::new(&self.config).acceptance_ratio(
            &self.state.current,
            temperature,
            &mut self.rng,
        )
    }

    /// The current temperature.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// The current and best solutions.
    pub fn state(&self) -> &AnnealState<S> {
        &self.state
    }

    /// Temperatures and best costs of every equilibrium phase so far.
    pub fn cooling_trace(&self) -> &CoolingTrace {
        &self.trace
    }

    fn report(&self) -> SearchReport {
        SearchReport {
            best_cost: self.state.best.cost(),
            feasible: self.state.best.is_feasible(),
            iterations: self.trace.batches,
            cost_history: self.trace.best_costs.clone(),
            temperature_history: self.trace.temperatures.clone(),
            fallbacks: 0,
        }
    }
}

impl<G: ProblemInstance, S: Solution> LocalSearch for ThresholdAccepting<'_, G, S> {
    fn run(&mut self) -> SearchReport {
        if self.finished {
            return self.report();
        }
        self.finished = true;

        if self.graph.task_count() == 0 {
            debug!("no tasks, nothing to search");
            return self.report();
        }

        let start = if self.config.calibrate {
            self.initial_temperature(self.config.initial_temperature)
        } else {
            self.config.initial_temperature
        };
        debug!(
            tasks = self.graph.task_count(),
            initial_cost = self.state.current.cost(),
            temperature = start,
            "threshold accepting started"
        );

        let placeholder = AnnealState::new(self.state.best.clone());
        let state = std::mem::replace(&mut self.state, placeholder);
        let (state, trace) = cool(state, start, &self.config, &mut self.rng);
        self.state = state;
        self.temperature = trace.final_temperature;
        self.trace = trace;

        info!(
            phases = self.trace.temperatures.len(),
            batches = self.trace.batches,
            best_cost = self.state.best.cost(),
            feasible = self.state.best.is_feasible(),
            "threshold accepting finished"
        );
        self.report()
    }

    fn best_assignment(&self) -> &[usize] {
        self.state.best.assignments()
    }

    fn best_cost(&self) -> f64 {
        self.state.best.cost()
    }

    fn is_feasible(&self) -> bool {
        self.state.best.is_feasible()
    }

    fn best_rendering(&self) -> String {
        self.state.best.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gap::{GapInstance, GapSolution};
    use crate::threshold::fixtures::{Ladder, Tasks, Walk};
    use crate::threshold::NeighborMove;

    fn small_config() -> ThresholdConfig {
        ThresholdConfig::default()
            .with_batch_size(10)
            .with_trial_factor(2)
    }

    fn random_instance(tasks: usize, agents: usize, seed: u64) -> GapInstance {
        let mut rng = StdRng::seed_from_u64(seed);
        let costs = (0..tasks)
            .map(|_| (0..agents).map(|_| rng.random_range(1..50) as f64).collect())
            .collect();
        GapInstance::new(costs, vec![(tasks / agents + 1) as f64; agents]).unwrap()
    }

    #[test]
    fn test_batch_accepts_within_threshold() {
        let mut rng = StdRng::seed_from_u64(0);
        let state = AnnealState::new(Ladder::new(0.0, Walk::Climb));

        let (state, outcome) = run_batch(state, 2.0, &small_config(), &mut rng);
        assert_eq!(outcome.accepted, 10);
        assert_eq!(outcome.trials, 10);
        assert!((outcome.mean - 5.5).abs() < 1e-12);
        assert_eq!(state.current.cost, 10.0);
        // Climbing never beats the start.
        assert_eq!(state.best.cost, 0.0);
    }

    #[test]
    fn test_batch_rejects_above_threshold() {
        let mut rng = StdRng::seed_from_u64(0);
        let state = AnnealState::new(Ladder::new(0.0, Walk::Climb));

        let (state, outcome) = run_batch(state, 0.5, &small_config(), &mut rng);
        assert_eq!(outcome.accepted, 0);
        assert_eq!(outcome.trials, 20);
        assert_eq!(outcome.mean, 0.0);
        assert_eq!(state.current.cost, 0.0);
    }

    #[test]
    fn test_batch_tracks_best() {
        let mut rng = StdRng::seed_from_u64(0);
        let state = AnnealState::new(Ladder::new(0.0, Walk::Descend));

        let (state, _) = run_batch(state, 0.0, &small_config(), &mut rng);
        assert_eq!(state.best.cost, -10.0);
        assert_eq!(state.best, state.current);
    }

    #[test]
    fn test_batch_mean_divisor() {
        // Three accepted moves (1, 2, 3) before the trial cap.
        let mut rng = StdRng::seed_from_u64(0);
        let state = AnnealState::new(Ladder::new(0.0, Walk::Wall));
        let (_, target) = run_batch(state.clone(), 2.0, &small_config(), &mut rng);
        assert_eq!(target.accepted, 3);
        assert_eq!(target.trials, 20);
        assert!((target.mean - 0.6).abs() < 1e-12);

        let config = small_config().with_batch_mean(BatchMean::Accepted);
        let (_, accepted) = run_batch(state, 2.0, &config, &mut rng);
        assert!((accepted.mean - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_equilibrium_stops_when_mean_rises() {
        let mut rng = StdRng::seed_from_u64(0);
        let state = AnnealState::new(Ladder::new(0.0, Walk::Climb));
        let (_, eq) = reach_equilibrium(state, 2.0, &small_config(), &mut rng);
        assert_eq!(eq.batches, 2);
        assert!(!eq.capped);
    }

    #[test]
    fn test_equilibrium_stops_when_mean_vanishes() {
        // Means 0.6, then 0.0, then 0.0 with q = 0 below epsilon.
        let mut rng = StdRng::seed_from_u64(0);
        let state = AnnealState::new(Ladder::new(0.0, Walk::Wall));
        let (state, eq) = reach_equilibrium(state, 2.0, &small_config(), &mut rng);
        assert_eq!(eq.batches, 3);
        assert_eq!(eq.mean, 0.0);
        assert_eq!(state.current.cost, 3.0);
    }

    #[test]
    fn test_equilibrium_capped_on_flat_landscape() {
        let mut rng = StdRng::seed_from_u64(0);
        let config = small_config().with_max_batches_per_temperature(7);
        let state = AnnealState::new(Ladder::new(5.0, Walk::Flat));
        let (_, eq) = reach_equilibrium(state, 1.0, &config, &mut rng);
        assert_eq!(eq.batches, 7);
        assert!(eq.capped);
    }

    #[test]
    fn test_cooling_monotone_and_bounded() {
        let mut rng = StdRng::seed_from_u64(0);
        let config = small_config()
            .with_cooling_factor(0.5)
            .with_epsilon(1e-3)
            .with_max_batches_per_temperature(3);
        let state = AnnealState::new(Ladder::new(5.0, Walk::Flat));
        let (_, trace) = cool(state, 8.0, &config, &mut rng);

        // 8 * 0.5^k > 1e-3 holds for k = 0..=12.
        assert_eq!(trace.temperatures.len(), 13);
        for window in trace.temperatures.windows(2) {
            assert!(window[1] < window[0]);
        }
        assert!(trace.temperatures.iter().all(|&t| t > 1e-3));
        assert!(trace.final_temperature <= 1e-3);
    }

    #[test]
    fn test_no_cooling_below_epsilon() {
        let mut rng = StdRng::seed_from_u64(0);
        let state = AnnealState::new(Ladder::new(5.0, Walk::Flat));
        let (state, trace) = cool(state, 1e-6, &small_config(), &mut rng);
        assert!(trace.temperatures.is_empty());
        assert_eq!(trace.batches, 0);
        assert_eq!(state.current.cost, 5.0);
    }

    #[test]
    fn test_engine_on_random_instance() {
        let instance = random_instance(15, 4, 21);
        let mut rng = StdRng::seed_from_u64(1);
        let seed = GapSolution::random(&instance, &mut rng);
        let initial_cost = seed.cost();
        let config = ThresholdConfig::default()
            .with_batch_size(100)
            .with_calibration_samples(200)
            .with_epsilon(1e-3)
            .with_cooling_factor(0.9)
            .with_max_batches_per_temperature(5)
            .with_seed(42);

        let mut search = ThresholdAccepting::new(&instance, seed, config).unwrap();
        let report = search.run();

        assert!(report.best_cost <= initial_cost);
        assert!(!report.temperature_history.is_empty());
        assert_eq!(report.cost_history.len(), report.temperature_history.len());
        for window in report.cost_history.windows(2) {
            assert!(window[1] <= window[0], "{} > {}", window[1], window[0]);
        }
        for window in report.temperature_history.windows(2) {
            assert!(window[1] < window[0]);
        }
        assert!(search.temperature() <= 1e-3);
        assert_eq!(report.best_cost, search.best_cost());
    }

    #[test]
    fn test_engine_swap_or_shift_finds_toy_optimum() {
        let instance = GapInstance::new(
            vec![vec![4.0, 6.0], vec![3.0, 5.0], vec![8.0, 2.0]],
            vec![2.0, 2.0],
        )
        .unwrap();
        let seed = GapSolution::uniform(&instance, 0).unwrap();
        let config = ThresholdConfig::default()
            .with_batch_size(20)
            .with_calibration_samples(100)
            .with_epsilon(1e-3)
            .with_max_batches_per_temperature(5)
            .with_neighbor_move(NeighborMove::SwapOrShift)
            .with_seed(3);

        let mut search = ThresholdAccepting::new(&instance, seed, config).unwrap();
        let report = search.run();
        assert_eq!(report.best_cost, 9.0);
        assert!(report.feasible);
        assert_eq!(search.best_rendering(), "[0, 0, 1]");
    }

    #[test]
    fn test_engine_zero_tasks() {
        let instance = Tasks(0);
        let mut search =
            ThresholdAccepting::new(&instance, Ladder::new(3.0, Walk::Descend), ThresholdConfig::default())
                .unwrap();
        let report = search.run();
        assert_eq!(report.iterations, 0);
        assert_eq!(report.best_cost, 3.0);
        assert!(report.temperature_history.is_empty());
    }

    #[test]
    fn test_engine_without_calibration_starts_at_configured_temperature() {
        let instance = Tasks(1);
        let config = small_config()
            .with_calibration(false)
            .with_initial_temperature(2.0)
            .with_epsilon(0.5)
            .with_cooling_factor(0.5);
        let mut search = ThresholdAccepting::new(&instance, Ladder::new(0.0, Walk::Flat), config)
            .unwrap();
        let report = search.run();
        assert_eq!(report.temperature_history, vec![2.0, 1.0]);
        assert_eq!(search.temperature(), 0.5);
    }

    #[test]
    fn test_engine_run_is_idempotent() {
        let instance = Tasks(1);
        let config = small_config()
            .with_calibration(false)
            .with_epsilon(1.0)
            .with_cooling_factor(0.5);
        let mut search =
            ThresholdAccepting::new(&instance, Ladder::new(0.0, Walk::Descend), config).unwrap();
        let first = search.run();
        let second = search.run();
        assert_eq!(first, second);
    }
}
