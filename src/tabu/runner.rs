//! Tabu Search execution engine.
//!
//! # Algorithm
//!
//! 1. Push the initial solution onto the tabu list
//! 2. At each iteration:
//!    a. Generate `tasks * neighbor_multiplier` swap/shift pairs from the
//!    current solution
//!    b. Drop every candidate equal to a tabu-list entry
//!    c. Select the cheapest remaining candidate (first one on ties); if
//!    none remain, apply the configured [`FallbackPolicy`]
//!    d. Make it current, append it to the tabu list (evicting the oldest)
//!    e. Update the best solution on strict improvement
//! 3. Terminate after the iteration budget
//!
//! # Reference
//!
//! Glover, F. (1989). "Tabu Search—Part I", *ORSA Journal on Computing* 1(3), 190-206.

use rand::rngs::StdRng;
use rand::SeedableRng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info, trace, warn};

use super::config::{FallbackPolicy, TabuConfig};
use super::list::TabuList;
use crate::error::Result;
use crate::neighborhood;
use crate::strategy::{LocalSearch, SearchReport};
use crate::types::{ProblemInstance, Solution};

const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Initialized,
    Running,
    Terminated,
}

/// Outcome of a single Tabu Search iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabuStep {
    /// Cost of the solution selected as current.
    pub cost: f64,
    /// Whether the best solution improved.
    pub improved: bool,
    /// Whether the whole neighborhood was tabu and the fallback policy chose.
    pub fallback: bool,
}

/// Tabu Search over a borrowed problem instance.
///
/// # Examples
///
/// ```
/// use gap_search::gap::{GapInstance, GapSolution};
/// use gap_search::tabu::{TabuConfig, TabuSearch};
/// use gap_search::LocalSearch;
///
/// let instance = GapInstance::new(
///     vec![vec![4.0, 6.0], vec![3.0, 5.0], vec![8.0, 2.0]],
///     vec![2.0, 2.0],
/// )
/// .unwrap();
/// let seed = GapSolution::uniform(&instance, 0).unwrap();
/// let config = TabuConfig::default().with_max_iterations(50).with_seed(7);
///
/// let mut search = TabuSearch::new(&instance, seed, config).unwrap();
/// search.run();
/// assert_eq!(search.best_cost(), 9.0);
/// assert!(search.is_feasible());
/// ```
pub struct TabuSearch<'a, G, S> {
    graph: &'a G,
    config: TabuConfig,
    rng: StdRng,
    phase: Phase,
    current: S,
    best: S,
    tabu: TabuList<S>,
    iteration: usize,
    fallbacks: usize,
    cost_history: Vec<f64>,
}

impl<'a, G: ProblemInstance, S: Solution> TabuSearch<'a, G, S> {
    /// Creates an engine starting from `initial`.
    pub fn new(graph: &'a G, initial: S, config: TabuConfig) -> Result<Self> {
        config.validate()?;
        let rng = StdRng::seed_from_u64(config.seed.unwrap_or(DEFAULT_SEED));
        let tabu = TabuList::new(config.tabu_list_size);
        let cost_history = Vec::with_capacity(config.max_iterations);

        Ok(Self {
            graph,
            config,
            rng,
            phase: Phase::Initialized,
            best: initial.clone(),
            current: initial,
            tabu,
            iteration: 0,
            fallbacks: 0,
            cost_history,
        })
    }

    /// Runs one iteration. Returns `None` once the budget is exhausted.
    pub fn step(&mut self) -> Option<TabuStep> {
        match self.phase {
            Phase::Terminated => return None,
            Phase::Initialized => {
                self.tabu.push(self.current.clone());
                self.phase = Phase::Running;
                debug!(
                    tasks = self.graph.task_count(),
                    initial_cost = self.current.cost(),
                    "tabu search started"
                );
            }
            Phase::Running => {}
        }

        let tasks = self.graph.task_count();
        if tasks == 0 || self.iteration >= self.config.max_iterations {
            self.phase = Phase::Terminated;
            return None;
        }

        let mut candidates = neighborhood::generate(
            &self.current,
            tasks * self.config.neighbor_multiplier,
            &mut self.rng,
        );
        let flags = self.tabu_flags(&candidates);

        let (index, fallback) = match select_admissible(&candidates, &flags) {
            Some(index) => (index, false),
            None => match select_fallback(&candidates, &self.tabu, self.config.fallback) {
                Some(index) => (index, true),
                None => {
                    self.phase = Phase::Terminated;
                    return None;
                }
            },
        };
        if fallback {
            self.fallbacks += 1;
            trace!(
                iteration = self.iteration,
                policy = ?self.config.fallback,
                "whole neighborhood is tabu"
            );
        }

        let selected = candidates.swap_remove(index);
        let cost = selected.cost();
        self.tabu.push(selected.clone());

        let improved = cost < self.best.cost();
        if improved {
            self.best = selected.clone();
            trace!(iteration = self.iteration, cost, "new best");
        }
        self.current = selected;
        self.iteration += 1;
        self.cost_history.push(self.best.cost());

        Some(TabuStep {
            cost,
            improved,
            fallback,
        })
    }

    #[cfg(not(feature = "parallel"))]
    fn tabu_flags(&self, candidates: &[S]) -> Vec<bool> {
        candidates.iter().map(|c| self.tabu.contains(c)).collect()
    }

    #[cfg(feature = "parallel")]
    fn tabu_flags(&self, candidates: &[S]) -> Vec<bool> {
        let tabu = &self.tabu;
        candidates.par_iter().map(|c| tabu.contains(c)).collect()
    }

    /// The solution the search is currently at.
    pub fn current(&self) -> &S {
        &self.current
    }

    /// The best solution found so far.
    pub fn best(&self) -> &S {
        &self.best
    }

    /// The current tabu list.
    pub fn tabu_list(&self) -> &TabuList<S> {
        &self.tabu
    }

    /// Iterations completed.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    fn report(&self) -> SearchReport {
        SearchReport {
            best_cost: self.best.cost(),
            feasible: self.best.is_feasible(),
            iterations: self.iteration,
            cost_history: self.cost_history.clone(),
            temperature_history: Vec::new(),
            fallbacks: self.fallbacks,
        }
    }
}

impl<G: ProblemInstance, S: Solution> LocalSearch for TabuSearch<'_, G, S> {
    fn run(&mut self) -> SearchReport {
        while self.step().is_some() {}

        if self.fallbacks > 0 {
            warn!(
                fallbacks = self.fallbacks,
                "neighborhood fully tabu on some iterations"
            );
        }
        info!(
            iterations = self.iteration,
            best_cost = self.best.cost(),
            feasible = self.best.is_feasible(),
            "tabu search finished"
        );
        self.report()
    }

    fn best_assignment(&self) -> &[usize] {
        self.best.assignments()
    }

    fn best_cost(&self) -> f64 {
        self.best.cost()
    }

    fn is_feasible(&self) -> bool {
        self.best.is_feasible()
    }

    fn best_rendering(&self) -> String {
        self.best.to_string()
    }
}

/// Index of the cheapest non-tabu candidate, first in generation order on ties.
fn select_admissible<S: Solution>(candidates: &[S], tabu_flags: &[bool]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, (candidate, &is_tabu)) in candidates.iter().zip(tabu_flags).enumerate() {
        if is_tabu {
            continue;
        }
        let cost = candidate.cost();
        if best.is_none_or(|(_, best_cost)| cost < best_cost) {
            best = Some((i, cost));
        }
    }
    best.map(|(i, _)| i)
}

/// Picks a candidate from an all-tabu neighborhood.
fn select_fallback<S: Solution>(
    candidates: &[S],
    tabu: &TabuList<S>,
    policy: FallbackPolicy,
) -> Option<usize> {
    match policy {
        FallbackPolicy::RelaxFilter => select_admissible(candidates, &vec![false; candidates.len()]),
        FallbackPolicy::LeastRecentlyTabu => {
            let mut best: Option<(usize, usize, f64)> = None;
            for (i, candidate) in candidates.iter().enumerate() {
                let age = tabu.last_position(candidate).unwrap_or(usize::MAX);
                let cost = candidate.cost();
                let better = match best {
                    None => true,
                    Some((_, best_age, best_cost)) => {
                        age < best_age || (age == best_age && cost < best_cost)
                    }
                };
                if better {
                    best = Some((i, age, cost));
                }
            }
            best.map(|(i, _, _)| i)
        }
    }
}
