//! Common interface over the two search strategies.
//!
//! [`TabuSearch`] and [`ThresholdAccepting`] are independent alternatives
//! over the same problem instance. Callers pick one, either directly or
//! through the [`Heuristic`] selector, and drive it via [`LocalSearch`].

use crate::error::Result;
use crate::tabu::{TabuConfig, TabuSearch};
use crate::threshold::{ThresholdAccepting, ThresholdConfig};
use crate::types::{ProblemInstance, Solution};

/// Summary of a completed search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchReport {
    /// Cost of the best solution.
    pub best_cost: f64,
    /// Whether the best solution satisfies all capacities.
    pub feasible: bool,
    /// Tabu: iterations run. Threshold accepting: batches run.
    pub iterations: usize,
    /// Best cost after each iteration (tabu) or each cooling step
    /// (threshold accepting).
    pub cost_history: Vec<f64>,
    /// Temperature at each cooling step. Empty for tabu.
    pub temperature_history: Vec<f64>,
    /// Iterations where every neighbor was tabu. Zero for threshold accepting.
    pub fallbacks: usize,
}

/// Capabilities shared by every search strategy.
pub trait LocalSearch {
    /// Runs the search to completion.
    fn run(&mut self) -> SearchReport;

    /// Agent id per task of the best solution so far.
    fn best_assignment(&self) -> &[usize];

    /// Cost of the best solution so far.
    fn best_cost(&self) -> f64;

    /// Whether the best solution so far is feasible.
    fn is_feasible(&self) -> bool;

    /// Textual rendering of the best assignment.
    fn best_rendering(&self) -> String;
}

/// Strategy selector.
///
/// # Examples
///
/// ```
/// use gap_search::gap::{GapInstance, GapSolution};
/// use gap_search::tabu::TabuConfig;
/// use gap_search::{Heuristic, LocalSearch};
///
/// let instance = GapInstance::new(
///     vec![vec![4.0, 6.0], vec![3.0, 5.0], vec![8.0, 2.0]],
///     vec![2.0, 2.0],
/// )
/// .unwrap();
/// let seed = GapSolution::uniform(&instance, 0).unwrap();
///
/// let heuristic = Heuristic::Tabu(TabuConfig::default().with_max_iterations(20).with_seed(1));
/// let mut search = heuristic.build(&instance, seed).unwrap();
/// let report = search.run();
/// assert!(report.best_cost <= 15.0);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Heuristic {
    /// Tabu Search.
    Tabu(TabuConfig),
    /// Threshold Accepting with calibrated initial temperature.
    ThresholdAccepting(ThresholdConfig),
}

impl Heuristic {
    /// Short name for reporting.
    pub fn name(&self) -> &'static str {
        match self {
            Heuristic::Tabu(_) => "tabu",
            Heuristic::ThresholdAccepting(_) => "threshold-accepting",
        }
    }

    /// Builds the selected engine over `graph`, starting from `initial`.
    pub fn build<'a, G, S>(&self, graph: &'a G, initial: S) -> Result<Box<dyn LocalSearch + 'a>>
    where
        G: ProblemInstance,
        S: Solution + 'a,
    {
        let search: Box<dyn LocalSearch + 'a> = match self {
            Heuristic::Tabu(config) => Box::new(TabuSearch::new(graph, initial, config.clone())?),
            Heuristic::ThresholdAccepting(config) => {
                Box::new(ThresholdAccepting::new(graph, initial, config.clone())?)
            }
        };
        Ok(search)
    }
}
