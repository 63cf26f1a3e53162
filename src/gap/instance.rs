//! GAP instance: costs, resource use and agent capacities.

use crate::error::{Result, SearchError};
use crate::types::ProblemInstance;

/// An immutable Generalized Assignment Problem instance.
///
/// All matrices are indexed `[task][agent]`.
///
/// # Examples
///
/// ```
/// use gap_search::gap::GapInstance;
///
/// let instance = GapInstance::new(
///     vec![vec![4.0, 6.0], vec![3.0, 5.0], vec![8.0, 2.0]],
///     vec![2.0, 2.0],
/// )
/// .unwrap();
/// assert_eq!(instance.num_tasks(), 3);
/// assert_eq!(instance.num_agents(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GapInstance {
    costs: Vec<Vec<f64>>,
    weights: Vec<Vec<f64>>,
    capacities: Vec<f64>,
}

impl GapInstance {
    /// Creates an instance where every task uses one unit of capacity.
    pub fn new(costs: Vec<Vec<f64>>, capacities: Vec<f64>) -> Result<Self> {
        let weights = costs.iter().map(|row| vec![1.0; row.len()]).collect();
        Self::with_weights(costs, weights, capacities)
    }

    /// Creates an instance with explicit per-task resource use.
    pub fn with_weights(
        costs: Vec<Vec<f64>>,
        weights: Vec<Vec<f64>>,
        capacities: Vec<f64>,
    ) -> Result<Self> {
        let agents = capacities.len();
        if !costs.is_empty() && agents == 0 {
            return Err(SearchError::InvalidInstance(
                "tasks present but no agents".into(),
            ));
        }
        if weights.len() != costs.len() {
            return Err(SearchError::InvalidInstance(format!(
                "{} cost rows but {} weight rows",
                costs.len(),
                weights.len()
            )));
        }
        for (task, (cost_row, weight_row)) in costs.iter().zip(&weights).enumerate() {
            if cost_row.len() != agents || weight_row.len() != agents {
                return Err(SearchError::InvalidInstance(format!(
                    "task {task} must have exactly {agents} costs and weights"
                )));
            }
            if cost_row.iter().any(|c| !c.is_finite()) {
                return Err(SearchError::InvalidInstance(format!(
                    "task {task} has a non-finite cost"
                )));
            }
            if weight_row.iter().any(|w| !w.is_finite() || *w < 0.0) {
                return Err(SearchError::InvalidInstance(format!(
                    "task {task} has a negative or non-finite weight"
                )));
            }
        }
        if let Some(agent) = capacities.iter().position(|c| !c.is_finite() || *c < 0.0) {
            return Err(SearchError::InvalidInstance(format!(
                "agent {agent} has a negative or non-finite capacity"
            )));
        }

        Ok(Self {
            costs,
            weights,
            capacities,
        })
    }

    /// Number of tasks.
    pub fn num_tasks(&self) -> usize {
        self.costs.len()
    }

    /// Number of agents.
    pub fn num_agents(&self) -> usize {
        self.capacities.len()
    }

    /// Cost of assigning `task` to `agent`.
    #[inline]
    pub fn cost(&self, task: usize, agent: usize) -> f64 {
        self.costs[task][agent]
    }

    /// Capacity consumed when `task` is assigned to `agent`.
    #[inline]
    pub fn weight(&self, task: usize, agent: usize) -> f64 {
        self.weights[task][agent]
    }

    /// Capacity of `agent`.
    #[inline]
    pub fn capacity(&self, agent: usize) -> f64 {
        self.capacities[agent]
    }
}

impl ProblemInstance for GapInstance {
    fn task_count(&self) -> usize {
        self.num_tasks()
    }
}
