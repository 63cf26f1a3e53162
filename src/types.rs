//! Capabilities the search engines consume from the problem side.
//!
//! The engines never look inside an instance or a solution. They only need
//! the task count to size a neighborhood, and a solution that can report its
//! cost, its feasibility, and produce perturbed copies of itself.

use std::fmt::Display;

use rand::Rng;

/// An immutable problem instance.
pub trait ProblemInstance: Send + Sync {
    /// Number of tasks to be assigned.
    fn task_count(&self) -> usize;
}

/// A candidate assignment of every task to an agent.
///
/// Solutions are value objects: the neighbor operations return a new
/// solution and leave `self` untouched. Equality must be structural
/// (same agent for every task), since the tabu list relies on it.
///
/// # Examples
///
/// ```ignore
/// #[derive(Clone, PartialEq)]
/// struct Toy { agents: Vec<usize>, cost: f64 }
///
/// impl Solution for Toy {
///     fn cost(&self) -> f64 { self.cost }
///     fn is_feasible(&self) -> bool { true }
///     fn assignments(&self) -> &[usize] { &self.agents }
///     fn swap_neighbor<R: Rng>(&self, rng: &mut R) -> Self { /* ... */ }
///     fn shift_neighbor<R: Rng>(&self, rng: &mut R) -> Self { /* ... */ }
/// }
/// ```
pub trait Solution: Clone + PartialEq + Display + Send + Sync {
    /// Total cost. Lower is better.
    fn cost(&self) -> f64;

    /// Whether every capacity constraint holds.
    fn is_feasible(&self) -> bool;

    /// Agent id per task, in task order.
    fn assignments(&self) -> &[usize];

    /// A new solution with the agents of two tasks exchanged.
    fn swap_neighbor<R: Rng>(&self, rng: &mut R) -> Self;

    /// A new solution with one task moved to a different agent.
    fn shift_neighbor<R: Rng>(&self, rng: &mut R) -> Self;
}
