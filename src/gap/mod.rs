//! Generalized Assignment Problem model.
//!
//! A reference implementation of the problem-side capabilities
//! ([`ProblemInstance`](crate::ProblemInstance) and
//! [`Solution`](crate::Solution)) for the classic GAP: assign each task to
//! exactly one agent, minimizing total cost, subject to per-agent capacity.
//!
//! # References
//!
//! - Ross, G. T. & Soland, R. M. (1975). "A branch and bound algorithm for the
//!   generalized assignment problem", *Mathematical Programming* 8, 91-103.

mod instance;
mod solution;

pub use instance::GapInstance;
pub use solution::GapSolution;
