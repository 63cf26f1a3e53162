//! Tabu Search (TS).
//!
//! A single-solution trajectory metaheuristic that keeps a bounded FIFO
//! list of recently visited solutions and refuses to move back to them,
//! which lets the search climb out of local optima instead of cycling.
//!
//! # References
//!
//! - Glover, F. (1989). "Tabu Search—Part I", *ORSA Journal on Computing* 1(3), 190-206.
//! - Glover, F. (1990). "Tabu Search—Part II", *ORSA Journal on Computing* 2(1), 4-32.

mod config;
mod list;
mod runner;

pub use config::{FallbackPolicy, TabuConfig};
pub use list::TabuList;
pub use runner::{TabuSearch, TabuStep};
