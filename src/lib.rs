//! Local-search metaheuristics for the Generalized Assignment Problem.
//!
//! Two alternative strategies share one neighbor-generation substrate:
//!
//! - **Tabu Search**: moves to the cheapest neighbor not in a bounded
//!   FIFO list of recently visited solutions.
//! - **Threshold Accepting**: accepts any neighbor whose cost is within a
//!   temperature of the current cost, cooling between thermal equilibria,
//!   with the starting temperature calibrated by bisection.
//!
//! # Architecture
//!
//! The engines only see a problem through the [`ProblemInstance`] and
//! [`Solution`] traits. The [`gap`] module provides the GAP model; other
//! assignment models plug in by implementing the same two traits. Pick a
//! strategy directly or through [`Heuristic`], and drive it via
//! [`LocalSearch`].

pub mod error;
pub mod gap;
pub mod neighborhood;
pub mod strategy;
pub mod tabu;
pub mod threshold;
mod types;

pub use error::{Result, SearchError};
pub use strategy::{Heuristic, LocalSearch, SearchReport};
pub use types::{ProblemInstance, Solution};
