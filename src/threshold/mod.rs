//! Threshold Accepting (TA).
//!
//! A deterministic-acceptance variant of simulated annealing: a neighbor
//! is accepted whenever its cost exceeds the current cost by no more than
//! the temperature. Batches of accepted moves run at each temperature
//! until their mean cost stops falling (thermal equilibrium), then the
//! temperature is cooled geometrically. The starting temperature is
//! calibrated by bisection so that a target share of proposals is accepted.
//!
//! # References
//!
//! - Dueck, G. & Scheuer, T. (1990), "Threshold Accepting: A General Purpose
//!   Optimization Algorithm Appearing Superior to Simulated Annealing",
//!   *Journal of Computational Physics* 90(1), 161-175.
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"

mod calibration;
mod config;
#[cfg(test)]
mod fixtures;
mod runner;

pub use calibration::TemperatureCalibrator;
pub use config::{AcceptanceBaseline, BatchMean, NeighborMove, ThresholdConfig};
pub use runner::{
    cool, reach_equilibrium, run_batch, AnnealState, BatchOutcome, CoolingTrace, Equilibrium,
    ThresholdAccepting,
};
