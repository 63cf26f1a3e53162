//! Synthetic solutions with known acceptance behavior.

use std::fmt;

use rand::Rng;

use crate::types::Solution;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Walk {
    /// Every neighbor costs one more.
    Climb,
    /// Every neighbor costs one less.
    Descend,
    /// One more while below 3, then a hundred more.
    Wall,
    /// Same cost.
    Flat,
    /// Uniform on 0.0, 0.1, ..., 99.9.
    Noise,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ladder {
    pub cost: f64,
    pub walk: Walk,
}

impl Ladder {
    pub fn new(cost: f64, walk: Walk) -> Self {
        Self { cost, walk }
    }

    fn next<R: Rng>(&self, rng: &mut R) -> Self {
        let cost = match self.walk {
            Walk::Climb => self.cost + 1.0,
            Walk::Descend => self.cost - 1.0,
            Walk::Wall if self.cost < 3.0 => self.cost + 1.0,
            Walk::Wall => self.cost + 100.0,
            Walk::Flat => self.cost,
            Walk::Noise => rng.random_range(0..1000) as f64 / 10.0,
        };
        Self::new(cost, self.walk)
    }
}

impl fmt::Display for Ladder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{}", self.walk, self.cost)
    }
}

impl Solution for Ladder {
    fn cost(&self) -> f64 {
        self.cost
    }

    fn is_feasible(&self) -> bool {
        true
    }

    fn assignments(&self) -> &[usize] {
        &[]
    }

    fn swap_neighbor<R: Rng>(&self, rng: &mut R) -> Self {
        self.next(rng)
    }

    fn shift_neighbor<R: Rng>(&self, rng: &mut R) -> Self {
        self.next(rng)
    }
}

/// Instance with a fixed task count.
pub struct Tasks(pub usize);

impl crate::types::ProblemInstance for Tasks {
    fn task_count(&self) -> usize {
        self.0
    }
}
