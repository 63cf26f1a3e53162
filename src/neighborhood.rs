//! Neighborhood generation shared by both search strategies.

use rand::Rng;

use crate::types::Solution;

/// Builds `2 * count` neighbors of `solution`, interleaved as
/// `(swap, shift)` pairs in generation order.
///
/// Neighbors are neither deduplicated nor checked for feasibility; the
/// caller filters and ranks them. `solution` is not modified.
pub fn generate<S: Solution, R: Rng>(solution: &S, count: usize, rng: &mut R) -> Vec<S> {
    let mut neighbors = Vec::with_capacity(2 * count);
    for _ in 0..count {
        neighbors.push(solution.swap_neighbor(rng));
        neighbors.push(solution.shift_neighbor(rng));
    }
    neighbors
}
