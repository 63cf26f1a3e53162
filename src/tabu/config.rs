//! Tabu Search configuration.

use crate::error::{Result, SearchError};

/// What to do when every generated neighbor is tabu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FallbackPolicy {
    /// Take the candidate that leaves the tabu list first, ranked by its
    /// newest matching entry. Ties go to the cheaper candidate, then to
    /// generation order.
    #[default]
    LeastRecentlyTabu,

    /// Ignore the tabu list for this iteration and take the cheapest
    /// candidate of the whole neighborhood.
    RelaxFilter,
}

/// Configuration parameters for Tabu Search.
///
/// # Examples
///
/// ```
/// use gap_search::tabu::TabuConfig;
///
/// let config = TabuConfig::default()
///     .with_max_iterations(1000)
///     .with_tabu_list_size(50)
///     .with_neighbor_multiplier(4);
/// assert_eq!(config.max_iterations, 1000);
/// assert_eq!(config.tabu_list_size, 50);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TabuConfig {
    /// Number of iterations to run.
    pub max_iterations: usize,
    /// Maximum number of solutions kept in the tabu list.
    pub tabu_list_size: usize,
    /// Swap/shift pairs generated per task at each iteration. The
    /// neighborhood has `2 * tasks * neighbor_multiplier` candidates.
    pub neighbor_multiplier: usize,
    /// Policy when the tabu filter empties the neighborhood.
    pub fallback: FallbackPolicy,
    /// Random seed (None for the default seed).
    pub seed: Option<u64>,
}

impl Default for TabuConfig {
    fn default() -> Self {
        Self {
            max_iterations: 20_000,
            tabu_list_size: 100,
            neighbor_multiplier: 10,
            fallback: FallbackPolicy::default(),
            seed: None,
        }
    }
}

impl TabuConfig {
    /// Sets the number of iterations.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the maximum tabu list size.
    pub fn with_tabu_list_size(mut self, size: usize) -> Self {
        self.tabu_list_size = size;
        self
    }

    /// Sets the neighborhood multiplier.
    pub fn with_neighbor_multiplier(mut self, multiplier: usize) -> Self {
        self.neighbor_multiplier = multiplier;
        self
    }

    /// Sets the empty-neighborhood policy.
    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.tabu_list_size == 0 {
            return Err(SearchError::InvalidConfig(
                "tabu_list_size must be at least 1".into(),
            ));
        }
        if self.neighbor_multiplier == 0 {
            return Err(SearchError::InvalidConfig(
                "neighbor_multiplier must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
