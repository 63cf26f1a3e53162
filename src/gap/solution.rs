//! GAP solution: an agent per task with cached cost and feasibility.

use std::fmt;

use rand::Rng;

use super::instance::GapInstance;
use crate::error::{Result, SearchError};
use crate::types::Solution;

/// An assignment of every task of a [`GapInstance`] to one agent.
///
/// Cost is the plain sum of assignment costs; capacity violations are
/// reported through [`is_feasible`](Solution::is_feasible) rather than
/// penalized.
#[derive(Debug, Clone)]
pub struct GapSolution<'a> {
    instance: &'a GapInstance,
    agents: Vec<usize>,
    cost: f64,
    feasible: bool,
}

impl<'a> GapSolution<'a> {
    /// Builds a solution from an explicit agent-per-task vector.
    ///
    /// # Examples
    ///
    /// ```
    /// use gap_search::gap::{GapInstance, GapSolution};
    /// use gap_search::Solution;
    ///
    /// let instance = GapInstance::new(
    ///     vec![vec![4.0, 6.0], vec![3.0, 5.0], vec![8.0, 2.0]],
    ///     vec![2.0, 2.0],
    /// )
    /// .unwrap();
    /// let seed = GapSolution::new(&instance, vec![0, 0, 0]).unwrap();
    /// assert_eq!(seed.cost(), 15.0);
    /// assert!(!seed.is_feasible());
    /// ```
    pub fn new(instance: &'a GapInstance, agents: Vec<usize>) -> Result<Self> {
        if agents.len() != instance.num_tasks() {
            return Err(SearchError::InvalidAssignment(format!(
                "expected {} tasks, got {}",
                instance.num_tasks(),
                agents.len()
            )));
        }
        if let Some((task, &agent)) = agents
            .iter()
            .enumerate()
            .find(|&(_, &a)| a >= instance.num_agents())
        {
            return Err(SearchError::InvalidAssignment(format!(
                "task {task} assigned to unknown agent {agent}"
            )));
        }
        Ok(Self::evaluated(instance, agents))
    }

    /// Assigns every task to the same agent.
    pub fn uniform(instance: &'a GapInstance, agent: usize) -> Result<Self> {
        Self::new(instance, vec![agent; instance.num_tasks()])
    }

    /// Assigns every task to a uniformly random agent.
    pub fn random<R: Rng>(instance: &'a GapInstance, rng: &mut R) -> Self {
        let agents = (0..instance.num_tasks())
            .map(|_| rng.random_range(0..instance.num_agents()))
            .collect();
        Self::evaluated(instance, agents)
    }

    /// Capacity used by each agent.
    pub fn loads(&self) -> Vec<f64> {
        let mut loads = vec![0.0; self.instance.num_agents()];
        for (task, &agent) in self.agents.iter().enumerate() {
            loads[agent] += self.instance.weight(task, agent);
        }
        loads
    }

    fn evaluated(instance: &'a GapInstance, agents: Vec<usize>) -> Self {
        let cost = agents
            .iter()
            .enumerate()
            .map(|(task, &agent)| instance.cost(task, agent))
            .sum();
        let mut solution = Self {
            instance,
            agents,
            cost,
            feasible: false,
        };
        solution.feasible = solution
            .loads()
            .iter()
            .enumerate()
            .all(|(agent, &load)| load <= instance.capacity(agent));
        solution
    }
}

impl PartialEq for GapSolution<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.agents == other.agents
    }
}

impl Eq for GapSolution<'_> {}

impl fmt::Display for GapSolution<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, agent) in self.agents.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{agent}")?;
        }
        write!(f, "]")
    }
}

impl Solution for GapSolution<'_> {
    fn cost(&self) -> f64 {
        self.cost
    }

    fn is_feasible(&self) -> bool {
        self.feasible
    }

    fn assignments(&self) -> &[usize] {
        &self.agents
    }

    fn swap_neighbor<R: Rng>(&self, rng: &mut R) -> Self {
        let n = self.agents.len();
        if n < 2 {
            return self.clone();
        }
        let i = rng.random_range(0..n);
        let partners: Vec<usize> = (0..n)
            .filter(|&j| self.agents[j] != self.agents[i])
            .collect();
        // Every task shares one agent: no swap changes anything.
        if partners.is_empty() {
            return self.clone();
        }
        let j = partners[rng.random_range(0..partners.len())];

        let mut agents = self.agents.clone();
        agents.swap(i, j);
        Self::evaluated(self.instance, agents)
    }

    fn shift_neighbor<R: Rng>(&self, rng: &mut R) -> Self {
        let n = self.agents.len();
        let m = self.instance.num_agents();
        if n == 0 || m < 2 {
            return self.clone();
        }
        let task = rng.random_range(0..n);
        let mut agent = rng.random_range(0..m - 1);
        if agent >= self.agents[task] {
            agent += 1;
        }

        let mut agents = self.agents.clone();
        agents[task] = agent;
        Self::evaluated(self.instance, agents)
    }
}
