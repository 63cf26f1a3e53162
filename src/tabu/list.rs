//! Bounded FIFO recency window of visited solutions.

use std::collections::VecDeque;

/// Recently selected solutions, oldest first.
///
/// Insertion appends at the tail; once the list grows past its maximum,
/// entries are evicted from the head. A solution is tabu only while it is
/// inside this sliding window.
#[derive(Debug, Clone)]
pub struct TabuList<S> {
    entries: VecDeque<S>,
    max_len: usize,
}

impl<S: PartialEq> TabuList<S> {
    /// Creates an empty list holding at most `max_len` solutions.
    pub fn new(max_len: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_len + 1),
            max_len,
        }
    }

    /// Appends `solution`, evicting from the head until within bound.
    pub fn push(&mut self, solution: S) {
        self.entries.push_back(solution);
        while self.entries.len() > self.max_len {
            self.entries.pop_front();
        }
    }

    /// Whether a structurally equal solution is in the window.
    pub fn contains(&self, solution: &S) -> bool {
        self.entries.contains(solution)
    }

    /// Index of the newest equal entry (0 is the head).
    ///
    /// A solution stays tabu until this entry is evicted, so a smaller
    /// index means it leaves the window sooner.
    pub fn last_position(&self, solution: &S) -> Option<usize> {
        self.entries.iter().rposition(|s| s == solution)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Iterates oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &S> {
        self.entries.iter()
    }
}
