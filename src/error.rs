//! Error types for instance construction and search configuration.

use thiserror::Error;

/// Errors raised while building an instance, a solution, or an engine.
///
/// The search loops themselves never fail: every budget is fixed up front,
/// so all validation happens before the first iteration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// A configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The problem instance is malformed.
    #[error("invalid instance: {0}")]
    InvalidInstance(String),

    /// An assignment does not fit the instance it was built for.
    #[error("invalid assignment: {0}")]
    InvalidAssignment(String),
}

/// Result alias for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, SearchError>;
