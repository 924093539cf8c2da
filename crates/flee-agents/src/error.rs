//! Error types for the flee-agents crate.
//!
//! Route selection never fails: a location without links or with every
//! destination full is resolved by policy, not reported. Errors here only
//! surface broken graph bookkeeping (dangling handles, count underflow).

/// Errors that can occur while moving an agent.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// A world-graph operation failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: flee_world::WorldError,
    },

    /// The selected route index does not exist in the outgoing link list.
    #[error("route index {index} out of range for {available} outgoing links")]
    RouteOutOfRange {
        /// The index returned by route selection.
        index: usize,
        /// Number of outgoing links at the decision point.
        available: usize,
    },
}
