//! Error types for the `flee-world` crate.
//!
//! All fallible graph operations return [`WorldError`]. Structural problems
//! (unknown or duplicate names, invalid distances) are configuration errors
//! raised while the graph is being built; the count variants guard the
//! agent bookkeeping invariants during a run.

use flee_types::{LinkId, LocationId};

/// Errors that can occur during world-graph operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A location handle does not refer to a registered location.
    #[error("location not found: {0}")]
    LocationNotFound(LocationId),

    /// A location name is not registered in the graph.
    #[error("location with name {0:?} does not exist")]
    UnknownLocationName(String),

    /// A link handle does not refer to a registered link.
    #[error("link not found: {0}")]
    LinkNotFound(LinkId),

    /// A location with the same name is already registered.
    #[error("duplicate location name: {0:?}")]
    DuplicateLocation(String),

    /// A link distance is not a finite positive number of km.
    #[error("invalid link distance {distance} between {from:?} and {to:?}")]
    InvalidDistance {
        /// Source location name.
        from: String,
        /// Destination location name.
        to: String,
        /// The rejected distance.
        distance: f64,
    },

    /// An agent count would drop below zero.
    #[error("agent count underflow on {context}")]
    CountUnderflow {
        /// Which counter was being decremented.
        context: String,
    },

    /// Arithmetic overflow during a checked operation.
    #[error("arithmetic overflow in world calculation")]
    ArithmeticOverflow,
}
