//! Person state machine and route selection for the Flee displacement
//! simulation.
//!
//! An agent is always either resident at a location or in transit on a
//! link. Each tick it may decide to depart, picking a link by weighted
//! random choice, and travellers advance along their link by a fixed speed
//! budget.
//!
//! # Modules
//!
//! - [`error`] -- Error types for agent movement.
//! - [`movement`] -- The per-tick departure decision and travel completion
//!   steps, including chained hops over short links.
//! - [`person`] -- [`Person`] with its explicit [`Position`] and optional
//!   travel counters.
//! - [`routing`] -- Link weighting, forced redirection, and the
//!   categorical draw over outgoing links.

pub mod error;
pub mod movement;
pub mod person;
pub mod routing;

// Re-export primary types at crate root.
pub use error::AgentError;
pub use movement::{TravelReport, decide_departure, finish_travel};
pub use person::{Person, Position, TravelLog};
pub use routing::{RouteWeights, choose_weighted, link_weight, route_weights, select_route};
