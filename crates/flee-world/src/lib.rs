//! Location graph, admission control, and attractiveness scoring for the
//! Flee displacement simulation.
//!
//! This crate models the physical world: settlements, camps, and conflict
//! zones as nodes of a directed weighted graph, and roads as pairs of
//! directed links.
//!
//! # Modules
//!
//! - [`error`] -- Error types for world-graph operations.
//! - [`link`] -- [`Link`], a directed edge with a distance, a
//!   forced-redirection flag, and an in-transit agent count.
//! - [`location`] -- [`LocationState`] wraps a [`LocationSpec`] with runtime
//!   state: agent count, conflict flag, score tiers, camp journey logs.
//! - [`world_map`] -- The world graph with name lookup, link management,
//!   the three-pass score cascade, and agent count bookkeeping.
//!
//! [`LocationSpec`]: flee_types::LocationSpec

pub mod error;
pub mod link;
pub mod location;
pub mod world_map;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use link::Link;
pub use location::LocationState;
pub use world_map::{JourneyTally, WorldMap};
