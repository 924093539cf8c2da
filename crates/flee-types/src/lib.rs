//! Shared type definitions for the Flee displacement simulation.
//!
//! This crate is the single source of truth for the identifiers,
//! parameters, and definition structs used across the workspace.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe arena index wrappers for locations, links, and agents
//! - [`enums`] -- Awareness levels used by route weighting
//! - [`params`] -- [`SimulationParameters`], the immutable model configuration
//! - [`structs`] -- Location definitions and report rows

pub mod enums;
pub mod ids;
pub mod params;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{AwarenessLevel, InvalidAwarenessLevel};
pub use ids::{AgentId, LinkId, LocationId};
pub use params::{InvalidParameter, SimulationParameters};
pub use structs::{CAMP_MOVECHANCE_THRESHOLD, DEFAULT_MOVECHANCE, LocationReport, LocationSpec};
