//! Type-safe identifier wrappers around arena indices.
//!
//! Locations, links, and agents live in insertion-ordered arenas owned by
//! the world graph and the ecosystem. Their identifiers are dense indices
//! into those arenas, wrapped in distinct types so a link handle can never
//! be used to look up a location. Identifiers are assigned in creation
//! order and are never reused within a simulation instance.

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around a `usize` arena index with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(usize);

        impl $name {
            /// Wrap a raw arena index.
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            /// Return the raw arena index.
            pub const fn index(self) -> usize {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }

        impl From<usize> for $name {
            fn from(index: usize) -> Self {
                Self(index)
            }
        }

        impl From<$name> for usize {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Identifier for a location (node in the world graph).
    LocationId
}

define_id! {
    /// Identifier for a directed link (edge in the world graph).
    LinkId
}

define_id! {
    /// Identifier for an agent (person) in the ecosystem.
    AgentId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trips() {
        let id = LocationId::new(7);
        assert_eq!(id.index(), 7);
        assert_eq!(usize::from(id), 7);
        assert_eq!(LinkId::from(3).index(), 3);
    }

    #[test]
    fn display_names_the_kind() {
        assert_eq!(AgentId::new(12).to_string(), "AgentId#12");
        assert_eq!(LinkId::new(0).to_string(), "LinkId#0");
    }

    #[test]
    fn ids_serialize_as_plain_numbers() {
        let json = serde_json::to_string(&LocationId::new(4)).unwrap_or_default();
        assert_eq!(json, "4");
    }
}
