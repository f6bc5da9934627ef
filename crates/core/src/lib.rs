//! Domain crate for the Pathways template engine.
//!
//! Zero internal dependencies so it can be used by the repository layer,
//! the API layer, and any future worker tooling. Contains shared types,
//! the domain error enum, role constants, and pure validation logic for
//! templates, phases, ordering, and version snapshots.

pub mod error;
pub mod ordering;
pub mod phase;
pub mod roles;
pub mod snapshot;
pub mod template;
pub mod types;
