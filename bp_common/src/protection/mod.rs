//! Battery protection shared types.
//!
//! Everything exchanged between the protection engine, its configuration and
//! its collaborators lives here: derating curve points, force-override
//! parameters and states, the per-cycle measurement snapshot, the published
//! limits, and the string status consumed by load weighting.

pub mod config;
pub mod curve;
pub mod force;
pub mod snapshot;
pub mod strings;
