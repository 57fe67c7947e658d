//! Battery Protection Common Library
//!
//! Shared constants, configuration loading and data types for the battery
//! protection workspace.
//!
//! # Module Structure
//!
//! - [`consts`] - Reference constants (rates, seeds, dwell times, string layout)
//! - [`config`] - Configuration loading traits and types
//! - [`protection`] - Curve, force-override, snapshot and string types
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use bp_common::config::{ConfigLoader, SharedConfig};
//! use bp_common::protection::config::ProtectionConfig;
//! ```

pub mod config;
pub mod consts;
pub mod prelude;
pub mod protection;
