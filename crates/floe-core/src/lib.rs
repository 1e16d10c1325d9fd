//! Floe core: errors, configuration, tracing, and shared constants.
//!
//! Everything here is engine-agnostic plumbing consumed by `floe-policy`
//! and the `floe` binary.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod types;
