//! Configuration system for Floe.
//! TOML-based, 4-layer resolution: CLI > env > project > user > defaults.
//!
//! This is the engine's invocation config (where documents live, which
//! report to write). Governance policy itself is resolved separately by
//! the tiered inheritance chain in `floe-policy`.

pub mod enforcement_config;
pub mod floe_config;

pub use enforcement_config::{EnforcementConfig, PolicyPathsConfig};
pub use floe_config::{CliOverrides, FloeConfig};
