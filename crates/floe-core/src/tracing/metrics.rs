//! Structured span field definitions for Floe.
//!
//! Standard field names used in tracing events across the engine so that
//! log queries stay stable.

/// Inheritance: tier being folded.
pub const TIER: &str = "tier";

/// Inheritance: resolution time in milliseconds.
pub const RESOLVE_TIME: &str = "resolve_time_ms";

/// Validators: validator kind.
pub const VALIDATOR: &str = "validator";

/// Validators: per-validator execution time in milliseconds.
pub const VALIDATOR_TIME: &str = "validator_time_ms";

/// Enforcer: total run time in milliseconds.
pub const ENFORCE_TIME: &str = "enforce_time_ms";

/// Enforcer: number of models in the graph.
pub const MODEL_COUNT: &str = "model_count";

/// Overrides: number of violations touched by overrides.
pub const OVERRIDES_APPLIED: &str = "overrides_applied";

/// Reporters: serialized report size in bytes.
pub const REPORT_BYTES: &str = "report_bytes";
