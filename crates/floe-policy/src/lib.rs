//! Floe policy engine.
//!
//! Validates a compiled model dependency graph against governance policy
//! resolved from a Foundation → Platform → Product inheritance chain.
//!
//! Subsystems:
//! - `graph`: model arena, manifest loader, cycle detection, downstream impact
//! - `inheritance`: tiered policy documents, strengthening-only resolution
//! - `enforcement`: validators, overrides, violation store, enforcer, reporters

pub mod enforcement;
pub mod graph;
pub mod inheritance;

pub use enforcement::{
    EnforcementResult, EnforcementSummary, EnforcerOptions, PolicyEnforcer, ReportExporter,
    ReportFormat, Severity, Violation,
};
pub use graph::{GraphDocument, GraphModel, ModelNode};
pub use inheritance::{EnforcementLevel, InheritanceResolver, PolicyDocument, ResolvedPolicy, Tier};
