//! Enforcement: validators, overrides, dedup store, orchestrator, reporters.

pub mod enforcer;
pub mod overrides;
pub mod reporters;
pub mod result;
pub mod store;
pub mod validators;
pub mod violation;

pub use enforcer::{EnforcerOptions, PolicyEnforcer};
pub use overrides::{OverrideEngine, OverrideReport};
pub use reporters::{ReportExporter, ReportFormat, Reporter};
pub use result::{EnforcementResult, EnforcementSummary};
pub use store::ViolationStore;
pub use validators::ValidatorKind;
pub use violation::{rule_ids, rule_title, PolicyType, Severity, Violation};
