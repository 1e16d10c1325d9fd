//! Three-tier policy inheritance.
//!
//! Foundation, Platform and Product tiers each supply a partial
//! `PolicyDocument`; `InheritanceResolver` folds them into one immutable
//! `ResolvedPolicy`, failing fast when a later tier loosens an earlier one.

pub mod custom_rules;
pub mod document;
pub mod overrides;
pub mod resolved;
pub mod resolver;
pub mod types;

pub use custom_rules::{CustomRule, CustomRuleKind, CUSTOM_RULE_TYPES};
pub use document::{
    CoverageDoc, CustomRuleSpec, DocumentationDoc, NamingDoc, OverrideSpec, PolicyDocument,
};
pub use overrides::PolicyOverride;
pub use resolved::{
    CompiledPattern, CoveragePolicy, DocumentationPolicy, NamingPolicy, ResolvedPolicy,
};
pub use resolver::InheritanceResolver;
pub use types::{EnforcementLevel, NamingConvention, OverrideAction, Tier};
