//! Core violation types shared by validators, overrides, and reporters.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use floe_core::constants::DOCS_BASE_URL;
use serde::{Deserialize, Serialize};

use crate::graph::{ModelId, ModelNode};

/// Stable rule identifiers.
pub mod rule_ids {
    pub const NAMING_PATTERN: &str = "FLOE-E201";
    pub const COVERAGE_BELOW_THRESHOLD: &str = "FLOE-E210";
    pub const COLUMN_UNTESTED: &str = "FLOE-E211";
    pub const MODEL_UNDOCUMENTED: &str = "FLOE-E220";
    pub const COLUMN_UNDOCUMENTED: &str = "FLOE-E221";
    pub const DESCRIPTION_TOO_SHORT: &str = "FLOE-E222";
    pub const DANGLING_REF: &str = "FLOE-E301";
    pub const CIRCULAR_DEPENDENCY: &str = "FLOE-E302";
    pub const UNDEFINED_SOURCE: &str = "FLOE-E303";
    pub const MISSING_REQUIRED_TAGS: &str = "FLOE-E400";
    pub const MISSING_META_FIELD: &str = "FLOE-E401";
    pub const MISSING_TEST_TYPE: &str = "FLOE-E402";
}

/// Short human title for a rule, used by SARIF rule metadata and HTML.
pub fn rule_title(rule_id: &str) -> &'static str {
    match rule_id {
        rule_ids::NAMING_PATTERN => "Model name does not match naming convention",
        rule_ids::COVERAGE_BELOW_THRESHOLD => "Column test coverage below threshold",
        rule_ids::COLUMN_UNTESTED => "Column has no tests",
        rule_ids::MODEL_UNDOCUMENTED => "Model has no description",
        rule_ids::COLUMN_UNDOCUMENTED => "Column has no description",
        rule_ids::DESCRIPTION_TOO_SHORT => "Description shorter than required minimum",
        rule_ids::DANGLING_REF => "Reference to a model that does not exist",
        rule_ids::CIRCULAR_DEPENDENCY => "Circular dependency between models",
        rule_ids::UNDEFINED_SOURCE => "Reference to an undefined source",
        rule_ids::MISSING_REQUIRED_TAGS => "Model is missing required tags",
        rule_ids::MISSING_META_FIELD => "Model is missing required meta fields",
        rule_ids::MISSING_TEST_TYPE => "Model is missing a required test type",
        _ => "Policy violation",
    }
}

/// Severity levels for violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(Self::Error),
            "warning" => Ok(Self::Warning),
            other => Err(format!("unknown severity '{other}' (expected error or warning)")),
        }
    }
}

/// Which family of policy produced a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyType {
    Naming,
    Coverage,
    Documentation,
    Semantic,
    Custom,
}

impl PolicyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Naming => "naming",
            Self::Coverage => "coverage",
            Self::Documentation => "documentation",
            Self::Semantic => "semantic",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for PolicyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single policy non-compliance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub rule_id: String,
    pub severity: Severity,
    pub policy_type: PolicyType,
    pub model_id: ModelId,
    pub model_name: String,
    pub column: Option<String>,
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
    /// Remediation guidance. Never empty.
    pub suggestion: String,
    pub documentation_url: String,
    /// Models transitively depending on this one. Filled only on request.
    pub downstream_impact: Option<Vec<ModelId>>,
    /// Reserved for persisted history; always `None`.
    pub first_detected: Option<DateTime<Utc>>,
    /// Reserved for persisted history; always `None`.
    pub occurrences: Option<u32>,
    /// Pattern of the override that downgraded this violation.
    pub override_applied: Option<String>,
}

/// Dedup identity: `(model_id, rule_id, column)`.
pub type DedupKey = (ModelId, String, Option<String>);

impl Violation {
    pub fn new(
        rule_id: &str,
        severity: Severity,
        policy_type: PolicyType,
        node: &ModelNode,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        let suggestion = suggestion.into();
        debug_assert!(!suggestion.trim().is_empty(), "{rule_id}: suggestion must not be empty");
        Self {
            rule_id: rule_id.to_string(),
            severity,
            policy_type,
            model_id: node.id.clone(),
            model_name: node.name.clone(),
            column: None,
            message: message.into(),
            expected: None,
            actual: None,
            suggestion,
            documentation_url: format!("{DOCS_BASE_URL}/{rule_id}"),
            downstream_impact: None,
            first_detected: None,
            occurrences: None,
            override_applied: None,
        }
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn with_actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = Some(actual.into());
        self
    }

    pub fn dedup_key(&self) -> DedupKey {
        (self.model_id.clone(), self.rule_id.clone(), self.column.clone())
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Format a percentage without trailing `.0` (e.g. `25%`, `33.3%`).
pub(crate) fn format_percent(value: f64) -> String {
    if (value - value.round()).abs() < f64::EPSILON {
        format!("{value:.0}%")
    } else {
        format!("{value:.1}%")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_formatting() {
        assert_eq!(format_percent(25.0), "25%");
        assert_eq!(format_percent(80.0), "80%");
        assert_eq!(format_percent(100.0 / 3.0), "33.3%");
    }

    #[test]
    fn violation_carries_documentation_url() {
        let node = ModelNode::new("model.shop.orders", "orders");
        let v = Violation::new(
            rule_ids::DANGLING_REF,
            Severity::Error,
            PolicyType::Semantic,
            &node,
            "bad ref",
            "fix the ref",
        );
        assert_eq!(v.documentation_url, "https://floe.dev/docs/policies/FLOE-E301");
        assert!(v.first_detected.is_none());
        assert!(v.occurrences.is_none());
    }
}
