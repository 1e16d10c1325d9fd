//! Enforcement run outcome.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::violation::{PolicyType, Severity, Violation};
use crate::graph::ModelId;
use crate::inheritance::EnforcementLevel;

/// Aggregate counts for one run. Contains no timings so identical inputs
/// serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnforcementSummary {
    pub total_models: usize,
    pub models_validated: usize,
    pub models_with_violations: usize,
    pub total_violations: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub naming_violations: usize,
    pub coverage_violations: usize,
    pub documentation_violations: usize,
    pub semantic_violations: usize,
    pub custom_rule_violations: usize,
    pub overrides_applied: usize,
    pub violations_by_rule: BTreeMap<String, usize>,
}

impl EnforcementSummary {
    pub fn from_violations(
        violations: &[Violation],
        total_models: usize,
        models_validated: usize,
        models_with_violations: usize,
        overrides_applied: usize,
    ) -> Self {
        let mut summary = Self {
            total_models,
            models_validated,
            models_with_violations,
            total_violations: violations.len(),
            overrides_applied,
            ..Default::default()
        };
        for v in violations {
            match v.severity {
                Severity::Error => summary.error_count += 1,
                Severity::Warning => summary.warning_count += 1,
            }
            match v.policy_type {
                PolicyType::Naming => summary.naming_violations += 1,
                PolicyType::Coverage => summary.coverage_violations += 1,
                PolicyType::Documentation => summary.documentation_violations += 1,
                PolicyType::Semantic => summary.semantic_violations += 1,
                PolicyType::Custom => summary.custom_rule_violations += 1,
            }
            *summary.violations_by_rule.entry(v.rule_id.clone()).or_default() += 1;
        }
        summary
    }
}

/// Final, frozen result of `PolicyEnforcer::enforce`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnforcementResult {
    pub passed: bool,
    pub enforcement_level: EnforcementLevel,
    pub summary: EnforcementSummary,
    pub violations: Vec<Violation>,
    pub violations_by_model: BTreeMap<ModelId, Vec<Violation>>,
    /// Non-fatal findings from policy resolution.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub policy_warnings: Vec<String>,
}

impl EnforcementResult {
    pub fn new(
        enforcement_level: EnforcementLevel,
        summary: EnforcementSummary,
        violations: Vec<Violation>,
        violations_by_model: BTreeMap<ModelId, Vec<Violation>>,
        policy_warnings: Vec<String>,
    ) -> Self {
        let passed = !(enforcement_level == EnforcementLevel::Strict && summary.error_count > 0);
        Self {
            passed,
            enforcement_level,
            summary,
            violations,
            violations_by_model,
            policy_warnings,
        }
    }

    /// Violations recorded for one model; empty when it has none.
    pub fn violations_for(&self, model_id: &str) -> &[Violation] {
        self.violations_by_model
            .get(model_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 0 when passed, 1 when strict enforcement failed.
    pub fn exit_code(&self) -> i32 {
        if self.passed {
            0
        } else {
            1
        }
    }
}
