//! Validator pipeline orchestration.
//!
//! raw violations → `OverrideEngine` → `ViolationStore` → `EnforcementResult`

use std::time::Instant;

use chrono::{NaiveDate, Utc};
use rayon::prelude::*;

use super::overrides::OverrideEngine;
use super::result::{EnforcementResult, EnforcementSummary};
use super::store::ViolationStore;
use super::validators::ValidatorKind;
use super::violation::Violation;
use crate::graph::GraphModel;
use crate::inheritance::ResolvedPolicy;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnforcerOptions {
    /// Attach transitive dependents to each violation.
    pub include_downstream_impact: bool,
    /// Validators to run. Order here is irrelevant; merge order is fixed.
    pub validators: Vec<ValidatorKind>,
}

impl Default for EnforcerOptions {
    fn default() -> Self {
        Self {
            include_downstream_impact: false,
            validators: ValidatorKind::ALL.to_vec(),
        }
    }
}

/// Runs every enabled validator against a graph and resolved policy.
#[derive(Debug, Clone, Default)]
pub struct PolicyEnforcer {
    options: EnforcerOptions,
}

impl PolicyEnforcer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EnforcerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EnforcerOptions {
        &self.options
    }

    /// Enforce using today's UTC date for override expiry.
    pub fn enforce(&self, graph: &GraphModel, policy: &ResolvedPolicy) -> EnforcementResult {
        self.enforce_at(graph, policy, Utc::now().date_naive())
    }

    /// Enforce with an explicit date for override expiry.
    pub fn enforce_at(
        &self,
        graph: &GraphModel,
        policy: &ResolvedPolicy,
        today: NaiveDate,
    ) -> EnforcementResult {
        let start = Instant::now();
        // `off` still validates and reports; it only never fails the run.
        let level = policy.enforcement_level();

        let kinds: Vec<ValidatorKind> = ValidatorKind::ALL
            .into_iter()
            .filter(|k| self.options.validators.contains(k))
            .collect();

        // Indexed collect keeps registry order regardless of completion order.
        let batches: Vec<Vec<Violation>> = kinds
            .par_iter()
            .map(|kind| {
                let t = Instant::now();
                let found = kind.run(graph, policy);
                tracing::debug!(
                    validator = kind.as_str(),
                    violations = found.len(),
                    validator_time_ms = t.elapsed().as_millis() as u64,
                    "validator finished"
                );
                found
            })
            .collect();
        let raw: Vec<Violation> = batches.into_iter().flatten().collect();
        let raw_count = raw.len();

        let (mut processed, report) = OverrideEngine::new(policy.overrides(), today).apply(raw);

        if self.options.include_downstream_impact {
            for v in &mut processed {
                v.downstream_impact = Some(graph.downstream_impact(&v.model_id).to_vec());
            }
        }

        let mut store = ViolationStore::with_capacity(processed.len());
        store.extend(processed);
        let duplicates = store.duplicates_dropped();
        let (violations, by_model) = store.finalize();

        let models_validated = if kinds.is_empty() { 0 } else { graph.len() };
        let summary = EnforcementSummary::from_violations(
            &violations,
            graph.len(),
            models_validated,
            by_model.len(),
            report.applied,
        );
        let result = EnforcementResult::new(
            level,
            summary,
            violations,
            by_model,
            policy.warnings().to_vec(),
        );

        tracing::info!(
            model_count = graph.len(),
            raw = raw_count,
            duplicates,
            violations = result.summary.total_violations,
            errors = result.summary.error_count,
            warnings = result.summary.warning_count,
            overrides_applied = report.applied,
            passed = result.passed,
            level = %level,
            enforce_time_ms = start.elapsed().as_millis() as u64,
            "enforcement complete"
        );
        result
    }
}
