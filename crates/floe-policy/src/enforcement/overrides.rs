//! Post-validation override processing.
//!
//! Overrides only ever see violations that were already produced, so every
//! suppressed issue was detected and logged first.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::violation::{Severity, Violation};
use crate::inheritance::{OverrideAction, PolicyOverride};

/// What the override pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideReport {
    /// Violations touched by any override.
    pub applied: usize,
    /// Errors lowered to warnings.
    pub downgraded: usize,
    /// Violations removed from the result.
    pub excluded: usize,
    /// Active overrides that matched nothing.
    pub unused_patterns: Vec<String>,
    /// Overrides past their expiry date.
    pub expired_patterns: Vec<String>,
}

/// Applies time-boxed downgrade/exclude rules to raw violations.
pub struct OverrideEngine<'a> {
    overrides: &'a [PolicyOverride],
    today: NaiveDate,
}

impl<'a> OverrideEngine<'a> {
    pub fn new(overrides: &'a [PolicyOverride], today: NaiveDate) -> Self {
        Self { overrides, today }
    }

    /// First active override in declaration order wins.
    fn find(&self, violation: &Violation) -> Option<(usize, &'a PolicyOverride)> {
        self.overrides.iter().enumerate().find(|(_, o)| {
            o.is_active(self.today)
                && o.applies_to_rule(&violation.rule_id)
                && o.matches(&violation.model_id, &violation.model_name)
        })
    }

    pub fn apply(&self, violations: Vec<Violation>) -> (Vec<Violation>, OverrideReport) {
        let mut report = OverrideReport::default();
        let mut used = vec![false; self.overrides.len()];
        let mut out = Vec::with_capacity(violations.len());

        for mut violation in violations {
            let Some((index, o)) = self.find(&violation) else {
                out.push(violation);
                continue;
            };
            used[index] = true;
            report.applied += 1;

            match o.action() {
                OverrideAction::Exclude => {
                    report.excluded += 1;
                    tracing::info!(
                        rule_id = %violation.rule_id,
                        model = %violation.model_id,
                        pattern = o.pattern(),
                        "violation excluded by override"
                    );
                }
                OverrideAction::Downgrade => {
                    if violation.severity == Severity::Error {
                        violation.severity = Severity::Warning;
                        report.downgraded += 1;
                    }
                    violation.override_applied = Some(o.pattern().to_string());
                    out.push(violation);
                }
            }
        }

        for (o, used) in self.overrides.iter().zip(&used) {
            if !o.is_active(self.today) {
                tracing::info!(pattern = o.pattern(), tier = %o.tier(), "override expired");
                report.expired_patterns.push(o.pattern().to_string());
            } else if !used {
                tracing::warn!(pattern = o.pattern(), tier = %o.tier(), "override matched no violations");
                report.unused_patterns.push(o.pattern().to_string());
            }
        }

        tracing::debug!(
            overrides_applied = report.applied,
            downgraded = report.downgraded,
            excluded = report.excluded,
            "overrides processed"
        );
        (out, report)
    }
}
