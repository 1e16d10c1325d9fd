//! Compiled policy overrides.

use chrono::NaiveDate;
use floe_core::errors::PolicyError;
use glob::Pattern;

use super::document::OverrideSpec;
use super::types::{OverrideAction, Tier};

/// An override with its glob precompiled and its declaring tier recorded.
#[derive(Debug, Clone)]
pub struct PolicyOverride {
    spec: OverrideSpec,
    matcher: Pattern,
    tier: Tier,
}

impl PolicyOverride {
    pub fn compile(spec: &OverrideSpec, tier: Tier, index: usize) -> Result<Self, PolicyError> {
        let matcher = Pattern::new(&spec.pattern).map_err(|e| PolicyError::InvalidPattern {
            tier: tier.to_string(),
            field: format!("policy_overrides[{index}].pattern"),
            pattern: spec.pattern.clone(),
            message: e.to_string(),
        })?;
        Ok(Self {
            spec: spec.clone(),
            matcher,
            tier,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.spec.pattern
    }

    pub fn action(&self) -> OverrideAction {
        self.spec.action
    }

    pub fn expires(&self) -> Option<NaiveDate> {
        self.spec.expires
    }

    pub fn is_permanent(&self) -> bool {
        self.spec.permanent
    }

    pub fn reason(&self) -> Option<&str> {
        self.spec.reason.as_deref()
    }

    pub fn rules(&self) -> &[String] {
        &self.spec.rules
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn spec(&self) -> &OverrideSpec {
        &self.spec
    }

    /// Neither dated nor explicitly permanent.
    pub fn is_unbounded(&self) -> bool {
        self.spec.expires.is_none() && !self.spec.permanent
    }

    /// Active until the day of `expires`; undated overrides never lapse.
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.spec.expires.map_or(true, |expires| expires > today)
    }

    /// The glob is tried against the model name, then the model id.
    pub fn matches(&self, model_id: &str, model_name: &str) -> bool {
        self.matcher.matches(model_name) || self.matcher.matches(model_id)
    }

    pub fn applies_to_rule(&self, rule_id: &str) -> bool {
        self.spec.rules.is_empty() || self.spec.rules.iter().any(|r| r == rule_id)
    }
}
