//! Declarative custom rules: the supported rule types and their compiled
//! form.
//!
//! Rules are checked when the policy is resolved. An unknown type or a
//! malformed parameter block aborts resolution; it never becomes a deferred
//! violation.

use std::collections::BTreeMap;

use floe_core::errors::PolicyError;
use glob::Pattern;
use serde_json::Value;

use super::document::CustomRuleSpec;
use super::types::Tier;
use crate::enforcement::Severity;

/// Compiled rule behavior with its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomRuleKind {
    /// Matching models must carry every listed tag.
    RequireTagsForPrefix { tags: Vec<String> },
    /// Matching models must define every listed meta key.
    RequireMetaField { fields: Vec<String> },
    /// Matching models must declare at least one test of a listed type.
    RequireTestsOfType { test_types: Vec<String> },
}

type ParamParser = fn(&BTreeMap<String, Value>) -> Result<CustomRuleKind, String>;

/// Entry in the custom rule registry.
pub struct CustomRuleType {
    pub name: &'static str,
    pub parameter: &'static str,
    parse: ParamParser,
}

/// Every supported custom rule type.
pub static CUSTOM_RULE_TYPES: &[CustomRuleType] = &[
    CustomRuleType {
        name: "require_tags_for_prefix",
        parameter: "tags",
        parse: parse_require_tags,
    },
    CustomRuleType {
        name: "require_meta_field",
        parameter: "fields",
        parse: parse_require_meta,
    },
    CustomRuleType {
        name: "require_tests_of_type",
        parameter: "test_types",
        parse: parse_require_tests,
    },
];

fn parse_require_tags(params: &BTreeMap<String, Value>) -> Result<CustomRuleKind, String> {
    string_list(params, "tags").map(|tags| CustomRuleKind::RequireTagsForPrefix { tags })
}

fn parse_require_meta(params: &BTreeMap<String, Value>) -> Result<CustomRuleKind, String> {
    string_list(params, "fields").map(|fields| CustomRuleKind::RequireMetaField { fields })
}

fn parse_require_tests(params: &BTreeMap<String, Value>) -> Result<CustomRuleKind, String> {
    string_list(params, "test_types")
        .map(|test_types| CustomRuleKind::RequireTestsOfType { test_types })
}

pub fn supported_rule_types() -> String {
    CUSTOM_RULE_TYPES
        .iter()
        .map(|t| t.name)
        .collect::<Vec<_>>()
        .join(", ")
}

fn lookup(name: &str) -> Option<&'static CustomRuleType> {
    CUSTOM_RULE_TYPES.iter().find(|t| t.name == name)
}

/// Read a non-empty list of non-empty strings from `params[key]`.
fn string_list(params: &BTreeMap<String, Value>, key: &str) -> Result<Vec<String>, String> {
    let value = params
        .get(key)
        .ok_or_else(|| format!("missing required parameter '{key}'"))?;
    let items = value
        .as_array()
        .ok_or_else(|| format!("parameter '{key}' must be a list of strings"))?;
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item.as_str() {
            Some(s) if !s.trim().is_empty() => out.push(s.to_string()),
            Some(_) => return Err(format!("parameter '{key}' contains an empty string")),
            None => return Err(format!("parameter '{key}' must be a list of strings")),
        }
    }
    if out.is_empty() {
        return Err(format!("parameter '{key}' must not be empty"));
    }
    Ok(out)
}

/// A validated custom rule ready for evaluation.
#[derive(Debug, Clone)]
pub struct CustomRule {
    spec: CustomRuleSpec,
    kind: CustomRuleKind,
    target: Pattern,
    severity: Severity,
}

impl CustomRule {
    /// Validate `spec`, which sits at `custom_rules[index]` of `tier`.
    pub fn compile(spec: &CustomRuleSpec, tier: Tier, index: usize) -> Result<Self, PolicyError> {
        let rule_type = lookup(&spec.rule_type).ok_or_else(|| PolicyError::UnknownCustomRuleType {
            tier: tier.to_string(),
            index,
            rule_type: spec.rule_type.clone(),
            supported: supported_rule_types(),
        })?;

        let kind = (rule_type.parse)(&spec.parameters).map_err(|message| {
            PolicyError::InvalidCustomRule {
                tier: tier.to_string(),
                index,
                rule_type: spec.rule_type.clone(),
                message,
            }
        })?;

        let unexpected: Vec<&str> = spec
            .parameters
            .keys()
            .map(String::as_str)
            .filter(|k| *k != rule_type.parameter)
            .collect();
        if !unexpected.is_empty() {
            return Err(PolicyError::InvalidCustomRule {
                tier: tier.to_string(),
                index,
                rule_type: spec.rule_type.clone(),
                message: format!("unexpected parameter(s): {}", unexpected.join(", ")),
            });
        }

        let target = Pattern::new(&spec.target_pattern).map_err(|e| PolicyError::InvalidPattern {
            tier: tier.to_string(),
            field: format!("custom_rules[{index}].target_pattern"),
            pattern: spec.target_pattern.clone(),
            message: e.to_string(),
        })?;

        Ok(Self {
            spec: spec.clone(),
            kind,
            target,
            severity: spec.severity.unwrap_or(Severity::Error),
        })
    }

    pub fn spec(&self) -> &CustomRuleSpec {
        &self.spec
    }

    pub fn kind(&self) -> &CustomRuleKind {
        &self.kind
    }

    pub fn rule_type(&self) -> &str {
        &self.spec.rule_type
    }

    pub fn target_pattern(&self) -> &str {
        self.target.as_str()
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn targets(&self, model_name: &str) -> bool {
        self.target.matches(model_name)
    }
}
