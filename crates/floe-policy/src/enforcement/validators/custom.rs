//! Declarative custom rules. These only add violations; downgrading is the
//! override engine's job.

use super::join;
use crate::enforcement::violation::{rule_ids, PolicyType, Violation};
use crate::graph::{GraphModel, ModelNode};
use crate::inheritance::{CustomRule, CustomRuleKind, ResolvedPolicy};

pub fn validate(graph: &GraphModel, policy: &ResolvedPolicy) -> Vec<Violation> {
    let mut out = Vec::new();
    for rule in policy.custom_rules() {
        for node in graph.nodes().filter(|n| rule.targets(&n.name)) {
            if let Some(v) = evaluate(rule, node) {
                out.push(v);
            }
        }
    }
    out
}

fn evaluate(rule: &CustomRule, node: &ModelNode) -> Option<Violation> {
    match rule.kind() {
        CustomRuleKind::RequireTagsForPrefix { tags } => {
            let missing: Vec<&str> = tags
                .iter()
                .filter(|t| !node.tags.contains(t.as_str()))
                .map(String::as_str)
                .collect();
            if missing.is_empty() {
                return None;
            }
            let missing = join(missing);
            Some(
                Violation::new(
                    rule_ids::MISSING_REQUIRED_TAGS,
                    rule.severity(),
                    PolicyType::Custom,
                    node,
                    format!(
                        "Model '{}' matches '{}' but is missing required tag {missing}",
                        node.name,
                        rule.target_pattern()
                    ),
                    format!("Add tag {missing} to the model config"),
                )
                .with_expected(join(tags.iter().map(String::as_str)))
                .with_actual(join(node.tags.iter().map(String::as_str))),
            )
        }
        CustomRuleKind::RequireMetaField { fields } => {
            let missing: Vec<&str> = fields
                .iter()
                .filter(|f| !node.meta.contains_key(f.as_str()))
                .map(String::as_str)
                .collect();
            if missing.is_empty() {
                return None;
            }
            let missing = join(missing);
            Some(
                Violation::new(
                    rule_ids::MISSING_META_FIELD,
                    rule.severity(),
                    PolicyType::Custom,
                    node,
                    format!("Model '{}' is missing required meta field {missing}", node.name),
                    format!("Set meta field {missing} in the model config"),
                )
                .with_expected(join(fields.iter().map(String::as_str)))
                .with_actual(join(node.meta.keys().map(String::as_str))),
            )
        }
        CustomRuleKind::RequireTestsOfType { test_types } => {
            if node.has_test_of_type(test_types) {
                return None;
            }
            let expected = join(test_types.iter().map(String::as_str));
            Some(
                Violation::new(
                    rule_ids::MISSING_TEST_TYPE,
                    rule.severity(),
                    PolicyType::Custom,
                    node,
                    format!(
                        "Model '{}' declares no test of type {expected}",
                        node.name
                    ),
                    format!("Add a test of type {expected} to model '{}'", node.name),
                )
                .with_expected(expected),
            )
        }
    }
}
