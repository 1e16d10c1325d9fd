//! Naming validator: model names against convention and custom regexes.

use super::join;
use crate::enforcement::violation::{rule_ids, PolicyType, Severity, Violation};
use crate::graph::{GraphModel, ModelNode};
use crate::inheritance::resolved::{CompiledPattern, NamingPolicy, MEDALLION_LAYERS};
use crate::inheritance::{NamingConvention, ResolvedPolicy};

pub fn validate(graph: &GraphModel, policy: &ResolvedPolicy) -> Vec<Violation> {
    let naming = policy.naming();
    if !naming.is_configured() {
        return Vec::new();
    }
    graph.nodes().filter_map(|node| check_node(node, naming)).collect()
}

fn check_node(node: &ModelNode, naming: &NamingPolicy) -> Option<Violation> {
    let failed: Vec<&CompiledPattern> = naming
        .applicable_patterns(node.layer.as_deref())
        .into_iter()
        .filter(|p| !p.is_match(&node.name))
        .collect();
    if failed.is_empty() {
        return None;
    }

    let expected = join(failed.iter().map(|p| p.as_str()));
    let message = format!(
        "Model '{}' does not match required naming pattern {}",
        node.name, expected
    );
    Some(
        Violation::new(
            rule_ids::NAMING_PATTERN,
            Severity::Error,
            PolicyType::Naming,
            node,
            message,
            suggestion(node, naming, &expected),
        )
        .with_expected(expected)
        .with_actual(node.name.clone()),
    )
}

fn suggestion(node: &ModelNode, naming: &NamingPolicy, expected: &str) -> String {
    let layer = node.layer.as_deref().unwrap_or_default();
    match naming.convention() {
        Some(NamingConvention::Medallion)
            if MEDALLION_LAYERS.contains(&layer) && !node.name.starts_with(&format!("{layer}_")) =>
        {
            format!(
                "Rename the model to '{layer}_{}' to follow the {layer} layer prefix (pattern {expected})",
                strip_medallion_prefix(&node.name)
            )
        }
        Some(NamingConvention::Kimball)
            if !node.name.starts_with("dim_") && !node.name.starts_with("fact_") =>
        {
            format!(
                "Rename the model to 'dim_{0}' for a dimension or 'fact_{0}' for a fact table (pattern {expected})",
                node.name
            )
        }
        _ => format!("Rename the model so its name matches {expected}"),
    }
}

fn strip_medallion_prefix(name: &str) -> &str {
    MEDALLION_LAYERS
        .iter()
        .find_map(|layer| name.strip_prefix(layer).and_then(|rest| rest.strip_prefix('_')))
        .unwrap_or(name)
}
