//! Model and column descriptions.

use crate::enforcement::violation::{rule_ids, PolicyType, Severity, Violation};
use crate::graph::{GraphModel, ModelNode};
use crate::inheritance::ResolvedPolicy;

pub fn validate(graph: &GraphModel, policy: &ResolvedPolicy) -> Vec<Violation> {
    let docs = policy.documentation();
    let min_len = docs.min_description_length() as usize;
    let mut out = Vec::new();

    for node in graph.nodes() {
        let description = node.description.trim();
        if description.is_empty() {
            if docs.require_model_description() {
                out.push(Violation::new(
                    rule_ids::MODEL_UNDOCUMENTED,
                    Severity::Error,
                    PolicyType::Documentation,
                    node,
                    format!("Model '{}' has no description", node.name),
                    format!(
                        "Add a description to model '{}' explaining what it contains and who owns it",
                        node.name
                    ),
                ));
            }
        } else if is_too_short(description, min_len) {
            out.push(too_short(node, None, description, min_len));
        }

        for column in &node.columns {
            let description = column.description.trim();
            if description.is_empty() {
                if docs.require_column_descriptions() {
                    out.push(
                        Violation::new(
                            rule_ids::COLUMN_UNDOCUMENTED,
                            Severity::Warning,
                            PolicyType::Documentation,
                            node,
                            format!(
                                "Column '{}' of model '{}' has no description",
                                column.name, node.name
                            ),
                            format!("Describe column '{}' in the model's schema file", column.name),
                        )
                        .with_column(column.name.clone()),
                    );
                }
            } else if is_too_short(description, min_len) {
                out.push(too_short(node, Some(&column.name), description, min_len));
            }
        }
    }
    out
}

fn is_too_short(description: &str, min_len: usize) -> bool {
    min_len > 0 && description.chars().count() < min_len
}

fn too_short(node: &ModelNode, column: Option<&str>, description: &str, min_len: usize) -> Violation {
    let length = description.chars().count();
    let subject = match column {
        Some(c) => format!("Column '{c}' of model '{}'", node.name),
        None => format!("Model '{}'", node.name),
    };
    let violation = Violation::new(
        rule_ids::DESCRIPTION_TOO_SHORT,
        Severity::Warning,
        PolicyType::Documentation,
        node,
        format!("{subject} has a {length}-character description; at least {min_len} required"),
        format!("Replace the placeholder description with at least {min_len} characters of real documentation"),
    )
    .with_expected(format!("{min_len} characters"))
    .with_actual(format!("{length} characters"));
    match column {
        Some(c) => violation.with_column(c),
        None => violation,
    }
}
