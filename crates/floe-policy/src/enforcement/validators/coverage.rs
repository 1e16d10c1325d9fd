//! Column test coverage.

use super::join;
use crate::enforcement::violation::{format_percent, rule_ids, PolicyType, Severity, Violation};
use crate::graph::{ColumnSpec, GraphModel, ModelNode};
use crate::inheritance::ResolvedPolicy;

pub fn validate(graph: &GraphModel, policy: &ResolvedPolicy) -> Vec<Violation> {
    let coverage = policy.coverage();
    let mut out = Vec::new();

    for node in graph.nodes() {
        let Some(threshold) = coverage.threshold_for(node.layer.as_deref()) else {
            continue;
        };
        let untested: Vec<&ColumnSpec> = node
            .columns
            .iter()
            .filter(|c| !node.column_has_test(&c.name))
            .collect();

        let percent = coverage_percent(node.columns.len(), untested.len());
        if percent < threshold {
            out.push(below_threshold(node, percent, threshold, &untested));
        }
        for column in untested {
            out.push(
                Violation::new(
                    rule_ids::COLUMN_UNTESTED,
                    Severity::Warning,
                    PolicyType::Coverage,
                    node,
                    format!("Column '{}' of model '{}' has no tests", column.name, node.name),
                    format!(
                        "Add a test such as not_null or unique for column '{}'",
                        column.name
                    ),
                )
                .with_column(column.name.clone()),
            );
        }
    }
    out
}

/// Share of tested columns. No columns is vacuously full coverage.
fn coverage_percent(total: usize, untested: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    (total - untested) as f64 * 100.0 / total as f64
}

fn below_threshold(node: &ModelNode, percent: f64, threshold: f64, untested: &[&ColumnSpec]) -> Violation {
    let actual = format_percent(percent);
    let required = format_percent(threshold);
    Violation::new(
        rule_ids::COVERAGE_BELOW_THRESHOLD,
        Severity::Error,
        PolicyType::Coverage,
        node,
        format!(
            "Model '{}' has {actual} column test coverage; {required} required",
            node.name
        ),
        format!(
            "Add tests for untested columns: {}",
            join(untested.iter().map(|c| c.name.as_str()))
        ),
    )
    .with_expected(required)
    .with_actual(actual)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_of_tested_columns() {
        assert_eq!(coverage_percent(4, 3), 25.0);
        assert_eq!(coverage_percent(0, 0), 100.0);
        assert_eq!(coverage_percent(2, 0), 100.0);
    }
}
