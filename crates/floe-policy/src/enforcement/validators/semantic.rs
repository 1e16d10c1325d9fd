//! Graph-structural checks: dangling refs, cycles, undefined sources.

use super::join;
use crate::enforcement::violation::{rule_ids, PolicyType, Severity, Violation};
use crate::graph::{find_cycles, GraphModel};
use crate::inheritance::ResolvedPolicy;

pub fn validate(graph: &GraphModel, _policy: &ResolvedPolicy) -> Vec<Violation> {
    let mut out = Vec::new();

    for node in graph.nodes() {
        let dangling: Vec<&str> = graph.dangling_refs(node).map(String::as_str).collect();
        if !dangling.is_empty() {
            let missing = join(dangling);
            out.push(
                Violation::new(
                    rule_ids::DANGLING_REF,
                    Severity::Error,
                    PolicyType::Semantic,
                    node,
                    format!("Model '{}' references missing model {missing}", node.name),
                    format!("Remove the ref or add the missing model {missing} to the project"),
                )
                .with_actual(missing),
            );
        }

        let undefined: Vec<&str> = graph.undefined_sources(node).map(String::as_str).collect();
        if !undefined.is_empty() {
            let missing = join(undefined);
            out.push(
                Violation::new(
                    rule_ids::UNDEFINED_SOURCE,
                    Severity::Error,
                    PolicyType::Semantic,
                    node,
                    format!("Model '{}' reads from undefined source {missing}", node.name),
                    format!("Declare source {missing} in a sources file or fix the source() call"),
                )
                .with_actual(missing),
            );
        }
    }

    for cycle in find_cycles(graph) {
        let path = cycle.display_path();
        for id in &cycle.path {
            let Some(node) = graph.get(id) else {
                continue;
            };
            out.push(
                Violation::new(
                    rule_ids::CIRCULAR_DEPENDENCY,
                    Severity::Error,
                    PolicyType::Semantic,
                    node,
                    format!("Model '{}' is part of a circular dependency: {path}", node.name),
                    format!("Break the cycle by removing one ref along {path}"),
                )
                .with_actual(path.clone()),
            );
        }
    }
    out
}
