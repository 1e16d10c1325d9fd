//! Downstream impact via transitive dependent analysis.

use std::collections::VecDeque;

use floe_core::types::collections::FxHashSet;
use petgraph::graph::NodeIndex;
use petgraph::Direction;

use super::model::GraphModel;
use super::types::ModelId;

/// Find all transitive dependents of `start` via inverse BFS: every model
/// whose output would change if `start` changed. Sorted by model id,
/// excluding `start` itself unless it sits on a cycle.
pub(crate) fn transitive_dependents(graph: &GraphModel, start: NodeIndex) -> Vec<ModelId> {
    let arena = graph.arena();
    let mut visited = FxHashSet::default();
    let mut queue = VecDeque::new();
    let mut result = Vec::new();

    queue.push_back(start);

    while let Some(node) = queue.pop_front() {
        for dependent in arena.neighbors_directed(node, Direction::Incoming) {
            if visited.insert(dependent) {
                result.push(arena[dependent].clone());
                queue.push_back(dependent);
            }
        }
    }

    result.sort();
    result
}
