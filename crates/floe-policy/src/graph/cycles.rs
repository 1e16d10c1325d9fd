//! Cycle detection over the ref graph.
//!
//! Iterative depth-first traversal with an explicit stack, so pathological
//! chains cannot overflow the call stack. Every back edge closes a cycle made
//! of the stack slice from the revisited node to the top.
//!
//! Back edges alone miss nodes whose only cycles run through an already
//! finished node. A second pass over the strongly connected components
//! closes a shortest cycle through every member still uncovered, so each
//! node on any cycle appears in at least one reported path.

use std::collections::{BTreeSet, VecDeque};

use petgraph::algo::kosaraju_scc;
use petgraph::graph::NodeIndex;

use super::model::GraphModel;
use super::types::ModelId;

/// A dependency cycle in traversal order. The first node is implied to
/// follow the last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    pub path: Vec<ModelId>,
}

impl Cycle {
    /// Rotation-independent identity: the sorted member ids.
    pub fn canonical_key(&self) -> Vec<ModelId> {
        let mut key = self.path.clone();
        key.sort();
        key
    }

    /// `a -> b -> c -> a`
    pub fn display_path(&self) -> String {
        let mut parts: Vec<&str> = self.path.iter().map(String::as_str).collect();
        if let Some(first) = self.path.first() {
            parts.push(first);
        }
        parts.join(" -> ")
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

/// Find the distinct cycles of the ref graph.
///
/// Every node that lies on some cycle is a member of at least one returned
/// path. Cycles that are rotations of each other are reported once. Results
/// are deterministic: roots and successors are visited in model-id order.
pub fn find_cycles(graph: &GraphModel) -> Vec<Cycle> {
    let arena = graph.arena();
    let n = arena.node_count();

    let adjacency: Vec<Vec<usize>> = (0..n)
        .map(|i| {
            let mut succ: Vec<usize> = arena
                .neighbors(NodeIndex::new(i))
                .map(|idx| idx.index())
                .collect();
            succ.sort_unstable();
            succ.dedup();
            succ
        })
        .collect();

    let mut marks = vec![Mark::Unvisited; n];
    let mut stack_pos: Vec<Option<usize>> = vec![None; n];
    let mut stack: Vec<(usize, usize)> = Vec::new();
    let mut covered = vec![false; n];
    let mut seen: BTreeSet<Vec<ModelId>> = BTreeSet::new();
    let mut cycles = Vec::new();

    for root in 0..n {
        if marks[root] != Mark::Unvisited {
            continue;
        }
        marks[root] = Mark::OnStack;
        stack_pos[root] = Some(0);
        stack.push((root, 0));

        while let Some(&(node, cursor)) = stack.last() {
            let top = stack.len() - 1;
            if cursor < adjacency[node].len() {
                stack[top].1 += 1;
                let next = adjacency[node][cursor];
                match marks[next] {
                    Mark::Unvisited => {
                        marks[next] = Mark::OnStack;
                        stack_pos[next] = Some(stack.len());
                        stack.push((next, 0));
                    }
                    Mark::OnStack => {
                        let from = stack_pos[next].unwrap_or(top);
                        for &(i, _) in &stack[from..] {
                            covered[i] = true;
                        }
                        let cycle = Cycle {
                            path: stack[from..]
                                .iter()
                                .map(|&(i, _)| arena[NodeIndex::new(i)].clone())
                                .collect(),
                        };
                        if seen.insert(cycle.canonical_key()) {
                            cycles.push(cycle);
                        }
                    }
                    Mark::Done => {}
                }
            } else {
                marks[node] = Mark::Done;
                stack_pos[node] = None;
                stack.pop();
            }
        }
    }

    // Self-loops are always closed above, so only components of two or
    // more nodes can hide uncovered members.
    let mut component_of = vec![usize::MAX; n];
    let mut components: Vec<Vec<usize>> = kosaraju_scc(arena)
        .into_iter()
        .filter(|c| c.len() > 1)
        .map(|c| {
            let mut members: Vec<usize> = c.into_iter().map(|idx| idx.index()).collect();
            members.sort_unstable();
            members
        })
        .collect();
    components.sort();
    for (id, members) in components.iter().enumerate() {
        for &m in members {
            component_of[m] = id;
        }
    }

    for members in &components {
        for &start in members {
            if covered[start] {
                continue;
            }
            let Some(path) = shortest_cycle_through(start, &adjacency, &component_of) else {
                continue;
            };
            for &i in &path {
                covered[i] = true;
            }
            let cycle = Cycle {
                path: path.iter().map(|&i| arena[NodeIndex::new(i)].clone()).collect(),
            };
            if seen.insert(cycle.canonical_key()) {
                cycles.push(cycle);
            }
        }
    }

    if !cycles.is_empty() {
        tracing::debug!(cycles = cycles.len(), "dependency cycles detected");
    }
    cycles
}

/// Breadth-first search from `start` back to itself, staying inside the
/// strongly connected component of `start`. Returns the path starting at
/// `start`, closing edge implied.
fn shortest_cycle_through(
    start: usize,
    adjacency: &[Vec<usize>],
    component_of: &[usize],
) -> Option<Vec<usize>> {
    let component = component_of[start];
    let mut parent: Vec<Option<usize>> = vec![None; adjacency.len()];
    let mut queue = VecDeque::from([start]);

    while let Some(node) = queue.pop_front() {
        for &next in &adjacency[node] {
            if component_of[next] != component {
                continue;
            }
            if next == start {
                let mut path = vec![node];
                let mut cursor = node;
                while cursor != start {
                    match parent[cursor] {
                        Some(p) => {
                            path.push(p);
                            cursor = p;
                        }
                        None => break,
                    }
                }
                path.reverse();
                return Some(path);
            }
            if parent[next].is_none() {
                parent[next] = Some(node);
                queue.push_back(next);
            }
        }
    }
    None
}
