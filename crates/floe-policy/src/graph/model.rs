//! In-memory model graph built once per enforcement run.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use floe_core::errors::GraphError;
use floe_core::types::collections::FxHashMap;
use moka::sync::Cache;
use petgraph::graph::{DiGraph, NodeIndex};

use super::impact::transitive_dependents;
use super::types::{ModelId, ModelNode, SourceRef};

/// Immutable model graph.
///
/// Nodes live in a `petgraph` arena; indices are assigned in sorted model-id
/// order so every traversal is deterministic. An edge `a → b` means model `a`
/// refs model `b`. Dangling refs stay on the node and get no edge.
pub struct GraphModel {
    nodes: BTreeMap<ModelId, ModelNode>,
    graph: DiGraph<ModelId, ()>,
    index: FxHashMap<ModelId, NodeIndex>,
    source_catalog: BTreeSet<SourceRef>,
    impact_cache: Cache<ModelId, Arc<[ModelId]>>,
}

impl GraphModel {
    pub fn builder() -> GraphModelBuilder {
        GraphModelBuilder::default()
    }

    /// Build a graph from nodes and the external source catalog.
    pub fn new(
        nodes: impl IntoIterator<Item = ModelNode>,
        source_catalog: impl IntoIterator<Item = SourceRef>,
    ) -> Result<Self, GraphError> {
        let mut by_id = BTreeMap::new();
        for node in nodes {
            if by_id.contains_key(&node.id) {
                return Err(GraphError::DuplicateModel { id: node.id });
            }
            by_id.insert(node.id.clone(), node);
        }

        let mut graph = DiGraph::with_capacity(by_id.len(), by_id.len() * 2);
        let mut index = FxHashMap::default();
        for id in by_id.keys() {
            let idx = graph.add_node(id.clone());
            index.insert(id.clone(), idx);
        }
        for node in by_id.values() {
            let from = index[&node.id];
            for target in &node.refs {
                if let Some(&to) = index.get(target) {
                    graph.add_edge(from, to, ());
                }
            }
        }

        let capacity = by_id.len().max(1) as u64;
        tracing::debug!(
            models = by_id.len(),
            edges = graph.edge_count(),
            "model graph built"
        );

        Ok(Self {
            nodes: by_id,
            graph,
            index,
            source_catalog: source_catalog.into_iter().collect(),
            impact_cache: Cache::new(capacity),
        })
    }

    /// All nodes in model-id order.
    pub fn nodes(&self) -> impl Iterator<Item = &ModelNode> {
        self.nodes.values()
    }

    pub fn get(&self, id: &str) -> Option<&ModelNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn source_catalog(&self) -> &BTreeSet<SourceRef> {
        &self.source_catalog
    }

    /// Refs on `node` that do not resolve to a model in this graph.
    pub fn dangling_refs<'a>(&'a self, node: &'a ModelNode) -> impl Iterator<Item = &'a ModelId> {
        node.refs.iter().filter(move |r| !self.nodes.contains_key(r.as_str()))
    }

    /// Sources on `node` missing from the source catalog.
    pub fn undefined_sources<'a>(
        &'a self,
        node: &'a ModelNode,
    ) -> impl Iterator<Item = &'a SourceRef> {
        node.sources
            .iter()
            .filter(move |s| !self.source_catalog.contains(s.as_str()))
    }

    /// Every model that transitively depends on `id`, sorted.
    ///
    /// Computed on first request and memoized for the lifetime of this graph.
    /// Unknown ids have no dependents.
    pub fn downstream_impact(&self, id: &str) -> Arc<[ModelId]> {
        let Some(&start) = self.index.get(id) else {
            return Arc::from(Vec::new());
        };
        self.impact_cache
            .get_with(id.to_string(), || transitive_dependents(self, start).into())
    }

    pub(crate) fn arena(&self) -> &DiGraph<ModelId, ()> {
        &self.graph
    }
}

impl fmt::Debug for GraphModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphModel")
            .field("nodes", &self.nodes.len())
            .field("edges", &self.graph.edge_count())
            .field("source_catalog", &self.source_catalog)
            .field("impact_cache_entries", &self.impact_cache.entry_count())
            .finish()
    }
}

/// Incremental builder for `GraphModel`.
#[derive(Debug, Default)]
pub struct GraphModelBuilder {
    nodes: Vec<ModelNode>,
    sources: Vec<SourceRef>,
}

impl GraphModelBuilder {
    pub fn node(mut self, node: ModelNode) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn nodes(mut self, nodes: impl IntoIterator<Item = ModelNode>) -> Self {
        self.nodes.extend(nodes);
        self
    }

    pub fn source(mut self, source: impl Into<SourceRef>) -> Self {
        self.sources.push(source.into());
        self
    }

    pub fn build(self) -> Result<GraphModel, GraphError> {
        GraphModel::new(self.nodes, self.sources)
    }
}
