//! Graph document loader for dbt-style compiled manifests.
//!
//! The manifest is produced by the external compiler; this module only
//! reads it. Schema versions outside the supported window are fatal.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use floe_core::constants::{MAX_MANIFEST_VERSION, MIN_MANIFEST_VERSION};
use floe_core::errors::GraphError;
use serde::Deserialize;
use serde_json::Value;

use super::model::GraphModel;
use super::types::{ColumnSpec, ModelNode, TestRef};
use crate::inheritance::resolved::MEDALLION_LAYERS;

/// Parsed manifest document.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphDocument {
    pub metadata: ManifestMetadata,
    #[serde(default)]
    pub nodes: BTreeMap<String, ManifestNode>,
    #[serde(default)]
    pub sources: BTreeMap<String, ManifestSource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestMetadata {
    pub dbt_schema_version: String,
    #[serde(default)]
    pub project_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestNode {
    pub resource_type: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub meta: BTreeMap<String, Value>,
    #[serde(default)]
    pub config: ManifestNodeConfig,
    #[serde(default)]
    pub columns: BTreeMap<String, ManifestColumn>,
    #[serde(default)]
    pub depends_on: ManifestDependsOn,
    #[serde(default)]
    pub test_metadata: Option<ManifestTestMetadata>,
    #[serde(default)]
    pub column_name: Option<String>,
    #[serde(default)]
    pub attached_node: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManifestNodeConfig {
    #[serde(default)]
    pub meta: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestColumn {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManifestDependsOn {
    #[serde(default)]
    pub nodes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestTestMetadata {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestSource {
    pub name: String,
    #[serde(default)]
    pub source_name: Option<String>,
}

impl GraphDocument {
    /// Parse a manifest from JSON text. `source_name` labels errors.
    pub fn from_json_str(json: &str, source_name: &str) -> Result<Self, GraphError> {
        let raw: Value = serde_json::from_str(json).map_err(|e| GraphError::MalformedGraph {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })?;

        // Version gate first: an unsupported layout should be reported as
        // such, not as whatever field happened to fail to deserialize.
        let version = raw
            .pointer("/metadata/dbt_schema_version")
            .and_then(Value::as_str)
            .ok_or_else(|| GraphError::MalformedGraph {
                source_name: source_name.to_string(),
                message: "missing metadata.dbt_schema_version".to_string(),
            })?;
        check_schema_version(version)?;

        serde_json::from_value(raw).map_err(|e| GraphError::MalformedGraph {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, GraphError> {
        let text = std::fs::read_to_string(path).map_err(|source| GraphError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text, &path.display().to_string())
    }

    /// Manifest schema version number (e.g. 12).
    pub fn schema_version(&self) -> Option<u32> {
        parse_schema_version(&self.metadata.dbt_schema_version)
    }

    /// Convert into the engine's graph model. Test nodes are attached to
    /// the model they exercise; other resource types are ignored.
    pub fn into_graph_model(self) -> Result<GraphModel, GraphError> {
        let mut models: BTreeMap<String, ModelNode> = BTreeMap::new();

        for (unique_id, node) in &self.nodes {
            if node.resource_type != "model" {
                continue;
            }
            models.insert(unique_id.clone(), convert_model(unique_id, node));
        }

        for (unique_id, node) in &self.nodes {
            if node.resource_type != "test" {
                continue;
            }
            let attached = node.attached_node.clone().or_else(|| {
                node.depends_on
                    .nodes
                    .iter()
                    .find(|d| d.starts_with("model."))
                    .cloned()
            });
            let Some(model) = attached.as_ref().and_then(|id| models.get_mut(id)) else {
                tracing::debug!(test = %unique_id, "test not attached to a known model");
                continue;
            };
            let test_type = node
                .test_metadata
                .as_ref()
                .map(|m| m.name.clone())
                .unwrap_or_else(|| "singular".to_string());
            model.declared_tests.push(TestRef {
                id: unique_id.clone(),
                test_type,
                column: node.column_name.clone(),
            });
        }

        let source_catalog: BTreeSet<String> = self.sources.keys().cloned().collect();
        tracing::info!(
            models = models.len(),
            sources = source_catalog.len(),
            version = %self.metadata.dbt_schema_version,
            "graph document loaded"
        );
        GraphModel::new(models.into_values(), source_catalog)
    }
}

/// Load and convert a manifest file in one step.
pub fn load_graph(path: &Path) -> Result<GraphModel, GraphError> {
    GraphDocument::from_path(path)?.into_graph_model()
}

fn convert_model(unique_id: &str, node: &ManifestNode) -> ModelNode {
    let meta: BTreeMap<String, String> = node
        .config
        .meta
        .iter()
        .chain(node.meta.iter())
        .map(|(k, v)| (k.clone(), meta_value_to_string(v)))
        .collect();

    let layer = meta.get("layer").cloned().or_else(|| {
        node.tags
            .iter()
            .find(|t| MEDALLION_LAYERS.contains(&t.as_str()))
            .cloned()
    });

    let mut refs = BTreeSet::new();
    let mut sources = BTreeSet::new();
    for dep in &node.depends_on.nodes {
        if dep.starts_with("model.") {
            refs.insert(dep.clone());
        } else if dep.starts_with("source.") {
            sources.insert(dep.clone());
        }
    }

    ModelNode {
        id: unique_id.to_string(),
        name: node.name.clone(),
        layer,
        tags: node.tags.iter().cloned().collect(),
        meta,
        columns: node
            .columns
            .values()
            .map(|c| ColumnSpec {
                name: c.name.clone(),
                description: c.description.clone(),
            })
            .collect(),
        declared_tests: Vec::new(),
        refs,
        sources,
        description: node.description.clone(),
    }
}

fn meta_value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Accepts `https://schemas.getdbt.com/dbt/manifest/v12.json` or bare `v12`.
fn parse_schema_version(raw: &str) -> Option<u32> {
    let last = raw.rsplit('/').next()?;
    let last = last.strip_suffix(".json").unwrap_or(last);
    last.strip_prefix('v')?.parse().ok()
}

fn check_schema_version(raw: &str) -> Result<u32, GraphError> {
    match parse_schema_version(raw) {
        Some(v) if (MIN_MANIFEST_VERSION..=MAX_MANIFEST_VERSION).contains(&v) => Ok(v),
        _ => Err(GraphError::UnsupportedGraphVersion {
            found: raw.to_string(),
            min: MIN_MANIFEST_VERSION,
            max: MAX_MANIFEST_VERSION,
        }),
    }
}
