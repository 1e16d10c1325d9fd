//! Graph node types.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Unique model identifier (e.g. `model.shop.customers`).
pub type ModelId = String;

/// Source identifier (e.g. `source.shop.raw.orders`).
pub type SourceRef = String;

/// A column declared on a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A test declared against a model, optionally scoped to one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRef {
    pub id: String,
    /// Generic test name such as `not_null`, `unique`, `relationships`.
    pub test_type: String,
    pub column: Option<String>,
}

/// A unit of the dependency graph: one compiled model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelNode {
    pub id: ModelId,
    pub name: String,
    pub layer: Option<String>,
    pub tags: BTreeSet<String>,
    pub meta: BTreeMap<String, String>,
    pub columns: Vec<ColumnSpec>,
    pub declared_tests: Vec<TestRef>,
    /// Upstream models this node selects from. May name models that do not
    /// exist; those are reported, never dropped.
    pub refs: BTreeSet<ModelId>,
    pub sources: BTreeSet<SourceRef>,
    pub description: String,
}

impl ModelNode {
    pub fn new(id: impl Into<ModelId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            layer: None,
            tags: BTreeSet::new(),
            meta: BTreeMap::new(),
            columns: Vec::new(),
            declared_tests: Vec::new(),
            refs: BTreeSet::new(),
            sources: BTreeSet::new(),
            description: String::new(),
        }
    }

    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = Some(layer.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    pub fn with_column(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.columns.push(ColumnSpec {
            name: name.into(),
            description: description.into(),
        });
        self
    }

    /// Declare a test. `column: None` is a model-level test.
    pub fn with_test(mut self, test_type: impl Into<String>, column: Option<&str>) -> Self {
        let test_type = test_type.into();
        let id = match column {
            Some(c) => format!("test.{}.{}_{}", self.name, test_type, c),
            None => format!("test.{}.{}", self.name, test_type),
        };
        self.declared_tests.push(TestRef {
            id,
            test_type,
            column: column.map(str::to_string),
        });
        self
    }

    pub fn with_ref(mut self, model_id: impl Into<ModelId>) -> Self {
        self.refs.insert(model_id.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<SourceRef>) -> Self {
        self.sources.insert(source.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether at least one declared test targets `column`.
    pub fn column_has_test(&self, column: &str) -> bool {
        self.declared_tests
            .iter()
            .any(|t| t.column.as_deref() == Some(column))
    }

    /// Whether any declared test is of one of the given types.
    pub fn has_test_of_type(&self, test_types: &[String]) -> bool {
        self.declared_tests
            .iter()
            .any(|t| test_types.iter().any(|ty| ty == &t.test_type))
    }
}
