//! Partial policy documents as authored by each tier.
//!
//! Every field is optional: a tier states only what it adds. Unknown keys
//! are rejected so a misspelled field cannot silently fall away.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use floe_core::errors::PolicyError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::{EnforcementLevel, NamingConvention, OverrideAction, Tier};
use crate::enforcement::Severity;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforcement_level: Option<EnforcementLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub naming: Option<NamingDoc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage: Option<CoverageDoc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<DocumentationDoc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_rules: Vec<CustomRuleSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub policy_overrides: Vec<OverrideSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamingDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convention: Option<NamingConvention>,
    /// Regexes every model name must match.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<String>,
    /// Regexes applied only to models in the keyed layer.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub layer_patterns: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoverageDoc {
    /// Global minimum column test coverage, in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_coverage: Option<f64>,
    /// Per-layer minimum, in percent.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub layers: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentationDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_model_description: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_column_descriptions: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_description_length: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomRuleSpec {
    #[serde(rename = "type")]
    pub rule_type: String,
    /// Glob over model names. Defaults to every model.
    #[serde(default = "default_target_pattern")]
    pub target_pattern: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

fn default_target_pattern() -> String {
    "*".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverrideSpec {
    /// Glob over model names or ids.
    pub pattern: String,
    pub action: OverrideAction,
    /// Last day before the override lapses (exclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<NaiveDate>,
    #[serde(default)]
    pub permanent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Restrict the override to these rule ids. Empty means every rule.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<String>,
}

impl PolicyDocument {
    pub fn from_yaml_str(text: &str, tier: Tier) -> Result<Self, PolicyError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| PolicyError::MalformedPolicy {
            tier: tier.to_string(),
            message: e.to_string(),
        })
    }

    pub fn from_toml_str(text: &str, tier: Tier) -> Result<Self, PolicyError> {
        toml::from_str(text).map_err(|e| PolicyError::MalformedPolicy {
            tier: tier.to_string(),
            message: e.to_string(),
        })
    }

    /// Load by extension: `.toml` is TOML, anything else is YAML.
    pub fn from_path(path: &Path, tier: Tier) -> Result<Self, PolicyError> {
        let text = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));
        let doc = if is_toml {
            Self::from_toml_str(&text, tier)?
        } else {
            Self::from_yaml_str(&text, tier)?
        };
        tracing::debug!(tier = %tier, path = %path.display(), "policy document loaded");
        Ok(doc)
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_is_empty_document() {
        let doc = PolicyDocument::from_yaml_str("  \n", Tier::Product).unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = PolicyDocument::from_yaml_str("enforcment_level: strict\n", Tier::Platform)
            .unwrap_err();
        assert!(matches!(err, PolicyError::MalformedPolicy { ref tier, .. } if tier == "platform"));
    }

    #[test]
    fn custom_rule_target_defaults_to_everything() {
        let doc = PolicyDocument::from_yaml_str(
            "custom_rules:\n  - type: require_meta_field\n    parameters:\n      fields: [owner]\n",
            Tier::Foundation,
        )
        .unwrap();
        assert_eq!(doc.custom_rules[0].target_pattern, "*");
    }

    #[test]
    fn toml_document_parses() {
        let doc = PolicyDocument::from_toml_str(
            r#"
enforcement_level = "strict"

[coverage]
min_coverage = 80.0

[[policy_overrides]]
pattern = "legacy_*"
action = "downgrade"
expires = "2030-01-01"
"#,
            Tier::Platform,
        )
        .unwrap();
        assert_eq!(doc.enforcement_level, Some(EnforcementLevel::Strict));
        assert_eq!(doc.coverage.unwrap().min_coverage, Some(80.0));
        assert_eq!(
            doc.policy_overrides[0].expires,
            NaiveDate::from_ymd_opt(2030, 1, 1)
        );
    }
}
