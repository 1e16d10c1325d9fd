//! The frozen output of inheritance resolution.
//!
//! Fields are private; validators read through accessors. Every regex and
//! glob is compiled once during resolution and shared for the whole run.

use std::collections::BTreeMap;

use floe_core::errors::PolicyError;
use regex::Regex;

use super::custom_rules::CustomRule;
use super::overrides::PolicyOverride;
use super::types::{EnforcementLevel, NamingConvention, Tier};

pub(crate) const MEDALLION_LAYERS: [&str; 3] = ["bronze", "silver", "gold"];
const MEDALLION_ANY: &str = "^(bronze|silver|gold)_";
const KIMBALL_ANY: &str = "^(dim|fact)_";

/// Label used when the caller (not a policy tier) requests a level.
pub const INVOCATION_TIER: &str = "invocation";

/// A regex with the source text it was compiled from.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    regex: Regex,
}

impl CompiledPattern {
    pub(crate) fn compile(source: &str, tier: &str, field: &str) -> Result<Self, PolicyError> {
        let regex = Regex::new(source).map_err(|e| PolicyError::InvalidPattern {
            tier: tier.to_string(),
            field: field.to_string(),
            pattern: source.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

#[derive(Debug, Clone, Default)]
pub struct NamingPolicy {
    pub(crate) convention: Option<NamingConvention>,
    pub(crate) convention_default: Option<CompiledPattern>,
    pub(crate) convention_layers: BTreeMap<String, CompiledPattern>,
    pub(crate) patterns: Vec<CompiledPattern>,
    pub(crate) layer_patterns: BTreeMap<String, Vec<CompiledPattern>>,
}

impl NamingPolicy {
    pub fn convention(&self) -> Option<NamingConvention> {
        self.convention
    }

    pub fn patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    pub fn layer_patterns(&self, layer: &str) -> &[CompiledPattern] {
        self.layer_patterns
            .get(layer)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_configured(&self) -> bool {
        self.convention_default.is_some()
            || !self.patterns.is_empty()
            || self.layer_patterns.values().any(|v| !v.is_empty())
    }

    /// Patterns a model in `layer` must match: layer-specific regexes,
    /// global regexes, then the convention pattern for the layer.
    pub fn applicable_patterns(&self, layer: Option<&str>) -> Vec<&CompiledPattern> {
        let mut out: Vec<&CompiledPattern> = Vec::new();
        if let Some(layer) = layer {
            out.extend(self.layer_patterns(layer));
        }
        out.extend(self.patterns.iter());
        let convention = layer
            .and_then(|l| self.convention_layers.get(l))
            .or(self.convention_default.as_ref());
        if let Some(p) = convention {
            out.push(p);
        }
        out
    }

    /// Installs the built-in patterns for `convention`.
    pub(crate) fn set_convention(&mut self, convention: NamingConvention) -> Result<(), PolicyError> {
        self.convention = Some(convention);
        let tier = "builtin";
        match convention {
            NamingConvention::Medallion => {
                self.convention_default =
                    Some(CompiledPattern::compile(MEDALLION_ANY, tier, "naming.convention")?);
                for layer in MEDALLION_LAYERS {
                    let source = format!("^{layer}_");
                    self.convention_layers.insert(
                        layer.to_string(),
                        CompiledPattern::compile(&source, tier, "naming.convention")?,
                    );
                }
            }
            NamingConvention::Kimball => {
                self.convention_default =
                    Some(CompiledPattern::compile(KIMBALL_ANY, tier, "naming.convention")?);
            }
            NamingConvention::Custom => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct CoveragePolicy {
    pub(crate) min_coverage: Option<f64>,
    pub(crate) layers: BTreeMap<String, f64>,
}

impl CoveragePolicy {
    pub fn min_coverage(&self) -> Option<f64> {
        self.min_coverage
    }

    pub fn layer_threshold(&self, layer: &str) -> Option<f64> {
        self.layers.get(layer).copied()
    }

    /// Effective threshold for `layer`: the layer value when one is set,
    /// else the global minimum. `None` means coverage is not enforced.
    pub fn threshold_for(&self, layer: Option<&str>) -> Option<f64> {
        layer
            .and_then(|l| self.layer_threshold(l))
            .or(self.min_coverage)
    }

    pub fn is_configured(&self) -> bool {
        self.min_coverage.is_some() || !self.layers.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentationPolicy {
    pub(crate) require_model_description: bool,
    pub(crate) require_column_descriptions: bool,
    pub(crate) min_description_length: u32,
}

impl DocumentationPolicy {
    pub fn require_model_description(&self) -> bool {
        self.require_model_description
    }

    pub fn require_column_descriptions(&self) -> bool {
        self.require_column_descriptions
    }

    pub fn min_description_length(&self) -> u32 {
        self.min_description_length
    }
}

/// Merged policy for one enforcement run.
#[derive(Debug, Clone, Default)]
pub struct ResolvedPolicy {
    pub(crate) enforcement_level: Option<EnforcementLevel>,
    pub(crate) naming: NamingPolicy,
    pub(crate) coverage: CoveragePolicy,
    pub(crate) documentation: DocumentationPolicy,
    pub(crate) custom_rules: Vec<CustomRule>,
    pub(crate) overrides: Vec<PolicyOverride>,
    pub(crate) warnings: Vec<String>,
    pub(crate) tiers: Vec<Tier>,
}

impl ResolvedPolicy {
    /// Level in force; `warn` when no tier set one.
    pub fn enforcement_level(&self) -> EnforcementLevel {
        self.enforcement_level.unwrap_or_default()
    }

    /// Level as explicitly set by a tier, if any.
    pub fn declared_enforcement_level(&self) -> Option<EnforcementLevel> {
        self.enforcement_level
    }

    pub fn naming(&self) -> &NamingPolicy {
        &self.naming
    }

    pub fn coverage(&self) -> &CoveragePolicy {
        &self.coverage
    }

    pub fn documentation(&self) -> &DocumentationPolicy {
        &self.documentation
    }

    pub fn custom_rules(&self) -> &[CustomRule] {
        &self.custom_rules
    }

    pub fn overrides(&self) -> &[PolicyOverride] {
        &self.overrides
    }

    /// Non-fatal resolution findings (e.g. undated product overrides).
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Tiers that contributed, in resolution order.
    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// Apply a caller-requested level. It may raise the level but never
    /// lower one a tier declared.
    pub fn with_requested_level(mut self, level: EnforcementLevel) -> Result<Self, PolicyError> {
        if let Some(current) = self.enforcement_level {
            if level < current {
                tracing::error!(
                    tier = INVOCATION_TIER,
                    old = %current,
                    new = %level,
                    "requested enforcement level weakens policy"
                );
                return Err(PolicyError::PolicyWeakened {
                    tier: INVOCATION_TIER.to_string(),
                    field: "enforcement_level".to_string(),
                    old: current.to_string(),
                    new: level.to_string(),
                });
            }
        }
        self.enforcement_level = Some(level);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn medallion_patterns_follow_layer() {
        let mut naming = NamingPolicy::default();
        naming.set_convention(NamingConvention::Medallion).unwrap();

        let bronze: Vec<&str> = naming
            .applicable_patterns(Some("bronze"))
            .iter()
            .map(|p| p.as_str())
            .collect();
        assert_eq!(bronze, vec!["^bronze_"]);

        let unknown: Vec<&str> = naming
            .applicable_patterns(Some("staging"))
            .iter()
            .map(|p| p.as_str())
            .collect();
        assert_eq!(unknown, vec![MEDALLION_ANY]);
        assert_eq!(naming.applicable_patterns(None).len(), 1);
    }

    #[test]
    fn custom_convention_has_no_builtin_pattern() {
        let mut naming = NamingPolicy::default();
        naming.set_convention(NamingConvention::Custom).unwrap();
        assert!(naming.applicable_patterns(Some("gold")).is_empty());
        assert!(!naming.is_configured());
    }

    #[test]
    fn layer_threshold_replaces_global() {
        let coverage = CoveragePolicy {
            min_coverage: Some(60.0),
            layers: BTreeMap::from([("gold".to_string(), 90.0), ("bronze".to_string(), 40.0)]),
        };
        assert_eq!(coverage.threshold_for(Some("gold")), Some(90.0));
        assert_eq!(coverage.threshold_for(Some("bronze")), Some(40.0));
        assert_eq!(coverage.threshold_for(Some("silver")), Some(60.0));
        assert_eq!(coverage.threshold_for(None), Some(60.0));
        assert_eq!(CoveragePolicy::default().threshold_for(Some("gold")), None);
    }

    #[test]
    fn requested_level_cannot_weaken() {
        let policy = ResolvedPolicy {
            enforcement_level: Some(EnforcementLevel::Strict),
            ..Default::default()
        };
        let err = policy.clone().with_requested_level(EnforcementLevel::Warn).unwrap_err();
        assert!(matches!(err, PolicyError::PolicyWeakened { ref tier, .. } if tier == "invocation"));

        let raised = ResolvedPolicy::default()
            .with_requested_level(EnforcementLevel::Strict)
            .unwrap();
        assert_eq!(raised.enforcement_level(), EnforcementLevel::Strict);
    }
}
