//! Strengthening-only fold over Foundation → Platform → Product.

use std::fmt::Display;
use std::time::Instant;

use floe_core::constants::MAX_TIERS;
use floe_core::errors::PolicyError;

use super::custom_rules::CustomRule;
use super::document::{CoverageDoc, DocumentationDoc, NamingDoc, PolicyDocument};
use super::overrides::PolicyOverride;
use super::resolved::{CompiledPattern, ResolvedPolicy};
use super::types::Tier;

/// Merges ordered tier documents into one `ResolvedPolicy`.
///
/// Scalars may only stay equal or grow stricter. Lists only grow. Overrides
/// are exempt from the strictness check but must be time-boxed or marked
/// permanent. Any breach aborts resolution.
#[derive(Debug, Default, Clone, Copy)]
pub struct InheritanceResolver;

impl InheritanceResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve explicitly labelled tiers. Missing tiers contribute nothing;
    /// present tiers must appear in Foundation → Platform → Product order.
    pub fn resolve(&self, tiers: &[(Tier, PolicyDocument)]) -> Result<ResolvedPolicy, PolicyError> {
        let start = Instant::now();
        check_tier_order(tiers.iter().map(|(t, _)| *t), tiers.len())?;

        let mut acc = ResolvedPolicy::default();
        for (tier, doc) in tiers {
            apply_tier(&mut acc, *tier, doc)?;
            acc.tiers.push(*tier);
        }

        tracing::info!(
            tiers = acc.tiers.len(),
            level = %acc.enforcement_level(),
            custom_rules = acc.custom_rules.len(),
            overrides = acc.overrides.len(),
            warnings = acc.warnings.len(),
            resolve_time_ms = start.elapsed().as_millis() as u64,
            "policy resolved"
        );
        Ok(acc)
    }

    /// Resolve positional documents: the first is Foundation, the second
    /// Platform, the third Product.
    pub fn resolve_ordered(&self, docs: &[PolicyDocument]) -> Result<ResolvedPolicy, PolicyError> {
        if docs.len() > MAX_TIERS {
            return Err(PolicyError::InvalidTierOrder {
                message: format!("at most {MAX_TIERS} tiers are supported, got {}", docs.len()),
            });
        }
        let labelled: Vec<(Tier, PolicyDocument)> = Tier::ALL
            .iter()
            .copied()
            .zip(docs.iter().cloned())
            .collect();
        self.resolve(&labelled)
    }
}

fn check_tier_order(tiers: impl Iterator<Item = Tier>, count: usize) -> Result<(), PolicyError> {
    if count > MAX_TIERS {
        return Err(PolicyError::InvalidTierOrder {
            message: format!("at most {MAX_TIERS} tiers are supported, got {count}"),
        });
    }
    let mut previous: Option<Tier> = None;
    for tier in tiers {
        if let Some(prev) = previous {
            if tier <= prev {
                return Err(PolicyError::InvalidTierOrder {
                    message: format!(
                        "{tier} tier cannot follow {prev} tier; expected foundation, platform, product"
                    ),
                });
            }
        }
        previous = Some(tier);
    }
    Ok(())
}

fn weakened(tier: Tier, field: &str, old: impl Display, new: impl Display) -> PolicyError {
    let (old, new) = (old.to_string(), new.to_string());
    tracing::error!(tier = %tier, field, old = %old, new = %new, "policy weakened");
    PolicyError::PolicyWeakened {
        tier: tier.to_string(),
        field: field.to_string(),
        old,
        new,
    }
}

fn apply_tier(acc: &mut ResolvedPolicy, tier: Tier, doc: &PolicyDocument) -> Result<(), PolicyError> {
    tracing::debug!(tier = %tier, empty = doc.is_empty(), "folding policy tier");

    if let Some(level) = doc.enforcement_level {
        if let Some(current) = acc.enforcement_level {
            if level < current {
                return Err(weakened(tier, "enforcement_level", current, level));
            }
        }
        acc.enforcement_level = Some(level);
    }

    if let Some(naming) = &doc.naming {
        merge_naming(acc, tier, naming)?;
    }
    if let Some(coverage) = &doc.coverage {
        merge_coverage(acc, tier, coverage)?;
    }
    if let Some(documentation) = &doc.documentation {
        merge_documentation(acc, tier, documentation)?;
    }

    for (index, spec) in doc.custom_rules.iter().enumerate() {
        let rule = CustomRule::compile(spec, tier, index)?;
        if !acc.custom_rules.iter().any(|r| r.spec() == spec) {
            acc.custom_rules.push(rule);
        }
    }

    merge_overrides(acc, tier, doc)
}

fn merge_naming(acc: &mut ResolvedPolicy, tier: Tier, naming: &NamingDoc) -> Result<(), PolicyError> {
    let tier_name = tier.to_string();

    if let Some(convention) = naming.convention {
        match acc.naming.convention {
            Some(current) if current != convention => {
                return Err(weakened(tier, "naming.convention", current, convention));
            }
            Some(_) => {}
            None => acc.naming.set_convention(convention)?,
        }
    }

    for source in &naming.patterns {
        let compiled = CompiledPattern::compile(source, &tier_name, "naming.patterns")?;
        if !acc.naming.patterns.iter().any(|p| p.as_str() == source) {
            acc.naming.patterns.push(compiled);
        }
    }

    for (layer, sources) in &naming.layer_patterns {
        let field = format!("naming.layer_patterns.{layer}");
        let entry = acc.naming.layer_patterns.entry(layer.clone()).or_default();
        for source in sources {
            let compiled = CompiledPattern::compile(source, &tier_name, &field)?;
            if !entry.iter().any(|p| p.as_str() == source) {
                entry.push(compiled);
            }
        }
    }
    Ok(())
}

fn check_percent(tier: Tier, field: &str, value: f64) -> Result<(), PolicyError> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(PolicyError::InvalidValue {
            tier: tier.to_string(),
            field: field.to_string(),
            message: format!("coverage must be between 0 and 100, got {value}"),
        })
    }
}

/// Layer values are compared against what the earlier tiers left for that
/// layer, never against the global minimum of the same document.
fn merge_coverage(acc: &mut ResolvedPolicy, tier: Tier, coverage: &CoverageDoc) -> Result<(), PolicyError> {
    let previous = acc.coverage.clone();

    if let Some(min) = coverage.min_coverage {
        check_percent(tier, "coverage.min_coverage", min)?;
        if let Some(current) = acc.coverage.min_coverage {
            if min < current {
                return Err(weakened(tier, "coverage.min_coverage", current, min));
            }
        }
        acc.coverage.min_coverage = Some(min);
    }

    for (layer, &value) in &coverage.layers {
        let field = format!("coverage.layers.{layer}");
        check_percent(tier, &field, value)?;
        if let Some(current) = previous.threshold_for(Some(layer)) {
            if value < current {
                return Err(weakened(tier, &field, current, value));
            }
        }
        acc.coverage.layers.insert(layer.clone(), value);
    }
    Ok(())
}

fn merge_documentation(
    acc: &mut ResolvedPolicy,
    tier: Tier,
    documentation: &DocumentationDoc,
) -> Result<(), PolicyError> {
    let current = &mut acc.documentation;

    if let Some(required) = documentation.require_model_description {
        if current.require_model_description && !required {
            return Err(weakened(tier, "documentation.require_model_description", true, false));
        }
        current.require_model_description = required;
    }
    if let Some(required) = documentation.require_column_descriptions {
        if current.require_column_descriptions && !required {
            return Err(weakened(tier, "documentation.require_column_descriptions", true, false));
        }
        current.require_column_descriptions = required;
    }
    if let Some(length) = documentation.min_description_length {
        if length < current.min_description_length {
            return Err(weakened(
                tier,
                "documentation.min_description_length",
                current.min_description_length,
                length,
            ));
        }
        current.min_description_length = length;
    }
    Ok(())
}

fn merge_overrides(acc: &mut ResolvedPolicy, tier: Tier, doc: &PolicyDocument) -> Result<(), PolicyError> {
    for (index, spec) in doc.policy_overrides.iter().enumerate() {
        let compiled = PolicyOverride::compile(spec, tier, index)?;

        if compiled.is_unbounded() {
            if !tier.allows_undated_overrides() {
                return Err(PolicyError::InvalidOverride {
                    tier: tier.to_string(),
                    pattern: spec.pattern.clone(),
                    message: "override must declare an expires date or permanent: true".to_string(),
                });
            }
            let warning = format!(
                "{tier} override '{}' has no expires date and is not marked permanent",
                spec.pattern
            );
            tracing::warn!(tier = %tier, pattern = %spec.pattern, "undated override");
            acc.warnings.push(warning);
        }

        if !acc.overrides.iter().any(|o| o.spec() == spec) {
            acc.overrides.push(compiled);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inheritance::types::EnforcementLevel;

    fn level(l: EnforcementLevel) -> PolicyDocument {
        PolicyDocument {
            enforcement_level: Some(l),
            ..Default::default()
        }
    }

    #[test]
    fn tiers_out_of_order_are_rejected() {
        let err = InheritanceResolver::new()
            .resolve(&[
                (Tier::Platform, PolicyDocument::default()),
                (Tier::Foundation, PolicyDocument::default()),
            ])
            .unwrap_err();
        assert!(matches!(err, PolicyError::InvalidTierOrder { .. }));
    }

    #[test]
    fn more_than_three_positional_tiers_are_rejected() {
        let docs = vec![PolicyDocument::default(); 4];
        let err = InheritanceResolver::new().resolve_ordered(&docs).unwrap_err();
        assert!(matches!(err, PolicyError::InvalidTierOrder { .. }));
    }

    #[test]
    fn missing_middle_tier_is_allowed() {
        let resolved = InheritanceResolver::new()
            .resolve(&[
                (Tier::Foundation, level(EnforcementLevel::Warn)),
                (Tier::Product, level(EnforcementLevel::Strict)),
            ])
            .unwrap();
        assert_eq!(resolved.enforcement_level(), EnforcementLevel::Strict);
        assert_eq!(resolved.tiers(), &[Tier::Foundation, Tier::Product]);
    }

    #[test]
    fn equal_value_is_not_a_weakening() {
        let resolved = InheritanceResolver::new()
            .resolve_ordered(&[level(EnforcementLevel::Strict), level(EnforcementLevel::Strict)])
            .unwrap();
        assert_eq!(resolved.enforcement_level(), EnforcementLevel::Strict);
    }
}
