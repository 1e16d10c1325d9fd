//! Inheritance resolution tests: strengthening, list union, overrides,
//! custom rule validation, document loading.
//! FLOE-INH-01 through FLOE-INH-15

use std::path::PathBuf;

use floe_core::errors::{FloeErrorCode, PolicyError};
use floe_policy::inheritance::{
    EnforcementLevel, InheritanceResolver, NamingConvention, PolicyDocument, Tier,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn yaml(text: &str, tier: Tier) -> PolicyDocument {
    PolicyDocument::from_yaml_str(text, tier).expect("valid policy yaml")
}

fn resolve(docs: &[(Tier, &str)]) -> Result<floe_policy::ResolvedPolicy, PolicyError> {
    let tiers: Vec<(Tier, PolicyDocument)> = docs.iter().map(|(t, text)| (*t, yaml(text, *t))).collect();
    InheritanceResolver::new().resolve(&tiers)
}

/// FLOE-INH-01: The three fixture tiers resolve into one stricter policy.
#[test]
fn test_fixture_chain_resolves() {
    let tiers: Vec<(Tier, PolicyDocument)> = [
        (Tier::Foundation, "foundation.yaml"),
        (Tier::Platform, "platform.yaml"),
        (Tier::Product, "product.yaml"),
    ]
    .into_iter()
    .map(|(tier, file)| (tier, PolicyDocument::from_path(&fixture(file), tier).unwrap()))
    .collect();

    let policy = InheritanceResolver::new().resolve(&tiers).unwrap();
    assert_eq!(policy.enforcement_level(), EnforcementLevel::Strict);
    assert_eq!(policy.naming().convention(), Some(NamingConvention::Medallion));
    assert_eq!(policy.naming().patterns().len(), 1);
    assert_eq!(policy.coverage().min_coverage(), Some(60.0));
    assert_eq!(policy.coverage().threshold_for(Some("gold")), Some(90.0));
    assert!(policy.documentation().require_model_description());
    assert_eq!(policy.documentation().min_description_length(), 10);
    assert_eq!(policy.custom_rules().len(), 2);
    assert_eq!(policy.overrides().len(), 2);
    assert_eq!(policy.tiers(), &[Tier::Foundation, Tier::Platform, Tier::Product]);
    // The product override has no expiry: kept, but flagged.
    assert_eq!(policy.warnings().len(), 1);
    assert!(policy.warnings()[0].contains("customers"));
}

/// FLOE-INH-02: Lowering the enforcement level is fatal and names the tier.
#[test]
fn test_level_weakening_is_fatal() {
    let err = resolve(&[
        (Tier::Foundation, "enforcement_level: strict"),
        (Tier::Product, "enforcement_level: warn"),
    ])
    .unwrap_err();
    match &err {
        PolicyError::PolicyWeakened { tier, field, old, new } => {
            assert_eq!(tier, "product");
            assert_eq!(field, "enforcement_level");
            assert_eq!(old, "strict");
            assert_eq!(new, "warn");
        }
        other => panic!("expected PolicyWeakened, got {other}"),
    }
    assert_eq!(err.error_code(), "POLICY_WEAKENED");
    assert!(err.diagnostic().starts_with("error[POLICY_WEAKENED]: "));
}

/// FLOE-INH-03: Lowering global or per-layer coverage is fatal.
#[test]
fn test_coverage_weakening_is_fatal() {
    let err = resolve(&[
        (Tier::Foundation, "coverage:\n  min_coverage: 80"),
        (Tier::Platform, "coverage:\n  min_coverage: 70"),
    ])
    .unwrap_err();
    assert!(matches!(err, PolicyError::PolicyWeakened { ref field, .. } if field == "coverage.min_coverage"));

    let err = resolve(&[
        (Tier::Foundation, "coverage:\n  layers:\n    gold: 90"),
        (Tier::Product, "coverage:\n  layers:\n    gold: 85"),
    ])
    .unwrap_err();
    assert!(matches!(err, PolicyError::PolicyWeakened { ref field, .. } if field == "coverage.layers.gold"));

    // A layer value below the global minimum loosens that layer.
    let err = resolve(&[
        (Tier::Foundation, "coverage:\n  min_coverage: 80"),
        (Tier::Platform, "coverage:\n  layers:\n    bronze: 40"),
    ])
    .unwrap_err();
    assert!(matches!(err, PolicyError::PolicyWeakened { .. }));
}

/// FLOE-INH-04: Turning a documentation requirement off or shortening the
/// minimum length is fatal.
#[test]
fn test_documentation_weakening_is_fatal() {
    let err = resolve(&[
        (Tier::Foundation, "documentation:\n  require_model_description: true"),
        (Tier::Platform, "documentation:\n  require_model_description: false"),
    ])
    .unwrap_err();
    assert!(matches!(err, PolicyError::PolicyWeakened { ref old, ref new, .. } if old == "true" && new == "false"));

    let err = resolve(&[
        (Tier::Platform, "documentation:\n  min_description_length: 20"),
        (Tier::Product, "documentation:\n  min_description_length: 5"),
    ])
    .unwrap_err();
    assert!(matches!(err, PolicyError::PolicyWeakened { ref tier, .. } if tier == "product"));
}

/// FLOE-INH-05: The naming convention can be repeated but not swapped.
#[test]
fn test_convention_change_is_fatal() {
    assert!(resolve(&[
        (Tier::Foundation, "naming:\n  convention: medallion"),
        (Tier::Product, "naming:\n  convention: medallion"),
    ])
    .is_ok());

    let err = resolve(&[
        (Tier::Foundation, "naming:\n  convention: medallion"),
        (Tier::Product, "naming:\n  convention: kimball"),
    ])
    .unwrap_err();
    assert!(matches!(err, PolicyError::PolicyWeakened { ref field, .. } if field == "naming.convention"));
}

/// FLOE-INH-06: Lists union across tiers and duplicates collapse.
#[test]
fn test_lists_union_without_duplicates() {
    let policy = resolve(&[
        (Tier::Foundation, "naming:\n  patterns: ['^[a-z_]+$']\n  layer_patterns:\n    gold: ['_v[0-9]+$']"),
        (Tier::Platform, "naming:\n  patterns: ['^[a-z_]+$', '^.{3,64}$']"),
        (Tier::Product, "naming:\n  layer_patterns:\n    gold: ['_v[0-9]+$', '^gold_']"),
    ])
    .unwrap();
    let globals: Vec<&str> = policy.naming().patterns().iter().map(|p| p.as_str()).collect();
    assert_eq!(globals, vec!["^[a-z_]+$", "^.{3,64}$"]);
    let gold: Vec<&str> = policy.naming().layer_patterns("gold").iter().map(|p| p.as_str()).collect();
    assert_eq!(gold, vec!["_v[0-9]+$", "^gold_"]);
}

/// FLOE-INH-07: Missing tiers contribute nothing.
#[test]
fn test_missing_tiers_default_to_empty() {
    let policy = InheritanceResolver::new().resolve(&[]).unwrap();
    assert_eq!(policy.enforcement_level(), EnforcementLevel::Warn);
    assert_eq!(policy.declared_enforcement_level(), None);
    assert!(!policy.naming().is_configured());
    assert!(!policy.coverage().is_configured());
    assert!(policy.custom_rules().is_empty());
}

/// FLOE-INH-08: Undated upper-tier overrides are fatal.
#[test]
fn test_undated_platform_override_is_fatal() {
    let err = resolve(&[(
        Tier::Platform,
        "policy_overrides:\n  - pattern: 'stg_*'\n    action: exclude",
    )])
    .unwrap_err();
    assert!(matches!(err, PolicyError::InvalidOverride { ref tier, ref pattern, .. } if tier == "platform" && pattern == "stg_*"));
    assert_eq!(err.error_code(), "POLICY_CONFIG_ERROR");
}

/// FLOE-INH-09: Permanent or dated overrides are accepted in any tier, and
/// overrides are exempt from the strengthening check.
#[test]
fn test_bounded_overrides_accepted() {
    let policy = resolve(&[
        (Tier::Foundation, "enforcement_level: strict\npolicy_overrides:\n  - pattern: 'stg_*'\n    action: exclude\n    permanent: true"),
        (Tier::Platform, "policy_overrides:\n  - pattern: 'tmp_*'\n    action: downgrade\n    expires: 2027-06-30"),
    ])
    .unwrap();
    assert_eq!(policy.overrides().len(), 2);
    assert!(policy.warnings().is_empty());
    assert_eq!(policy.overrides()[0].tier(), Tier::Foundation);
}

/// FLOE-INH-10: Unknown custom rule types and malformed parameters are fatal.
#[test]
fn test_custom_rule_validation() {
    let err = resolve(&[(
        Tier::Platform,
        "custom_rules:\n  - type: require_owner\n    parameters: {}",
    )])
    .unwrap_err();
    assert!(matches!(err, PolicyError::UnknownCustomRuleType { .. }));
    assert_eq!(err.error_code(), "CUSTOM_RULE_ERROR");

    let err = resolve(&[(
        Tier::Product,
        "custom_rules:\n  - type: require_meta_field\n    parameters:\n      fields: owner",
    )])
    .unwrap_err();
    assert!(matches!(err, PolicyError::InvalidCustomRule { index: 0, .. }));
}

/// FLOE-INH-11: Invalid regexes fail at resolution, naming the field.
#[test]
fn test_invalid_regex_is_fatal() {
    let err = resolve(&[(Tier::Foundation, "naming:\n  patterns: ['^(unclosed']")]).unwrap_err();
    assert!(matches!(err, PolicyError::InvalidPattern { ref field, .. } if field == "naming.patterns"));
}

/// FLOE-INH-12: Coverage outside 0..=100 is rejected.
#[test]
fn test_coverage_out_of_range() {
    let err = resolve(&[(Tier::Foundation, "coverage:\n  min_coverage: 120")]).unwrap_err();
    assert!(matches!(err, PolicyError::InvalidValue { .. }));
}

/// FLOE-INH-13: TOML and YAML documents resolve to the same policy.
#[test]
fn test_toml_matches_yaml() {
    let from_toml = PolicyDocument::from_path(&fixture("platform.toml"), Tier::Platform).unwrap();
    let from_yaml = PolicyDocument::from_path(&fixture("platform.yaml"), Tier::Platform).unwrap();
    assert_eq!(from_toml.enforcement_level, from_yaml.enforcement_level);
    assert_eq!(from_toml.coverage, from_yaml.coverage);
    assert_eq!(from_toml.documentation, from_yaml.documentation);
}

/// FLOE-INH-14: The invocation level may raise but not lower the policy level.
#[test]
fn test_requested_level_strengthens_only() {
    let base = resolve(&[(Tier::Foundation, "enforcement_level: warn")]).unwrap();
    let raised = base.clone().with_requested_level(EnforcementLevel::Strict).unwrap();
    assert_eq!(raised.enforcement_level(), EnforcementLevel::Strict);

    let err = base.with_requested_level(EnforcementLevel::Off).unwrap_err();
    assert!(matches!(err, PolicyError::PolicyWeakened { ref tier, .. } if tier == "invocation"));

    let weakening = PolicyDocument::from_path(&fixture("weakening_product.yaml"), Tier::Product).unwrap();
    let strict = yaml("enforcement_level: strict", Tier::Platform);
    let err = InheritanceResolver::new()
        .resolve(&[(Tier::Platform, strict), (Tier::Product, weakening)])
        .unwrap_err();
    assert!(matches!(err, PolicyError::PolicyWeakened { .. }));
}

/// FLOE-INH-15: A layer value is checked against the earlier tiers only. A
/// single document may set a layer below its own global minimum, and a later
/// tier may raise the global without touching an existing layer value.
#[test]
fn test_layer_threshold_against_earlier_tiers() {
    let policy = resolve(&[(Tier::Foundation, "coverage:\n  min_coverage: 80\n  layers:\n    bronze: 50")])
        .unwrap();
    assert_eq!(policy.coverage().threshold_for(Some("bronze")), Some(50.0));
    assert_eq!(policy.coverage().threshold_for(Some("gold")), Some(80.0));

    let policy = resolve(&[
        (Tier::Foundation, "coverage:\n  min_coverage: 60\n  layers:\n    bronze: 40"),
        (Tier::Platform, "coverage:\n  min_coverage: 70\n  layers:\n    bronze: 45"),
    ])
    .unwrap();
    assert_eq!(policy.coverage().threshold_for(Some("bronze")), Some(45.0));
    assert_eq!(policy.coverage().threshold_for(None), Some(70.0));

    let err = resolve(&[
        (Tier::Foundation, "coverage:\n  layers:\n    bronze: 50"),
        (Tier::Platform, "coverage:\n  min_coverage: 90\n  layers:\n    bronze: 45"),
    ])
    .unwrap_err();
    assert!(matches!(err, PolicyError::PolicyWeakened { ref field, .. } if field == "coverage.layers.bronze"));
}
