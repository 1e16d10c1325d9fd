//! Tests for the Floe error handling system.

use std::path::PathBuf;

use floe_core::errors::*;

/// Every error enum exposes a non-empty error code.
#[test]
fn test_all_errors_have_error_code() {
    let graph = GraphError::MalformedGraph {
        source_name: "manifest.json".into(),
        message: "expected value".into(),
    };
    assert_eq!(graph.error_code(), "GRAPH_ERROR");

    let version = GraphError::UnsupportedGraphVersion {
        found: "v4".into(),
        min: 9,
        max: 12,
    };
    assert_eq!(version.error_code(), "UNSUPPORTED_GRAPH_VERSION");

    let weakened = PolicyError::PolicyWeakened {
        tier: "product".into(),
        field: "coverage.min_coverage".into(),
        old: "80".into(),
        new: "60".into(),
    };
    assert_eq!(weakened.error_code(), "POLICY_WEAKENED");

    let custom = PolicyError::UnknownCustomRuleType {
        tier: "platform".into(),
        index: 0,
        rule_type: "require_owner".into(),
        supported: "require_meta_field".into(),
    };
    assert_eq!(custom.error_code(), "CUSTOM_RULE_ERROR");

    let report = ReportError::UnknownFormat("xml".into());
    assert_eq!(report.error_code(), "REPORT_ERROR");

    let config = ConfigError::FileNotFound {
        path: "/tmp/floe.toml".into(),
    };
    assert_eq!(config.error_code(), "CONFIG_ERROR");
}

/// Sub-errors convert into the run-level error and keep their code.
#[test]
fn test_from_conversions_preserve_code() {
    let err: EnforceError = PolicyError::InvalidTierOrder {
        message: "four tiers supplied".into(),
    }
    .into();
    assert!(matches!(err, EnforceError::Policy(PolicyError::InvalidTierOrder { .. })));
    assert_eq!(err.error_code(), "POLICY_CONFIG_ERROR");

    let err: EnforceError = ReportError::OutputNotDirectory {
        path: PathBuf::from("/tmp/report"),
    }
    .into();
    assert_eq!(err.error_code(), "REPORT_ERROR");

    let err: EnforceError = GraphError::DuplicateModel { id: "model.a".into() }.into();
    assert_eq!(err.error_code(), "GRAPH_ERROR");
}

/// The weakening message names tier, field, old value and new value.
#[test]
fn test_policy_weakened_message_is_actionable() {
    let err = PolicyError::PolicyWeakened {
        tier: "product".into(),
        field: "enforcement_level".into(),
        old: "strict".into(),
        new: "warn".into(),
    };
    let msg = err.to_string();
    assert!(msg.contains("product"));
    assert!(msg.contains("enforcement_level"));
    assert!(msg.contains("strict"));
    assert!(msg.contains("warn"));
}

/// Diagnostics render as a single `error[CODE]: message` line.
#[test]
fn test_diagnostic_is_single_line() {
    let err: EnforceError = PolicyError::InvalidPattern {
        tier: "foundation".into(),
        field: "naming.patterns".into(),
        pattern: "([".into(),
        message: "unclosed group".into(),
    }
    .into();
    let line = err.diagnostic();
    assert!(line.starts_with("error[POLICY_CONFIG_ERROR]: "));
    assert!(!line.contains('\n'));
    assert!(line.contains("naming.patterns"));
}

/// IO errors carry their source for `Error::source` chains.
#[test]
fn test_io_error_source() {
    use std::error::Error;
    let err = GraphError::Io {
        path: PathBuf::from("missing.json"),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "nope"),
    };
    assert!(err.source().is_some());
    assert!(err.to_string().contains("missing.json"));
}
