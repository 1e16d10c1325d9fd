//! Report export tests: JSON, SARIF, HTML, file output.
//! FLOE-RPT-01 through FLOE-RPT-07

use std::path::PathBuf;

use chrono::NaiveDate;
use floe_core::errors::ReportError;
use floe_policy::enforcement::{
    EnforcementResult, EnforcerOptions, PolicyEnforcer, ReportExporter, ReportFormat,
};
use floe_policy::graph::load_graph;
use floe_policy::inheritance::{InheritanceResolver, PolicyDocument, Tier};
use serde_json::Value;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn shop_result() -> EnforcementResult {
    let tiers: Vec<(Tier, PolicyDocument)> = [
        (Tier::Foundation, "foundation.yaml"),
        (Tier::Platform, "platform.yaml"),
        (Tier::Product, "product.yaml"),
    ]
    .into_iter()
    .map(|(tier, file)| (tier, PolicyDocument::from_path(&fixture(file), tier).unwrap()))
    .collect();
    let policy = InheritanceResolver::new().resolve(&tiers).unwrap();
    let graph = load_graph(&fixture("manifest_v12.json")).unwrap();
    PolicyEnforcer::with_options(EnforcerOptions {
        include_downstream_impact: true,
        ..Default::default()
    })
    .enforce_at(&graph, &policy, NaiveDate::from_ymd_opt(2026, 10, 15).unwrap())
}

fn export_json(result: &EnforcementResult, format: ReportFormat) -> Value {
    let bytes = ReportExporter::new().export(result, format).unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// FLOE-RPT-01: The JSON report carries the tool header and the full result.
#[test]
fn test_json_report_shape() {
    let result = shop_result();
    let json = export_json(&result, ReportFormat::Json);
    assert_eq!(json["tool"], "floe");
    assert_eq!(json["passed"], false);
    assert_eq!(json["enforcement_level"], "strict");
    assert_eq!(
        json["summary"]["total_violations"].as_u64().unwrap() as usize,
        result.violations.len()
    );
    assert_eq!(json["violations"].as_array().unwrap().len(), result.violations.len());
    assert!(json["violations_by_model"]["model.shop.customers"].is_array());
    assert_eq!(json["policy_warnings"].as_array().unwrap().len(), 1);
}

/// FLOE-RPT-02: The JSON report deserializes back into an equal result.
#[test]
fn test_json_report_reloads() {
    let result = shop_result();
    let json = export_json(&result, ReportFormat::Json);
    let reloaded: EnforcementResult = serde_json::from_value(json).unwrap();
    assert_eq!(reloaded, result);
}

/// FLOE-RPT-03: SARIF output is 2.1.0 with one result per violation and
/// logical locations instead of files.
#[test]
fn test_sarif_structure() {
    let result = shop_result();
    let sarif = export_json(&result, ReportFormat::Sarif);
    assert_eq!(sarif["version"], "2.1.0");
    let run = &sarif["runs"][0];
    assert_eq!(run["tool"]["driver"]["name"], "floe");

    let results = run["results"].as_array().unwrap();
    assert_eq!(results.len(), result.violations.len());

    let rules = run["tool"]["driver"]["rules"].as_array().unwrap();
    let rule_ids: Vec<&str> = rules.iter().map(|r| r["id"].as_str().unwrap()).collect();
    let mut unique = rule_ids.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), rule_ids.len());

    for (entry, violation) in results.iter().zip(&result.violations) {
        assert_eq!(entry["ruleId"], violation.rule_id.as_str());
        let locations = entry["locations"][0]["logicalLocations"].as_array().unwrap();
        let model = locations.last().unwrap();
        assert_eq!(model["fullyQualifiedName"], violation.model_id.as_str());
        if let Some(column) = &violation.column {
            assert_eq!(
                locations[0]["fullyQualifiedName"],
                format!("{}/{}", violation.model_id, column)
            );
        }
        assert_eq!(entry["fixes"][0]["description"]["text"], violation.suggestion.as_str());
    }
}

/// FLOE-RPT-04: SARIF marks downgraded results and maps severities.
#[test]
fn test_sarif_override_properties() {
    let result = shop_result();
    let sarif = export_json(&result, ReportFormat::Sarif);
    let results = sarif["runs"][0]["results"].as_array().unwrap();
    let downgraded = results
        .iter()
        .find(|r| r["properties"]["overrideApplied"] == "customers")
        .unwrap();
    assert_eq!(downgraded["level"], "warning");
    assert_eq!(sarif["runs"][0]["properties"]["passed"], false);
}

/// FLOE-RPT-05: HTML is self-contained and escapes model content.
#[test]
fn test_html_report() {
    let result = shop_result();
    let html = String::from_utf8(ReportExporter::new().export(&result, ReportFormat::Html).unwrap()).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<style>"));
    assert!(!html.contains("<script"));
    assert!(!html.contains("http-equiv"));
    assert!(html.contains("FAILED"));
    assert!(html.contains("model.shop.gold_revenue"));
    assert!(html.contains("FLOE-E301"));
    assert!(html.contains("OVERRIDE"));
    assert!(html.contains("Downstream impact"));
}

/// FLOE-RPT-06: Reports are written under a fixed name, creating the
/// directory and replacing earlier runs.
#[test]
fn test_write_report_to_directory() {
    let result = shop_result();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("reports").join("ci");
    let exporter = ReportExporter::new();

    for format in ReportFormat::ALL {
        let path = exporter.write_report(&result, format, &out).unwrap();
        assert_eq!(path, out.join(format.file_name()));
        let written = std::fs::read(&path).unwrap();
        assert_eq!(written, exporter.export(&result, format).unwrap());
    }

    // Second write replaces in place.
    exporter.write_report(&result, ReportFormat::Json, &out).unwrap();
    let entries = std::fs::read_dir(&out).unwrap().count();
    assert_eq!(entries, 3);
}

/// FLOE-RPT-07: A file in place of the output directory is rejected.
#[test]
fn test_write_report_rejects_file_path() {
    let result = shop_result();
    let file = tempfile::NamedTempFile::new().unwrap();
    let err = ReportExporter::new()
        .write_report(&result, ReportFormat::Json, file.path())
        .unwrap_err();
    assert!(matches!(err, ReportError::OutputNotDirectory { .. }));
}
