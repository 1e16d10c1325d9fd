//! SARIF 2.1.0 reporter.
//!
//! Models are not files, so every result carries logical locations:
//! `model_id` for model-level findings, `model_id/column` for columns.

use std::collections::BTreeSet;

use floe_core::constants::{TOOL_NAME, VERSION};
use floe_core::errors::ReportError;
use serde_json::{json, Value};

use super::Reporter;
use crate::enforcement::result::EnforcementResult;
use crate::enforcement::violation::{rule_title, Severity, Violation};

const SARIF_SCHEMA: &str =
    "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/main/sarif-2.1/schema/sarif-schema-2.1.0.json";

/// SARIF 2.1.0 reporter.
pub struct SarifReporter {
    pub tool_name: String,
    pub tool_version: String,
}

impl SarifReporter {
    pub fn new() -> Self {
        Self {
            tool_name: TOOL_NAME.to_string(),
            tool_version: VERSION.to_string(),
        }
    }

    fn severity_to_sarif_level(severity: Severity) -> &'static str {
        match severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }

    fn logical_locations(violation: &Violation) -> Vec<Value> {
        let model = json!({
            "name": violation.model_name,
            "fullyQualifiedName": violation.model_id,
            "kind": "module"
        });
        match &violation.column {
            Some(column) => vec![json!({
                "name": column,
                "fullyQualifiedName": format!("{}/{}", violation.model_id, column),
                "kind": "member"
            }), model],
            None => vec![model],
        }
    }

    fn build_results(&self, result: &EnforcementResult) -> Vec<Value> {
        result
            .violations
            .iter()
            .map(|violation| {
                let mut entry = json!({
                    "ruleId": violation.rule_id,
                    "level": Self::severity_to_sarif_level(violation.severity),
                    "message": {
                        "text": violation.message
                    },
                    "locations": [{
                        "logicalLocations": Self::logical_locations(violation)
                    }],
                    "fixes": [{
                        "description": {
                            "text": violation.suggestion
                        }
                    }]
                });

                let mut properties = serde_json::Map::new();
                properties.insert("policyType".to_string(), json!(violation.policy_type));
                if let Some(ref expected) = violation.expected {
                    properties.insert("expected".to_string(), json!(expected));
                }
                if let Some(ref actual) = violation.actual {
                    properties.insert("actual".to_string(), json!(actual));
                }
                if let Some(ref pattern) = violation.override_applied {
                    properties.insert("overrideApplied".to_string(), json!(pattern));
                }
                if let Some(ref impact) = violation.downstream_impact {
                    properties.insert("downstreamImpact".to_string(), json!(impact));
                }
                entry["properties"] = Value::Object(properties);
                entry
            })
            .collect()
    }

    fn build_rules(&self, result: &EnforcementResult) -> Vec<Value> {
        let mut seen = BTreeSet::new();
        let mut rules = Vec::new();

        for violation in &result.violations {
            if seen.insert(violation.rule_id.as_str()) {
                rules.push(json!({
                    "id": violation.rule_id,
                    "shortDescription": {
                        "text": rule_title(&violation.rule_id)
                    },
                    "helpUri": violation.documentation_url,
                    "defaultConfiguration": {
                        "level": Self::severity_to_sarif_level(violation.severity)
                    },
                    "properties": {
                        "category": violation.policy_type
                    }
                }));
            }
        }

        rules
    }
}

impl Default for SarifReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for SarifReporter {
    fn name(&self) -> &'static str {
        "sarif"
    }

    fn generate(&self, result: &EnforcementResult) -> Result<String, ReportError> {
        let sarif = json!({
            "$schema": SARIF_SCHEMA,
            "version": "2.1.0",
            "runs": [{
                "tool": {
                    "driver": {
                        "name": self.tool_name,
                        "version": self.tool_version,
                        "informationUri": "https://floe.dev",
                        "rules": self.build_rules(result)
                    }
                },
                "invocations": [{
                    "executionSuccessful": true
                }],
                "results": self.build_results(result),
                "properties": {
                    "enforcementLevel": result.enforcement_level,
                    "passed": result.passed,
                    "summary": result.summary
                }
            }]
        });

        serde_json::to_string_pretty(&sarif).map_err(|e| ReportError::Serialization(e.to_string()))
    }
}
