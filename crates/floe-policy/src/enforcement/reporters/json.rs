//! JSON reporter: structured JSON output.

use floe_core::constants::{TOOL_NAME, VERSION};
use floe_core::errors::ReportError;
use serde::Serialize;

use super::Reporter;
use crate::enforcement::result::EnforcementResult;

/// JSON reporter for machine-readable output.
pub struct JsonReporter;

#[derive(Serialize)]
struct JsonReport<'a> {
    tool: &'static str,
    version: &'static str,
    #[serde(flatten)]
    result: &'a EnforcementResult,
}

impl Reporter for JsonReporter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn generate(&self, result: &EnforcementResult) -> Result<String, ReportError> {
        let report = JsonReport {
            tool: TOOL_NAME,
            version: VERSION,
            result,
        };
        serde_json::to_string_pretty(&report).map_err(|e| ReportError::Serialization(e.to_string()))
    }
}
