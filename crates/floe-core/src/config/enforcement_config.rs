//! Enforcement invocation configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_OUTPUT_DIR, DEFAULT_OUTPUT_FORMAT};

/// Configuration for a single enforcement invocation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EnforcementConfig {
    /// Requested level: "off" | "warn" | "strict". May only strengthen the
    /// level resolved from the policy tiers.
    pub level: Option<String>,
    /// Report format: "json" | "sarif" | "html". Default: "json".
    pub output_format: Option<String>,
    /// Report output directory. Default: "target/floe".
    pub output_dir: Option<String>,
    /// Attach downstream impact to every reported violation.
    pub include_downstream_impact: Option<bool>,
}

impl EnforcementConfig {
    /// Returns the effective report format, defaulting to "json".
    pub fn effective_output_format(&self) -> &str {
        self.output_format.as_deref().unwrap_or(DEFAULT_OUTPUT_FORMAT)
    }

    /// Returns the effective output directory.
    pub fn effective_output_dir(&self) -> &str {
        self.output_dir.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR)
    }

    pub fn effective_include_downstream_impact(&self) -> bool {
        self.include_downstream_impact.unwrap_or(false)
    }
}

/// Locations of the graph document and the three policy tiers.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PolicyPathsConfig {
    /// Compiled graph manifest (JSON).
    pub manifest: Option<String>,
    /// Foundation tier policy document.
    pub foundation: Option<String>,
    /// Platform tier policy document.
    pub platform: Option<String>,
    /// Data-product tier policy document.
    pub product: Option<String>,
}
