//! Shared constants for the Floe policy engine.

/// Floe version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tool name reported in SARIF and HTML output.
pub const TOOL_NAME: &str = "floe";

/// Base URL for per-rule documentation links.
pub const DOCS_BASE_URL: &str = "https://floe.dev/docs/policies";

/// Default report format.
pub const DEFAULT_OUTPUT_FORMAT: &str = "json";

/// Default report output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "target/floe";

/// Report file stem; the extension follows the format.
pub const REPORT_FILE_STEM: &str = "floe-enforcement";

/// Maximum number of inheritance tiers (Foundation, Platform, Product).
pub const MAX_TIERS: usize = 3;

/// Oldest dbt manifest schema version the graph loader accepts.
pub const MIN_MANIFEST_VERSION: u32 = 9;

/// Newest dbt manifest schema version the graph loader accepts.
pub const MAX_MANIFEST_VERSION: u32 = 12;

/// Enforcement levels accepted in config and on the command line.
pub const ENFORCEMENT_LEVELS: &[&str] = &["off", "warn", "strict"];

/// Report formats accepted in config and on the command line.
pub const OUTPUT_FORMATS: &[&str] = &["json", "sarif", "html"];
