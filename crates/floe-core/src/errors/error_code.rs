//! FloeErrorCode trait for stable, machine-readable error codes.

/// Every error enum implements this to expose a structured code string
/// for CI logs and the command line.
pub trait FloeErrorCode {
    /// Returns the error code string (e.g., "POLICY_WEAKENED").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted single-line diagnostic: `error[CODE]: message`.
    fn diagnostic(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("error[{}]: {}", self.error_code(), self)
    }
}

pub const GRAPH_ERROR: &str = "GRAPH_ERROR";
pub const UNSUPPORTED_GRAPH_VERSION: &str = "UNSUPPORTED_GRAPH_VERSION";
pub const POLICY_WEAKENED: &str = "POLICY_WEAKENED";
pub const POLICY_CONFIG_ERROR: &str = "POLICY_CONFIG_ERROR";
pub const CUSTOM_RULE_ERROR: &str = "CUSTOM_RULE_ERROR";
pub const REPORT_ERROR: &str = "REPORT_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
