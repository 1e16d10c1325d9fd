//! Policy resolution errors.

use std::path::PathBuf;

use super::error_code::{self, FloeErrorCode};

/// Errors that can occur while resolving the tiered policy chain.
///
/// Each variant names the tier and field so the message alone is enough
/// to locate the offending configuration.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("Policy weakened in {tier} tier: {field} changed from {old} to {new}; later tiers may only strengthen policy")]
    PolicyWeakened {
        tier: String,
        field: String,
        old: String,
        new: String,
    },

    #[error("Unknown custom rule type '{rule_type}' in {tier} tier (custom_rules[{index}]); supported: {supported}")]
    UnknownCustomRuleType {
        tier: String,
        index: usize,
        rule_type: String,
        supported: String,
    },

    #[error("Invalid custom rule '{rule_type}' in {tier} tier (custom_rules[{index}]): {message}")]
    InvalidCustomRule {
        tier: String,
        index: usize,
        rule_type: String,
        message: String,
    },

    #[error("Invalid pattern '{pattern}' in {tier} tier ({field}): {message}")]
    InvalidPattern {
        tier: String,
        field: String,
        pattern: String,
        message: String,
    },

    #[error("Invalid override '{pattern}' in {tier} tier: {message}")]
    InvalidOverride {
        tier: String,
        pattern: String,
        message: String,
    },

    #[error("Invalid value in {tier} tier for {field}: {message}")]
    InvalidValue {
        tier: String,
        field: String,
        message: String,
    },

    #[error("Invalid tier order: {message}")]
    InvalidTierOrder { message: String },

    #[error("Malformed policy document for {tier} tier: {message}")]
    MalformedPolicy { tier: String, message: String },

    #[error("IO error reading policy {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl FloeErrorCode for PolicyError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::PolicyWeakened { .. } => error_code::POLICY_WEAKENED,
            Self::UnknownCustomRuleType { .. } | Self::InvalidCustomRule { .. } => {
                error_code::CUSTOM_RULE_ERROR
            }
            _ => error_code::POLICY_CONFIG_ERROR,
        }
    }
}
