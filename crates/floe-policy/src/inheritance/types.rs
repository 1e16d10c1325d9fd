//! Inheritance enums: tiers, enforcement levels, naming conventions,
//! override actions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How violations affect the run outcome. Ordered `Off < Warn < Strict`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EnforcementLevel {
    Off,
    #[default]
    Warn,
    Strict,
}

impl EnforcementLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Warn => "warn",
            Self::Strict => "strict",
        }
    }
}

impl fmt::Display for EnforcementLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnforcementLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "warn" => Ok(Self::Warn),
            "strict" => Ok(Self::Strict),
            other => Err(format!(
                "unknown enforcement level '{other}' (expected off, warn, or strict)"
            )),
        }
    }
}

/// Inheritance tier. Declaration order is resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Foundation,
    Platform,
    Product,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Foundation, Tier::Platform, Tier::Product];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Foundation => "foundation",
            Self::Platform => "platform",
            Self::Product => "product",
        }
    }

    /// Product-tier overrides may be undated (with a warning); upper tiers
    /// must bound every override.
    pub fn allows_undated_overrides(&self) -> bool {
        matches!(self, Self::Product)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "foundation" => Ok(Self::Foundation),
            "platform" => Ok(Self::Platform),
            "product" | "data-product" | "data_product" => Ok(Self::Product),
            other => Err(format!("unknown tier '{other}'")),
        }
    }
}

/// Naming convention family. Not ordered: once set it can only be repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingConvention {
    /// `bronze_` / `silver_` / `gold_` prefixes keyed by layer.
    Medallion,
    /// `dim_` / `fact_` prefixes.
    Kimball,
    /// Only the explicitly configured regexes apply.
    Custom,
}

impl NamingConvention {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Medallion => "medallion",
            Self::Kimball => "kimball",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for NamingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an override does to a matching violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideAction {
    /// Error becomes warning; the violation stays in the report.
    Downgrade,
    /// Violation is dropped from the result (still logged).
    Exclude,
}

impl OverrideAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Downgrade => "downgrade",
            Self::Exclude => "exclude",
        }
    }
}

impl fmt::Display for OverrideAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
