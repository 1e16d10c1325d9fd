//! Top-level Floe configuration with 4-layer resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{EnforcementConfig, PolicyPathsConfig};
use crate::constants::{ENFORCEMENT_LEVELS, OUTPUT_FORMATS};
use crate::errors::ConfigError;

/// Project config file name, looked up in the project root.
pub const PROJECT_CONFIG_FILE: &str = "floe.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`FLOE_*`)
/// 3. Project config (`floe.toml` in project root)
/// 4. User config (`~/.floe/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FloeConfig {
    pub enforcement: EnforcementConfig,
    pub policy: PolicyPathsConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub level: Option<String>,
    pub output_format: Option<String>,
    pub output_dir: Option<String>,
    pub manifest: Option<String>,
    pub foundation: Option<String>,
    pub platform: Option<String>,
    pub product: Option<String>,
}

impl FloeConfig {
    /// Load configuration with 4-layer resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                Self::merge_toml_file(&mut config, &user_config_path)?;
            }
        }

        // Layer 3: project config
        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config)?;

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;
        tracing::debug!(root = %root.display(), "engine configuration resolved");
        Ok(config)
    }

    /// Load configuration from an explicit TOML file plus env and CLI layers.
    pub fn load_file(path: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let mut config = Self::default();
        Self::merge_toml_file(&mut config, path)?;
        Self::apply_env_overrides(&mut config)?;
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }
        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &FloeConfig) -> Result<(), ConfigError> {
        if let Some(ref level) = config.enforcement.level {
            if !ENFORCEMENT_LEVELS.contains(&level.as_str()) {
                return Err(ConfigError::ValidationFailed {
                    field: "enforcement.level".to_string(),
                    message: format!("'{level}' is not one of off, warn, strict"),
                });
            }
        }
        if let Some(ref format) = config.enforcement.output_format {
            if !OUTPUT_FORMATS.contains(&format.as_str()) {
                return Err(ConfigError::ValidationFailed {
                    field: "enforcement.output_format".to_string(),
                    message: format!("'{format}' is not one of json, sarif, html"),
                });
            }
        }
        if let Some(ref dir) = config.enforcement.output_dir {
            if dir.trim().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "enforcement.output_dir".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.floe/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".floe").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut FloeConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: FloeConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base` values
    /// only when `other` has a `Some` value.
    fn merge(base: &mut FloeConfig, other: &FloeConfig) {
        let (b, o) = (&mut base.enforcement, &other.enforcement);
        if o.level.is_some() {
            b.level = o.level.clone();
        }
        if o.output_format.is_some() {
            b.output_format = o.output_format.clone();
        }
        if o.output_dir.is_some() {
            b.output_dir = o.output_dir.clone();
        }
        if o.include_downstream_impact.is_some() {
            b.include_downstream_impact = o.include_downstream_impact;
        }

        let (b, o) = (&mut base.policy, &other.policy);
        if o.manifest.is_some() {
            b.manifest = o.manifest.clone();
        }
        if o.foundation.is_some() {
            b.foundation = o.foundation.clone();
        }
        if o.platform.is_some() {
            b.platform = o.platform.clone();
        }
        if o.product.is_some() {
            b.product = o.product.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `FLOE_ENFORCEMENT_LEVEL`, `FLOE_OUTPUT_FORMAT`, `FLOE_OUTPUT_DIR`,
    /// `FLOE_INCLUDE_DOWNSTREAM_IMPACT` (`true` or `false`).
    fn apply_env_overrides(config: &mut FloeConfig) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("FLOE_ENFORCEMENT_LEVEL") {
            config.enforcement.level = Some(val);
        }
        if let Ok(val) = std::env::var("FLOE_OUTPUT_FORMAT") {
            config.enforcement.output_format = Some(val);
        }
        if let Ok(val) = std::env::var("FLOE_OUTPUT_DIR") {
            config.enforcement.output_dir = Some(val);
        }
        if let Ok(val) = std::env::var("FLOE_INCLUDE_DOWNSTREAM_IMPACT") {
            let v = val.parse::<bool>().map_err(|_| ConfigError::ValidationFailed {
                field: "FLOE_INCLUDE_DOWNSTREAM_IMPACT".to_string(),
                message: format!("expected true or false, got '{val}'"),
            })?;
            config.enforcement.include_downstream_impact = Some(v);
        }
        Ok(())
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut FloeConfig, cli: &CliOverrides) {
        if let Some(ref v) = cli.level {
            config.enforcement.level = Some(v.clone());
        }
        if let Some(ref v) = cli.output_format {
            config.enforcement.output_format = Some(v.clone());
        }
        if let Some(ref v) = cli.output_dir {
            config.enforcement.output_dir = Some(v.clone());
        }
        if let Some(ref v) = cli.manifest {
            config.policy.manifest = Some(v.clone());
        }
        if let Some(ref v) = cli.foundation {
            config.policy.foundation = Some(v.clone());
        }
        if let Some(ref v) = cli.platform {
            config.policy.platform = Some(v.clone());
        }
        if let Some(ref v) = cli.product {
            config.policy.product = Some(v.clone());
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
