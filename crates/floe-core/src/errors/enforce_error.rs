//! Top-level fatal error for an enforcement run.

use super::error_code::FloeErrorCode;
use super::{ConfigError, GraphError, PolicyError, ReportError};

/// Any fatal error that aborts an enforcement run.
/// Aggregates subsystem errors via `From` conversions.
///
/// None of these are retried: each one needs a human to fix the input.
#[derive(Debug, thiserror::Error)]
pub enum EnforceError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl FloeErrorCode for EnforceError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Graph(e) => e.error_code(),
            Self::Policy(e) => e.error_code(),
            Self::Report(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}

/// Result alias for fallible engine entry points.
pub type EnforceResult<T> = Result<T, EnforceError>;
