//! Error handling for Floe.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.
//!
//! These are the fatal configuration errors: they abort a run before any
//! violation is produced. Policy findings are never errors.

pub mod config_error;
pub mod enforce_error;
pub mod error_code;
pub mod graph_error;
pub mod policy_error;
pub mod report_error;

pub use config_error::ConfigError;
pub use enforce_error::{EnforceError, EnforceResult};
pub use error_code::FloeErrorCode;
pub use graph_error::GraphError;
pub use policy_error::PolicyError;
pub use report_error::ReportError;
