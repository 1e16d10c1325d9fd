//! Report export errors.

use std::path::PathBuf;

use super::error_code::{self, FloeErrorCode};

/// Errors that can occur while serializing or writing a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Unknown report format '{0}' (expected json, sarif, or html)")]
    UnknownFormat(String),

    #[error("Report output path {path} exists and is not a directory")]
    OutputNotDirectory { path: PathBuf },

    #[error("Report serialization failed: {0}")]
    Serialization(String),

    #[error("IO error writing report to {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl FloeErrorCode for ReportError {
    fn error_code(&self) -> &'static str {
        error_code::REPORT_ERROR
    }
}
