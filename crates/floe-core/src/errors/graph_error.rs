//! Graph document errors.

use std::path::PathBuf;

use super::error_code::{self, FloeErrorCode};

/// Errors raised while loading the external model graph document.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Malformed graph document {source_name}: {message}")]
    MalformedGraph { source_name: String, message: String },

    #[error("Unsupported graph schema version {found} (supported: v{min} through v{max})")]
    UnsupportedGraphVersion { found: String, min: u32, max: u32 },

    #[error("Duplicate model id in graph: {id}")]
    DuplicateModel { id: String },

    #[error("IO error reading graph {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl FloeErrorCode for GraphError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedGraphVersion { .. } => error_code::UNSUPPORTED_GRAPH_VERSION,
            _ => error_code::GRAPH_ERROR,
        }
    }
}
