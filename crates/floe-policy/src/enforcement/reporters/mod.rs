//! Reporters: output formats for enforcement results.
//!
//! Three formats: JSON, SARIF 2.1.0, and self-contained HTML.

pub mod html;
pub mod json;
pub mod sarif;

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use floe_core::constants::REPORT_FILE_STEM;
use floe_core::errors::ReportError;
use tempfile::NamedTempFile;

use super::result::EnforcementResult;

/// Trait for report generation.
pub trait Reporter: Send + Sync {
    fn name(&self) -> &'static str;
    fn generate(&self, result: &EnforcementResult) -> Result<String, ReportError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportFormat {
    Json,
    Sarif,
    Html,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 3] = [ReportFormat::Json, ReportFormat::Sarif, ReportFormat::Html];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Sarif => "sarif",
            Self::Html => "html",
        }
    }

    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    /// `floe-enforcement.<ext>`
    pub fn file_name(&self) -> String {
        format!("{REPORT_FILE_STEM}.{}", self.extension())
    }

    pub fn reporter(&self) -> Box<dyn Reporter> {
        match self {
            Self::Json => Box::new(json::JsonReporter),
            Self::Sarif => Box::new(sarif::SarifReporter::new()),
            Self::Html => Box::new(html::HtmlReporter::new()),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == lower)
            .ok_or_else(|| ReportError::UnknownFormat(s.to_string()))
    }
}

/// Serializes results and writes report artifacts.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportExporter;

impl ReportExporter {
    pub fn new() -> Self {
        Self
    }

    pub fn export(&self, result: &EnforcementResult, format: ReportFormat) -> Result<Vec<u8>, ReportError> {
        let text = format.reporter().generate(result)?;
        tracing::debug!(format = format.as_str(), report_bytes = text.len(), "report generated");
        Ok(text.into_bytes())
    }

    /// Write `floe-enforcement.<ext>` into `output_dir`, creating the
    /// directory if needed. The file is replaced atomically.
    pub fn write_report(
        &self,
        result: &EnforcementResult,
        format: ReportFormat,
        output_dir: &Path,
    ) -> Result<PathBuf, ReportError> {
        if output_dir.exists() && !output_dir.is_dir() {
            return Err(ReportError::OutputNotDirectory {
                path: output_dir.to_path_buf(),
            });
        }
        std::fs::create_dir_all(output_dir).map_err(|source| ReportError::Io {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let bytes = self.export(result, format)?;
        let path = output_dir.join(format.file_name());

        let mut tmp = NamedTempFile::new_in(output_dir).map_err(|source| ReportError::Io {
            path: output_dir.to_path_buf(),
            source,
        })?;
        tmp.write_all(&bytes).map_err(|source| ReportError::Io {
            path: tmp.path().to_path_buf(),
            source,
        })?;
        tmp.persist(&path).map_err(|e| ReportError::Io {
            path: path.clone(),
            source: e.error,
        })?;

        tracing::info!(path = %path.display(), format = format.as_str(), "report written");
        Ok(path)
    }
}

/// Minimal HTML escaping for text and attribute content.
pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
