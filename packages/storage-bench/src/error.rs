use std::path::PathBuf;

use thiserror::Error;

/// Failures the harness distinguishes.
///
/// Only `Configuration` stops a run. `Setup` and `Operation` are logged and
/// folded into the report as failure markers; `ReportWrite` and
/// `IncompleteReport` cost a single dimension its report.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Configuration error: {detail}")]
    Configuration { detail: String },
    #[error("Setup failed for {dimension}/{variant}: {detail}")]
    Setup {
        dimension: String,
        variant: String,
        detail: String,
    },
    #[error("Operation {operation} failed on {dimension}/{variant}: {detail}")]
    Operation {
        dimension: String,
        variant: String,
        operation: String,
        detail: String,
    },
    #[error("Failed to write report for {dimension} to {}: {source}", .path.display())]
    ReportWrite {
        dimension: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Report for {dimension} is missing cell {operation} [{variant}]")]
    IncompleteReport {
        dimension: String,
        operation: String,
        variant: String,
    },
}

impl HarnessError {
    pub fn configuration(detail: impl Into<String>) -> Self {
        Self::Configuration {
            detail: detail.into(),
        }
    }

    /// Whether this error must stop the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, HarnessError::Configuration { .. })
    }
}
