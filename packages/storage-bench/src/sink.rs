//! Persists comparison reports as stable, line-oriented text.
//!
//! Layout:
//!
//! ```text
//! # dimension: durability
//! # baseline: durable
//! # started: 2024-05-01 09:30:00 UTC
//! # <description line>...
//! bulk-insert:10000 [durable]: 41.2ms
//! bulk-insert:10000 [non-durable]: 12.4ms
//! ...
//! bulk-insert:10000 [non-durable/durable]: 0.30x
//! ```
//!
//! Cell lines come first (operation-major, variants in declared order), then
//! ratio lines in the same order. Labels never change between runs so two
//! reports can be diffed directly.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use time::macros::format_description;
use tracing::info;

use crate::error::HarnessError;
use crate::report::{ComparisonReport, Ratio};
use crate::trial::{FailureKind, TrialOutcome};

#[derive(Debug, Clone)]
pub struct ReportSink {
    results_dir: PathBuf,
}

impl ReportSink {
    pub fn new(results_dir: impl Into<PathBuf>) -> Self {
        Self {
            results_dir: results_dir.into(),
        }
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    pub fn report_path(&self, dimension: &str) -> PathBuf {
        self.results_dir.join(format!("{dimension}_benchmark.txt"))
    }

    /// Write `report` under the results directory, creating it if needed.
    pub fn write(&self, report: &ComparisonReport) -> Result<PathBuf, HarnessError> {
        let path = self.report_path(report.dimension());
        let write_err = |source: std::io::Error| HarnessError::ReportWrite {
            dimension: report.dimension().to_string(),
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.results_dir).map_err(write_err)?;
        fs::write(&path, render_report(report)).map_err(write_err)?;

        info!(
            "report=written dimension={} path={}",
            report.dimension(),
            path.display()
        );
        Ok(path)
    }
}

/// Render the full text of a report.
pub fn render_report(report: &ComparisonReport) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "# dimension: {}", report.dimension());
    let _ = writeln!(out, "# baseline: {}", report.baseline());
    let started = format_description!("[year]-[month]-[day] [hour]:[minute]:[second] UTC");
    if let Ok(started) = report.started_at().format(&started) {
        let _ = writeln!(out, "# started: {started}");
    }
    for line in report.description() {
        let _ = writeln!(out, "# {line}");
    }

    for trial in report.cells() {
        let value = match trial.outcome() {
            TrialOutcome::Completed { elapsed, .. } => format_duration(*elapsed),
            TrialOutcome::Failed(marker) => match marker.kind {
                FailureKind::Setup => format!("SETUP FAILED ({})", single_line(&marker.detail)),
                FailureKind::Operation => format!("FAILED ({})", single_line(&marker.detail)),
            },
        };
        let _ = writeln!(out, "{} [{}]: {}", trial.operation(), trial.variant(), value);
    }

    for cell in report.ratios() {
        let value = match cell.ratio {
            Ratio::Defined(r) => format!("{r:.2}x"),
            Ratio::Undefined => "undefined".to_string(),
        };
        let _ = writeln!(
            out,
            "{} [{}/{}]: {}",
            cell.operation, cell.variant, cell.baseline, value
        );
    }
    out
}

/// Human-readable elapsed time: `850ns`, `12.4µs`, `12.4ms`, `1.25s`.
pub fn format_duration(d: Duration) -> String {
    let nanos = d.as_nanos();
    if nanos < 1_000 {
        format!("{nanos}ns")
    } else if nanos < 1_000_000 {
        format!("{:.1}µs", nanos as f64 / 1e3)
    } else if nanos < 1_000_000_000 {
        format!("{:.1}ms", nanos as f64 / 1e6)
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}

fn single_line(detail: &str) -> String {
    detail.split_whitespace().collect::<Vec<_>>().join(" ")
}
