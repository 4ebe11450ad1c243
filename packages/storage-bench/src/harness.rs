//! Top-level run: compare every selected dimension and persist its report.

use std::path::PathBuf;

use tracing::{error, info};

use crate::catalog::{Dimension, ScenarioCatalog};
use crate::clock::{Clock, MonotonicClock};
use crate::comparator::StrategyComparator;
use crate::error::HarnessError;
use crate::sink::ReportSink;
use crate::store::Store;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Dimensions to run. Empty means all of them.
    pub only: Vec<String>,
}

/// What a run produced.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Report files written, in catalog order.
    pub written: Vec<PathBuf>,
    /// Dimensions that produced no report file.
    pub failures: Vec<(String, HarnessError)>,
}

impl RunSummary {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

pub async fn run_benchmarks(
    store: &dyn Store,
    catalog: &ScenarioCatalog,
    sink: &ReportSink,
    options: &RunOptions,
) -> Result<RunSummary, HarnessError> {
    let clock = MonotonicClock::new();
    run_benchmarks_with_clock(store, &clock, catalog, sink, options).await
}

/// Run the selected dimensions one after another.
///
/// Only a bad selection is returned as an error. A dimension that fails to
/// produce or write its report is recorded in the summary and the remaining
/// dimensions still run.
pub async fn run_benchmarks_with_clock(
    store: &dyn Store,
    clock: &dyn Clock,
    catalog: &ScenarioCatalog,
    sink: &ReportSink,
    options: &RunOptions,
) -> Result<RunSummary, HarnessError> {
    let selected = select(catalog, &options.only)?;
    info!(
        "run=start dimensions={} results_dir={}",
        selected.len(),
        sink.results_dir().display()
    );

    let comparator = StrategyComparator::new(store, clock);
    let mut summary = RunSummary::default();

    for dimension in selected {
        let outcome = match comparator.compare(dimension).await {
            Ok(report) => sink.write(&report),
            Err(e) => Err(e),
        };
        match outcome {
            Ok(path) => summary.written.push(path),
            Err(e) => {
                error!(
                    dimension = %dimension.name(),
                    error = %e,
                    "dimension produced no report"
                );
                summary.failures.push((dimension.name().to_string(), e));
            }
        }
    }

    info!(
        "run=done written={} failed={}",
        summary.written.len(),
        summary.failures.len()
    );
    Ok(summary)
}

fn select<'c>(
    catalog: &'c ScenarioCatalog,
    only: &[String],
) -> Result<Vec<&'c Dimension>, HarnessError> {
    if catalog.is_empty() {
        return Err(HarnessError::configuration("scenario catalog is empty"));
    }
    if let Some(unknown) = only.iter().find(|n| catalog.dimension(n).is_none()) {
        let known: Vec<&str> = catalog.dimensions().map(|d| d.name()).collect();
        return Err(HarnessError::configuration(format!(
            "unknown dimension '{unknown}' (known: {})",
            known.join(", ")
        )));
    }
    Ok(catalog
        .dimensions()
        .filter(|d| only.is_empty() || only.iter().any(|n| n == d.name()))
        .collect())
}
