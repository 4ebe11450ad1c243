#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

//! Storage-strategy benchmarking harness.
//!
//! Runs logically identical operations against alternate physical layouts of
//! the same data (partitioned vs. monolithic, logged vs. unlogged) and writes
//! one comparison report per dimension.

pub mod catalog;
pub mod clock;
pub mod comparator;
pub mod error;
pub mod executor;
pub mod harness;
pub mod operation;
pub mod procedure;
pub mod report;
pub mod scenarios;
pub mod sink;
pub mod store;
pub mod trial;

pub use catalog::{CatalogBuilder, Dimension, ScenarioCatalog, Variant};
pub use clock::{Clock, MonotonicClock};
pub use comparator::StrategyComparator;
pub use error::HarnessError;
pub use executor::TrialExecutor;
pub use harness::{run_benchmarks, run_benchmarks_with_clock, RunOptions, RunSummary};
pub use operation::{Comparison, Operation, OperationKind, Predicate, PredicateValue};
pub use procedure::{Durability, Procedure, Step};
pub use report::{ComparisonReport, Ratio, RatioCell, ReportBuilder};
pub use scenarios::{default_catalog, ScenarioConfig};
pub use sink::{format_duration, render_report, ReportSink};
pub use store::sea_store::SeaStore;
pub use store::{Store, StoreError};
pub use trial::{FailureKind, FailureMarker, Trial, TrialOutcome};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    bench_test_support::logging::init();
}
