use tracing::{error, info, warn};

use crate::catalog::{Dimension, Variant};
use crate::clock::Clock;
use crate::error::HarnessError;
use crate::executor::TrialExecutor;
use crate::report::{ComparisonReport, ReportBuilder};
use crate::store::Store;
use crate::trial::Trial;

/// Drives every variant of a dimension through the same operation sequence.
pub struct StrategyComparator<'a> {
    store: &'a dyn Store,
    executor: TrialExecutor<'a>,
}

impl<'a> StrategyComparator<'a> {
    pub fn new(store: &'a dyn Store, clock: &'a dyn Clock) -> Self {
        Self {
            store,
            executor: TrialExecutor::new(store, clock),
        }
    }

    /// Run each variant in declared order: setup, every operation, teardown.
    ///
    /// A variant whose setup fails gets a setup-failure marker in every cell
    /// and the next variant still runs. The only error returned is an
    /// incomplete matrix.
    pub async fn compare(&self, dimension: &Dimension) -> Result<ComparisonReport, HarnessError> {
        info!(
            "compare=start dimension={} variants={} operations={}",
            dimension.name(),
            dimension.variants().len(),
            dimension.operations().len()
        );

        let mut report = ReportBuilder::new(dimension);
        for variant in dimension.variants() {
            for trial in self.run_variant(dimension, variant).await {
                report.record(trial)?;
            }
        }
        let report = report.finish()?;

        info!(
            "compare=done dimension={} failures={}",
            dimension.name(),
            report.failure_count()
        );
        Ok(report)
    }

    async fn run_variant(&self, dimension: &Dimension, variant: &Variant) -> Vec<Trial> {
        info!(
            "variant=start dimension={} variant={} table={}",
            dimension.name(),
            variant.name(),
            variant.table()
        );

        if let Err(e) = variant.setup().run(self.store).await {
            let err = HarnessError::Setup {
                dimension: dimension.name().to_string(),
                variant: variant.name().to_string(),
                detail: e.to_string(),
            };
            error!(
                dimension = %dimension.name(),
                variant = %variant.name(),
                error = %err,
                "variant setup failed; skipping its operations"
            );
            return dimension
                .operations()
                .iter()
                .map(|op| Trial::setup_failed(op.name(), variant.name(), e.to_string()))
                .collect();
        }

        // Operations run strictly in declared order; later ones may rely on
        // rows left behind by earlier ones.
        let mut trials = Vec::with_capacity(dimension.operations().len());
        for operation in dimension.operations() {
            trials.push(self.executor.run(dimension.name(), variant, operation).await);
        }

        if let Some(teardown) = variant.teardown() {
            if let Err(e) = teardown.run(self.store).await {
                warn!(
                    dimension = %dimension.name(),
                    variant = %variant.name(),
                    error = %e,
                    "variant teardown failed"
                );
            }
        }

        info!(
            "variant=done dimension={} variant={}",
            dimension.name(),
            variant.name()
        );
        trials
    }
}
