use std::time::Duration;

use tracing::{debug, warn};

use crate::catalog::Variant;
use crate::clock::Clock;
use crate::error::HarnessError;
use crate::operation::{CallMode, Operation};
use crate::store::{Store, StoreError};
use crate::trial::Trial;

/// Times single operations against a variant's backing table.
///
/// Only the store call is bracketed by the clock. Repeated operations are
/// timed per call and summed, so the trial reflects total overhead rather
/// than an average. Store failures never escape: they become a failed trial.
pub struct TrialExecutor<'a> {
    store: &'a dyn Store,
    clock: &'a dyn Clock,
}

impl<'a> TrialExecutor<'a> {
    pub fn new(store: &'a dyn Store, clock: &'a dyn Clock) -> Self {
        Self { store, clock }
    }

    pub async fn run(&self, dimension: &str, variant: &Variant, operation: &Operation) -> Trial {
        let invocation = operation.invocation(variant.table());
        let mut elapsed = Duration::ZERO;
        let mut observed: i64 = 0;

        for repetition in 0..invocation.repetitions {
            let params = invocation.params.clone();
            let start = self.clock.now();
            let result = match invocation.mode {
                CallMode::Execute => self
                    .store
                    .execute(&invocation.sql, params)
                    .await
                    .map(|n| i64::try_from(n).unwrap_or(i64::MAX)),
                CallMode::Scalar => self.store.query_scalar(&invocation.sql, params).await,
            };
            let end = self.clock.now();

            match result {
                Ok(value) => {
                    elapsed += end.saturating_sub(start);
                    observed = observed.saturating_add(value);
                }
                Err(e) => return self.failed(dimension, variant, operation, repetition, e),
            }
        }

        debug!(
            "trial=done dimension={} variant={} operation={} elapsed_us={} observed={}",
            dimension,
            variant.name(),
            operation.name(),
            elapsed.as_micros(),
            observed
        );
        Trial::completed(operation.name(), variant.name(), elapsed, observed)
    }

    fn failed(
        &self,
        dimension: &str,
        variant: &Variant,
        operation: &Operation,
        repetition: u32,
        source: StoreError,
    ) -> Trial {
        let err = HarnessError::Operation {
            dimension: dimension.to_string(),
            variant: variant.name().to_string(),
            operation: operation.name().to_string(),
            detail: source.to_string(),
        };
        warn!(
            dimension = %dimension,
            variant = %variant.name(),
            operation = %operation.name(),
            repetition,
            error = %err,
            "operation failed; recording failure marker"
        );
        Trial::failed(operation.name(), variant.name(), source.to_string())
    }
}
