use std::time::Duration;

use time::OffsetDateTime;

/// Why a cell carries no measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The variant's setup failed; no operation was attempted.
    Setup,
    /// The timed call itself failed.
    Operation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureMarker {
    pub kind: FailureKind,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrialOutcome {
    /// `observed` is the summed affected-row count, or the scalar a query returned.
    Completed { elapsed: Duration, observed: i64 },
    Failed(FailureMarker),
}

/// One timed execution of an operation against a variant. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trial {
    operation: String,
    variant: String,
    outcome: TrialOutcome,
    recorded_at: OffsetDateTime,
}

impl Trial {
    pub fn completed(
        operation: impl Into<String>,
        variant: impl Into<String>,
        elapsed: Duration,
        observed: i64,
    ) -> Self {
        Self::new(operation, variant, TrialOutcome::Completed { elapsed, observed })
    }

    pub fn failed(
        operation: impl Into<String>,
        variant: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::new(
            operation,
            variant,
            TrialOutcome::Failed(FailureMarker {
                kind: FailureKind::Operation,
                detail: detail.into(),
            }),
        )
    }

    pub fn setup_failed(
        operation: impl Into<String>,
        variant: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::new(
            operation,
            variant,
            TrialOutcome::Failed(FailureMarker {
                kind: FailureKind::Setup,
                detail: detail.into(),
            }),
        )
    }

    fn new(operation: impl Into<String>, variant: impl Into<String>, outcome: TrialOutcome) -> Self {
        Self {
            operation: operation.into(),
            variant: variant.into(),
            outcome,
            recorded_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    pub fn outcome(&self) -> &TrialOutcome {
        &self.outcome
    }

    pub fn recorded_at(&self) -> OffsetDateTime {
        self.recorded_at
    }

    pub fn elapsed(&self) -> Option<Duration> {
        match &self.outcome {
            TrialOutcome::Completed { elapsed, .. } => Some(*elapsed),
            TrialOutcome::Failed(_) => None,
        }
    }

    pub fn observed(&self) -> Option<i64> {
        match &self.outcome {
            TrialOutcome::Completed { observed, .. } => Some(*observed),
            TrialOutcome::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&FailureMarker> {
        match &self.outcome {
            TrialOutcome::Completed { .. } => None,
            TrialOutcome::Failed(marker) => Some(marker),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.failure().is_some()
    }
}
