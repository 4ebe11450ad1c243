//! Comparison matrix for one dimension.

use std::collections::HashMap;

use time::OffsetDateTime;

use crate::catalog::Dimension;
use crate::error::HarnessError;
use crate::trial::Trial;

/// Duration of a non-baseline variant relative to the baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ratio {
    Defined(f64),
    /// A side failed, or the baseline measured zero.
    Undefined,
}

impl Ratio {
    pub fn between(variant: &Trial, baseline: &Trial) -> Ratio {
        match (variant.elapsed(), baseline.elapsed()) {
            (Some(v), Some(b)) if !b.is_zero() => Ratio::Defined(v.as_secs_f64() / b.as_secs_f64()),
            _ => Ratio::Undefined,
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Ratio::Defined(v) => Some(v),
            Ratio::Undefined => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RatioCell {
    pub operation: String,
    pub variant: String,
    pub baseline: String,
    pub ratio: Ratio,
}

/// Complete (operation, variant) → trial matrix plus derived ratios.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    dimension: String,
    description: Vec<String>,
    operations: Vec<String>,
    variants: Vec<String>,
    /// Indexed `[operation][variant]`.
    cells: Vec<Vec<Trial>>,
    ratios: Vec<RatioCell>,
    started_at: OffsetDateTime,
}

impl ComparisonReport {
    pub fn dimension(&self) -> &str {
        &self.dimension
    }

    pub fn description(&self) -> &[String] {
        &self.description
    }

    /// When the earliest trial was recorded.
    pub fn started_at(&self) -> OffsetDateTime {
        self.started_at
    }

    pub fn baseline(&self) -> &str {
        &self.variants[0]
    }

    pub fn operations(&self) -> &[String] {
        &self.operations
    }

    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    pub fn cell(&self, operation: &str, variant: &str) -> Option<&Trial> {
        let o = self.operations.iter().position(|n| n == operation)?;
        let v = self.variants.iter().position(|n| n == variant)?;
        Some(&self.cells[o][v])
    }

    /// Every cell, operation-major, variants in declared order.
    pub fn cells(&self) -> impl Iterator<Item = &Trial> {
        self.cells.iter().flatten()
    }

    /// Ratio cells, operation-major, non-baseline variants in declared order.
    pub fn ratios(&self) -> &[RatioCell] {
        &self.ratios
    }

    pub fn ratio(&self, operation: &str, variant: &str) -> Option<Ratio> {
        self.ratios
            .iter()
            .find(|r| r.operation == operation && r.variant == variant)
            .map(|r| r.ratio)
    }

    pub fn failure_count(&self) -> usize {
        self.cells().filter(|t| t.is_failure()).count()
    }
}

/// Collects trials for a dimension and refuses to finish while any cell is
/// missing.
#[derive(Debug)]
pub struct ReportBuilder {
    dimension: String,
    description: Vec<String>,
    operations: Vec<String>,
    variants: Vec<String>,
    cells: HashMap<(usize, usize), Trial>,
}

impl ReportBuilder {
    pub fn new(dimension: &Dimension) -> Self {
        Self {
            dimension: dimension.name().to_string(),
            description: dimension.description().to_vec(),
            operations: dimension
                .operations()
                .iter()
                .map(|o| o.name().to_string())
                .collect(),
            variants: dimension
                .variants()
                .iter()
                .map(|v| v.name().to_string())
                .collect(),
            cells: HashMap::new(),
        }
    }

    pub fn record(&mut self, trial: Trial) -> Result<(), HarnessError> {
        let o = self.operations.iter().position(|n| n == trial.operation());
        let v = self.variants.iter().position(|n| n == trial.variant());
        let (Some(o), Some(v)) = (o, v) else {
            return Err(HarnessError::configuration(format!(
                "trial {} [{}] does not belong to dimension '{}'",
                trial.operation(),
                trial.variant(),
                self.dimension
            )));
        };
        if self.cells.contains_key(&(o, v)) {
            return Err(HarnessError::configuration(format!(
                "trial {} [{}] recorded twice in dimension '{}'",
                trial.operation(),
                trial.variant(),
                self.dimension
            )));
        }
        self.cells.insert((o, v), trial);
        Ok(())
    }

    pub fn finish(mut self) -> Result<ComparisonReport, HarnessError> {
        let mut cells = Vec::with_capacity(self.operations.len());
        for (o, operation) in self.operations.iter().enumerate() {
            let mut row = Vec::with_capacity(self.variants.len());
            for (v, variant) in self.variants.iter().enumerate() {
                let trial = self.cells.remove(&(o, v)).ok_or_else(|| {
                    HarnessError::IncompleteReport {
                        dimension: self.dimension.clone(),
                        operation: operation.clone(),
                        variant: variant.clone(),
                    }
                })?;
                row.push(trial);
            }
            cells.push(row);
        }

        let started_at = cells
            .iter()
            .flatten()
            .map(Trial::recorded_at)
            .min()
            .unwrap_or_else(OffsetDateTime::now_utc);

        let mut ratios = Vec::new();
        for (o, operation) in self.operations.iter().enumerate() {
            let baseline = &cells[o][0];
            for (v, variant) in self.variants.iter().enumerate().skip(1) {
                ratios.push(RatioCell {
                    operation: operation.clone(),
                    variant: variant.clone(),
                    baseline: self.variants[0].clone(),
                    ratio: Ratio::between(&cells[o][v], baseline),
                });
            }
        }

        Ok(ComparisonReport {
            dimension: self.dimension,
            description: self.description,
            operations: self.operations,
            variants: self.variants,
            cells,
            ratios,
            started_at,
        })
    }
}
