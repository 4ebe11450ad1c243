//! Scenario catalog: dimensions, their variants, and the operation sequence
//! every variant of a dimension shares.
//!
//! The catalog is assembled once through [`CatalogBuilder`] and is read-only
//! afterwards. Registration order is significant: the first variant of a
//! dimension is its baseline.

use lazy_regex::regex_is_match;
use tracing::debug;

use crate::error::HarnessError;
use crate::operation::{Operation, OperationKind};
use crate::procedure::Procedure;

/// One physical implementation under test, bound to a single backing table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    name: String,
    table: String,
    setup: Procedure,
    teardown: Option<Procedure>,
}

impl Variant {
    pub fn new(name: impl Into<String>, table: impl Into<String>, setup: Procedure) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            setup,
            teardown: None,
        }
    }

    pub fn with_teardown(mut self, teardown: Procedure) -> Self {
        self.teardown = Some(teardown);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn setup(&self) -> &Procedure {
        &self.setup
    }

    pub fn teardown(&self) -> Option<&Procedure> {
        self.teardown.as_ref()
    }
}

/// An axis of comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    name: String,
    description: Vec<String>,
    variants: Vec<Variant>,
    operations: Vec<Operation>,
}

impl Dimension {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-text lines rendered in the report header.
    pub fn description(&self) -> &[String] {
        &self.description
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// The first registered variant. A dimension only exists once a variant
    /// has been registered for it, so this always has a value.
    pub fn baseline(&self) -> &Variant {
        &self.variants[0]
    }
}

/// Immutable, ordered set of dimensions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioCatalog {
    dimensions: Vec<Dimension>,
}

impl ScenarioCatalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Dimensions in registration order.
    pub fn dimensions(&self) -> impl Iterator<Item = &Dimension> {
        self.dimensions.iter()
    }

    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct CatalogBuilder {
    dimensions: Vec<Dimension>,
}

impl CatalogBuilder {
    /// Register `variant` under `dimension`.
    ///
    /// The first registration of a dimension fixes its operation sequence;
    /// every later registration must pass an identical sequence.
    pub fn register(
        &mut self,
        dimension: &str,
        variant: Variant,
        operations: Vec<Operation>,
    ) -> Result<&mut Self, HarnessError> {
        validate_dimension_name(dimension)?;
        validate_variant(dimension, &variant)?;

        match self.dimensions.iter_mut().find(|d| d.name == dimension) {
            Some(existing) => {
                if existing.variants.iter().any(|v| v.name == variant.name) {
                    return Err(HarnessError::configuration(format!(
                        "variant '{}' is already registered under dimension '{dimension}'",
                        variant.name
                    )));
                }
                if let Some(other) = existing.variants.iter().find(|v| v.table == variant.table) {
                    return Err(HarnessError::configuration(format!(
                        "table '{}' of variant '{}' is already bound to variant '{}' in dimension '{dimension}'",
                        variant.table, variant.name, other.name
                    )));
                }
                if existing.operations != operations {
                    return Err(HarnessError::configuration(format!(
                        "variant '{}' declares operations that differ from dimension '{dimension}'",
                        variant.name
                    )));
                }
                debug!(
                    "catalog=register dimension={} variant={} table={}",
                    dimension, variant.name, variant.table
                );
                existing.variants.push(variant);
            }
            None => {
                validate_operations(dimension, &operations)?;
                debug!(
                    "catalog=register dimension={} variant={} table={} operations={}",
                    dimension,
                    variant.name,
                    variant.table,
                    operations.len()
                );
                self.dimensions.push(Dimension {
                    name: dimension.to_string(),
                    description: Vec::new(),
                    variants: vec![variant],
                    operations,
                });
            }
        }
        Ok(self)
    }

    /// Attach header lines to an already registered dimension.
    pub fn describe<I, S>(&mut self, dimension: &str, lines: I) -> Result<&mut Self, HarnessError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let existing = self
            .dimensions
            .iter_mut()
            .find(|d| d.name == dimension)
            .ok_or_else(|| {
                HarnessError::configuration(format!(
                    "cannot describe unknown dimension '{dimension}'"
                ))
            })?;
        for line in lines {
            let line = line.into();
            if line.contains('\n') {
                return Err(HarnessError::configuration(format!(
                    "description of dimension '{dimension}' must be single lines"
                )));
            }
            existing.description.push(line);
        }
        Ok(self)
    }

    pub fn build(self) -> ScenarioCatalog {
        ScenarioCatalog {
            dimensions: self.dimensions,
        }
    }
}

fn is_sql_identifier(name: &str) -> bool {
    regex_is_match!(
        r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$",
        name
    )
}

fn validate_dimension_name(dimension: &str) -> Result<(), HarnessError> {
    // Dimension names become report file names.
    if !regex_is_match!(r"^[A-Za-z0-9][A-Za-z0-9_-]*$", dimension) {
        return Err(HarnessError::configuration(format!(
            "invalid dimension name '{dimension}'"
        )));
    }
    Ok(())
}

fn validate_variant(dimension: &str, variant: &Variant) -> Result<(), HarnessError> {
    if !regex_is_match!(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$", &variant.name) {
        return Err(HarnessError::configuration(format!(
            "invalid variant name '{}' in dimension '{dimension}'",
            variant.name
        )));
    }
    if !is_sql_identifier(&variant.table) {
        return Err(HarnessError::configuration(format!(
            "variant '{}' in dimension '{dimension}' is bound to malformed table name '{}'",
            variant.name, variant.table
        )));
    }
    Ok(())
}

fn validate_operations(dimension: &str, operations: &[Operation]) -> Result<(), HarnessError> {
    if operations.is_empty() {
        return Err(HarnessError::configuration(format!(
            "dimension '{dimension}' declares no operations"
        )));
    }
    for (i, op) in operations.iter().enumerate() {
        if !regex_is_match!(r"^[A-Za-z0-9][A-Za-z0-9_:.-]*$", op.name()) {
            return Err(HarnessError::configuration(format!(
                "invalid operation name '{}' in dimension '{dimension}'",
                op.name()
            )));
        }
        match op.kind() {
            OperationKind::SingleInsert { repetitions: 0 } => {
                return Err(HarnessError::configuration(format!(
                    "operation '{}' in dimension '{dimension}' repeats zero times",
                    op.name()
                )));
            }
            OperationKind::BulkInsert { rows } if *rows == 0 || i32::try_from(*rows).is_err() => {
                return Err(HarnessError::configuration(format!(
                    "operation '{}' in dimension '{dimension}' must insert between 1 and {} rows",
                    op.name(),
                    i32::MAX
                )));
            }
            _ => {}
        }
        if let Some(column) = op.column() {
            if !is_sql_identifier(column) {
                return Err(HarnessError::configuration(format!(
                    "operation '{}' in dimension '{dimension}' filters on malformed column '{column}'",
                    op.name()
                )));
            }
        }
        if operations[..i].iter().any(|prev| prev.name() == op.name()) {
            return Err(HarnessError::configuration(format!(
                "operation '{}' is declared twice in dimension '{dimension}'",
                op.name()
            )));
        }
    }
    Ok(())
}
