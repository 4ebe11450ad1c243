//! Operations shared verbatim by every variant of a dimension.
//!
//! An operation knows how to render itself against a backing table; it never
//! carries variant-specific state, so two variants running the same
//! `Operation` issue byte-identical SQL apart from the table name.

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::store::Value;

/// Comparison used in a filtered count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ge,
}

impl Comparison {
    pub fn as_sql(self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Ge => ">=",
        }
    }
}

/// Bound value of a predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredicateValue {
    Integer(i64),
    /// Timestamp literal such as `2024-05-01`, cast server-side.
    Timestamp(String),
}

impl PredicateValue {
    fn placeholder(&self) -> &'static str {
        match self {
            PredicateValue::Integer(_) => "$1",
            PredicateValue::Timestamp(_) => "$1::timestamp",
        }
    }

    fn to_value(&self) -> Value {
        match self {
            PredicateValue::Integer(v) => Value::BigInt(Some(*v)),
            PredicateValue::Timestamp(v) => Value::from(v.clone()),
        }
    }
}

/// `<column> <comparison> <value>` filter for a count query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub column: String,
    pub comparison: Comparison,
    pub value: PredicateValue,
}

impl Predicate {
    pub fn new(column: impl Into<String>, comparison: Comparison, value: PredicateValue) -> Self {
        Self {
            column: column.into(),
            comparison,
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationKind {
    /// One statement inserting `rows` generated rows.
    BulkInsert { rows: u32 },
    /// `repetitions` separate single-row inserts, timed as one total.
    SingleInsert { repetitions: u32 },
    /// Unfiltered `COUNT(*)`.
    Count,
    /// `COUNT(*)` restricted by a predicate.
    FilteredCount { predicate: Predicate },
    /// Delete every row.
    DeleteAll,
}

/// How an invocation is sent to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallMode {
    Execute,
    Scalar,
}

/// A rendered statement ready for the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub sql: String,
    pub params: Vec<Value>,
    pub mode: CallMode,
    pub repetitions: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    name: String,
    kind: OperationKind,
}

impl Operation {
    pub fn bulk_insert(rows: u32) -> Self {
        Self {
            name: format!("bulk-insert:{rows}"),
            kind: OperationKind::BulkInsert { rows },
        }
    }

    pub fn single_insert(repetitions: u32) -> Self {
        Self {
            name: format!("single-insert:{repetitions}"),
            kind: OperationKind::SingleInsert { repetitions },
        }
    }

    pub fn read_count() -> Self {
        Self {
            name: "read-count".to_string(),
            kind: OperationKind::Count,
        }
    }

    /// Filtered count labelled `filtered-count:<label>`.
    pub fn filtered_count(label: &str, predicate: Predicate) -> Self {
        Self {
            name: format!("filtered-count:{label}"),
            kind: OperationKind::FilteredCount { predicate },
        }
    }

    pub fn delete_all() -> Self {
        Self {
            name: "delete-all".to_string(),
            kind: OperationKind::DeleteAll,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &OperationKind {
        &self.kind
    }

    /// Column referenced by the operation, if any.
    pub fn column(&self) -> Option<&str> {
        match &self.kind {
            OperationKind::FilteredCount { predicate } => Some(&predicate.column),
            _ => None,
        }
    }

    /// Render the operation against `table`.
    pub fn invocation(&self, table: &str) -> Invocation {
        match &self.kind {
            OperationKind::BulkInsert { rows } => Invocation {
                sql: format!(
                    "INSERT INTO {table} (id, data) SELECT g, 'data' FROM generate_series(1, $1::integer) AS g"
                ),
                params: vec![Value::BigInt(Some(i64::from(*rows)))],
                mode: CallMode::Execute,
                repetitions: 1,
            },
            OperationKind::SingleInsert { repetitions } => Invocation {
                sql: format!("INSERT INTO {table} (data) VALUES ('single')"),
                params: Vec::new(),
                mode: CallMode::Execute,
                repetitions: *repetitions,
            },
            OperationKind::Count => Invocation {
                sql: format!("SELECT COUNT(*) FROM {table}"),
                params: Vec::new(),
                mode: CallMode::Scalar,
                repetitions: 1,
            },
            OperationKind::FilteredCount { predicate } => Invocation {
                sql: format!(
                    "SELECT COUNT(*) FROM {table} WHERE {} {} {}",
                    predicate.column,
                    predicate.comparison.as_sql(),
                    predicate.value.placeholder()
                ),
                params: vec![predicate.value.to_value()],
                mode: CallMode::Scalar,
                repetitions: 1,
            },
            OperationKind::DeleteAll => Invocation {
                sql: format!("DELETE FROM {table}"),
                params: Vec::new(),
                mode: CallMode::Execute,
                repetitions: 1,
            },
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.name)
    }
}
