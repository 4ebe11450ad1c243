//! Built-in benchmark dimensions.
//!
//! `partition` compares the range-partitioned attendance log with its
//! monolithic twin; both are provisioned by the seed scripts, so setup only
//! checks they exist. `durability` compares a logged and an unlogged scratch
//! table that the harness creates and drops itself.

use crate::catalog::{ScenarioCatalog, Variant};
use crate::error::HarnessError;
use crate::operation::{Comparison, Operation, Predicate, PredicateValue};
use crate::procedure::{Durability, Procedure};

pub const PARTITION: &str = "partition";
pub const DURABILITY: &str = "durability";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioConfig {
    pub bulk_rows: u32,
    pub single_rows: u32,
    /// Lower bound on `start_time` for the partition-key filter.
    pub partition_cutoff: String,
    /// `user_id` for the non-key filter.
    pub nonkey_user_id: i64,
    pub partitioned_table: String,
    pub monolithic_table: String,
    pub durable_table: String,
    pub scratch_table: String,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            bulk_rows: 10_000,
            single_rows: 1_000,
            partition_cutoff: "2024-05-01".to_string(),
            nonkey_user_id: 12345,
            partitioned_table: "attendance_logs_part".to_string(),
            monolithic_table: "attendance_logs".to_string(),
            durable_table: "test_logged".to_string(),
            scratch_table: "test_unlogged".to_string(),
        }
    }
}

pub fn partition_operations(config: &ScenarioConfig) -> Vec<Operation> {
    vec![
        Operation::filtered_count(
            "by-key",
            Predicate::new(
                "start_time",
                Comparison::Ge,
                PredicateValue::Timestamp(config.partition_cutoff.clone()),
            ),
        ),
        Operation::filtered_count(
            "by-nonkey",
            Predicate::new(
                "user_id",
                Comparison::Eq,
                PredicateValue::Integer(config.nonkey_user_id),
            ),
        ),
    ]
}

/// Bulk insert, single-row inserts, read, delete; in that order.
pub fn durability_operations(config: &ScenarioConfig) -> Vec<Operation> {
    vec![
        Operation::bulk_insert(config.bulk_rows),
        Operation::single_insert(config.single_rows),
        Operation::read_count(),
        Operation::delete_all(),
    ]
}

/// The two dimensions the harness ships with.
pub fn default_catalog(config: &ScenarioConfig) -> Result<ScenarioCatalog, HarnessError> {
    let mut builder = ScenarioCatalog::builder();

    let partition_ops = partition_operations(config);
    builder
        .register(
            PARTITION,
            Variant::new(
                "partitioned",
                &config.partitioned_table,
                Procedure::require_table(&config.partitioned_table),
            ),
            partition_ops.clone(),
        )?
        .register(
            PARTITION,
            Variant::new(
                "monolithic",
                &config.monolithic_table,
                Procedure::require_table(&config.monolithic_table),
            ),
            partition_ops,
        )?
        .describe(
            PARTITION,
            [
                format!(
                    "Partitioned table: {} (monthly range partitions on start_time)",
                    config.partitioned_table
                ),
                format!("Monolithic table: {}", config.monolithic_table),
            ],
        )?;

    let durability_ops = durability_operations(config);
    builder
        .register(
            DURABILITY,
            Variant::new(
                "durable",
                &config.durable_table,
                Procedure::scratch_table(&config.durable_table, Durability::Logged),
            )
            .with_teardown(Procedure::drop_table(&config.durable_table)),
            durability_ops.clone(),
        )?
        .register(
            DURABILITY,
            Variant::new(
                "non-durable",
                &config.scratch_table,
                Procedure::scratch_table(&config.scratch_table, Durability::Unlogged),
            )
            .with_teardown(Procedure::drop_table(&config.scratch_table)),
            durability_ops,
        )?
        .describe(
            DURABILITY,
            [
                "Tests: bulk insert, single-row inserts, read, delete".to_string(),
                format!(
                    "Data volume: {} rows bulk, {} single-row inserts",
                    config.bulk_rows, config.single_rows
                ),
            ],
        )?;

    Ok(builder.build())
}
