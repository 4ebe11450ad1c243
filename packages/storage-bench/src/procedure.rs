//! Setup and teardown procedures owned by a variant.
//!
//! Every constructor here produces an idempotent procedure: running it twice,
//! or after a crashed run, leaves the store in the same state as running it
//! once.

use tracing::debug;

use crate::store::{Store, StoreError, Value};

/// Whether a scratch table is WAL-logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Durability {
    Logged,
    Unlogged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Run a statement verbatim.
    Execute(String),
    /// Fail unless the named relation exists.
    RequireTable(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Procedure {
    steps: Vec<Step>,
}

impl Procedure {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// Drop and recreate an `(id SERIAL, data TEXT)` scratch table.
    pub fn scratch_table(table: &str, durability: Durability) -> Self {
        let create = match durability {
            Durability::Logged => format!("CREATE TABLE {table} (id SERIAL, data TEXT)"),
            Durability::Unlogged => format!("CREATE UNLOGGED TABLE {table} (id SERIAL, data TEXT)"),
        };
        Self::new(vec![
            Step::Execute(format!("DROP TABLE IF EXISTS {table}")),
            Step::Execute(create),
        ])
    }

    pub fn drop_table(table: &str) -> Self {
        Self::new(vec![Step::Execute(format!("DROP TABLE IF EXISTS {table}"))])
    }

    /// Verify a seeded table exists without touching its contents.
    pub fn require_table(table: &str) -> Self {
        Self::new(vec![Step::RequireTable(table.to_string())])
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Run the steps in order, stopping at the first failure.
    pub async fn run(&self, store: &dyn Store) -> Result<(), StoreError> {
        for step in &self.steps {
            match step {
                Step::Execute(sql) => {
                    debug!(sql = %sql, "procedure=execute");
                    store.execute(sql, Vec::new()).await?;
                }
                Step::RequireTable(table) => {
                    let found = store
                        .query_scalar(
                            "SELECT COUNT(*) FROM pg_class WHERE oid = to_regclass($1)",
                            vec![Value::from(table.clone())],
                        )
                        .await?;
                    if found == 0 {
                        return Err(StoreError::MissingRelation {
                            relation: table.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
