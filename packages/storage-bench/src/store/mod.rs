//! The single capability the harness needs from a data store.
//!
//! Production code talks to Postgres through [`sea_store::SeaStore`]; tests
//! substitute a fake with injected latencies.

pub mod sea_store;

use async_trait::async_trait;
pub use sea_orm::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(String),
    #[error("query returned no rows")]
    NoRows,
    #[error("failed to decode scalar: {0}")]
    Decode(String),
    #[error("relation {relation} does not exist")]
    MissingRelation { relation: String },
}

impl From<sea_orm::DbErr> for StoreError {
    fn from(e: sea_orm::DbErr) -> Self {
        StoreError::Db(e.to_string())
    }
}

/// Statement-level access to the backing store.
///
/// Each call is one round trip; implementations never wrap calls in a
/// transaction on the harness's behalf.
#[async_trait]
pub trait Store: Send + Sync {
    /// Run a statement and return the number of affected rows.
    async fn execute(&self, sql: &str, params: Vec<Value>) -> Result<u64, StoreError>;

    /// Run a query and return the first column of its first row.
    async fn query_scalar(&self, sql: &str, params: Vec<Value>) -> Result<i64, StoreError>;
}
