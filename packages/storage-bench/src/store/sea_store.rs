//! SeaORM adapter for the [`Store`] capability.

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement};
use tracing::trace;

use super::{Store, StoreError, Value};

/// Store backed by a SeaORM connection.
///
/// The connection is expected to hold a single physical session (see
/// `db_infra::connect`), so trials are issued strictly one after another.
#[derive(Debug)]
pub struct SeaStore {
    conn: DatabaseConnection,
}

impl SeaStore {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    pub fn into_connection(self) -> DatabaseConnection {
        self.conn
    }

    fn statement(&self, sql: &str, params: Vec<Value>) -> Statement {
        Statement::from_sql_and_values(self.backend(), sql, params)
    }

    fn backend(&self) -> DbBackend {
        self.conn.get_database_backend()
    }
}

#[async_trait]
impl Store for SeaStore {
    async fn execute(&self, sql: &str, params: Vec<Value>) -> Result<u64, StoreError> {
        trace!(sql, "store=execute");
        let result = self.conn.execute(self.statement(sql, params)).await?;
        Ok(result.rows_affected())
    }

    async fn query_scalar(&self, sql: &str, params: Vec<Value>) -> Result<i64, StoreError> {
        trace!(sql, "store=query_scalar");
        let row = self
            .conn
            .query_one(self.statement(sql, params))
            .await?
            .ok_or(StoreError::NoRows)?;
        row.try_get_by_index::<i64>(0)
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}
