//! Shared database configuration and connection infrastructure.
//! Used by the benchmark binary and the harness's live-database tests.

pub mod config;
pub mod error;
pub mod infra;

pub use config::db;
pub use error::DbInfraError;
pub use infra::db::core::{connect, database_exists, sanitize_db_url};

#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    bench_test_support::logging::init();
}
