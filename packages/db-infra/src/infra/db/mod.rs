pub mod core;

pub use core::{connect, database_exists, sanitize_db_url};
