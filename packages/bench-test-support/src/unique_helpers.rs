//! Unique scratch-table names so live-database tests never collide with each
//! other or with a real benchmark run.

use ulid::Ulid;

/// Generate a unique, lowercase SQL identifier with the given prefix
///
/// # Examples
/// ```
/// use bench_test_support::unique_helpers::unique_table;
///
/// let a = unique_table("bench_scratch");
/// let b = unique_table("bench_scratch");
/// assert_ne!(a, b);
/// assert!(a.starts_with("bench_scratch_"));
/// ```
pub fn unique_table(prefix: &str) -> String {
    format!("{}_{}", prefix, Ulid::new().to_string().to_lowercase())
}
