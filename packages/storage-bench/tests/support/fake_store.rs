//! In-memory store that understands the statements the harness issues.
//!
//! Tables are row counters. Every call advances a shared [`FakeClock`] by a
//! latency derived from the rows it touches, so timings in tests are exact.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use storage_bench::store::Value;
use storage_bench::{Clock, Store, StoreError};

/// Manually advanced clock shared with the store.
#[derive(Debug, Default)]
pub struct FakeClock {
    nanos: AtomicU64,
}

impl FakeClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn advance(&self, by: Duration) {
        let by = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        self.nanos.fetch_add(by, Ordering::SeqCst);
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

/// Latency model, before the per-table factor is applied.
#[derive(Debug, Clone, Copy)]
pub struct Cost {
    pub per_call: Duration,
    pub per_written_row: Duration,
    pub per_scanned_row: Duration,
}

impl Default for Cost {
    fn default() -> Self {
        Self {
            per_call: Duration::from_micros(50),
            per_written_row: Duration::from_micros(2),
            per_scanned_row: Duration::from_nanos(100),
        }
    }
}

impl Cost {
    pub fn free() -> Self {
        Self {
            per_call: Duration::ZERO,
            per_written_row: Duration::ZERO,
            per_scanned_row: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub sql: String,
    pub params: Vec<Value>,
}

#[derive(Debug, Clone, Copy)]
struct Table {
    rows: i64,
    /// Rows matched by any filtered count.
    hits: i64,
    unlogged: bool,
}

#[derive(Debug)]
struct FailRule {
    needle: String,
    successes_left: usize,
    message: String,
}

#[derive(Debug, Default)]
struct State {
    tables: HashMap<String, Table>,
    factors: HashMap<String, f64>,
    log: Vec<Call>,
    rules: Vec<FailRule>,
}

pub struct FakeStore {
    clock: Arc<FakeClock>,
    cost: Cost,
    state: Mutex<State>,
}

impl FakeStore {
    pub fn new(clock: Arc<FakeClock>) -> Self {
        Self {
            clock,
            cost: Cost::default(),
            state: Mutex::new(State::default()),
        }
    }

    pub fn with_cost(mut self, cost: Cost) -> Self {
        self.cost = cost;
        self
    }

    /// Pre-existing table holding `rows` rows, a tenth of which match filters.
    pub fn with_table(self, table: &str, rows: i64) -> Self {
        self.state.lock().tables.insert(
            table.to_string(),
            Table {
                rows,
                hits: rows / 10,
                unlogged: false,
            },
        );
        self
    }

    /// Scale every latency on `table` by `factor`.
    pub fn with_factor(self, table: &str, factor: f64) -> Self {
        self.state.lock().factors.insert(table.to_string(), factor);
        self
    }

    /// Fail every statement containing `needle`.
    pub fn fail_on(&self, needle: &str, message: &str) {
        self.fail_after(needle, 0, message);
    }

    /// Let `successes` statements containing `needle` through, then fail.
    pub fn fail_after(&self, needle: &str, successes: usize, message: &str) {
        self.state.lock().rules.push(FailRule {
            needle: needle.to_string(),
            successes_left: successes,
            message: message.to_string(),
        });
    }

    pub fn rows(&self, table: &str) -> Option<i64> {
        self.state.lock().tables.get(table).map(|t| t.rows)
    }

    pub fn is_unlogged(&self, table: &str) -> Option<bool> {
        self.state.lock().tables.get(table).map(|t| t.unlogged)
    }

    pub fn log(&self) -> Vec<Call> {
        self.state.lock().log.clone()
    }

    /// Logged calls whose SQL mentions `table`.
    pub fn calls_on(&self, table: &str) -> Vec<Call> {
        self.log()
            .into_iter()
            .filter(|c| c.sql.contains(table))
            .collect()
    }

    fn call(&self, sql: &str, params: Vec<Value>) -> Result<i64, StoreError> {
        let mut state = self.state.lock();
        state.log.push(Call {
            sql: sql.to_string(),
            params: params.clone(),
        });

        if let Some(rule) = state.rules.iter_mut().find(|r| sql.contains(&r.needle)) {
            if rule.successes_left == 0 {
                let message = rule.message.clone();
                drop(state);
                self.clock.advance(self.cost.per_call);
                return Err(StoreError::Db(message));
            }
            rule.successes_left -= 1;
        }

        let (result, table, written, scanned) = apply(&mut state, sql, &params)?;
        let factor = table
            .and_then(|t| state.factors.get(&t).copied())
            .unwrap_or(1.0);
        drop(state);

        let latency = self.cost.per_call
            + self.cost.per_written_row * to_u32(written)
            + self.cost.per_scanned_row * to_u32(scanned);
        let scaled = (latency.as_nanos() as f64 * factor).round() as u64;
        self.clock.advance(Duration::from_nanos(scaled));
        Ok(result)
    }
}

#[async_trait]
impl Store for FakeStore {
    async fn execute(&self, sql: &str, params: Vec<Value>) -> Result<u64, StoreError> {
        self.call(sql, params)
            .map(|n| u64::try_from(n).unwrap_or_default())
    }

    async fn query_scalar(&self, sql: &str, params: Vec<Value>) -> Result<i64, StoreError> {
        self.call(sql, params)
    }
}

/// (result, table touched, rows written, rows scanned)
type Applied = (i64, Option<String>, i64, i64);

fn apply(state: &mut State, sql: &str, params: &[Value]) -> Result<Applied, StoreError> {
    if let Some(table) = table_after(sql, "DROP TABLE IF EXISTS ") {
        state.tables.remove(table);
        return Ok((0, Some(table.to_string()), 0, 0));
    }

    for (prefix, unlogged) in [("CREATE TABLE ", false), ("CREATE UNLOGGED TABLE ", true)] {
        if let Some(table) = table_after(sql, prefix) {
            if state.tables.contains_key(table) {
                return Err(StoreError::Db(format!(
                    "relation \"{table}\" already exists"
                )));
            }
            state.tables.insert(
                table.to_string(),
                Table {
                    rows: 0,
                    hits: 0,
                    unlogged,
                },
            );
            return Ok((0, Some(table.to_string()), 0, 0));
        }
    }

    if sql.starts_with("SELECT COUNT(*) FROM pg_class") {
        let found = match params.first() {
            Some(Value::String(Some(name))) => state.tables.contains_key(name.as_str()),
            _ => false,
        };
        return Ok((i64::from(found), None, 0, 0));
    }

    if let Some(table) = table_after(sql, "INSERT INTO ") {
        let rows = if sql.contains("generate_series") {
            match params.first() {
                Some(Value::BigInt(Some(n))) => *n,
                other => {
                    return Err(StoreError::Db(format!(
                        "unexpected bulk insert parameter {other:?}"
                    )))
                }
            }
        } else {
            1
        };
        let t = existing(state, table)?;
        t.rows += rows;
        return Ok((rows, Some(table.to_string()), rows, 0));
    }

    if let Some(table) = table_after(sql, "SELECT COUNT(*) FROM ") {
        let t = existing(state, table)?;
        let result = if sql.contains(" WHERE ") { t.hits } else { t.rows };
        let scanned = t.rows;
        return Ok((result, Some(table.to_string()), 0, scanned));
    }

    if let Some(table) = table_after(sql, "DELETE FROM ") {
        let t = existing(state, table)?;
        let deleted = t.rows;
        t.rows = 0;
        t.hits = 0;
        return Ok((deleted, Some(table.to_string()), deleted, 0));
    }

    Err(StoreError::Db(format!("unsupported statement: {sql}")))
}

fn existing<'s>(state: &'s mut State, table: &str) -> Result<&'s mut Table, StoreError> {
    state
        .tables
        .get_mut(table)
        .ok_or_else(|| StoreError::Db(format!("relation \"{table}\" does not exist")))
}

fn table_after<'a>(sql: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = sql.strip_prefix(prefix)?;
    rest.split(|c: char| c.is_whitespace() || c == '(').next()
}

fn to_u32(n: i64) -> u32 {
    u32::try_from(n.max(0)).unwrap_or(u32::MAX)
}
