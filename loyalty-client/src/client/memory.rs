//! In-process table store
//!
//! Behaves like the hosted store for the operations the gateway uses:
//! `id` primary keys, foreign keys with cascading delete, equality filters,
//! ordering and limit. Errors carry the same Postgres codes the store would
//! return. Tests can queue a one-shot failure per table and operation, and
//! inspect the log of calls made.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::DateTime;
use parking_lot::Mutex;
use serde_json::{Map, Value};

use super::TableClient;
use crate::error::UNDEFINED_TABLE;
use crate::query::{Direction, Filter, Query};
use crate::rows::{CUSTOMERS, REDEMPTIONS, REWARDS, VISITS};
use crate::{ClientError, ClientResult};

const PRIMARY_KEY: &str = "id";
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Table operation, as recorded in the call log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Select,
    Insert,
    Update,
    Delete,
    Upsert,
}

impl Operation {
    pub fn is_write(self) -> bool {
        !matches!(self, Operation::Select)
    }
}

/// `table.column` references `target.id`; deleting the target deletes the row
#[derive(Debug, Clone)]
struct ForeignKey {
    table: String,
    column: String,
    target: String,
}

#[derive(Debug, Default)]
struct Inner {
    tables: HashMap<String, Vec<Value>>,
    foreign_keys: Vec<ForeignKey>,
    failures: HashSet<(String, Operation)>,
    log: Vec<(String, Operation)>,
}

/// In-memory [`TableClient`]
#[derive(Debug, Default)]
pub struct MemoryTableClient {
    inner: Mutex<Inner>,
}

impl MemoryTableClient {
    /// Store with no tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with the loyalty tables and their foreign keys
    pub fn with_loyalty_schema() -> Self {
        let store = Self::new();
        for table in [CUSTOMERS, VISITS, REWARDS, REDEMPTIONS] {
            store.create_table(table);
        }
        store.add_foreign_key(VISITS, "customer_id", CUSTOMERS);
        store.add_foreign_key(REDEMPTIONS, "customer_id", CUSTOMERS);
        store
    }

    pub fn create_table(&self, table: &str) {
        self.inner.lock().tables.entry(table.to_string()).or_default();
    }

    /// Declare `table.column -> target.id` with cascading delete
    pub fn add_foreign_key(&self, table: &str, column: &str, target: &str) {
        self.inner.lock().foreign_keys.push(ForeignKey {
            table: table.to_string(),
            column: column.to_string(),
            target: target.to_string(),
        });
    }

    /// Make the next `operation` on `table` fail with a connection error
    pub fn fail_next(&self, table: &str, operation: Operation) {
        self.inner
            .lock()
            .failures
            .insert((table.to_string(), operation));
    }

    /// Snapshot of a table's rows, in insertion order
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.inner.lock().tables.get(table).cloned().unwrap_or_default()
    }

    /// Every call made so far (including failed ones)
    pub fn operations(&self) -> Vec<(String, Operation)> {
        self.inner.lock().log.clone()
    }

    /// Calls that modify data
    pub fn write_operations(&self) -> Vec<(String, Operation)> {
        self.operations()
            .into_iter()
            .filter(|(_, op)| op.is_write())
            .collect()
    }

    pub fn clear_operations(&self) {
        self.inner.lock().log.clear();
    }
}

impl Inner {
    /// Log the call and consume an injected failure
    fn begin(&mut self, table: &str, operation: Operation) -> ClientResult<()> {
        self.log.push((table.to_string(), operation));
        if self.failures.remove(&(table.to_string(), operation)) {
            return Err(ClientError::Connection(format!(
                "injected {operation:?} failure on {table}"
            )));
        }
        if !self.tables.contains_key(table) {
            return Err(ClientError::Api {
                status: 404,
                code: UNDEFINED_TABLE.to_string(),
                message: format!("relation \"public.{table}\" does not exist"),
                details: None,
                hint: None,
            });
        }
        Ok(())
    }

    fn check_foreign_keys(&self, table: &str, row: &Value) -> ClientResult<()> {
        for fk in self.foreign_keys.iter().filter(|fk| fk.table == table) {
            let Some(value) = row.get(&fk.column).filter(|v| !v.is_null()) else {
                continue;
            };
            let exists = self
                .tables
                .get(&fk.target)
                .is_some_and(|rows| rows.iter().any(|r| r.get(PRIMARY_KEY) == Some(value)));
            if !exists {
                return Err(ClientError::Api {
                    status: 409,
                    code: FOREIGN_KEY_VIOLATION.to_string(),
                    message: format!(
                        "insert or update on table \"{table}\" violates foreign key constraint \"{table}_{}_fkey\"",
                        fk.column
                    ),
                    details: Some(format!(
                        "Key ({})=({}) is not present in table \"{}\".",
                        fk.column,
                        value_text(value),
                        fk.target
                    )),
                    hint: None,
                });
            }
        }
        Ok(())
    }

    fn check_unique(&self, table: &str, row: &Value) -> ClientResult<()> {
        let Some(id) = row.get(PRIMARY_KEY) else {
            return Ok(());
        };
        let rows = self.tables.get(table).map(Vec::as_slice).unwrap_or_default();
        if rows.iter().any(|r| r.get(PRIMARY_KEY) == Some(id)) {
            return Err(ClientError::Api {
                status: 409,
                code: UNIQUE_VIOLATION.to_string(),
                message: format!("duplicate key value violates unique constraint \"{table}_pkey\""),
                details: Some(format!("Key (id)=({}) already exists.", value_text(id))),
                hint: None,
            });
        }
        Ok(())
    }

    /// Delete matching rows of `table` and, transitively, rows referencing them
    fn delete_cascade(&mut self, table: &str, filters: &[Filter]) {
        let Some(rows) = self.tables.get_mut(table) else {
            return;
        };
        let mut removed = Vec::new();
        rows.retain(|row| {
            let hit = filters.iter().all(|f| f.matches(row));
            if hit {
                if let Some(id) = row.get(PRIMARY_KEY) {
                    removed.push(id.clone());
                }
            }
            !hit
        });

        let dependents: Vec<ForeignKey> = self
            .foreign_keys
            .iter()
            .filter(|fk| fk.target == table)
            .cloned()
            .collect();
        for fk in dependents {
            for id in &removed {
                self.delete_cascade(&fk.table, &[Filter::eq(fk.column.clone(), id.clone())]);
            }
        }
    }
}

#[async_trait]
impl TableClient for MemoryTableClient {
    async fn select(&self, table: &str, query: &Query) -> ClientResult<Vec<Value>> {
        let mut inner = self.inner.lock();
        inner.begin(table, Operation::Select)?;

        let mut rows: Vec<Value> = inner.tables[table]
            .iter()
            .filter(|row| query.matches(row))
            .cloned()
            .collect();
        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ord = compare(a.get(&order.column), b.get(&order.column));
                match order.direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            });
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> ClientResult<Vec<Value>> {
        let mut inner = self.inner.lock();
        inner.begin(table, Operation::Insert)?;

        // All or nothing, like a single INSERT statement
        let mut staged = inner.tables[table].clone();
        for row in &rows {
            expect_object(row)?;
            inner.check_foreign_keys(table, row)?;
            inner.check_unique(table, row)?;
            if let Some(id) = row.get(PRIMARY_KEY) {
                if staged.iter().any(|r| r.get(PRIMARY_KEY) == Some(id)) {
                    return Err(ClientError::Api {
                        status: 409,
                        code: UNIQUE_VIOLATION.to_string(),
                        message: format!("duplicate key value violates unique constraint \"{table}_pkey\""),
                        details: None,
                        hint: None,
                    });
                }
            }
            staged.push(row.clone());
        }
        inner.tables.insert(table.to_string(), staged);
        Ok(rows)
    }

    async fn update(&self, table: &str, filters: &[Filter], patch: Value) -> ClientResult<Vec<Value>> {
        let mut inner = self.inner.lock();
        inner.begin(table, Operation::Update)?;
        let patch = expect_object(&patch)?.clone();

        let mut staged = inner.tables[table].clone();
        let mut updated = Vec::new();
        for row in staged.iter_mut().filter(|row| filters.iter().all(|f| f.matches(row))) {
            merge(row, &patch);
            inner.check_foreign_keys(table, row)?;
            updated.push(row.clone());
        }
        inner.tables.insert(table.to_string(), staged);
        Ok(updated)
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> ClientResult<()> {
        let mut inner = self.inner.lock();
        inner.begin(table, Operation::Delete)?;
        inner.delete_cascade(table, filters);
        Ok(())
    }

    async fn upsert(&self, table: &str, rows: Vec<Value>, on_conflict: &str) -> ClientResult<Vec<Value>> {
        let mut inner = self.inner.lock();
        inner.begin(table, Operation::Upsert)?;

        let mut staged = inner.tables[table].clone();
        let mut stored = Vec::with_capacity(rows.len());
        for row in rows {
            let fields = expect_object(&row)?.clone();
            inner.check_foreign_keys(table, &row)?;
            let position = row
                .get(on_conflict)
                .and_then(|k| staged.iter().position(|r| r.get(on_conflict) == Some(k)));
            match position {
                Some(i) => {
                    merge(&mut staged[i], &fields);
                    stored.push(staged[i].clone());
                }
                None => {
                    staged.push(row.clone());
                    stored.push(row);
                }
            }
        }
        inner.tables.insert(table.to_string(), staged);
        Ok(stored)
    }
}

fn expect_object(value: &Value) -> ClientResult<&Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| ClientError::InvalidResponse(format!("row must be a JSON object, got {value}")))
}

fn merge(row: &mut Value, patch: &Map<String, Value>) {
    if let Some(fields) = row.as_object_mut() {
        for (k, v) in patch {
            fields.insert(k.clone(), v.clone());
        }
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Column ordering: nulls last, numbers numerically, RFC 3339 timestamps by
/// instant, everything else as text
fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => {
            match (DateTime::parse_from_rfc3339(x), DateTime::parse_from_rfc3339(y)) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => x.cmp(y),
            }
        }
        (Some(x), Some(y)) => value_text(x).cmp(&value_text(y)),
    }
}
