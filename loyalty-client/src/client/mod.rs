//! Table clients
//!
//! [`TableClient`] is the generic row interface the gateway is written
//! against. Two implementations:
//! - [`RestTableClient`]: hosted store over HTTP
//! - [`memory::MemoryTableClient`]: in-process tables (feature `in-memory`)

#[cfg(any(test, feature = "in-memory"))]
pub mod memory;
mod rest;

pub use rest::RestTableClient;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::ClientResult;
use crate::query::{Filter, Query};

/// Generic row CRUD over JSON rows
#[async_trait]
pub trait TableClient: Send + Sync {
    /// Rows of `table` matching `query`
    async fn select(&self, table: &str, query: &Query) -> ClientResult<Vec<Value>>;

    /// Insert rows, returning them as stored
    async fn insert(&self, table: &str, rows: Vec<Value>) -> ClientResult<Vec<Value>>;

    /// Merge `patch` into every row matching `filters`, returning the updated rows
    async fn update(&self, table: &str, filters: &[Filter], patch: Value) -> ClientResult<Vec<Value>>;

    /// Delete every row matching `filters`
    async fn delete(&self, table: &str, filters: &[Filter]) -> ClientResult<()>;

    /// Insert rows, merging into existing rows that share the `on_conflict` column
    async fn upsert(&self, table: &str, rows: Vec<Value>, on_conflict: &str) -> ClientResult<Vec<Value>>;
}

#[async_trait]
impl<T: TableClient + ?Sized> TableClient for Arc<T> {
    async fn select(&self, table: &str, query: &Query) -> ClientResult<Vec<Value>> {
        (**self).select(table, query).await
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> ClientResult<Vec<Value>> {
        (**self).insert(table, rows).await
    }

    async fn update(&self, table: &str, filters: &[Filter], patch: Value) -> ClientResult<Vec<Value>> {
        (**self).update(table, filters, patch).await
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> ClientResult<()> {
        (**self).delete(table, filters).await
    }

    async fn upsert(&self, table: &str, rows: Vec<Value>, on_conflict: &str) -> ClientResult<Vec<Value>> {
        (**self).upsert(table, rows, on_conflict).await
    }
}
