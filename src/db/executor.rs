//! Statement Executor
//!
//! The seam between the query layer and whatever actually runs SQL.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Runs a statement with positional parameters and returns its rows.
///
/// Rows are JSON objects keyed by column name. Write statements return a
/// single row describing the outcome.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<Vec<Value>>;
}
