//! In-Memory Message Table
//!
//! An [`Executor`] holding the `messages` table in process memory. It answers
//! the two statements the message API issues and rejects everything else.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::debug;

use crate::db::Executor;
use crate::error::{AppError, Result};

/// Lists every message, newest first.
pub const LIST_MESSAGES_SQL: &str = "SELECT * FROM messages ORDER BY created_at DESC";

/// Inserts a message; parameters are name, email, message.
pub const INSERT_MESSAGE_SQL: &str = "INSERT INTO messages (name, email, message) VALUES (?, ?, ?)";

// == Message Row ==
/// A row of the `messages` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct MessageTable {
    rows: Vec<Message>,
    next_id: u64,
}

// == Memory Database ==
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    messages: RwLock<MessageTable>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    async fn list_messages(&self) -> Result<Vec<Value>> {
        let table = self.messages.read().await;
        let mut rows: Vec<&Message> = table.rows.iter().collect();
        // Ties on created_at fall back to insertion order, newest first
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        rows.into_iter()
            .map(|row| serde_json::to_value(row).map_err(|e| AppError::Internal(e.to_string())))
            .collect()
    }

    async fn insert_message(&self, params: &[Value]) -> Result<Vec<Value>> {
        let [name, email, message] = params else {
            return Err(AppError::InvalidParams(format!(
                "expected 3 parameters, got {}",
                params.len()
            )));
        };

        let text = |value: &Value, column: &str| -> Result<String> {
            value
                .as_str()
                .map(str::to_owned)
                .ok_or_else(|| AppError::InvalidParams(format!("{column} must be a string")))
        };
        let name = text(name, "name")?;
        let email = text(email, "email")?;
        let message = text(message, "message")?;

        let mut table = self.messages.write().await;
        table.next_id += 1;
        let id = table.next_id;
        table.rows.push(Message {
            id,
            name,
            email,
            message,
            created_at: Utc::now(),
        });
        debug!(id, "Inserted message");

        Ok(vec![json!({ "insertId": id, "affectedRows": 1 })])
    }
}

#[async_trait]
impl Executor for MemoryDatabase {
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<Vec<Value>> {
        match sql.trim() {
            LIST_MESSAGES_SQL => self.list_messages().await,
            INSERT_MESSAGE_SQL => self.insert_message(params).await,
            other => Err(AppError::UnsupportedStatement(other.to_string())),
        }
    }
}
