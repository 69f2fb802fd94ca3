//! Database Module
//!
//! Statement execution behind the [`Executor`] trait, the cached query layer
//! on top of it, and the in-memory `messages` table.

mod executor;
mod memory;
mod query;

pub use executor::Executor;
pub use memory::{Message, MemoryDatabase, INSERT_MESSAGE_SQL, LIST_MESSAGES_SQL};
pub use query::{cache_key, QueryLayer, QueryOptions};
