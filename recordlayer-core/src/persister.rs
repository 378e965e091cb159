//! Loader and saver collaborator contracts for durable media.
//!
//! A persistence engine that owns an in-memory working set delegates durability
//! to these two narrow interfaces: the loader hydrates the full record set at
//! open time, the saver overwrites the medium with the full record set on every
//! flush. Both are optional on the engine side; an engine bound to neither
//! behaves as pure, non-durable memory.

use async_trait::async_trait;

use crate::error::StoreResult;

/// Reads the full record collection from a durable medium.
#[async_trait]
pub trait Loader<T>: Send + Sync {
    /// Loads every record held by the medium.
    ///
    /// An empty medium yields an empty vector and is not an error; only an
    /// unreadable or malformed medium fails.
    async fn load(&self, correlation_id: Option<&str>) -> StoreResult<Vec<T>>;
}

/// Writes the full record collection to a durable medium.
#[async_trait]
pub trait Saver<T>: Send + Sync {
    /// Overwrites the medium wholesale with `entities`.
    async fn save(&self, correlation_id: Option<&str>, entities: &[T]) -> StoreResult<()>;
}
