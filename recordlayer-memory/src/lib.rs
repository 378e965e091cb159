//! Concurrency-safe in-memory persistence engine for recordlayer.
//!
//! This crate provides the authoritative in-memory implementation of the
//! [`PersistenceEngine`](recordlayer_core::engine::PersistenceEngine) contract.
//! It owns an ordered working set guarded by an async-aware read-write lock and
//! optionally mirrors it to a durable medium through the loader/saver
//! collaborators: the loader hydrates the set at open time, the saver is
//! invoked as the last step of every mutating call (save-on-mutation) and once
//! more at close time.
//!
//! # Features
//!
//! - **Linearized mutations** - every write holds the writer lock for its full
//!   duration, flush included, so readers never observe an unflushed mutation
//! - **Snapshot reads** - lookups and listings return independent copies, never
//!   live references into the working set
//! - **Optional durability** - an engine bound to no loader/saver behaves as
//!   pure, non-durable memory
//!
//! # Quick Start
//!
//! ```ignore
//! use recordlayer::{Entity, PersistenceEngine, memory::MemoryPersistence};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct User {
//!     pub id: Option<String>,
//!     pub name: String,
//! }
//!
//! impl Entity for User {
//!     type Id = String;
//!     fn id(&self) -> Option<&String> { self.id.as_ref() }
//!     fn set_id(&mut self, id: String) { self.id = Some(id); }
//!     fn store_name() -> &'static str { "users" }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MemoryPersistence::<User>::new();
//!     store.open(None).await?;
//!
//!     let user = store.create(None, User { id: None, name: "Alice".to_string() }).await?;
//!     assert!(user.id.is_some());
//!
//!     store.close(None).await?;
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as recordlayer_memory;

pub mod store;

pub use store::MemoryPersistence;
