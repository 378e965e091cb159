//! Main recordlayer crate providing a uniform CRUD persistence contract over
//! pluggable storage backends.
//!
//! This crate is the primary entry point for users of the recordlayer
//! framework. It re-exports the core types from the sub-crates and provides
//! convenient access to the storage backends.
//!
//! # Features
//!
//! - **One contract, three backends** - the same create/update/set/delete/get
//!   operations over pure memory, a JSON data file, and MongoDB
//! - **Identity management** - caller-supplied or engine-generated identities,
//!   declared per id type at compile time
//! - **Save-on-mutation durability** - file-backed stores flush every mutation
//!   before the call returns
//! - **Correlation ids** - an opaque trace token threaded through every
//!   operation, log event, and error annotation
//!
//! # Quick Start
//!
//! ```ignore
//! use recordlayer::{prelude::*, memory::MemoryPersistence};
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
//! async fn main() {
//!     let store = MemoryPersistence::<User>::new();
//!     store.open(None).await.unwrap();
//!
//!     // Create a user; the identity is generated because it is unset.
//!     let user = store
//!         .create(Some("req-1"), User { id: None, name: "Alice".to_string() })
//!         .await
//!         .unwrap();
//!
//!     // Look it up again.
//!     let found = store
//!         .get_one_by_id(Some("req-1"), user.id.as_ref().unwrap())
//!         .await
//!         .unwrap();
//!     assert!(found.is_some());
//!
//!     store.close(None).await.unwrap();
//! }
//! ```
//!
//! # Durable Variants
//!
//! Swapping the backend does not change a single call site. The file-backed
//! engine mirrors the in-memory store to one JSON array file:
//!
//! ```ignore
//! use recordlayer::{prelude::*, file::FilePersistence};
//!
//! let store = FilePersistence::<User>::with_path("users.json");
//! store.open(None).await?;                  // loads the file (absent = empty)
//! store.create(None, user).await?;          // flushes before returning
//! store.close(None).await?;                 // final flush
//! ```
//!
//! The MongoDB adapter (behind the `mongodb` feature) implements the same
//! contract with no local cache, configured through the `connection.*`,
//! `credential.*`, and `options.*` parameter sections:
//!
//! ```ignore
//! use recordlayer::{prelude::*, mongodb::MongoPersistence};
//!
//! let mut store = MongoPersistence::<User>::new();
//! store.configure(&ConfigParams::from_tuples(&[
//!     ("connection.type", "mongodb"),
//!     ("connection.host", "localhost"),
//!     ("connection.port", "27017"),
//!     ("connection.database", "app"),
//! ]))?;
//! store.open(None).await?;
//! ```
//!
//! # Backends
//!
//! - [`memory`] - concurrency-safe in-memory storage
//! - [`file`] - in-memory storage durably mirrored to a JSON file
//! - [`mongodb`] - remote MongoDB adapter (requires the `mongodb` feature)

pub mod prelude;

pub use recordlayer_core::{config, engine, entity, error, page, persister, query};

/// In-memory storage backend.
pub mod memory {
    pub use recordlayer_memory::MemoryPersistence;
}

/// File-backed storage backend.
pub mod file {
    pub use recordlayer_file::{FilePersistence, JsonFilePersister};
}

/// MongoDB storage backend.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use recordlayer_mongodb::MongoPersistence;
}
