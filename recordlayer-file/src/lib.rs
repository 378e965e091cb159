//! File-backed persistence engine for recordlayer.
//!
//! This crate durably mirrors the in-memory engine to a single JSON file:
//!
//! - [`JsonFilePersister`] - a concrete loader/saver pair that (de)serializes
//!   the whole record collection to one pretty-printed JSON array file
//! - [`FilePersistence`] - the in-memory engine bound to that persister, so
//!   every mutation is flushed to the file and every open re-reads it
//!
//! An absent file is an empty collection, not an error. Writes overwrite the
//! file wholesale with no partial-write protection: a process interruption
//! mid-write can leave a truncated file behind.
//!
//! # Quick Start
//!
//! ```ignore
//! use recordlayer::{Entity, PersistenceEngine, file::FilePersistence};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = FilePersistence::<User>::with_path("users.json");
//!     store.open(None).await?;
//!
//!     store.create(None, User { id: None, name: "Alice".to_string() }).await?;
//!
//!     store.close(None).await?;
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as recordlayer_file;

pub mod persister;
pub mod store;

pub use persister::JsonFilePersister;
pub use store::FilePersistence;
