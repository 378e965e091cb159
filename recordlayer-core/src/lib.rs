//! A storage-agnostic CRUD persistence layer that provides a uniform contract for working with identity-keyed records.
//!
//! This crate is the core of the recordlayer project and provides:
//!
//! - **Entity contract** ([`entity`]) - Core traits for defining records and their identities
//! - **Persistence engine abstraction** ([`engine`]) - The uniform operation contract implemented by every backend
//! - **Loader/saver collaborators** ([`persister`]) - Narrow contracts for durable media
//! - **Configuration parameters** ([`config`]) - Key/value options consumed by backends
//! - **List-query hooks** ([`query`]) - Caller-supplied filtering and ordering for listing operations
//! - **Paging** ([`page`]) - Page results and paging parameters
//! - **Error handling** ([`error`]) - Typed errors and result types
//!
//! # Example
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
//!
//!     fn id(&self) -> Option<&String> {
//!         self.id.as_ref()
//!     }
//!
//!     fn set_id(&mut self, id: String) {
//!         self.id = Some(id);
//!     }
//!
//!     fn store_name() -> &'static str {
//!         "users"
//!     }
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as recordlayer_core;

pub mod config;
pub mod engine;
pub mod entity;
pub mod error;
pub mod page;
pub mod persister;
pub mod query;
