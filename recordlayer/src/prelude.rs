//! Convenient re-exports of commonly used types from recordlayer.
//!
//! Import this prelude module to quickly access the most frequently used types
//! and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use recordlayer::prelude::*;
//! ```
//!
//! This provides access to:
//! - The entity contract and id generation
//! - The persistence engine trait and lifecycle states
//! - Loader/saver collaborator contracts
//! - Configuration, paging, and list-query types
//! - Error types

pub use recordlayer_core::{
    config::{ConfigParams, ConnectionParams, CredentialParams},
    engine::{LifecycleState, PersistenceEngine},
    entity::{Entity, EntityId, IdGenerator},
    error::{StoreError, StoreResult},
    page::{Page, PagingParams},
    persister::{Loader, Saver},
    query::{FilterPredicate, ListQuery, SortComparator},
};
