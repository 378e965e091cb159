//! Persistence engine abstraction shared by all storage backends.
//!
//! This module defines the uniform operation contract implemented identically
//! over the in-memory, file-backed, and remote backends. Backends are
//! independent implementations composed with the loader/saver collaborators
//! from [`crate::persister`]; there is no shared base implementation.
//!
//! # Overview
//!
//! The [`PersistenceEngine`] trait provides a unified async interface for the
//! full record lifecycle: open/close, create/update/set/delete, lookup, and
//! listing with caller-supplied hooks. Every operation threads an opaque
//! correlation token for cross-component log correlation.
//!
//! # Thread Safety
//!
//! All implementations must be thread-safe (`Send + Sync`) and support
//! concurrent access from multiple async tasks. The exact concurrency model
//! (read-write lock, remote round trips, ...) is implementation-specific but
//! must guarantee that readers never observe a partially applied mutation.
//!
//! # Cancellation
//!
//! All methods are async and follow the cancellation semantics typical of Rust
//! futures: dropping the returned future abandons the call at its next
//! suspension point (lock acquisition, file or network I/O). A mutation that
//! has already acquired its engine's writer lock applies to the working set
//! atomically; cancellation is cooperative and never leaves a partially
//! mutated record set behind.
//!
//! # Error Handling
//!
//! Operations return [`StoreResult<T>`](crate::error::StoreResult). Absent
//! targets are not errors: lookups, updates, and deletes return `Option` and
//! yield `None` for "no match". Every real failure is annotated with the
//! operation name, store name, and correlation token before it reaches the
//! caller.

use async_trait::async_trait;

use crate::{
    config::ConfigParams,
    entity::Entity,
    error::StoreResult,
    page::{Page, PagingParams},
    query::ListQuery,
};

/// Lifecycle state of a persistence engine instance.
///
/// The progression is strictly linear per instance:
/// `Unopened` -> `Open` -> `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    /// Constructed but not yet opened; the working set is empty.
    #[default]
    Unopened,
    /// Opened; the working set has been hydrated from the bound loader.
    Open,
    /// Closed; the working set has been flushed for the last time.
    Closed,
}

/// Uniform contract for creating, reading, updating, upserting, and deleting
/// uniquely-identified records.
///
/// Implemented identically by every backend:
///
/// - [`MemoryPersistence`](https://docs.rs/recordlayer-memory) - concurrency-safe in-memory store
/// - [`FilePersistence`](https://docs.rs/recordlayer-file) - file-backed variant mirroring the in-memory store
/// - [`MongoPersistence`](https://docs.rs/recordlayer-mongodb) - remote document-store adapter
///
/// Engines are configured once, opened once, used, and closed once. Every
/// operation accepts an optional correlation token that is carried into log
/// events and error annotations.
#[async_trait]
pub trait PersistenceEngine<T: Entity>: Send + Sync {
    /// Applies configuration parameters to this engine.
    ///
    /// Must be called before [`PersistenceEngine::open`]. Which keys are
    /// consumed is backend-specific; every backend honors
    /// `max_page_size`/`options.max_page_size` for listing caps.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`](crate::error::StoreError::Config) when a
    /// required setting is missing or invalid.
    fn configure(&mut self, config: &ConfigParams) -> StoreResult<()>;

    /// Opens the engine, hydrating its state from the bound medium.
    ///
    /// For in-memory engines this performs exactly one loader call and replaces
    /// the working set wholesale; for remote engines it establishes the
    /// connection. An empty medium yields an empty working set and is not an
    /// error. Transitions the lifecycle state to open.
    async fn open(&self, correlation_id: Option<&str>) -> StoreResult<()>;

    /// Closes the engine, flushing its state to the bound medium.
    ///
    /// Performs exactly one saver call (when a saver is bound) or tears down
    /// the remote connection. Transitions the lifecycle state to closed.
    async fn close(&self, correlation_id: Option<&str>) -> StoreResult<()>;

    /// Creates a new record.
    ///
    /// When the identity is unset and the identity type supports generation, a
    /// fresh, process-unique identity is assigned. The record is appended to
    /// the working set and the mutation is flushed before the call returns.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::IdentityRequired`](crate::error::StoreError::IdentityRequired)
    /// when the identity is unset and cannot be generated, and
    /// [`StoreError::AlreadyExists`](crate::error::StoreError::AlreadyExists)
    /// when the identity is already present.
    async fn create(&self, correlation_id: Option<&str>, entity: T) -> StoreResult<T>;

    /// Replaces the record with a matching identity, preserving its position.
    ///
    /// Returns `None` without mutating anything when no record matches
    /// (tolerant-miss policy - an absent target is not an error).
    async fn update(&self, correlation_id: Option<&str>, entity: T) -> StoreResult<Option<T>>;

    /// Upserts a record: replaces the record with a matching identity in
    /// place, or behaves as [`PersistenceEngine::create`] (including identity
    /// generation) when none matches. Always returns the resulting record.
    async fn set(&self, correlation_id: Option<&str>, entity: T) -> StoreResult<T>;

    /// Removes the record with the given identity and returns it.
    ///
    /// Returns `None` when no record matches; repeating the call is an
    /// idempotent no-op.
    async fn delete_by_id(&self, correlation_id: Option<&str>, id: &T::Id) -> StoreResult<Option<T>>;

    /// Returns a copy of the record with the given identity, or `None`.
    async fn get_one_by_id(&self, correlation_id: Option<&str>, id: &T::Id) -> StoreResult<Option<T>>;

    /// Returns an independent copy of the working set with the query's hooks
    /// applied, capped at the configured maximum page size.
    async fn get_list(&self, correlation_id: Option<&str>, query: ListQuery<T>) -> StoreResult<Vec<T>>;

    /// Returns one page of the working set with the query's hooks applied.
    ///
    /// The requested page size is capped at the configured maximum.
    async fn get_page(
        &self,
        correlation_id: Option<&str>,
        query: ListQuery<T>,
        paging: PagingParams,
    ) -> StoreResult<Page<T>>;

    /// Removes every record from the store and flushes the now-empty set.
    async fn clear(&self, correlation_id: Option<&str>) -> StoreResult<()>;
}
