//! File-backed persistence engine composed from the in-memory engine.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use recordlayer_core::{
    config::ConfigParams,
    engine::{LifecycleState, PersistenceEngine},
    entity::Entity,
    error::StoreResult,
    page::{Page, PagingParams},
    persister::{Loader, Saver},
    query::ListQuery,
};
use recordlayer_memory::MemoryPersistence;

use crate::persister::JsonFilePersister;

/// In-memory persistence engine durably mirrored to a JSON file.
///
/// Composes a [`MemoryPersistence`] with one shared [`JsonFilePersister`] as
/// both loader and saver: opening re-reads the file, every mutation rewrites
/// it, closing flushes it a final time. All operation semantics (ordering,
/// tolerant misses, identity generation, paging caps, locking discipline) are
/// those of the in-memory engine.
#[derive(Debug)]
pub struct FilePersistence<T: Entity> {
    persister: Arc<JsonFilePersister<T>>,
    memory: MemoryPersistence<T>,
}

impl<T: Entity> FilePersistence<T> {
    /// Creates an unconfigured engine; [`FilePersistence::configure`] must
    /// supply the `path` option before it is opened.
    pub fn new() -> Self {
        Self::from_persister(JsonFilePersister::new())
    }

    /// Creates an engine targeting the given data file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self::from_persister(JsonFilePersister::with_path(path))
    }

    fn from_persister(persister: JsonFilePersister<T>) -> Self {
        let persister = Arc::new(persister);

        let memory = MemoryPersistence::bound(
            Some(Arc::clone(&persister) as Arc<dyn Loader<T>>),
            Some(Arc::clone(&persister) as Arc<dyn Saver<T>>),
        );

        Self { persister, memory }
    }

    /// Returns the file persister backing this engine.
    pub fn persister(&self) -> &JsonFilePersister<T> {
        &self.persister
    }

    /// Returns the current lifecycle state.
    pub async fn state(&self) -> LifecycleState {
        self.memory.state().await
    }
}

impl<T: Entity> Default for FilePersistence<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> PersistenceEngine<T> for FilePersistence<T> {
    /// Applies configuration to the persister (required `path`) and to the
    /// underlying in-memory engine (`max_page_size`).
    ///
    /// Rebinds the engine to a fresh persister, resetting any not-yet-opened
    /// working set.
    fn configure(&mut self, config: &ConfigParams) -> StoreResult<()> {
        let mut persister = JsonFilePersister::new();
        persister.configure(config)?;

        *self = Self::from_persister(persister);

        self.memory.configure(config)
    }

    async fn open(&self, correlation_id: Option<&str>) -> StoreResult<()> {
        self.memory.open(correlation_id).await
    }

    async fn close(&self, correlation_id: Option<&str>) -> StoreResult<()> {
        self.memory.close(correlation_id).await
    }

    async fn create(&self, correlation_id: Option<&str>, entity: T) -> StoreResult<T> {
        self.memory.create(correlation_id, entity).await
    }

    async fn update(&self, correlation_id: Option<&str>, entity: T) -> StoreResult<Option<T>> {
        self.memory.update(correlation_id, entity).await
    }

    async fn set(&self, correlation_id: Option<&str>, entity: T) -> StoreResult<T> {
        self.memory.set(correlation_id, entity).await
    }

    async fn delete_by_id(
        &self,
        correlation_id: Option<&str>,
        id: &T::Id,
    ) -> StoreResult<Option<T>> {
        self.memory.delete_by_id(correlation_id, id).await
    }

    async fn get_one_by_id(
        &self,
        correlation_id: Option<&str>,
        id: &T::Id,
    ) -> StoreResult<Option<T>> {
        self.memory.get_one_by_id(correlation_id, id).await
    }

    async fn get_list(
        &self,
        correlation_id: Option<&str>,
        query: ListQuery<T>,
    ) -> StoreResult<Vec<T>> {
        self.memory.get_list(correlation_id, query).await
    }

    async fn get_page(
        &self,
        correlation_id: Option<&str>,
        query: ListQuery<T>,
        paging: PagingParams,
    ) -> StoreResult<Page<T>> {
        self.memory.get_page(correlation_id, query, paging).await
    }

    async fn clear(&self, correlation_id: Option<&str>) -> StoreResult<()> {
        self.memory.clear(correlation_id).await
    }
}
