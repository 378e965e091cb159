//! In-memory persistence engine with flush-on-write durability hooks.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use mea::rwlock::RwLock;
use tracing::trace;

use recordlayer_core::{
    config::ConfigParams,
    engine::{LifecycleState, PersistenceEngine},
    entity::{Entity, ensure_identity},
    error::{StoreError, StoreResult},
    page::{Page, PagingParams},
    persister::{Loader, Saver},
    query::ListQuery,
};

const DEFAULT_MAX_PAGE_SIZE: usize = 100;

/// Concurrency-safe in-memory store of identity-keyed records.
///
/// The working set is an ordered sequence guarded by an async read-write lock:
/// creates append, updates and set-replacements keep the replaced record's
/// position. Multiple lookups and listings proceed concurrently; every
/// mutating call takes the writer lock for its entire duration, including the
/// flush to the bound [`Saver`], so a mutation and its flush are observed as
/// one atomic unit by any subsequent reader.
///
/// # Thread Safety
///
/// `MemoryPersistence` is cloneable and shares its state through `Arc`, so
/// clones of the same instance operate on the same working set across tasks.
///
/// # Durability
///
/// Both collaborators are optional. With neither bound the engine is pure
/// memory; with a loader, [`open`](PersistenceEngine::open) replaces the
/// working set wholesale; with a saver, every mutation and the final
/// [`close`](PersistenceEngine::close) flush the full set. There is no
/// batching or write buffering.
#[derive(Clone)]
pub struct MemoryPersistence<T: Entity> {
    store_name: &'static str,
    entities: Arc<RwLock<Vec<T>>>,
    state: Arc<RwLock<LifecycleState>>,
    loader: Option<Arc<dyn Loader<T>>>,
    saver: Option<Arc<dyn Saver<T>>>,
    max_page_size: usize,
}

impl<T: Entity> MemoryPersistence<T> {
    /// Creates a pure in-memory engine with no durability collaborators.
    pub fn new() -> Self {
        Self::bound(None, None)
    }

    /// Creates an engine bound to the given loader and saver.
    ///
    /// Either collaborator may be absent; a missing loader makes `open` a pure
    /// state transition, a missing saver disables flushing.
    pub fn bound(
        loader: Option<Arc<dyn Loader<T>>>,
        saver: Option<Arc<dyn Saver<T>>>,
    ) -> Self {
        Self {
            store_name: T::store_name(),
            entities: Arc::new(RwLock::new(Vec::new())),
            state: Arc::new(RwLock::new(LifecycleState::Unopened)),
            loader,
            saver,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }

    /// Returns the current lifecycle state.
    pub async fn state(&self) -> LifecycleState {
        *self.state.read().await
    }

    /// Flushes `entities` through the bound saver, if any.
    ///
    /// Callers invoke this while still holding the writer lock on the working
    /// set, which is what makes a mutation and its flush atomic for readers.
    async fn flush(
        &self,
        operation: &'static str,
        correlation_id: Option<&str>,
        entities: &[T],
    ) -> StoreResult<()> {
        if let Some(saver) = &self.saver {
            saver
                .save(correlation_id, entities)
                .await
                .map_err(|e| e.annotate(operation, self.store_name, correlation_id))?;

            trace!(correlation_id, "saved {} of {}", entities.len(), self.store_name);
        }

        Ok(())
    }

    async fn snapshot(&self) -> Vec<T> {
        self.entities.read().await.clone()
    }
}

impl<T: Entity> Default for MemoryPersistence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> fmt::Debug for MemoryPersistence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryPersistence")
            .field("store_name", &self.store_name)
            .field("max_page_size", &self.max_page_size)
            .field("loader", &self.loader.is_some())
            .field("saver", &self.saver.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<T: Entity> PersistenceEngine<T> for MemoryPersistence<T> {
    fn configure(&mut self, config: &ConfigParams) -> StoreResult<()> {
        self.max_page_size = config
            .get_as("max_page_size")
            .or_else(|| config.get_section("options").get_as("max_page_size"))
            .unwrap_or(self.max_page_size);

        Ok(())
    }

    async fn open(&self, correlation_id: Option<&str>) -> StoreResult<()> {
        let mut entities = self.entities.write().await;

        if let Some(loader) = &self.loader {
            *entities = loader
                .load(correlation_id)
                .await
                .map_err(|e| e.annotate("open", self.store_name, correlation_id))?;

            trace!(correlation_id, "loaded {} of {}", entities.len(), self.store_name);
        }

        *self.state.write().await = LifecycleState::Open;

        Ok(())
    }

    async fn close(&self, correlation_id: Option<&str>) -> StoreResult<()> {
        let entities = self.entities.write().await;

        self.flush("close", correlation_id, &entities).await?;

        *self.state.write().await = LifecycleState::Closed;

        Ok(())
    }

    async fn create(&self, correlation_id: Option<&str>, entity: T) -> StoreResult<T> {
        let (entity, id) = ensure_identity(entity, "create")
            .map_err(|e| e.annotate("create", self.store_name, correlation_id))?;

        let mut entities = self.entities.write().await;

        if entities.iter().any(|existing| existing.id() == Some(&id)) {
            return Err(StoreError::AlreadyExists {
                id: format!("{id:?}"),
                store: self.store_name.to_string(),
            }
            .annotate("create", self.store_name, correlation_id));
        }

        entities.push(entity.clone());

        self.flush("create", correlation_id, &entities).await?;

        trace!(correlation_id, "created {:?} in {}", id, self.store_name);

        Ok(entity)
    }

    async fn update(&self, correlation_id: Option<&str>, entity: T) -> StoreResult<Option<T>> {
        let Some(id) = entity.id().cloned() else {
            return Ok(None);
        };

        let mut entities = self.entities.write().await;

        let Some(index) = entities
            .iter()
            .position(|existing| existing.id() == Some(&id))
        else {
            trace!(correlation_id, "cannot find {:?} in {}", id, self.store_name);
            return Ok(None);
        };

        entities[index] = entity.clone();

        self.flush("update", correlation_id, &entities).await?;

        trace!(correlation_id, "updated {:?} in {}", id, self.store_name);

        Ok(Some(entity))
    }

    async fn set(&self, correlation_id: Option<&str>, entity: T) -> StoreResult<T> {
        let (entity, id) = ensure_identity(entity, "set")
            .map_err(|e| e.annotate("set", self.store_name, correlation_id))?;

        let mut entities = self.entities.write().await;

        match entities
            .iter()
            .position(|existing| existing.id() == Some(&id))
        {
            Some(index) => entities[index] = entity.clone(),
            None => entities.push(entity.clone()),
        }

        self.flush("set", correlation_id, &entities).await?;

        trace!(correlation_id, "set {:?} in {}", id, self.store_name);

        Ok(entity)
    }

    async fn delete_by_id(
        &self,
        correlation_id: Option<&str>,
        id: &T::Id,
    ) -> StoreResult<Option<T>> {
        let mut entities = self.entities.write().await;

        let Some(index) = entities
            .iter()
            .position(|existing| existing.id() == Some(id))
        else {
            trace!(correlation_id, "cannot find {:?} in {}", id, self.store_name);
            return Ok(None);
        };

        let removed = entities.remove(index);

        self.flush("delete_by_id", correlation_id, &entities).await?;

        trace!(correlation_id, "deleted {:?} from {}", id, self.store_name);

        Ok(Some(removed))
    }

    async fn get_one_by_id(
        &self,
        correlation_id: Option<&str>,
        id: &T::Id,
    ) -> StoreResult<Option<T>> {
        let entities = self.entities.read().await;

        let item = entities
            .iter()
            .find(|existing| existing.id() == Some(id))
            .cloned();

        if item.is_some() {
            trace!(correlation_id, "retrieved {:?} from {}", id, self.store_name);
        } else {
            trace!(correlation_id, "cannot find {:?} in {}", id, self.store_name);
        }

        Ok(item)
    }

    async fn get_list(
        &self,
        correlation_id: Option<&str>,
        query: ListQuery<T>,
    ) -> StoreResult<Vec<T>> {
        let mut items = query.apply(self.snapshot().await);
        items.truncate(self.max_page_size);

        trace!(correlation_id, "retrieved {} of {}", items.len(), self.store_name);

        Ok(items)
    }

    async fn get_page(
        &self,
        correlation_id: Option<&str>,
        query: ListQuery<T>,
        paging: PagingParams,
    ) -> StoreResult<Page<T>> {
        let items = query.apply(self.snapshot().await);
        let page = paging.capped(self.max_page_size).paginate(items);

        trace!(correlation_id, "retrieved page {} of {}", paging.page, self.store_name);

        Ok(page)
    }

    async fn clear(&self, correlation_id: Option<&str>) -> StoreResult<()> {
        let mut entities = self.entities.write().await;

        entities.clear();

        self.flush("clear", correlation_id, &entities).await?;

        trace!(correlation_id, "cleared {}", self.store_name);

        Ok(())
    }
}
