//! MongoDB persistence engine with no local cache.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bson::{Bson, Document, de::deserialize_from_bson, doc, ser::serialize_to_bson};
use futures::TryStreamExt;
use mea::rwlock::RwLock;
use mongodb::{
    Client, Collection,
    options::{ClientOptions, Credential, ReturnDocument, ServerAddress},
};
use tracing::{debug, trace};

use recordlayer_core::{
    config::{ConfigParams, ConnectionParams, CredentialParams},
    engine::{LifecycleState, PersistenceEngine},
    entity::{Entity, ensure_identity},
    error::{StoreError, StoreResult},
    page::{Page, PagingParams},
    query::ListQuery,
};

const DEFAULT_POOL_SIZE: u32 = 4;
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5000;
const DEFAULT_MAX_PAGE_SIZE: usize = 100;

fn default_config() -> ConfigParams {
    ConfigParams::from_tuples(&[
        ("options.pool_size", "4"),
        ("options.connect_timeout", "5000"),
        ("options.max_page_size", "100"),
    ])
}

#[derive(Debug, Clone)]
struct MongoConnection {
    client: Client,
    database: String,
}

/// Remote persistence engine backed by a MongoDB collection.
///
/// Unlike the in-memory and file-backed engines this adapter holds no working
/// set of its own: every operation becomes one filter-by-`_id` round trip to
/// the server, which is also what provides the concurrency guarantees. The
/// collection name is taken from [`Entity::store_name`].
///
/// Entities are serialized to BSON documents with `_id` set from the identity
/// on the way in and stripped again on the way out, so the record's own
/// identity field stays the single source of truth for callers.
///
/// Listing operations fetch the collection and apply the caller-supplied
/// filter/sort hooks in-process before paging; the hooks are opaque predicates
/// and cannot be pushed down to the server.
pub struct MongoPersistence<T: Entity> {
    config: ConfigParams,
    connection: Arc<RwLock<Option<MongoConnection>>>,
    state: Arc<RwLock<LifecycleState>>,
    pool_size: u32,
    connect_timeout: Duration,
    max_page_size: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Entity> MongoPersistence<T> {
    /// Creates an unconfigured adapter; connection settings must be supplied
    /// through [`MongoPersistence::configure`] before it is opened.
    pub fn new() -> Self {
        Self {
            config: default_config(),
            connection: Arc::new(RwLock::new(None)),
            state: Arc::new(RwLock::new(LifecycleState::Unopened)),
            pool_size: DEFAULT_POOL_SIZE,
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS),
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            _marker: PhantomData,
        }
    }

    /// Returns the current lifecycle state.
    pub async fn state(&self) -> LifecycleState {
        *self.state.read().await
    }

    async fn collection(&self) -> StoreResult<Collection<Document>> {
        let guard = self.connection.read().await;

        let connection = guard
            .as_ref()
            .ok_or_else(|| StoreError::NotOpened(T::store_name().to_string()))?;

        Ok(connection
            .client
            .database(&connection.database)
            .collection(T::store_name()))
    }

    fn id_bson(id: &T::Id) -> StoreResult<Bson> {
        serialize_to_bson(id).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Serializes `entity` and keys the resulting document with `_id`.
    fn to_document(entity: &T, id: &T::Id) -> StoreResult<Document> {
        let mut document = serialize_to_bson(entity)
            .map_err(|e| StoreError::Serialization(e.to_string()))?
            .as_document()
            .cloned()
            .ok_or_else(|| {
                StoreError::Serialization("entity did not serialize to a document".to_string())
            })?;

        document.insert("_id", Self::id_bson(id)?);

        Ok(document)
    }

    /// Strips the storage key and deserializes the remaining document.
    fn from_document(document: Document) -> StoreResult<T> {
        let stripped = Document::from_iter(document.into_iter().filter(|(k, _)| k != "_id"));

        deserialize_from_bson(Bson::Document(stripped))
            .map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn backend_error(err: mongodb::error::Error) -> StoreError {
        StoreError::Backend(err.to_string())
    }

    async fn open_inner(&self, correlation_id: Option<&str>) -> StoreResult<()> {
        let connection = ConnectionParams::from_config(&self.config);
        let credential = CredentialParams::from_config(&self.config);

        let kind = connection.kind.ok_or_else(|| StoreError::Config {
            message: "connection.type is not set".to_string(),
        })?;
        if kind != "mongodb" {
            return Err(StoreError::Config {
                message: format!("connection.type {kind} is not supported"),
            });
        }

        let host = connection.host.ok_or_else(|| StoreError::Config {
            message: "connection.host is not set".to_string(),
        })?;
        let port = connection.port.ok_or_else(|| StoreError::Config {
            message: "connection.port is not set".to_string(),
        })?;
        let database = connection.database.ok_or_else(|| StoreError::Config {
            message: "connection.database is not set".to_string(),
        })?;

        trace!(
            correlation_id,
            "connecting to mongodb database {}, collection {}",
            database,
            T::store_name()
        );

        let mut options = ClientOptions::default();
        options.hosts = vec![ServerAddress::Tcp {
            host: host.clone(),
            port: Some(port),
        }];
        options.max_pool_size = Some(self.pool_size);
        options.connect_timeout = Some(self.connect_timeout);
        options.server_selection_timeout = Some(self.connect_timeout);

        if credential.username.is_some() {
            let mut db_credential = Credential::default();
            db_credential.username = credential.username;
            db_credential.password = credential.password;
            db_credential.source = Some(database.clone());

            options.credential = Some(db_credential);
        }

        let target = format!("{host}:{port}/{database}");

        let client = Client::with_options(options).map_err(|e| StoreError::Connection {
            target: target.clone(),
            message: e.to_string(),
        })?;

        client
            .database(&database)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::Connection {
                target,
                message: e.to_string(),
            })?;

        *self.connection.write().await = Some(MongoConnection {
            client,
            database: database.clone(),
        });
        *self.state.write().await = LifecycleState::Open;

        debug!(
            correlation_id,
            "connected to mongodb database {}, collection {}",
            database,
            T::store_name()
        );

        Ok(())
    }

    async fn create_inner(&self, correlation_id: Option<&str>, entity: T) -> StoreResult<T> {
        let (entity, id) = ensure_identity(entity, "create")?;

        self.collection()
            .await?
            .insert_one(Self::to_document(&entity, &id)?)
            .await
            .map_err(Self::backend_error)?;

        trace!(correlation_id, "created in {} with id = {:?}", T::store_name(), id);

        Ok(entity)
    }

    async fn update_inner(&self, correlation_id: Option<&str>, entity: T) -> StoreResult<Option<T>> {
        let Some(id) = entity.id().cloned() else {
            return Ok(None);
        };

        let result = self
            .collection()
            .await?
            .find_one_and_replace(
                doc! { "_id": Self::id_bson(&id)? },
                Self::to_document(&entity, &id)?,
            )
            .upsert(false)
            .return_document(ReturnDocument::After)
            .await
            .map_err(Self::backend_error)?;

        trace!(correlation_id, "updated in {} with id = {:?}", T::store_name(), id);

        result.map(Self::from_document).transpose()
    }

    async fn set_inner(&self, correlation_id: Option<&str>, entity: T) -> StoreResult<T> {
        let (entity, id) = ensure_identity(entity, "set")?;

        let result = self
            .collection()
            .await?
            .find_one_and_replace(
                doc! { "_id": Self::id_bson(&id)? },
                Self::to_document(&entity, &id)?,
            )
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .map_err(Self::backend_error)?;

        trace!(correlation_id, "set in {} with id = {:?}", T::store_name(), id);

        Ok(result.map(Self::from_document).transpose()?.unwrap_or(entity))
    }

    async fn delete_inner(&self, correlation_id: Option<&str>, id: &T::Id) -> StoreResult<Option<T>> {
        let result = self
            .collection()
            .await?
            .find_one_and_delete(doc! { "_id": Self::id_bson(id)? })
            .await
            .map_err(Self::backend_error)?;

        trace!(correlation_id, "deleted from {} with id = {:?}", T::store_name(), id);

        result.map(Self::from_document).transpose()
    }

    async fn get_one_inner(&self, correlation_id: Option<&str>, id: &T::Id) -> StoreResult<Option<T>> {
        let result = self
            .collection()
            .await?
            .find_one(doc! { "_id": Self::id_bson(id)? })
            .await
            .map_err(Self::backend_error)?;

        trace!(correlation_id, "retrieved from {} with id = {:?}", T::store_name(), id);

        result.map(Self::from_document).transpose()
    }

    /// Fetches the full collection and deserializes it.
    async fn fetch_all(&self) -> StoreResult<Vec<T>> {
        let documents: Vec<Document> = self
            .collection()
            .await?
            .find(doc! {})
            .await
            .map_err(Self::backend_error)?
            .try_collect()
            .await
            .map_err(Self::backend_error)?;

        documents
            .into_iter()
            .map(Self::from_document)
            .collect::<StoreResult<Vec<T>>>()
    }
}

impl<T: Entity> Default for MongoPersistence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> fmt::Debug for MongoPersistence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MongoPersistence")
            .field("store_name", &T::store_name())
            .field("pool_size", &self.pool_size)
            .field("connect_timeout", &self.connect_timeout)
            .field("max_page_size", &self.max_page_size)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<T: Entity> PersistenceEngine<T> for MongoPersistence<T> {
    fn configure(&mut self, config: &ConfigParams) -> StoreResult<()> {
        self.config = config.clone().set_defaults(&default_config());

        let options = self.config.get_section("options");
        self.pool_size = options.get_as_or("pool_size", DEFAULT_POOL_SIZE);
        self.connect_timeout =
            Duration::from_millis(options.get_as_or("connect_timeout", DEFAULT_CONNECT_TIMEOUT_MS));
        self.max_page_size = options.get_as_or("max_page_size", DEFAULT_MAX_PAGE_SIZE);

        Ok(())
    }

    async fn open(&self, correlation_id: Option<&str>) -> StoreResult<()> {
        self.open_inner(correlation_id)
            .await
            .map_err(|e| e.annotate("open", T::store_name(), correlation_id))
    }

    async fn close(&self, correlation_id: Option<&str>) -> StoreResult<()> {
        if let Some(connection) = self.connection.write().await.take() {
            connection.client.shutdown().await;
        }

        *self.state.write().await = LifecycleState::Closed;

        trace!(correlation_id, "closed {}", T::store_name());

        Ok(())
    }

    async fn create(&self, correlation_id: Option<&str>, entity: T) -> StoreResult<T> {
        self.create_inner(correlation_id, entity)
            .await
            .map_err(|e| e.annotate("create", T::store_name(), correlation_id))
    }

    async fn update(&self, correlation_id: Option<&str>, entity: T) -> StoreResult<Option<T>> {
        self.update_inner(correlation_id, entity)
            .await
            .map_err(|e| e.annotate("update", T::store_name(), correlation_id))
    }

    async fn set(&self, correlation_id: Option<&str>, entity: T) -> StoreResult<T> {
        self.set_inner(correlation_id, entity)
            .await
            .map_err(|e| e.annotate("set", T::store_name(), correlation_id))
    }

    async fn delete_by_id(
        &self,
        correlation_id: Option<&str>,
        id: &T::Id,
    ) -> StoreResult<Option<T>> {
        self.delete_inner(correlation_id, id)
            .await
            .map_err(|e| e.annotate("delete_by_id", T::store_name(), correlation_id))
    }

    async fn get_one_by_id(
        &self,
        correlation_id: Option<&str>,
        id: &T::Id,
    ) -> StoreResult<Option<T>> {
        self.get_one_inner(correlation_id, id)
            .await
            .map_err(|e| e.annotate("get_one_by_id", T::store_name(), correlation_id))
    }

    async fn get_list(
        &self,
        correlation_id: Option<&str>,
        query: ListQuery<T>,
    ) -> StoreResult<Vec<T>> {
        let entities = self
            .fetch_all()
            .await
            .map_err(|e| e.annotate("get_list", T::store_name(), correlation_id))?;

        let mut items = query.apply(entities);
        items.truncate(self.max_page_size);

        trace!(correlation_id, "retrieved {} of {}", items.len(), T::store_name());

        Ok(items)
    }

    async fn get_page(
        &self,
        correlation_id: Option<&str>,
        query: ListQuery<T>,
        paging: PagingParams,
    ) -> StoreResult<Page<T>> {
        let entities = self
            .fetch_all()
            .await
            .map_err(|e| e.annotate("get_page", T::store_name(), correlation_id))?;

        let items = query.apply(entities);
        let page = paging.capped(self.max_page_size).paginate(items);

        trace!(correlation_id, "retrieved page {} of {}", paging.page, T::store_name());

        Ok(page)
    }

    async fn clear(&self, correlation_id: Option<&str>) -> StoreResult<()> {
        self.collection()
            .await
            .map_err(|e| e.annotate("clear", T::store_name(), correlation_id))?
            .drop()
            .await
            .map_err(|e| {
                Self::backend_error(e).annotate("clear", T::store_name(), correlation_id)
            })?;

        trace!(correlation_id, "cleared {}", T::store_name());

        Ok(())
    }
}
