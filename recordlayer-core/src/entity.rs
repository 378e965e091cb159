//! Core traits and types for record representation and identity management.
//!
//! This module provides the fundamental contract every stored record must satisfy,
//! as well as the id-generation capability backing auto-assigned identities.

use std::fmt::Debug;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

/// Core trait that all records managed by a persistence engine must implement.
///
/// This trait defines the minimal interface required for a type to be stored.
/// Every record carries exactly one identity field, unique among all records
/// currently held by a store; the engine never inspects any other field.
///
/// # Example
///
/// ```ignore
/// use recordlayer::entity::Entity;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct User {
///     pub id: Option<String>,
///     pub name: String,
///     pub email: String,
/// }
///
/// impl Entity for User {
///     type Id = String;
///
///     fn id(&self) -> Option<&String> {
///         self.id.as_ref()
///     }
///
///     fn set_id(&mut self, id: String) {
///         self.id = Some(id);
///     }
///
///     fn store_name() -> &'static str {
///         "users"
///     }
/// }
/// ```
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + Clone + 'static {
    /// The identity type used for equality and lookup.
    type Id: EntityId;

    /// Returns the record's identity, or `None` when it has not been assigned yet.
    fn id(&self) -> Option<&Self::Id>;

    /// Assigns the record's identity. Engines call this when a fresh identity
    /// is generated on create/set.
    fn set_id(&mut self, id: Self::Id);

    /// Returns the name of the store this record type belongs to.
    ///
    /// This should be a static, lowercase identifier (e.g., "users", "products").
    /// Backends use it as the remote collection name and as the identifier in
    /// log events and error annotations.
    fn store_name() -> &'static str;
}

/// Identity types usable as record keys.
///
/// Whether an identity type can be auto-generated is declared here, at the type
/// level: generatable types override [`EntityId::generate`], every other type
/// inherits the `None` default and must arrive with the identity pre-set or the
/// create/set call is rejected with [`StoreError::IdentityRequired`].
pub trait EntityId: Clone + Eq + Debug + Serialize + Send + Sync + 'static {
    /// Returns a freshly generated identity, or `None` when identities must be
    /// supplied by the caller.
    fn generate() -> Option<Self> {
        None
    }
}

impl EntityId for String {
    fn generate() -> Option<Self> {
        Some(IdGenerator::next_long())
    }
}

impl EntityId for Uuid {
    fn generate() -> Option<Self> {
        Some(Uuid::new_v4())
    }
}

impl EntityId for i32 {}
impl EntityId for i64 {}
impl EntityId for u32 {}
impl EntityId for u64 {}

/// Ensures `entity` carries an identity before a create/set operation.
///
/// When the identity is unset and the identity type supports generation, a
/// fresh identity is assigned; when it does not, the operation is rejected.
/// Returns the (possibly identity-assigned) entity together with its identity.
pub fn ensure_identity<T: Entity>(
    mut entity: T,
    operation: &'static str,
) -> StoreResult<(T, T::Id)> {
    match entity.id().cloned() {
        Some(id) => Ok((entity, id)),
        None => match T::Id::generate() {
            Some(id) => {
                entity.set_id(id.clone());
                Ok((entity, id))
            }
            None => Err(StoreError::IdentityRequired { operation }),
        },
    }
}

static NEXT_LONG: OnceLock<AtomicU64> = OnceLock::new();

/// Process-wide generator of unique identity tokens.
pub struct IdGenerator;

impl IdGenerator {
    /// Returns a decimal token distinct from every token previously produced
    /// by this process.
    ///
    /// The counter is seeded from the wall clock at first use and incremented
    /// on every call, leaving 1024 tokens per millisecond of namespace between
    /// process restarts.
    pub fn next_long() -> String {
        let counter = NEXT_LONG.get_or_init(|| {
            let millis = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis() as u64;
            AtomicU64::new(millis << 10)
        });

        counter.fetch_add(1, Ordering::Relaxed).to_string()
    }

    /// Returns a random 32-character hexadecimal token.
    pub fn next_uuid() -> String {
        Uuid::new_v4().simple().to_string()
    }
}
