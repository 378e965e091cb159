//! Error types and result types for persistence operations.
//!
//! This module provides error handling for every backend of the persistence layer.
//! Use [`StoreResult<T>`] as the return type for fallible operations.
//!
//! "Not found" is deliberately absent from the taxonomy: lookups, updates, and
//! deletes targeting an unknown identity return an empty [`Option`] instead of
//! failing, so callers branch on result presence to tell "no match" from failure.

use serde_json::Error as SerdeJsonError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Represents all possible errors that can occur when interacting with a persistence engine.
///
/// This enum covers configuration and connection setup, the file medium,
/// serialization, and backend-specific errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A required setting is missing or invalid. Raised at configure or open
    /// time and non-retryable until the configuration is corrected.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description naming the offending setting.
        message: String,
    },
    /// A remote backend could not establish its connection. Surfaced at open;
    /// the caller may retry the open.
    #[error("connection to {target} failed: {message}")]
    Connection {
        /// The host/database the connection was aimed at.
        target: String,
        /// The underlying driver failure.
        message: String,
    },
    /// The data file exists but could not be read.
    #[error("failed to read data file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The data file was read but is not a valid record array.
    #[error("failed to parse data file {path}: {source}")]
    FileParse {
        path: PathBuf,
        #[source]
        source: SerdeJsonError,
    },
    /// The data file could not be written.
    #[error("failed to write data file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Serialization/deserialization error when converting records for storage.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// The entity arrived without an identity and its identity type does not
    /// support generation.
    #[error("entity identity must be set before {operation}")]
    IdentityRequired { operation: &'static str },
    /// An entity with the same identity is already present in the store.
    /// The first field is the identity, the second is the store name.
    #[error("entity {id} already exists in {store}")]
    AlreadyExists { id: String, store: String },
    /// An operation was invoked on a remote backend before a successful open.
    #[error("store {0} is not opened")]
    NotOpened(String),
    /// An error occurred in the underlying storage backend.
    #[error("backend error: {0}")]
    Backend(String),
    /// A failure annotated with the operation, store, and correlation token it
    /// crossed the engine boundary with. Wraps the originating error.
    #[error("{operation} failed on {store} (correlation id {correlation_id:?}): {source}")]
    Operation {
        operation: &'static str,
        store: String,
        correlation_id: Option<String>,
        #[source]
        source: Box<StoreError>,
    },
}

/// A specialized `Result` type for persistence operations.
///
/// This type alias is used throughout the crate to indicate operations that may fail
/// with a [`StoreError`].
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// Wraps this error with the operation name, store name, and correlation
    /// token it is propagating out of.
    ///
    /// Errors that are already annotated are returned unchanged, so an engine
    /// delegating to another engine does not stack annotation layers.
    pub fn annotate(
        self,
        operation: &'static str,
        store: &str,
        correlation_id: Option<&str>,
    ) -> StoreError {
        match self {
            StoreError::Operation { .. } => self,
            source => StoreError::Operation {
                operation,
                store: store.to_string(),
                correlation_id: correlation_id.map(str::to_string),
                source: Box::new(source),
            },
        }
    }

    /// Returns the innermost error, unwrapping any [`StoreError::Operation`] annotation.
    pub fn root_cause(&self) -> &StoreError {
        match self {
            StoreError::Operation { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl From<SerdeJsonError> for StoreError {
    fn from(err: SerdeJsonError) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
