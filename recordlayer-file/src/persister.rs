//! JSON file loader/saver for full record collections.

use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::trace;

use recordlayer_core::{
    config::ConfigParams,
    entity::Entity,
    error::{StoreError, StoreResult},
    persister::{Loader, Saver},
};

/// Loader/saver pair persisting a record collection as one JSON array file.
///
/// The file holds a UTF-8, pretty-printed JSON array of records; an absent
/// file is equivalent to an empty collection. Saving serializes the full
/// sequence and overwrites the target wholesale. There is no atomic-rename or
/// partial-write protection: a process interruption mid-write can leave a
/// truncated or corrupt file, which the next load reports as a parse error.
#[derive(Debug)]
pub struct JsonFilePersister<T: Entity> {
    path: Option<PathBuf>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Entity> JsonFilePersister<T> {
    /// Creates an unconfigured persister; a path must be supplied through
    /// [`JsonFilePersister::configure`] before any load or save.
    pub fn new() -> Self {
        Self {
            path: None,
            _marker: PhantomData,
        }
    }

    /// Creates a persister targeting `path`.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            _marker: PhantomData,
        }
    }

    /// Applies configuration parameters. The single required option is `path`.
    pub fn configure(&mut self, config: &ConfigParams) -> StoreResult<()> {
        let Some(path) = config.get("path") else {
            return Err(StoreError::Config {
                message: "data file path is not set".to_string(),
            });
        };

        self.path = Some(PathBuf::from(path));

        Ok(())
    }

    /// Returns the configured target path.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn require_path(&self) -> StoreResult<&Path> {
        self.path.as_deref().ok_or_else(|| StoreError::Config {
            message: "data file path is not set".to_string(),
        })
    }
}

impl<T: Entity> Default for JsonFilePersister<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> Loader<T> for JsonFilePersister<T> {
    async fn load(&self, correlation_id: Option<&str>) -> StoreResult<Vec<T>> {
        let path = self.require_path()?;

        if !path.exists() {
            return Ok(Vec::new());
        }

        let text = fs::read_to_string(path).map_err(|source| StoreError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        // An existing but empty file is an empty collection, same as no file.
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let entities: Vec<T> =
            serde_json::from_str(&text).map_err(|source| StoreError::FileParse {
                path: path.to_path_buf(),
                source,
            })?;

        trace!(correlation_id, "loaded {} from {}", entities.len(), path.display());

        Ok(entities)
    }
}

#[async_trait]
impl<T: Entity> Saver<T> for JsonFilePersister<T> {
    async fn save(&self, correlation_id: Option<&str>, entities: &[T]) -> StoreResult<()> {
        let path = self.require_path()?;

        let json = serde_json::to_string_pretty(entities)?;

        fs::write(path, json).map_err(|source| StoreError::FileWrite {
            path: path.to_path_buf(),
            source,
        })?;

        trace!(correlation_id, "saved {} to {}", entities.len(), path.display());

        Ok(())
    }
}
