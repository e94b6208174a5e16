//! [`object_store`] store support for the [`tessera`](https://docs.rs/tessera/latest/tessera/index.html) crate.
//!
//! [`ObjectStore`] wraps any [`object_store::ObjectStore`] (Amazon S3, Google Cloud Storage, Azure Blob Storage, HTTP, local files, in-memory) as a synchronous tessera store.
//! Each call is driven to completion on an asynchronous runtime supplied through [`BlockOn`].
//! Timeouts, retries and cancellation are the responsibility of the wrapped object store's client configuration.
//!
//! ```rust
//! # use std::sync::Arc;
//! use tessera_object_store::{BlockOn, ObjectStore};
//!
//! struct TokioBlockOn(tokio::runtime::Runtime);
//!
//! impl BlockOn for TokioBlockOn {
//!     fn block_on<F: core::future::Future>(&self, future: F) -> F::Output {
//!         self.0.block_on(future)
//!     }
//! }
//!
//! let block_on = TokioBlockOn(tokio::runtime::Runtime::new()?);
//! let store = Arc::new(ObjectStore::new(
//!     object_store::memory::InMemory::new(),
//!     block_on,
//! ));
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Licence
//! `tessera_object_store` is licensed under either of
//! - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//! - the MIT license <http://opensource.org/licenses/MIT>, at your option.

pub use object_store;

use futures::{StreamExt, TryStreamExt};
use object_store::{path::Path, PutMode, PutOptions, UpdateVersion};
use tessera_storage::{
    Bytes, ListableStorageTraits, MaybeBytes, ReadableStorageTraits, StorageError, StoreKey,
    StoreKeys, StoreKeysPrefixes, StorePrefix, WritableStorageTraits,
};

/// Trait for an asynchronous runtime implementing `block_on`.
///
/// The runtime must be compatible with the wrapped object store, e.g. a `tokio` runtime for the HTTP and cloud stores.
/// Calling a blocking method from within an asynchronous execution context will typically panic.
pub trait BlockOn: Send + Sync {
    /// Runs a future to completion.
    fn block_on<F: core::future::Future>(&self, future: F) -> F::Output;
}

fn storage_error(err: object_store::Error) -> StorageError {
    StorageError::Other(err.to_string())
}

/// Maps a [`StoreKey`] to an [`object_store`] path.
fn key_to_path(key: &StoreKey) -> Path {
    Path::from(key.as_str())
}

/// Maps a [`StorePrefix`] to an [`object_store`] path.
fn prefix_to_path(prefix: &StorePrefix) -> Path {
    Path::from(prefix.as_str())
}

/// Map [`object_store::Error::NotFound`] to None, pass through other errors
fn handle_result<T>(result: Result<T, object_store::Error>) -> Result<Option<T>, StorageError> {
    match result {
        Ok(result) => Ok(Some(result)),
        Err(object_store::Error::NotFound { .. }) => Ok(None),
        Err(err) => Err(storage_error(err)),
    }
}

/// A synchronous store backed by an [`object_store::ObjectStore`].
pub struct ObjectStore<TObjectStore, TBlockOn> {
    object_store: TObjectStore,
    block_on: TBlockOn,
    conditional_put: bool,
}

impl<TObjectStore: object_store::ObjectStore, TBlockOn: BlockOn>
    ObjectStore<TObjectStore, TBlockOn>
{
    /// Create a new [`ObjectStore`].
    #[must_use]
    pub fn new(object_store: TObjectStore, block_on: TBlockOn) -> Self {
        Self {
            object_store,
            block_on,
            conditional_put: false,
        }
    }

    /// Enable compare-and-set through conditional puts.
    ///
    /// Only enable this if the wrapped store implements [`PutMode::Create`] and [`PutMode::Update`] (e.g. in-memory, Amazon S3 with conditional writes, Google Cloud Storage, Azure).
    /// Erasure through compare-and-set is checked against the current value, but is not atomic.
    #[must_use]
    pub const fn with_conditional_put(mut self) -> Self {
        self.conditional_put = true;
        self
    }

    fn list_impl(
        &self,
        prefix: &StorePrefix,
    ) -> Result<Vec<object_store::ObjectMeta>, StorageError> {
        let path = prefix_to_path(prefix);
        self.block_on
            .block_on(self.object_store.list(Some(&path)).try_collect::<Vec<_>>())
            .map_err(storage_error)
    }
}

impl<TObjectStore: object_store::ObjectStore, TBlockOn: BlockOn> ReadableStorageTraits
    for ObjectStore<TObjectStore, TBlockOn>
{
    fn get(&self, key: &StoreKey) -> Result<MaybeBytes, StorageError> {
        self.block_on.block_on(async {
            let Some(get) = handle_result(self.object_store.get(&key_to_path(key)).await)? else {
                return Ok(None);
            };
            Ok(Some(get.bytes().await.map_err(storage_error)?))
        })
    }

    fn size_key(&self, key: &StoreKey) -> Result<Option<u64>, StorageError> {
        let head = self.block_on.block_on(self.object_store.head(&key_to_path(key)));
        Ok(handle_result(head)?.map(|meta| meta.size))
    }
}

impl<TObjectStore: object_store::ObjectStore, TBlockOn: BlockOn> WritableStorageTraits
    for ObjectStore<TObjectStore, TBlockOn>
{
    fn set(&self, key: &StoreKey, value: Bytes) -> Result<(), StorageError> {
        self.block_on
            .block_on(self.object_store.put(&key_to_path(key), value.into()))
            .map_err(storage_error)?;
        Ok(())
    }

    fn erase(&self, key: &StoreKey) -> Result<(), StorageError> {
        handle_result(self.block_on.block_on(self.object_store.delete(&key_to_path(key))))?;
        Ok(())
    }

    fn erase_prefix(&self, prefix: &StorePrefix) -> Result<(), StorageError> {
        let path = prefix_to_path(prefix);
        self.block_on.block_on(async {
            let locations = self
                .object_store
                .list(Some(&path))
                .map_ok(|meta| meta.location)
                .boxed();
            self.object_store
                .delete_stream(locations)
                .try_collect::<Vec<Path>>()
                .await
                .map_err(storage_error)
        })?;
        Ok(())
    }

    fn supports_compare_and_set(&self) -> bool {
        self.conditional_put
    }

    fn compare_and_set(
        &self,
        key: &StoreKey,
        expected: Option<&[u8]>,
        value: Option<Bytes>,
    ) -> Result<bool, StorageError> {
        if !self.conditional_put {
            return Err(StorageError::Unsupported(
                "conditional puts are not enabled for this object store".to_string(),
            ));
        }
        let path = key_to_path(key);
        self.block_on.block_on(async {
            let mode = match expected {
                None => PutMode::Create,
                Some(expected) => {
                    let Some(current) = handle_result(self.object_store.get(&path).await)? else {
                        return Ok(false);
                    };
                    let version = UpdateVersion {
                        e_tag: current.meta.e_tag.clone(),
                        version: current.meta.version.clone(),
                    };
                    if current.bytes().await.map_err(storage_error)? != expected {
                        return Ok(false);
                    }
                    PutMode::Update(version)
                }
            };
            let Some(value) = value else {
                if matches!(mode, PutMode::Create) {
                    // the key must be absent, and erasing an absent key is a no-op
                    return handle_result(self.object_store.head(&path).await)
                        .map(|meta| meta.is_none());
                }
                handle_result(self.object_store.delete(&path).await)?;
                return Ok(true);
            };
            match self
                .object_store
                .put_opts(&path, value.into(), PutOptions::from(mode))
                .await
            {
                Ok(_) => Ok(true),
                Err(
                    object_store::Error::AlreadyExists { .. }
                    | object_store::Error::Precondition { .. },
                ) => {
                    log::debug!("conditional put on {key} rejected, the value has changed");
                    Ok(false)
                }
                Err(err) => Err(storage_error(err)),
            }
        })
    }
}

impl<TObjectStore: object_store::ObjectStore, TBlockOn: BlockOn> ListableStorageTraits
    for ObjectStore<TObjectStore, TBlockOn>
{
    fn list_prefix(&self, prefix: &StorePrefix) -> Result<StoreKeys, StorageError> {
        let mut keys = self
            .list_impl(prefix)?
            .into_iter()
            .map(|meta| StoreKey::try_from(meta.location.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        keys.sort();
        Ok(keys)
    }

    fn list_dir(&self, prefix: &StorePrefix) -> Result<StoreKeysPrefixes, StorageError> {
        let path = prefix_to_path(prefix);
        let list_result = self
            .block_on
            .block_on(self.object_store.list_with_delimiter(Some(&path)))
            .map_err(storage_error)?;
        let mut prefixes = list_result
            .common_prefixes
            .iter()
            .map(|path| StorePrefix::new(path.to_string() + "/"))
            .collect::<Result<Vec<_>, _>>()?;
        let mut keys = list_result
            .objects
            .iter()
            .map(|meta| StoreKey::try_from(meta.location.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        keys.sort();
        prefixes.sort();
        Ok(StoreKeysPrefixes::new(keys, prefixes))
    }

    fn size_prefix(&self, prefix: &StorePrefix) -> Result<u64, StorageError> {
        Ok(self.list_impl(prefix)?.iter().map(|meta| meta.size).sum())
    }
}
