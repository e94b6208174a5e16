use std::sync::Arc;

use crate::config::global_config;
use crate::node::{node_exists, NodeMetadata, StorageResultExt, StoreOperation};
use crate::storage::{
    ReadableStorageTraits, ReadableWritableStorageTraits, StoreKey, WritableStorageTraits,
};

use super::{
    array_bytes, Array, ArrayError, ArrayMetadata, ArraySubset, CodecOptions, CodecRegistry,
    Element, OpenMode, OverlappingChunk,
};

impl<TStorage: ?Sized + ReadableWritableStorageTraits + 'static> Array<TStorage> {
    /// Create an array at `path` with `metadata` and the default [`CodecRegistry`], and write its metadata to the store.
    ///
    /// If `overwrite` is true, any existing node at `path` is erased first, including all of its chunks or children.
    ///
    /// # Errors
    /// Returns [`ArrayError::AlreadyExists`] if a node exists at `path` and `overwrite` is false.
    /// Returns another [`ArrayError`] if the metadata is invalid or there is an underlying store error.
    /// Invalid metadata is detected before the store is modified.
    pub fn create(
        storage: Arc<TStorage>,
        path: &str,
        metadata: ArrayMetadata,
        overwrite: bool,
    ) -> Result<Self, ArrayError> {
        Self::create_with_registry(
            storage,
            path,
            metadata,
            Arc::new(CodecRegistry::default()),
            overwrite,
        )
    }

    /// Create an array at `path`, looking up its codec in `registry`.
    ///
    /// # Errors
    /// See [`Array::create`].
    pub fn create_with_registry(
        storage: Arc<TStorage>,
        path: &str,
        metadata: ArrayMetadata,
        registry: Arc<CodecRegistry>,
        overwrite: bool,
    ) -> Result<Self, ArrayError> {
        let array =
            Self::new_with_metadata(storage, path, metadata, registry, OpenMode::ReadWrite)?;
        if node_exists(&array.storage, &array.path)? {
            if !overwrite {
                return Err(ArrayError::AlreadyExists(array.path));
            }
            let prefix = array.path.prefix()?;
            log::debug!("Overwriting the node at {}", array.path);
            array
                .storage
                .erase_prefix(&prefix)
                .with_store_context(StoreOperation::Erase, &prefix)?;
        }
        array.store_metadata()?;
        Ok(array)
    }

    /// Store metadata.
    ///
    /// # Errors
    /// Returns [`ArrayError::ReadOnly`] if the array was opened read only, or an [`ArrayError`] if there is an underlying store error.
    pub fn store_metadata(&self) -> Result<(), ArrayError> {
        self.check_writable()?;
        let key = self.path.meta_key()?;
        let bytes = NodeMetadata::Array(self.metadata.clone())
            .to_json_vec()
            .map_err(|err| ArrayError::InvalidMetadata(key.clone(), err.to_string()))?;
        self.storage
            .set(&key, bytes.into())
            .with_store_context(StoreOperation::Set, &key)?;
        Ok(())
    }

    /// Encode `chunk_bytes` and store at `chunk_indices` with default codec options.
    ///
    /// # Errors
    /// See [`Array::store_chunk_opt`].
    pub fn store_chunk(&self, chunk_indices: &[u64], chunk_bytes: &[u8]) -> Result<(), ArrayError> {
        let options = global_config().codec_options();
        self.store_chunk_opt(chunk_indices, chunk_bytes, &options)
    }

    /// Explicit options version of [`store_chunk`](Array::store_chunk).
    ///
    /// `chunk_bytes` holds the full chunk shape. Elements beyond the array shape are stored as the fill value.
    /// If every element equals the fill value and [`CodecOptions::store_empty_chunks`] is false, the chunk is erased instead.
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if
    ///  - the array was opened read only,
    ///  - `chunk_indices` are invalid,
    ///  - the length of `chunk_bytes` does not match the chunk size ([`ArrayError::ShapeMismatch`]),
    ///  - there is a codec encoding error, or
    ///  - an underlying store error.
    pub fn store_chunk_opt(
        &self,
        chunk_indices: &[u64],
        chunk_bytes: &[u8],
        options: &CodecOptions,
    ) -> Result<(), ArrayError> {
        self.check_writable()?;
        self.check_chunk_indices(chunk_indices)?;
        if chunk_bytes.len() != self.chunk_size_bytes() {
            return Err(ArrayError::ShapeMismatch {
                expected: self.chunk_size_bytes() as u64,
                got: chunk_bytes.len(),
            });
        }
        let key = self.chunk_key(chunk_indices)?;
        let chunk_bytes = self.clear_chunk_padding(chunk_indices, chunk_bytes.to_vec())?;
        let encoded = self.encode_chunk_if_not_empty(&chunk_bytes, options)?;
        self.store_encoded_chunk(&key, encoded)
    }

    /// Encode `chunk_elements` and store at `chunk_indices` with default codec options.
    ///
    /// # Errors
    /// Returns [`ArrayError::IncompatibleElementType`] if `T` does not match the data type, or see [`Array::store_chunk_opt`].
    pub fn store_chunk_elements<T: Element>(
        &self,
        chunk_indices: &[u64],
        chunk_elements: &[T],
    ) -> Result<(), ArrayError> {
        self.check_element_type::<T>()?;
        self.store_chunk(chunk_indices, bytemuck::cast_slice(chunk_elements))
    }

    /// Erase the chunk at `chunk_indices`, so that it reads as the fill value.
    ///
    /// Succeeds if the chunk does not exist.
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if the array was opened read only, `chunk_indices` are invalid, or there is an underlying store error.
    pub fn erase_chunk(&self, chunk_indices: &[u64]) -> Result<(), ArrayError> {
        self.check_writable()?;
        self.check_chunk_indices(chunk_indices)?;
        let key = self.chunk_key(chunk_indices)?;
        self.storage
            .erase(&key)
            .with_store_context(StoreOperation::Erase, &key)?;
        Ok(())
    }

    /// Encode `subset_bytes` and store in `array_subset` with default codec options.
    ///
    /// # Errors
    /// See [`Array::store_array_subset_opt`].
    pub fn store_array_subset(
        &self,
        array_subset: &ArraySubset,
        subset_bytes: &[u8],
    ) -> Result<(), ArrayError> {
        let options = global_config().codec_options();
        self.store_array_subset_opt(array_subset, subset_bytes, &options)
    }

    /// Explicit options version of [`store_array_subset`](Array::store_array_subset).
    ///
    /// Chunks entirely covered by `array_subset` are replaced.
    /// Chunks partially covered are read, merged and rewritten; see the [module documentation](crate::array) for concurrency semantics.
    /// A chunk left entirely equal to the fill value is erased unless [`CodecOptions::store_empty_chunks`] is true.
    ///
    /// Chunks are committed one at a time in array order.
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if
    ///  - the array was opened read only,
    ///  - `array_subset` is outside the array ([`ArrayError::IndexOutOfRange`]), in which case the store is not modified,
    ///  - the length of `subset_bytes` does not match `array_subset` ([`ArrayError::ShapeMismatch`]),
    ///  - an existing chunk cannot be decoded,
    ///  - a chunk changed concurrently on every attempt ([`ArrayError::WriteConflict`]), or
    ///  - an underlying store error.
    ///
    /// If the error occurs after at least one chunk was committed, it is wrapped in [`ArrayError::PartialWrite`] listing the regions that were not written.
    pub fn store_array_subset_opt(
        &self,
        array_subset: &ArraySubset,
        subset_bytes: &[u8],
        options: &CodecOptions,
    ) -> Result<(), ArrayError> {
        self.check_writable()?;
        let chunks = self.chunks_overlapping(array_subset)?;
        let expected = array_subset.num_elements() * self.data_type().size() as u64;
        if subset_bytes.len() as u64 != expected {
            return Err(ArrayError::ShapeMismatch {
                expected,
                got: subset_bytes.len(),
            });
        }

        let mut committed = 0;
        for chunk in &chunks {
            if let Err(err) = self.store_chunk_subset(&chunk, array_subset, subset_bytes, options) {
                if committed == 0 {
                    return Err(err);
                }
                let incomplete = chunks
                    .iter()
                    .skip(committed)
                    .map(|chunk| chunk.array_subset)
                    .collect();
                return Err(ArrayError::PartialWrite {
                    incomplete,
                    source: Box::new(err),
                });
            }
            committed += 1;
        }
        Ok(())
    }

    /// Encode `subset_elements` and store in `array_subset` with default codec options.
    ///
    /// # Errors
    /// Returns [`ArrayError::IncompatibleElementType`] if `T` does not match the data type, or see [`Array::store_array_subset_opt`].
    pub fn store_array_subset_elements<T: Element>(
        &self,
        array_subset: &ArraySubset,
        subset_elements: &[T],
    ) -> Result<(), ArrayError> {
        let options = global_config().codec_options();
        self.store_array_subset_elements_opt(array_subset, subset_elements, &options)
    }

    /// Explicit options version of [`store_array_subset_elements`](Array::store_array_subset_elements).
    #[allow(clippy::missing_errors_doc)]
    pub fn store_array_subset_elements_opt<T: Element>(
        &self,
        array_subset: &ArraySubset,
        subset_elements: &[T],
        options: &CodecOptions,
    ) -> Result<(), ArrayError> {
        self.check_element_type::<T>()?;
        self.store_array_subset_opt(array_subset, bytemuck::cast_slice(subset_elements), options)
    }

    /// Write the part of `subset_bytes` overlapping `chunk` into the chunk.
    fn store_chunk_subset(
        &self,
        chunk: &OverlappingChunk,
        array_subset: &ArraySubset,
        subset_bytes: &[u8],
        options: &CodecOptions,
    ) -> Result<(), ArrayError> {
        let key = self.chunk_key(&chunk.chunk_indices)?;
        let chunk_shape = self.chunk_grid.chunk_shape_u64();
        let overlay = |mut chunk_bytes: Vec<u8>| -> Result<Vec<u8>, ArrayError> {
            array_bytes::copy_subset(
                subset_bytes,
                array_subset.shape(),
                &chunk.output_subset,
                &mut chunk_bytes,
                &chunk_shape,
                &chunk.chunk_subset,
                self.data_type().size(),
                self.order(),
            )?;
            Ok(chunk_bytes)
        };

        let chunk_subset_bounded = self
            .chunk_grid
            .chunk_subset_bounded(&chunk.chunk_indices, self.shape())?;
        if chunk.array_subset == chunk_subset_bounded {
            let chunk_bytes = overlay(self.fill_value.repeat(self.chunk_num_elements()))?;
            let encoded = self.encode_chunk_if_not_empty(&chunk_bytes, options)?;
            return self.store_encoded_chunk(&key, encoded);
        }

        let merge = |existing: Option<&[u8]>| -> Result<Option<Vec<u8>>, ArrayError> {
            let chunk_bytes = match existing {
                Some(encoded) => self.clear_chunk_padding(
                    &chunk.chunk_indices,
                    self.decode_chunk(&key, encoded, options)?,
                )?,
                None => self.fill_value.repeat(self.chunk_num_elements()),
            };
            self.encode_chunk_if_not_empty(&overlay(chunk_bytes)?, options)
        };

        if !self.storage.supports_compare_and_set() {
            let existing = self
                .storage
                .get(&key)
                .with_store_context(StoreOperation::Get, &key)?;
            let encoded = merge(existing.as_deref())?;
            return self.store_encoded_chunk(&key, encoded);
        }

        let attempts = global_config().compare_and_swap_attempts();
        for attempt in 1..=attempts {
            let existing = self
                .storage
                .get(&key)
                .with_store_context(StoreOperation::Get, &key)?;
            let encoded = merge(existing.as_deref())?;
            if existing.is_none() && encoded.is_none() {
                return Ok(());
            }
            if self
                .storage
                .compare_and_set(&key, existing.as_deref(), encoded.map(Into::into))
                .with_store_context(StoreOperation::CompareAndSet, &key)?
            {
                return Ok(());
            }
            log::debug!("Chunk {key} was modified concurrently (attempt {attempt} of {attempts})");
        }
        Err(ArrayError::WriteConflict(key))
    }

    /// Encode `chunk_bytes`, or return [`None`] if the chunk is all fill and should be erased.
    fn encode_chunk_if_not_empty(
        &self,
        chunk_bytes: &[u8],
        options: &CodecOptions,
    ) -> Result<Option<Vec<u8>>, ArrayError> {
        if !options.store_empty_chunks() && self.fill_value.equals_all(chunk_bytes) {
            Ok(None)
        } else {
            Ok(Some(self.codec.encode(chunk_bytes)?))
        }
    }

    fn store_encoded_chunk(
        &self,
        key: &StoreKey,
        encoded: Option<Vec<u8>>,
    ) -> Result<(), ArrayError> {
        match encoded {
            Some(encoded) => self
                .storage
                .set(key, encoded.into())
                .with_store_context(StoreOperation::Set, key)?,
            None => {
                log::trace!("Erasing chunk {key}, every element is the fill value");
                self.storage
                    .erase(key)
                    .with_store_context(StoreOperation::Erase, key)?;
            }
        }
        Ok(())
    }
}
