use rayon::prelude::*;

use crate::config::global_config;
use crate::node::{StorageResultExt, StoreOperation};
use crate::storage::{MaybeBytes, ReadableStorageTraits};

use super::{array_bytes, Array, ArrayError, ArraySubset, CodecOptions, Element, OverlappingChunk};

impl<TStorage: ?Sized + ReadableStorageTraits> Array<TStorage> {
    /// Read and return the encoded bytes of the chunk at `chunk_indices` if it exists.
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if the chunk indices are invalid or there is an underlying store error.
    pub fn retrieve_encoded_chunk(&self, chunk_indices: &[u64]) -> Result<MaybeBytes, ArrayError> {
        self.check_chunk_indices(chunk_indices)?;
        let key = self.chunk_key(chunk_indices)?;
        Ok(self
            .storage
            .get(&key)
            .with_store_context(StoreOperation::Get, &key)?)
    }

    /// Read and decode the chunk at `chunk_indices` into its bytes if it exists with default codec options.
    ///
    /// # Errors
    /// See [`Array::retrieve_chunk_if_exists_opt`].
    pub fn retrieve_chunk_if_exists(
        &self,
        chunk_indices: &[u64],
    ) -> Result<Option<Vec<u8>>, ArrayError> {
        let options = global_config().codec_options();
        self.retrieve_chunk_if_exists_opt(chunk_indices, &options)
    }

    /// Explicit options version of [`retrieve_chunk_if_exists`](Array::retrieve_chunk_if_exists).
    ///
    /// The chunk is returned at the full chunk shape.
    /// Elements beyond the array shape read as the fill value, even if stale data remains in the store after a shrink.
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if
    ///  - the chunk indices are invalid,
    ///  - there is a codec decoding error ([`ArrayError::CorruptChunk`]), or
    ///  - an underlying store error.
    pub fn retrieve_chunk_if_exists_opt(
        &self,
        chunk_indices: &[u64],
        options: &CodecOptions,
    ) -> Result<Option<Vec<u8>>, ArrayError> {
        self.check_chunk_indices(chunk_indices)?;
        let key = self.chunk_key(chunk_indices)?;
        let encoded = self
            .storage
            .get(&key)
            .with_store_context(StoreOperation::Get, &key)?;
        encoded
            .map(|encoded| {
                let chunk_bytes = self.decode_chunk(&key, &encoded, options)?;
                self.clear_chunk_padding(chunk_indices, chunk_bytes)
            })
            .transpose()
    }

    /// Read and decode the chunk at `chunk_indices` into its bytes with default codec options.
    ///
    /// A chunk which does not exist reads as the fill value.
    ///
    /// # Errors
    /// See [`Array::retrieve_chunk_if_exists_opt`].
    pub fn retrieve_chunk(&self, chunk_indices: &[u64]) -> Result<Vec<u8>, ArrayError> {
        let options = global_config().codec_options();
        self.retrieve_chunk_opt(chunk_indices, &options)
    }

    /// Explicit options version of [`retrieve_chunk`](Array::retrieve_chunk).
    #[allow(clippy::missing_errors_doc)]
    pub fn retrieve_chunk_opt(
        &self,
        chunk_indices: &[u64],
        options: &CodecOptions,
    ) -> Result<Vec<u8>, ArrayError> {
        Ok(self
            .retrieve_chunk_if_exists_opt(chunk_indices, options)?
            .unwrap_or_else(|| self.fill_value.repeat(self.chunk_num_elements())))
    }

    /// Read and decode the `array_subset` of the array into its bytes with default codec options.
    ///
    /// # Errors
    /// See [`Array::retrieve_array_subset_opt`].
    pub fn retrieve_array_subset(&self, array_subset: &ArraySubset) -> Result<Vec<u8>, ArrayError> {
        let options = global_config().codec_options();
        self.retrieve_array_subset_opt(array_subset, &options)
    }

    /// Explicit options version of [`retrieve_array_subset`](Array::retrieve_array_subset).
    ///
    /// Chunks are retrieved and decoded in parallel, at most [`CodecOptions::concurrent_target`] at a time.
    /// Regions of chunks that do not exist read as the fill value.
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if
    ///  - the `array_subset` dimensionality does not match the array or it is outside the array ([`ArrayError::IndexOutOfRange`]),
    ///  - a chunk cannot be decoded ([`ArrayError::CorruptChunk`]), or
    ///  - an underlying store error.
    pub fn retrieve_array_subset_opt(
        &self,
        array_subset: &ArraySubset,
        options: &CodecOptions,
    ) -> Result<Vec<u8>, ArrayError> {
        let chunks = self.chunks_overlapping(array_subset)?;
        let mut output = self.fill_value.repeat(array_subset.num_elements_usize());
        if chunks.is_empty() {
            return Ok(output);
        }

        let chunk_shape = self.chunk_grid.chunk_shape_u64();
        let element_size = self.data_type().size();
        let concurrent_target = options.concurrent_target().max(1);
        let mut chunks_iter = chunks.iter();
        loop {
            let batch: Vec<OverlappingChunk> =
                chunks_iter.by_ref().take(concurrent_target).collect();
            if batch.is_empty() {
                break;
            }
            let decoded = batch
                .par_iter()
                .map(|chunk| self.retrieve_chunk_if_exists_opt(&chunk.chunk_indices, options))
                .collect::<Result<Vec<_>, _>>()?;
            for (chunk, chunk_bytes) in std::iter::zip(&batch, decoded) {
                let Some(chunk_bytes) = chunk_bytes else {
                    continue;
                };
                array_bytes::copy_subset(
                    &chunk_bytes,
                    &chunk_shape,
                    &chunk.chunk_subset,
                    &mut output,
                    array_subset.shape(),
                    &chunk.output_subset,
                    element_size,
                    self.order(),
                )?;
            }
        }
        Ok(output)
    }

    /// Read and decode the `array_subset` of the array into a vector of its elements with default codec options.
    ///
    /// # Errors
    /// Returns [`ArrayError::IncompatibleElementType`] if `T` does not match the data type, or see [`Array::retrieve_array_subset_opt`].
    pub fn retrieve_array_subset_elements<T: Element>(
        &self,
        array_subset: &ArraySubset,
    ) -> Result<Vec<T>, ArrayError> {
        let options = global_config().codec_options();
        self.retrieve_array_subset_elements_opt(array_subset, &options)
    }

    /// Explicit options version of [`retrieve_array_subset_elements`](Array::retrieve_array_subset_elements).
    #[allow(clippy::missing_errors_doc)]
    pub fn retrieve_array_subset_elements_opt<T: Element>(
        &self,
        array_subset: &ArraySubset,
        options: &CodecOptions,
    ) -> Result<Vec<T>, ArrayError> {
        self.check_element_type::<T>()?;
        let bytes = self.retrieve_array_subset_opt(array_subset, options)?;
        Ok(bytemuck::allocation::pod_collect_to_vec(&bytes))
    }

    /// Read and decode the chunk at `chunk_indices` into a vector of its elements with default codec options.
    ///
    /// # Errors
    /// Returns [`ArrayError::IncompatibleElementType`] if `T` does not match the data type, or see [`Array::retrieve_chunk_if_exists_opt`].
    pub fn retrieve_chunk_elements<T: Element>(
        &self,
        chunk_indices: &[u64],
    ) -> Result<Vec<T>, ArrayError> {
        self.check_element_type::<T>()?;
        let bytes = self.retrieve_chunk(chunk_indices)?;
        Ok(bytemuck::allocation::pod_collect_to_vec(&bytes))
    }
}
