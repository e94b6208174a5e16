use crate::node::{StorageResultExt, StoreOperation};
use crate::storage::{
    ListableStorageTraits, ReadableStorageTraits, ReadableWritableListableStorageTraits, StoreKey,
};

use super::{Array, ArrayError, ArrayIndices, ArrayInfo, ArrayShape};

impl<TStorage: ?Sized + ReadableStorageTraits + ListableStorageTraits> Array<TStorage> {
    /// Return the keys and chunk grid indices of every chunk stored in the store, in key order.
    ///
    /// Keys under the array prefix which are not chunk keys of the array (such as the metadata) are skipped.
    /// Chunks beyond the current chunk grid, for example after the array was shrunk, are included.
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if there is an underlying store error.
    pub fn stored_chunks(&self) -> Result<Vec<(StoreKey, ArrayIndices)>, ArrayError> {
        let prefix = self.path.prefix()?;
        let keys = self
            .storage
            .list_prefix(&prefix)
            .with_store_context(StoreOperation::List, &prefix)?;
        Ok(keys
            .into_iter()
            .filter_map(|key| {
                let relative = key.as_str().strip_prefix(prefix.as_str())?;
                let chunk_indices = self
                    .chunk_key_encoding
                    .decode(relative, self.dimensionality())?;
                Some((key, chunk_indices))
            })
            .collect())
    }

    /// Return the keys of every chunk stored in the store, in key order.
    ///
    /// # Errors
    /// See [`Array::stored_chunks`].
    pub fn stored_chunk_keys(&self) -> Result<Vec<StoreKey>, ArrayError> {
        Ok(self
            .stored_chunks()?
            .into_iter()
            .map(|(key, _)| key)
            .collect())
    }

    /// Return the total encoded size in bytes of the chunks stored in the store.
    ///
    /// The cost is proportional to the number of stored chunks, not the array shape.
    /// Metadata and attributes are not included.
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if there is an underlying store error.
    pub fn nbytes_stored(&self) -> Result<u64, ArrayError> {
        let mut nbytes = 0;
        for key in self.stored_chunk_keys()? {
            nbytes += self
                .storage
                .size_key(&key)
                .with_store_context(StoreOperation::Get, &key)?
                .unwrap_or_default();
        }
        Ok(nbytes)
    }

    /// Return a summary of the array.
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if there is an underlying store error.
    pub fn info(&self) -> Result<ArrayInfo, ArrayError> {
        let grid_shape = self.chunk_grid_shape();
        let chunks_initialized = self
            .stored_chunks()?
            .iter()
            .filter(|(_, chunk_indices)| {
                std::iter::zip(chunk_indices, &grid_shape).all(|(index, size)| index < size)
            })
            .count();
        Ok(ArrayInfo {
            path: self.path.clone(),
            shape: self.shape().to_vec(),
            chunk_shape: self.chunk_grid.chunk_shape_u64(),
            data_type: *self.data_type(),
            fill_value: self.metadata.fill_value,
            codec: self.metadata.codec.clone(),
            order: self.metadata.order,
            nbytes: self.shape().iter().product::<u64>() * self.data_type().size() as u64,
            nbytes_stored: self.nbytes_stored()?,
            chunks_initialized: chunks_initialized as u64,
            chunks_total: grid_shape.iter().product(),
        })
    }
}

impl<TStorage: ?Sized + ReadableWritableListableStorageTraits + 'static> Array<TStorage> {
    /// Erase stored chunks which lie entirely outside the array shape and reset the out of bounds elements of edge chunks to the fill value.
    ///
    /// Returns the number of chunks erased.
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if the array was opened read only, or there is an underlying store or codec error.
    pub fn prune(&self) -> Result<usize, ArrayError> {
        self.check_writable()?;
        let grid_shape = self.chunk_grid_shape();
        let mut erased = 0;
        for (key, chunk_indices) in self.stored_chunks()? {
            let in_grid =
                std::iter::zip(&chunk_indices, &grid_shape).all(|(index, size)| index < size);
            if !in_grid {
                log::debug!("Pruning chunk {key} outside array shape {:?}", self.shape());
                self.storage
                    .erase(&key)
                    .with_store_context(StoreOperation::Erase, &key)?;
                erased += 1;
            } else if !self.chunk_within_shape(&chunk_indices) {
                let chunk_bytes = self.retrieve_chunk(&chunk_indices)?;
                self.store_chunk(&chunk_indices, &chunk_bytes)?;
            }
        }
        Ok(erased)
    }

    /// Resize the array to `array_shape` and store the updated metadata.
    ///
    /// Only the metadata is rewritten.
    /// Growing the array exposes new elements which read as the fill value; before growing, chunks and chunk regions outside the current shape are [pruned](Array::prune) so that stale data never becomes visible.
    /// Shrinking the array leaves chunks outside the new shape in the store until [`prune`](Array::prune) is called.
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if the array was opened read only, the dimensionality of `array_shape` does not match the array, or there is an underlying store error.
    pub fn resize(&mut self, array_shape: ArrayShape) -> Result<(), ArrayError> {
        self.check_writable()?;
        if array_shape.len() != self.dimensionality() {
            return Err(ArrayError::InvalidChunkGridDimensionality(
                self.dimensionality(),
                array_shape.len(),
            ));
        }
        if std::iter::zip(&array_shape, self.shape()).any(|(new, old)| new > old) {
            self.prune()?;
        }
        log::debug!(
            "Resizing {} from {:?} to {array_shape:?}",
            self.path,
            self.shape()
        );
        self.metadata.shape = array_shape;
        self.store_metadata()
    }
}
