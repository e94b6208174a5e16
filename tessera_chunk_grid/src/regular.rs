use std::num::NonZeroU64;

use crate::iterators::ChunksOverlapping;
use crate::{
    chunk_shape_to_array_shape, ArrayIndices, ArrayShape, ArraySubset, ChunkOrder, ChunkShape,
    IncompatibleArraySubsetError,
};

/// A regular chunk grid.
///
/// Every chunk has the same shape. Chunks on the upper edge of an array may extend beyond the array shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegularChunkGrid {
    chunk_shape: ChunkShape,
}

impl RegularChunkGrid {
    /// Create a new regular chunk grid with chunk shape `chunk_shape`.
    #[must_use]
    pub fn new(chunk_shape: ChunkShape) -> Self {
        Self { chunk_shape }
    }

    /// Return the chunk shape.
    #[must_use]
    pub fn chunk_shape(&self) -> &[NonZeroU64] {
        &self.chunk_shape
    }

    /// Return the chunk shape as an [`ArrayShape`].
    #[must_use]
    pub fn chunk_shape_u64(&self) -> ArrayShape {
        chunk_shape_to_array_shape(&self.chunk_shape)
    }

    /// Return the number of elements in a chunk, or [`None`] if it overflows a [`u64`].
    #[must_use]
    pub fn chunk_num_elements(&self) -> Option<u64> {
        self.chunk_shape
            .iter()
            .try_fold(1u64, |acc, size| acc.checked_mul(size.get()))
    }

    /// Return the dimensionality of the grid.
    #[must_use]
    pub fn dimensionality(&self) -> usize {
        self.chunk_shape.len()
    }

    fn check_dimensionality(&self, got: usize) -> Result<(), IncompatibleArraySubsetError> {
        if got == self.dimensionality() {
            Ok(())
        } else {
            Err(IncompatibleArraySubsetError::IncompatibleDimensionality {
                got,
                expected: self.dimensionality(),
            })
        }
    }

    /// Return the number of chunks along each dimension of an array with `array_shape`.
    ///
    /// # Errors
    /// Returns [`IncompatibleArraySubsetError`] if the dimensionality of `array_shape` does not match the grid.
    pub fn grid_shape(
        &self,
        array_shape: &[u64],
    ) -> Result<ArrayShape, IncompatibleArraySubsetError> {
        self.check_dimensionality(array_shape.len())?;
        Ok(std::iter::zip(array_shape, &self.chunk_shape)
            .map(|(&size, chunk_size)| size.div_ceil(chunk_size.get()))
            .collect())
    }

    /// Return the indices of the chunk holding the element at `array_indices`.
    ///
    /// # Errors
    /// Returns [`IncompatibleArraySubsetError`] if the dimensionality does not match or `array_indices` is outside of `array_shape`.
    pub fn chunk_indices(
        &self,
        array_indices: &[u64],
        array_shape: &[u64],
    ) -> Result<ArrayIndices, IncompatibleArraySubsetError> {
        self.check_dimensionality(array_indices.len())?;
        let element = ArraySubset::new_with_start_shape(
            array_indices.to_vec(),
            vec![1; array_indices.len()],
        )?;
        element.check_inbounds(array_shape)?;
        Ok(std::iter::zip(array_indices, &self.chunk_shape)
            .map(|(&index, chunk_size)| index / chunk_size.get())
            .collect())
    }

    /// Return the array indices of the first element of the chunk at `chunk_indices`.
    #[must_use]
    pub fn chunk_origin(&self, chunk_indices: &[u64]) -> ArrayIndices {
        std::iter::zip(chunk_indices, &self.chunk_shape)
            .map(|(&index, chunk_size)| index.saturating_mul(chunk_size.get()))
            .collect()
    }

    /// Return the subset of the array covered by the chunk at `chunk_indices`, which may extend beyond the array shape.
    ///
    /// # Errors
    /// Returns [`IncompatibleArraySubsetError`] if the dimensionality of `chunk_indices` does not match the grid.
    pub fn chunk_subset(
        &self,
        chunk_indices: &[u64],
    ) -> Result<ArraySubset, IncompatibleArraySubsetError> {
        self.check_dimensionality(chunk_indices.len())?;
        ArraySubset::new_with_start_shape(self.chunk_origin(chunk_indices), self.chunk_shape_u64())
    }

    /// Return the subset of the array covered by the chunk at `chunk_indices`, clipped to `array_shape`.
    ///
    /// # Errors
    /// Returns [`IncompatibleArraySubsetError`] if the dimensionality of `chunk_indices` or `array_shape` does not match the grid.
    pub fn chunk_subset_bounded(
        &self,
        chunk_indices: &[u64],
        array_shape: &[u64],
    ) -> Result<ArraySubset, IncompatibleArraySubsetError> {
        self.check_dimensionality(array_shape.len())?;
        self.chunk_subset(chunk_indices)?
            .overlap(&ArraySubset::new_with_shape(array_shape.to_vec()))
    }

    /// Return the subset of chunk indices for chunks which overlap `array_subset`.
    ///
    /// The result is empty if `array_subset` is empty.
    ///
    /// # Errors
    /// Returns [`IncompatibleArraySubsetError`] if the dimensionality of `array_subset` does not match the grid.
    pub fn chunks_in_array_subset(
        &self,
        array_subset: &ArraySubset,
    ) -> Result<ArraySubset, IncompatibleArraySubsetError> {
        self.check_dimensionality(array_subset.dimensionality())?;
        if array_subset.is_empty() {
            return Ok(ArraySubset::new_empty(self.dimensionality()));
        }
        let ranges = itertools::izip!(
            array_subset.start(),
            array_subset.shape(),
            &self.chunk_shape
        )
        .map(|(&start, &size, chunk_size)| {
            let chunk_size = chunk_size.get();
            let last = start.saturating_add(size - 1);
            start / chunk_size..last / chunk_size + 1
        })
        .collect::<Vec<_>>();
        Ok(ArraySubset::new_with_ranges(&ranges))
    }

    /// Return a lazy, restartable iterator over the chunks overlapping `array_subset` of an array with `array_shape`.
    ///
    /// Chunks are enumerated in `order`. Each item describes the overlap in chunk, array and output coordinates.
    ///
    /// # Errors
    /// Returns [`IncompatibleArraySubsetError`] if the dimensionality does not match or `array_subset` extends beyond `array_shape`.
    pub fn chunks_overlapping(
        &self,
        array_subset: &ArraySubset,
        array_shape: &[u64],
        order: ChunkOrder,
    ) -> Result<ChunksOverlapping, IncompatibleArraySubsetError> {
        self.check_dimensionality(array_shape.len())?;
        array_subset.check_inbounds(array_shape)?;
        let chunks = self.chunks_in_array_subset(array_subset)?;
        Ok(ChunksOverlapping::new(
            self.clone(),
            array_subset.clone(),
            chunks,
            order,
        ))
    }
}
