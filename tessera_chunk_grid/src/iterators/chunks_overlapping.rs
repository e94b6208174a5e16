use std::iter::FusedIterator;

use super::{Indices, IndicesIterator};
use crate::{ArrayIndices, ArraySubset, ChunkOrder, RegularChunkGrid};

/// A chunk overlapping an array subset, as yielded by [`ChunksOverlapping`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlappingChunk {
    /// The chunk grid indices of the chunk.
    pub chunk_indices: ArrayIndices,
    /// The overlapping region relative to the chunk origin.
    pub chunk_subset: ArraySubset,
    /// The overlapping region in array coordinates.
    pub array_subset: ArraySubset,
    /// The overlapping region relative to the start of the requested array subset.
    pub output_subset: ArraySubset,
}

/// Iterates over the chunks of a [`RegularChunkGrid`] overlapping an array subset.
///
/// Created by [`RegularChunkGrid::chunks_overlapping`].
/// Iteration is lazy; the description can be iterated any number of times.
#[derive(Clone, Debug)]
pub struct ChunksOverlapping {
    grid: RegularChunkGrid,
    array_subset: ArraySubset,
    chunks: ArraySubset,
    indices: Indices,
}

impl ChunksOverlapping {
    pub(crate) fn new(
        grid: RegularChunkGrid,
        array_subset: ArraySubset,
        chunks: ArraySubset,
        order: ChunkOrder,
    ) -> Self {
        let indices = chunks.indices(order);
        Self {
            grid,
            array_subset,
            chunks,
            indices,
        }
    }

    /// Return the subset of chunk grid indices covered.
    #[must_use]
    pub fn chunks(&self) -> &ArraySubset {
        &self.chunks
    }

    /// Return the number of chunks.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.indices.len()
    }

    /// Returns true if no chunks overlap.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Create a new serial iterator.
    #[must_use]
    pub fn iter(&self) -> ChunksOverlappingIterator<'_> {
        <&Self as IntoIterator>::into_iter(self)
    }
}

impl<'a> IntoIterator for &'a ChunksOverlapping {
    type Item = OverlappingChunk;
    type IntoIter = ChunksOverlappingIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        ChunksOverlappingIterator {
            grid: &self.grid,
            array_subset: &self.array_subset,
            inner: self.indices.iter(),
        }
    }
}

/// Serial chunks overlapping iterator.
///
/// See [`ChunksOverlapping`].
#[derive(Clone, Debug)]
pub struct ChunksOverlappingIterator<'a> {
    grid: &'a RegularChunkGrid,
    array_subset: &'a ArraySubset,
    inner: IndicesIterator<'a>,
}

impl ChunksOverlappingIterator<'_> {
    fn overlapping_chunk(&self, chunk_indices: ArrayIndices) -> OverlappingChunk {
        let origin = self.grid.chunk_origin(&chunk_indices);
        let chunk = ArraySubset::new_with_start_shape(origin.clone(), self.grid.chunk_shape_u64())
            .unwrap_or_else(|_| {
                unreachable!("chunk origin and shape share the grid dimensionality")
            });
        let array_subset = overlap_unchecked(&chunk, self.array_subset);
        let chunk_subset = relative_unchecked(&array_subset, &origin);
        let output_subset = relative_unchecked(&array_subset, self.array_subset.start());
        OverlappingChunk {
            chunk_indices,
            chunk_subset,
            array_subset,
            output_subset,
        }
    }
}

fn overlap_unchecked(a: &ArraySubset, b: &ArraySubset) -> ArraySubset {
    a.overlap(b)
        .unwrap_or_else(|_| unreachable!("subsets share the grid dimensionality"))
}

fn relative_unchecked(subset: &ArraySubset, start: &[u64]) -> ArraySubset {
    subset
        .relative_to(start)
        .unwrap_or_else(|_| unreachable!("overlap lies within both subsets"))
}

impl Iterator for ChunksOverlappingIterator<'_> {
    type Item = OverlappingChunk;

    fn next(&mut self) -> Option<Self::Item> {
        let chunk_indices = self.inner.next()?;
        Some(self.overlapping_chunk(chunk_indices))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl FusedIterator for ChunksOverlappingIterator<'_> {}
