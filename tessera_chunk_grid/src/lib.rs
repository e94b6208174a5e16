//! The chunk grid API for the [`tessera`](https://docs.rs/tessera/latest/tessera/index.html) crate.
//!
//! A [`RegularChunkGrid`] splits an array into fixed-size chunks.
//! It is a pure function of the chunk shape: it maps element indices to chunk indices and decomposes any [`ArraySubset`] into the chunks it overlaps.
//!
//! ## Licence
//! `tessera_chunk_grid` is licensed under either of
//!  - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license <http://opensource.org/licenses/MIT>, at your option.

mod array_subset;
pub use array_subset::ArraySubset;

mod regular;
pub use regular::RegularChunkGrid;

pub mod iterators;

use std::num::NonZeroU64;

use thiserror::Error;

/// The shape of an array.
pub type ArrayShape = Vec<u64>;

/// The shape of a chunk. All dimensions must be non-zero.
pub type ChunkShape = Vec<NonZeroU64>;

/// An ND index to an element in an array or chunk.
pub type ArrayIndices = Vec<u64>;

/// The memory order of elements within a chunk, and the order in which chunks are enumerated.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum ChunkOrder {
    /// Row-major order: the last dimension varies fastest.
    #[default]
    RowMajor,
    /// Column-major order: the first dimension varies fastest.
    ColumnMajor,
}

/// An array subset that is incompatible with an array shape.
#[derive(Clone, Debug, Error)]
pub enum IncompatibleArraySubsetError {
    /// The dimensionality does not match.
    #[error("incompatible dimensionality {got}, expected {expected}")]
    IncompatibleDimensionality {
        /// The dimensionality of the subset or indices.
        got: usize,
        /// The expected dimensionality.
        expected: usize,
    },
    /// The subset extends beyond the array shape.
    #[error("array subset {subset} is out of bounds of array shape {array_shape:?}")]
    OutOfBounds {
        /// The array subset.
        subset: ArraySubset,
        /// The array shape.
        array_shape: ArrayShape,
    },
}

/// Convert a [`ChunkShape`] to an [`ArrayShape`].
#[must_use]
pub fn chunk_shape_to_array_shape(chunk_shape: &[NonZeroU64]) -> ArrayShape {
    chunk_shape.iter().map(|size| size.get()).collect()
}

/// Return the strides (in elements) of an array with `shape` in `order`.
#[must_use]
pub fn strides(shape: &[u64], order: ChunkOrder) -> Vec<u64> {
    let mut strides = vec![0; shape.len()];
    let mut stride = 1;
    match order {
        ChunkOrder::RowMajor => {
            for (out, &size) in strides.iter_mut().zip(shape).rev() {
                *out = stride;
                stride *= size;
            }
        }
        ChunkOrder::ColumnMajor => {
            for (out, &size) in strides.iter_mut().zip(shape) {
                *out = stride;
                stride *= size;
            }
        }
    }
    strides
}

/// Ravel ND `indices` into a linear index of an array with `shape` in `order`.
///
/// Indices are not bounds checked.
#[must_use]
pub fn ravel_indices(indices: &[u64], shape: &[u64], order: ChunkOrder) -> u64 {
    std::iter::zip(indices, strides(shape, order))
        .map(|(index, stride)| index * stride)
        .sum()
}

/// Unravel a linear `index` into ND indices of an array with `shape` in `order`.
#[must_use]
pub fn unravel_index(mut index: u64, shape: &[u64], order: ChunkOrder) -> ArrayIndices {
    let mut indices = vec![0; shape.len()];
    let mut unravel = |out: &mut u64, size: u64| {
        *out = index % size;
        index /= size;
    };
    match order {
        ChunkOrder::RowMajor => std::iter::zip(indices.iter_mut(), shape)
            .rev()
            .for_each(|(out, &size)| unravel(out, size)),
        ChunkOrder::ColumnMajor => std::iter::zip(indices.iter_mut(), shape)
            .for_each(|(out, &size)| unravel(out, size)),
    }
    indices
}
