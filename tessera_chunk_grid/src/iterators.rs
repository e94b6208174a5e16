//! Array subset iterators.
//!
//! The iterators are:
//!  - [`Indices`]: iterate over the multidimensional indices of the elements in an array subset,
//!  - [`ContiguousLinearisedIndices`]: iterate over contiguous runs of elements in an array subset, given as linearised offsets into an enclosing array,
//!  - [`ChunksOverlapping`]: iterate over the chunks of a [`RegularChunkGrid`](crate::RegularChunkGrid) overlapping an array subset.
//!
//! All iterators are lazy and restartable: each is a cheap description that can be iterated any number of times.

mod chunks_overlapping;
mod contiguous_indices_iterator;
mod indices_iterator;

pub use chunks_overlapping::{ChunksOverlapping, ChunksOverlappingIterator, OverlappingChunk};
pub use contiguous_indices_iterator::{
    contiguous_dimensions, ContiguousLinearisedIndices, ContiguousLinearisedIndicesIterator,
};
pub use indices_iterator::{Indices, IndicesIterator};
