use std::iter::FusedIterator;

use itertools::izip;

use super::{Indices, IndicesIterator};
use crate::{ArrayShape, ArraySubset, ChunkOrder, IncompatibleArraySubsetError, ravel_indices};

/// Return the number of dimensions, starting from the fastest varying dimension in `order`, which can be merged into a single contiguous run of elements.
///
/// The fastest varying dimension is always contiguous.
/// Each subsequent dimension is contiguous if every faster varying dimension spans the full extent of `array_shape`.
#[must_use]
pub fn contiguous_dimensions(
    subset: &ArraySubset,
    array_shape: &[u64],
    order: ChunkOrder,
) -> usize {
    let mut dims = 0;
    let mut contiguous = true;
    let pairs = izip!(subset.start(), subset.shape(), array_shape);
    let mut check = |(&start, &size, &array_size): (&u64, &u64, &u64)| {
        if contiguous {
            dims += 1;
            contiguous = start == 0 && size == array_size;
        }
    };
    match order {
        ChunkOrder::RowMajor => pairs.rev().for_each(&mut check),
        ChunkOrder::ColumnMajor => pairs.for_each(&mut check),
    }
    dims
}

/// Iterates over contiguous runs of elements in an array subset.
///
/// The iterator item is the linearised index of the first element of each run within the enclosing array.
/// Every run has [`contiguous_elements`](ContiguousLinearisedIndices::contiguous_elements) elements.
///
/// For example, consider a 4x3 row-major array with element indices
/// ```text
/// (0, 0)  (0, 1)  (0, 2)
/// (1, 0)  (1, 1)  (1, 2)
/// (2, 0)  (2, 1)  (2, 2)
/// (3, 0)  (3, 1)  (3, 2)
/// ```
/// An iterator with an array subset covering the entire array will produce `[0]` with 12 contiguous elements.
/// An iterator with an array subset corresponding to the lower right 2x2 region will produce `[7, 10]` with 2 contiguous elements.
#[derive(Clone, Debug)]
pub struct ContiguousLinearisedIndices {
    run_starts: Indices,
    array_shape: ArrayShape,
    order: ChunkOrder,
    contiguous_elements: u64,
}

impl ContiguousLinearisedIndices {
    /// Create a new contiguous linearised indices iterator.
    ///
    /// # Errors
    /// Returns [`IncompatibleArraySubsetError`] if `array_shape` does not encapsulate `subset`.
    pub fn new(
        subset: ArraySubset,
        array_shape: &[u64],
        order: ChunkOrder,
    ) -> Result<Self, IncompatibleArraySubsetError> {
        let dims = contiguous_dimensions(&subset, array_shape, order);
        Self::new_with_dimensions(subset, array_shape, order, dims)
    }

    /// Create a new contiguous linearised indices iterator merging at most `dimensions` of the fastest varying dimensions into each run.
    ///
    /// This is used to iterate over two arrays in lockstep, with the minimum [`contiguous_dimensions`] of both.
    ///
    /// # Errors
    /// Returns [`IncompatibleArraySubsetError`] if `array_shape` does not encapsulate `subset`.
    pub fn new_with_dimensions(
        subset: ArraySubset,
        array_shape: &[u64],
        order: ChunkOrder,
        dimensions: usize,
    ) -> Result<Self, IncompatibleArraySubsetError> {
        subset.check_inbounds(array_shape)?;
        let dimensions = dimensions.min(contiguous_dimensions(&subset, array_shape, order));
        let ndim = subset.dimensionality();
        let merged = |axis: usize| match order {
            ChunkOrder::RowMajor => axis >= ndim - dimensions,
            ChunkOrder::ColumnMajor => axis < dimensions,
        };
        let mut contiguous_elements = 1;
        let run_shape = subset
            .shape()
            .iter()
            .enumerate()
            .map(|(axis, &size)| {
                if merged(axis) {
                    contiguous_elements *= size;
                    1.min(size)
                } else {
                    size
                }
            })
            .collect();
        let run_starts = ArraySubset::new_with_start_shape(subset.start().to_vec(), run_shape)?;
        Ok(Self {
            run_starts: run_starts.indices(order),
            array_shape: array_shape.to_vec(),
            order,
            contiguous_elements,
        })
    }

    /// Return the number of runs (i.e. the length of the iterator).
    #[must_use]
    pub fn len(&self) -> u64 {
        self.run_starts.len()
    }

    /// Returns true if there are no runs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the number of contiguous elements (fixed on each iteration).
    #[must_use]
    pub fn contiguous_elements(&self) -> u64 {
        self.contiguous_elements
    }

    /// Create a new serial iterator.
    #[must_use]
    pub fn iter(&self) -> ContiguousLinearisedIndicesIterator<'_> {
        <&Self as IntoIterator>::into_iter(self)
    }
}

impl<'a> IntoIterator for &'a ContiguousLinearisedIndices {
    type Item = u64;
    type IntoIter = ContiguousLinearisedIndicesIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        ContiguousLinearisedIndicesIterator {
            inner: self.run_starts.iter(),
            array_shape: &self.array_shape,
            order: self.order,
        }
    }
}

/// Serial contiguous linearised indices iterator.
///
/// See [`ContiguousLinearisedIndices`].
#[derive(Clone, Debug)]
pub struct ContiguousLinearisedIndicesIterator<'a> {
    inner: IndicesIterator<'a>,
    array_shape: &'a [u64],
    order: ChunkOrder,
}

impl Iterator for ContiguousLinearisedIndicesIterator<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        let indices = self.inner.next()?;
        Some(ravel_indices(&indices, self.array_shape, self.order))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl FusedIterator for ContiguousLinearisedIndicesIterator<'_> {}
