use std::iter::FusedIterator;
use std::ops::Range;

use crate::{unravel_index, ArrayIndices, ArraySubset, ChunkOrder};

/// An iterator over the indices in an array subset.
///
/// Iterates over the last dimension fastest for [`ChunkOrder::RowMajor`] (i.e. C-contiguous order), or the first dimension fastest for [`ChunkOrder::ColumnMajor`].
/// For example, consider a 4x3 array with element indices
/// ```text
/// (0, 0)  (0, 1)  (0, 2)
/// (1, 0)  (1, 1)  (1, 2)
/// (2, 0)  (2, 1)  (2, 2)
/// (3, 0)  (3, 1)  (3, 2)
/// ```
/// A row-major iterator with an array subset corresponding to the lower right 2x2 region will produce `[(2, 1), (2, 2), (3, 1), (3, 2)]`.
/// A column-major iterator will produce `[(2, 1), (3, 1), (2, 2), (3, 2)]`.
#[derive(Clone, Debug)]
pub struct Indices {
    subset: ArraySubset,
    order: ChunkOrder,
}

impl Indices {
    /// Create a new indices struct.
    #[must_use]
    pub fn new(subset: ArraySubset, order: ChunkOrder) -> Self {
        Self { subset, order }
    }

    /// Return the number of indices.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.subset.num_elements()
    }

    /// Returns true if the number of indices is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Create a new serial iterator.
    #[must_use]
    pub fn iter(&self) -> IndicesIterator<'_> {
        <&Self as IntoIterator>::into_iter(self)
    }
}

impl<'a> IntoIterator for &'a Indices {
    type Item = ArrayIndices;
    type IntoIter = IndicesIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        IndicesIterator {
            subset: &self.subset,
            order: self.order,
            range: 0..self.len(),
        }
    }
}

/// Serial indices iterator.
///
/// See [`Indices`].
#[derive(Clone, Debug)]
pub struct IndicesIterator<'a> {
    subset: &'a ArraySubset,
    order: ChunkOrder,
    range: Range<u64>,
}

impl IndicesIterator<'_> {
    fn indices(&self, index: u64) -> ArrayIndices {
        let mut indices = unravel_index(index, self.subset.shape(), self.order);
        std::iter::zip(&mut indices, self.subset.start()).for_each(|(index, start)| {
            *index += start;
        });
        indices
    }
}

impl Iterator for IndicesIterator<'_> {
    type Item = ArrayIndices;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.range.next()?;
        Some(self.indices(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.range.end - self.range.start).ok();
        (remaining.unwrap_or(usize::MAX), remaining)
    }
}

impl DoubleEndedIterator for IndicesIterator<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let index = self.range.next_back()?;
        Some(self.indices(index))
    }
}

impl FusedIterator for IndicesIterator<'_> {}
