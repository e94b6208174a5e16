//! Array subsets.
//!
//! An [`ArraySubset`] represents a hyperrectangular subset of an array or chunk.

use std::fmt::Display;
use std::ops::Range;

use crate::iterators::{ContiguousLinearisedIndices, Indices};
use crate::{ArrayIndices, ArrayShape, ChunkOrder, IncompatibleArraySubsetError};

/// An array subset.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct ArraySubset {
    /// The start of the array subset.
    start: ArrayIndices,
    /// The shape of the array subset.
    shape: ArrayShape,
}

impl Display for ArraySubset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.to_ranges())
    }
}

impl<T: IntoIterator<Item = Range<u64>>> From<T> for ArraySubset {
    fn from(ranges: T) -> Self {
        let (start, shape) = ranges
            .into_iter()
            .map(|range| (range.start, range.end.saturating_sub(range.start)))
            .unzip();
        Self { start, shape }
    }
}

impl ArraySubset {
    /// Create a new empty array subset.
    #[must_use]
    pub fn new_empty(dimensionality: usize) -> Self {
        Self {
            start: vec![0; dimensionality],
            shape: vec![0; dimensionality],
        }
    }

    /// Create a new array subset from a list of [`Range`]s.
    ///
    /// A range with `end < start` is treated as empty.
    #[must_use]
    pub fn new_with_ranges(ranges: &[Range<u64>]) -> Self {
        Self::from(ranges.iter().cloned())
    }

    /// Create a new array subset with `shape` starting at the origin.
    #[must_use]
    pub fn new_with_shape(shape: ArrayShape) -> Self {
        Self {
            start: vec![0; shape.len()],
            shape,
        }
    }

    /// Create a new array subset.
    ///
    /// # Errors
    /// Returns [`IncompatibleArraySubsetError`] if the lengths of `start` and `shape` do not
    /// match.
    pub fn new_with_start_shape(
        start: ArrayIndices,
        shape: ArrayShape,
    ) -> Result<Self, IncompatibleArraySubsetError> {
        if start.len() == shape.len() {
            Ok(Self { start, shape })
        } else {
            Err(IncompatibleArraySubsetError::IncompatibleDimensionality {
                got: shape.len(),
                expected: start.len(),
            })
        }
    }

    /// Return the start of the array subset.
    #[must_use]
    pub fn start(&self) -> &[u64] {
        &self.start
    }

    /// Return the shape of the array subset.
    #[must_use]
    pub fn shape(&self) -> &[u64] {
        &self.shape
    }

    /// Return the end (exclusive) of the array subset.
    ///
    /// Saturates at [`u64::MAX`].
    #[must_use]
    pub fn end_exc(&self) -> ArrayIndices {
        std::iter::zip(&self.start, &self.shape)
            .map(|(start, size)| start.saturating_add(*size))
            .collect()
    }

    /// Return the array subset as a list of ranges.
    #[must_use]
    pub fn to_ranges(&self) -> Vec<Range<u64>> {
        std::iter::zip(&self.start, &self.shape)
            .map(|(&start, &size)| start..start.saturating_add(size))
            .collect()
    }

    /// Returns if the array subset is empty (i.e. has a zero element in its shape).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shape.contains(&0)
    }

    /// Return the dimensionality of the array subset.
    #[must_use]
    pub fn dimensionality(&self) -> usize {
        self.start.len()
    }

    /// Return the number of elements of the array subset.
    ///
    /// Equal to the product of the components of its shape.
    #[must_use]
    pub fn num_elements(&self) -> u64 {
        self.shape.iter().product()
    }

    /// Return the number of elements of the array subset as a `usize`.
    ///
    /// # Panics
    /// Panics if [`num_elements()`](Self::num_elements()) is greater than [`usize::MAX`].
    #[must_use]
    pub fn num_elements_usize(&self) -> usize {
        usize::try_from(self.num_elements()).expect("element count exceeds usize::MAX")
    }

    /// Returns true if the array subset is within the bounds of `array_shape`.
    ///
    /// A subset whose end is not representable as a [`u64`] is never in bounds.
    #[must_use]
    pub fn inbounds_shape(&self, array_shape: &[u64]) -> bool {
        self.dimensionality() == array_shape.len()
            && itertools::izip!(&self.start, &self.shape, array_shape).all(
                |(&start, &size, &array_size)| {
                    start
                        .checked_add(size)
                        .is_some_and(|end| end <= array_size)
                },
            )
    }

    /// Check that the array subset is within the bounds of `array_shape`.
    ///
    /// # Errors
    /// Returns [`IncompatibleArraySubsetError`] if the dimensionality does not match or the subset
    /// extends beyond `array_shape`.
    pub fn check_inbounds(&self, array_shape: &[u64]) -> Result<(), IncompatibleArraySubsetError> {
        if self.dimensionality() != array_shape.len() {
            Err(IncompatibleArraySubsetError::IncompatibleDimensionality {
                got: self.dimensionality(),
                expected: array_shape.len(),
            })
        } else if self.inbounds_shape(array_shape) {
            Ok(())
        } else {
            Err(IncompatibleArraySubsetError::OutOfBounds {
                subset: self.clone(),
                array_shape: array_shape.to_vec(),
            })
        }
    }

    /// Return the overlapping subset between this array subset and `subset_other`.
    ///
    /// The overlap is empty if the subsets are disjoint.
    ///
    /// # Errors
    /// Returns [`IncompatibleArraySubsetError`] if the dimensionality of `subset_other` does not
    /// match the dimensionality of this array subset.
    pub fn overlap(&self, subset_other: &Self) -> Result<Self, IncompatibleArraySubsetError> {
        if subset_other.dimensionality() != self.dimensionality() {
            return Err(IncompatibleArraySubsetError::IncompatibleDimensionality {
                got: subset_other.dimensionality(),
                expected: self.dimensionality(),
            });
        }
        let (start, shape) = itertools::izip!(
            &self.start,
            &self.shape,
            &subset_other.start,
            &subset_other.shape
        )
        .map(|(&start, &size, &other_start, &other_size)| {
            let overlap_start = start.max(other_start);
            let overlap_end = start
                .saturating_add(size)
                .min(other_start.saturating_add(other_size));
            (overlap_start, overlap_end.saturating_sub(overlap_start))
        })
        .unzip();
        Ok(Self { start, shape })
    }

    /// Return the subset relative to `start`.
    ///
    /// # Errors
    /// Returns [`IncompatibleArraySubsetError`] if the dimensionality of `start` does not match, or
    /// `start` exceeds the start of this subset.
    pub fn relative_to(&self, start: &[u64]) -> Result<Self, IncompatibleArraySubsetError> {
        if start.len() != self.dimensionality() {
            return Err(IncompatibleArraySubsetError::IncompatibleDimensionality {
                got: start.len(),
                expected: self.dimensionality(),
            });
        }
        let relative_start = std::iter::zip(&self.start, start)
            .map(|(&a, &b)| a.checked_sub(b))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| IncompatibleArraySubsetError::OutOfBounds {
                subset: self.clone(),
                array_shape: start.to_vec(),
            })?;
        Ok(Self {
            start: relative_start,
            shape: self.shape.clone(),
        })
    }

    /// Returns an iterator over the indices of elements within the subset in `order`.
    #[must_use]
    pub fn indices(&self, order: ChunkOrder) -> Indices {
        Indices::new(self.clone(), order)
    }

    /// Returns an iterator over the linearised indices of contiguous runs of elements within the
    /// subset, where the subset is within an array of `array_shape` stored in `order`.
    ///
    /// # Errors
    /// Returns [`IncompatibleArraySubsetError`] if `array_shape` does not encapsulate this array
    /// subset.
    pub fn contiguous_linearised_indices(
        &self,
        array_shape: &[u64],
        order: ChunkOrder,
    ) -> Result<ContiguousLinearisedIndices, IncompatibleArraySubsetError> {
        ContiguousLinearisedIndices::new(self.clone(), array_shape, order)
    }
}
