use tessera_chunk_grid::iterators::{contiguous_dimensions, ContiguousLinearisedIndices};

use crate::array::{ArraySubset, ChunkOrder, IncompatibleArraySubsetError};

/// Copy the elements of `src_subset` in an array of `src_shape` to `dst_subset` in an array of `dst_shape`.
///
/// Both subsets must have the same shape. Elements are copied in contiguous runs.
#[allow(clippy::too_many_arguments)]
pub(crate) fn copy_subset(
    src: &[u8],
    src_shape: &[u64],
    src_subset: &ArraySubset,
    dst: &mut [u8],
    dst_shape: &[u64],
    dst_subset: &ArraySubset,
    element_size: usize,
    order: ChunkOrder,
) -> Result<(), IncompatibleArraySubsetError> {
    debug_assert_eq!(src_subset.shape(), dst_subset.shape());
    let dimensions = contiguous_dimensions(src_subset, src_shape, order)
        .min(contiguous_dimensions(dst_subset, dst_shape, order));
    let src_indices = ContiguousLinearisedIndices::new_with_dimensions(
        src_subset.clone(),
        src_shape,
        order,
        dimensions,
    )?;
    let dst_indices = ContiguousLinearisedIndices::new_with_dimensions(
        dst_subset.clone(),
        dst_shape,
        order,
        dimensions,
    )?;
    #[allow(clippy::cast_possible_truncation)]
    let run = src_indices.contiguous_elements() as usize * element_size;
    for (src_index, dst_index) in src_indices.iter().zip(dst_indices.iter()) {
        #[allow(clippy::cast_possible_truncation)]
        let (src_offset, dst_offset) = (
            src_index as usize * element_size,
            dst_index as usize * element_size,
        );
        dst[dst_offset..dst_offset + run].copy_from_slice(&src[src_offset..src_offset + run]);
    }
    Ok(())
}
