//! Chunked, compressed arrays.
//!
//! An [`Array`] is a dense multidimensional array of fixed-width elements, partitioned into chunks by a [`RegularChunkGrid`].
//! Each chunk is encoded independently by a [`Codec`] and stored under its own key beneath the array prefix.
//! A chunk which has never been written, or whose elements all equal the fill value, is absent from the store and reads as the [`FillValue`].
//!
//! Use [`ArrayBuilder`] to create a new array, or [`Array::open`] to open an existing one.
//!
//! ## Reading and writing
//! - [`retrieve_array_subset`](Array::retrieve_array_subset) and [`store_array_subset`](Array::store_array_subset) read and write any region as raw element bytes.
//! - [`retrieve_array_subset_elements`](Array::retrieve_array_subset_elements) and [`store_array_subset_elements`](Array::store_array_subset_elements) read and write native [`Element`]s.
//! - [`retrieve_chunk`](Array::retrieve_chunk) and [`store_chunk`](Array::store_chunk) read and write whole chunks.
//!
//! Regions are [`ArraySubset`]s, and raw bytes are laid out in the array [order](ArrayOrder).
//!
//! A write that only partially covers a chunk merges into the existing chunk (read-modify-write).
//! If the store [supports compare-and-set](crate::storage::WritableStorageTraits::supports_compare_and_set), the merge is retried when another writer changed the chunk concurrently.
//! Otherwise the last writer of a chunk wins.
//!
//! Chunks are always stored at the full chunk shape; elements beyond the array shape hold the fill value.

mod array_builder;
mod array_bytes;
mod array_errors;
mod array_info;
mod array_sync_listable;
mod array_sync_readable;
mod array_sync_writable;
pub mod chunk_key_encoding;
mod element;
mod fill_value;

use std::num::NonZeroU64;
use std::sync::Arc;

pub use array_builder::ArrayBuilder;
pub use array_errors::ArrayError;
pub use array_info::ArrayInfo;
pub use chunk_key_encoding::ChunkKeyEncoding;
pub use element::Element;
pub use fill_value::FillValue;

pub use tessera_chunk_grid::{
    iterators::{ChunksOverlapping, OverlappingChunk},
    ArrayIndices, ArrayShape, ArraySubset, ChunkOrder, ChunkShape, IncompatibleArraySubsetError,
    RegularChunkGrid,
};
pub use tessera_codec::{Codec, CodecError, CodecOptions, CodecRegistry};

pub use crate::metadata::{
    ArrayMetadata, ArrayOrder, ChunkKeyEncodingMetadata, ChunkKeySeparator, CodecConfiguration,
    CodecMetadata, DataType, DataTypeKind, Endianness, FillValueMetadata, NodeMetadata, PreFilter,
};

use crate::node::{retrieve_metadata, NodeAttributes, NodePath};
use crate::storage::{ReadableStorageTraits, StoreKey};

/// The access mode of an opened [`Array`] or [`Group`](crate::group::Group).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum OpenMode {
    /// Reads only. Write operations fail with a read only error.
    ReadOnly,
    /// Reads and writes.
    #[default]
    ReadWrite,
}

/// A chunked, compressed array.
///
/// An array is a view of the metadata and chunks at a [`NodePath`] in a store.
/// It holds no chunk data itself, so any number of arrays may be opened on the same path.
///
/// The shape is the only mutable property of an array, see [`resize`](Array::resize).
#[derive(Debug)]
pub struct Array<TStorage: ?Sized> {
    storage: Arc<TStorage>,
    path: NodePath,
    mode: OpenMode,
    metadata: ArrayMetadata,
    chunk_grid: RegularChunkGrid,
    chunk_key_encoding: ChunkKeyEncoding,
    codec: Codec,
    fill_value: FillValue,
    chunk_num_elements: usize,
    registry: Arc<CodecRegistry>,
}

impl<TStorage: ?Sized> Array<TStorage> {
    /// Create an array at `path` with `metadata` using the compressors in `registry`.
    ///
    /// This does not read or write the store, see [`ArrayBuilder::create`] and [`Array::open`].
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if the path is invalid or the metadata is inconsistent: mismatched dimensionality, a chunk too large to decode into memory, an unrepresentable fill value, or an unsupported codec.
    pub fn new_with_metadata(
        storage: Arc<TStorage>,
        path: &str,
        metadata: ArrayMetadata,
        registry: Arc<CodecRegistry>,
        mode: OpenMode,
    ) -> Result<Self, ArrayError> {
        let path = NodePath::new(path)?;
        if metadata.chunk_shape.len() != metadata.shape.len() {
            return Err(ArrayError::InvalidChunkGridDimensionality(
                metadata.chunk_shape.len(),
                metadata.shape.len(),
            ));
        }
        let chunk_grid = RegularChunkGrid::new(metadata.chunk_shape.clone());
        let chunk_num_elements = chunk_grid
            .chunk_num_elements()
            .and_then(|num_elements| usize::try_from(num_elements).ok())
            .filter(|num_elements| {
                num_elements
                    .checked_mul(metadata.data_type.size())
                    .is_some_and(|size| isize::try_from(size).is_ok())
            })
            .ok_or_else(|| ArrayError::ChunkTooLarge(chunk_grid.chunk_shape_u64()))?;
        let fill_value = FillValue::from_metadata(&metadata.data_type, &metadata.fill_value)
            .ok_or(ArrayError::InvalidFillValue {
                data_type: metadata.data_type,
                fill_value: metadata.fill_value,
            })?;
        let codec = Codec::from_metadata(&metadata.codec, &registry)?;
        Ok(Self {
            storage,
            path,
            mode,
            chunk_grid,
            chunk_key_encoding: ChunkKeyEncoding::new(metadata.chunk_key_encoding),
            codec,
            fill_value,
            chunk_num_elements,
            metadata,
            registry,
        })
    }

    /// Get the underlying storage backing the array.
    #[must_use]
    pub fn storage(&self) -> Arc<TStorage> {
        self.storage.clone()
    }

    /// Get the node path.
    #[must_use]
    pub const fn path(&self) -> &NodePath {
        &self.path
    }

    /// Get the access mode.
    #[must_use]
    pub const fn mode(&self) -> OpenMode {
        self.mode
    }

    /// Get the array metadata.
    #[must_use]
    pub const fn metadata(&self) -> &ArrayMetadata {
        &self.metadata
    }

    /// Get the array shape.
    #[must_use]
    pub fn shape(&self) -> &[u64] {
        &self.metadata.shape
    }

    /// Get the array dimensionality.
    #[must_use]
    pub fn dimensionality(&self) -> usize {
        self.metadata.shape.len()
    }

    /// Get the chunk shape.
    #[must_use]
    pub fn chunk_shape(&self) -> &[NonZeroU64] {
        self.chunk_grid.chunk_shape()
    }

    /// Get the data type.
    #[must_use]
    pub const fn data_type(&self) -> &DataType {
        &self.metadata.data_type
    }

    /// Get the fill value.
    #[must_use]
    pub const fn fill_value(&self) -> &FillValue {
        &self.fill_value
    }

    /// Get the codec.
    #[must_use]
    pub const fn codec(&self) -> &Codec {
        &self.codec
    }

    /// Get the codec registry the array was created or opened with.
    #[must_use]
    pub fn registry(&self) -> &Arc<CodecRegistry> {
        &self.registry
    }

    /// Get the chunk grid.
    #[must_use]
    pub const fn chunk_grid(&self) -> &RegularChunkGrid {
        &self.chunk_grid
    }

    /// Get the chunk key encoding.
    #[must_use]
    pub const fn chunk_key_encoding(&self) -> &ChunkKeyEncoding {
        &self.chunk_key_encoding
    }

    /// Get the element order within chunks, which is also the order in which chunks are enumerated.
    #[must_use]
    pub fn order(&self) -> ChunkOrder {
        match self.metadata.order {
            ArrayOrder::C => ChunkOrder::RowMajor,
            ArrayOrder::F => ChunkOrder::ColumnMajor,
        }
    }

    /// Return the number of chunks along each dimension.
    #[must_use]
    pub fn chunk_grid_shape(&self) -> ArrayShape {
        std::iter::zip(self.shape(), self.chunk_shape())
            .map(|(&size, chunk_size)| size.div_ceil(chunk_size.get()))
            .collect()
    }

    /// Return the store key of the chunk at `chunk_indices`.
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if the key is invalid.
    pub fn chunk_key(&self, chunk_indices: &[u64]) -> Result<StoreKey, ArrayError> {
        let encoded = self.chunk_key_encoding.encode(chunk_indices);
        Ok(self.path.prefix()?.key(&encoded)?)
    }

    /// Return the subset of the array covered by the chunk at `chunk_indices`, clipped to the array shape.
    ///
    /// # Errors
    /// Returns [`ArrayError::InvalidChunkGridIndices`] if `chunk_indices` are outside the chunk grid.
    pub fn chunk_subset_bounded(&self, chunk_indices: &[u64]) -> Result<ArraySubset, ArrayError> {
        self.check_chunk_indices(chunk_indices)?;
        Ok(self
            .chunk_grid
            .chunk_subset_bounded(chunk_indices, self.shape())?)
    }

    /// Return the chunks overlapping `array_subset`, enumerated in array order.
    ///
    /// # Errors
    /// Returns [`ArrayError::IndexOutOfRange`] if `array_subset` is outside the array.
    pub fn chunks_overlapping(
        &self,
        array_subset: &ArraySubset,
    ) -> Result<ChunksOverlapping, ArrayError> {
        Ok(self
            .chunk_grid
            .chunks_overlapping(array_subset, self.shape(), self.order())?)
    }

    /// Return the user attributes of the array.
    #[must_use]
    pub fn attrs(&self) -> NodeAttributes<'_, TStorage> {
        NodeAttributes::new(&*self.storage, &self.path, self.mode == OpenMode::ReadWrite)
    }

    fn check_chunk_indices(&self, chunk_indices: &[u64]) -> Result<(), ArrayError> {
        let grid_shape = self.chunk_grid_shape();
        if chunk_indices.len() == grid_shape.len()
            && std::iter::zip(chunk_indices, &grid_shape).all(|(index, size)| index < size)
        {
            Ok(())
        } else {
            Err(ArrayError::InvalidChunkGridIndices(chunk_indices.to_vec()))
        }
    }

    /// Returns true if the chunk at `chunk_indices` lies entirely within the array shape.
    fn chunk_within_shape(&self, chunk_indices: &[u64]) -> bool {
        std::iter::zip(self.chunk_grid.chunk_origin(chunk_indices), self.shape())
            .zip(self.chunk_shape())
            .all(|((origin, &size), chunk_size)| {
                origin.saturating_add(chunk_size.get()) <= size
            })
    }

    fn check_element_type<T: Element>(&self) -> Result<(), ArrayError> {
        if T::compatible(self.data_type()) {
            Ok(())
        } else {
            Err(ArrayError::IncompatibleElementType {
                data_type: *self.data_type(),
                element: T::NAME,
            })
        }
    }

    fn check_writable(&self) -> Result<(), ArrayError> {
        match self.mode {
            OpenMode::ReadWrite => Ok(()),
            OpenMode::ReadOnly => Err(ArrayError::ReadOnly(self.path.clone())),
        }
    }

    /// Return the number of bytes of a decoded chunk.
    fn chunk_size_bytes(&self) -> usize {
        self.chunk_num_elements() * self.data_type().size()
    }

    fn chunk_num_elements(&self) -> usize {
        self.chunk_num_elements
    }

    fn decode_chunk(
        &self,
        key: &StoreKey,
        encoded: &[u8],
        options: &CodecOptions,
    ) -> Result<Vec<u8>, ArrayError> {
        self.codec
            .decode(encoded, self.chunk_size_bytes(), options)
            .map_err(|source| ArrayError::CorruptChunk {
                key: key.clone(),
                source,
            })
    }

    /// Reset elements of a decoded chunk beyond the array shape to the fill value.
    fn clear_chunk_padding(
        &self,
        chunk_indices: &[u64],
        chunk_bytes: Vec<u8>,
    ) -> Result<Vec<u8>, ArrayError> {
        if self.chunk_within_shape(chunk_indices) {
            return Ok(chunk_bytes);
        }
        let chunk_shape = self.chunk_grid.chunk_shape_u64();
        let mut cleared = self
            .fill_value
            .repeat(self.chunk_num_elements());
        let bounded = self
            .chunk_grid
            .chunk_subset_bounded(chunk_indices, self.shape())?
            .relative_to(&self.chunk_grid.chunk_origin(chunk_indices))?;
        array_bytes::copy_subset(
            &chunk_bytes,
            &chunk_shape,
            &bounded,
            &mut cleared,
            &chunk_shape,
            &bounded,
            self.data_type().size(),
            self.order(),
        )?;
        Ok(cleared)
    }
}

impl<TStorage: ?Sized + ReadableStorageTraits> Array<TStorage> {
    /// Open the existing array at `path` with the default [`CodecRegistry`].
    ///
    /// # Errors
    /// Returns [`ArrayError::NotFound`] if there is no node at `path`, [`ArrayError::NotAnArray`] if the node is a group, or another [`ArrayError`] if the metadata is invalid or cannot be retrieved.
    pub fn open(storage: Arc<TStorage>, path: &str, mode: OpenMode) -> Result<Self, ArrayError> {
        Self::open_with_registry(storage, path, mode, Arc::new(CodecRegistry::default()))
    }

    /// Open the existing array at `path`, looking up its codec in `registry`.
    ///
    /// # Errors
    /// See [`Array::open`]. Returns [`CodecError::UnsupportedCodec`] (wrapped) if the codec is not in `registry`.
    pub fn open_with_registry(
        storage: Arc<TStorage>,
        path: &str,
        mode: OpenMode,
        registry: Arc<CodecRegistry>,
    ) -> Result<Self, ArrayError> {
        let node_path = NodePath::new(path)?;
        match retrieve_metadata(&*storage, &node_path)? {
            Some(NodeMetadata::Array(metadata)) => {
                Self::new_with_metadata(storage, path, metadata, registry, mode)
            }
            Some(NodeMetadata::Group(_)) => Err(ArrayError::NotAnArray(node_path)),
            None => Err(ArrayError::NotFound(node_path)),
        }
    }
}
