use std::num::NonZeroU64;
use std::sync::Arc;

use crate::metadata::Attributes;
use crate::storage::ReadableWritableStorageTraits;

use super::{
    Array, ArrayError, ArrayMetadata, ArrayOrder, ArrayShape, ChunkKeyEncodingMetadata,
    CodecMetadata, CodecRegistry, DataType, FillValueMetadata,
};

/// An [`Array`] builder.
///
/// The array builder is initialised from an array shape, chunk shape, data type and fill value.
/// By default, chunks are stored uncompressed in row-major order with the `default` chunk key encoding and `/` separator.
///
/// Use the methods in the array builder to change the configuration away from these defaults, and then build the array at a path of some storage with [`ArrayBuilder::create`].
///
/// For example:
/// ```rust
/// # use std::sync::Arc;
/// # use std::num::NonZeroUsize;
/// use tessera::array::{ArrayBuilder, CodecMetadata, DataType, PreFilter};
/// # let store = Arc::new(tessera::storage::store::MemoryStore::new());
/// let array = ArrayBuilder::new(
///     vec![8, 8], // array shape
///     vec![4, 4], // regular chunk shape
///     DataType::float32(),
///     f64::NAN,
/// )
/// .codec(
///     CodecMetadata::new("zstd")
///         .with_level(5)
///         .with_pre_filter(PreFilter::ByteShuffle, NonZeroUsize::new(4).unwrap()),
/// )
/// .create(store, "/group/array")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct ArrayBuilder {
    shape: ArrayShape,
    chunk_shape: ArrayShape,
    data_type: DataType,
    fill_value: FillValueMetadata,
    codec: CodecMetadata,
    order: ArrayOrder,
    chunk_key_encoding: ChunkKeyEncodingMetadata,
    attributes: Attributes,
    overwrite: bool,
    registry: Option<Arc<CodecRegistry>>,
}

impl ArrayBuilder {
    /// Create a new array builder.
    ///
    /// The length of the array shape and chunk shape must match the dimensionality of the intended array.
    #[must_use]
    pub fn new(
        shape: ArrayShape,
        chunk_shape: ArrayShape,
        data_type: DataType,
        fill_value: impl Into<FillValueMetadata>,
    ) -> Self {
        Self {
            shape,
            chunk_shape,
            data_type,
            fill_value: fill_value.into(),
            codec: CodecMetadata::none(),
            order: ArrayOrder::default(),
            chunk_key_encoding: ChunkKeyEncodingMetadata::default(),
            attributes: Attributes::default(),
            overwrite: false,
            registry: None,
        }
    }

    /// Set the shape.
    pub fn shape(&mut self, shape: ArrayShape) -> &mut Self {
        self.shape = shape;
        self
    }

    /// Set the codec.
    ///
    /// If left unmodified, chunks are stored uncompressed.
    #[must_use]
    pub fn codec(mut self, codec: CodecMetadata) -> Self {
        self.codec = codec;
        self
    }

    /// Set the element order.
    ///
    /// If left unmodified, the order is row-major.
    #[must_use]
    pub fn order(mut self, order: ArrayOrder) -> Self {
        self.order = order;
        self
    }

    /// Set the chunk key encoding.
    ///
    /// If left unmodified, the `default` chunk key encoding with the `/` separator is used.
    #[must_use]
    pub fn chunk_key_encoding(mut self, chunk_key_encoding: ChunkKeyEncodingMetadata) -> Self {
        self.chunk_key_encoding = chunk_key_encoding;
        self
    }

    /// Set the user attributes written when the array is created.
    #[must_use]
    pub fn attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Replace any existing node at the path when the array is created.
    ///
    /// If left unmodified, creating an array where a node exists fails with [`ArrayError::AlreadyExists`].
    #[must_use]
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Set the codec registry used to look up the codec.
    ///
    /// If left unmodified, [`CodecRegistry::default`] is used.
    #[must_use]
    pub fn registry(mut self, registry: Arc<CodecRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Build into array metadata.
    ///
    /// # Errors
    /// Returns [`ArrayError::InvalidChunkShape`] if a dimension of the chunk shape is zero.
    pub fn build_metadata(&self) -> Result<ArrayMetadata, ArrayError> {
        let chunk_shape = self
            .chunk_shape
            .iter()
            .map(|&size| NonZeroU64::new(size))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| ArrayError::InvalidChunkShape(self.chunk_shape.clone()))?;
        Ok(ArrayMetadata::new(
            self.shape.clone(),
            chunk_shape,
            self.data_type,
            self.fill_value,
            self.codec.clone(),
        )
        .with_order(self.order)
        .with_chunk_key_encoding(self.chunk_key_encoding))
    }

    /// Create the array at `path` of `storage` and write its metadata and attributes.
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if the metadata is invalid, a node already exists at `path` and overwrite was not requested, or there is an underlying store error.
    pub fn create<TStorage: ?Sized + ReadableWritableStorageTraits + 'static>(
        &self,
        storage: Arc<TStorage>,
        path: &str,
    ) -> Result<Array<TStorage>, ArrayError> {
        let registry = self.registry.clone().unwrap_or_default();
        let array = Array::create_with_registry(
            storage,
            path,
            self.build_metadata()?,
            registry,
            self.overwrite,
        )?;
        if !self.attributes.is_empty() {
            array.attrs().replace(&self.attributes)?;
        }
        Ok(array)
    }
}
