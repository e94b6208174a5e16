use thiserror::Error;

use crate::array::{ArrayIndices, ArrayShape, ArraySubset, DataType, IncompatibleArraySubsetError};
use crate::metadata::FillValueMetadata;
use crate::node::{
    NodeAttributesError, NodeCreateError, NodePath, NodePathError, StoreOperationError,
};
use crate::storage::{StoreKey, StoreKeyError};
use tessera_codec::CodecError;

/// Array errors.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum ArrayError {
    /// An invalid node path.
    #[error(transparent)]
    NodePathError(#[from] NodePathError),
    /// There is no array at the path.
    #[error("no array exists at {0}")]
    NotFound(NodePath),
    /// A node already exists at the path.
    #[error("a node already exists at {0}")]
    AlreadyExists(NodePath),
    /// The node at the path is a group.
    #[error("the node at {0} is not an array")]
    NotAnArray(NodePath),
    /// A write operation was attempted on an array opened read only.
    #[error("{0} was opened read only")]
    ReadOnly(NodePath),
    /// The metadata document could not be parsed or serialised.
    #[error("invalid metadata at {0}: {1}")]
    InvalidMetadata(StoreKey, String),
    /// The dimensionality of the chunk shape does not match the array shape.
    #[error("chunk shape dimensionality {0} does not match array dimensionality {1}")]
    InvalidChunkGridDimensionality(usize, usize),
    /// The chunk shape has a zero dimension.
    #[error("invalid chunk shape {0:?}, every dimension must be non-zero")]
    InvalidChunkShape(ArrayShape),
    /// A decoded chunk would not fit in the address space.
    #[error("chunk shape {0:?} is too large to decode into memory")]
    ChunkTooLarge(ArrayShape),
    /// The fill value is not representable by the data type.
    #[error("invalid fill value {fill_value} for data type {data_type}")]
    InvalidFillValue {
        /// The data type.
        data_type: DataType,
        /// The fill value metadata.
        fill_value: FillValueMetadata,
    },
    /// A region is outside the array or has the wrong dimensionality.
    #[error(transparent)]
    IndexOutOfRange(#[from] IncompatibleArraySubsetError),
    /// Chunk grid indices are outside the chunk grid.
    #[error("invalid chunk grid indices: {0:?}")]
    InvalidChunkGridIndices(ArrayIndices),
    /// The size of input data does not match the region.
    #[error("got {got} bytes, expected {expected}")]
    ShapeMismatch {
        /// The expected number of bytes.
        expected: u64,
        /// The number of bytes supplied.
        got: usize,
    },
    /// The element type does not match the data type.
    #[error("the element type {element} does not match the data type {data_type}")]
    IncompatibleElementType {
        /// The data type.
        data_type: DataType,
        /// The element type name.
        element: &'static str,
    },
    /// A codec could not be created from the array metadata.
    #[error(transparent)]
    CodecError(#[from] CodecError),
    /// A stored chunk could not be decoded.
    #[error("corrupt chunk {key}: {source}")]
    CorruptChunk {
        /// The chunk key.
        key: StoreKey,
        /// The decoding error.
        source: CodecError,
    },
    /// An invalid chunk key.
    #[error(transparent)]
    InvalidChunkKey(#[from] StoreKeyError),
    /// A storage error.
    #[error(transparent)]
    StorageError(#[from] StoreOperationError),
    /// An attributes error.
    #[error(transparent)]
    AttributesError(#[from] NodeAttributesError),
    /// A chunk kept changing concurrently during a read-modify-write.
    #[error("chunk {0} was modified concurrently on every compare-and-set attempt")]
    WriteConflict(StoreKey),
    /// A write spanning multiple chunks failed after some chunks were committed.
    ///
    /// Chunks outside `incomplete` hold the newly written data. Chunks within `incomplete` hold either their previous contents or the new contents, never a mix within one chunk.
    #[error("write incomplete for {} region(s): {source}", .incomplete.len())]
    PartialWrite {
        /// The regions of the write that were not committed.
        incomplete: Vec<ArraySubset>,
        /// The error that stopped the write.
        source: Box<ArrayError>,
    },
}

impl From<NodeCreateError> for ArrayError {
    fn from(err: NodeCreateError) -> Self {
        match err {
            NodeCreateError::NodePathError(err) => Self::NodePathError(err),
            NodeCreateError::StorageError(err) => Self::StorageError(err),
            NodeCreateError::InvalidMetadata(key, err) => Self::InvalidMetadata(key, err),
            NodeCreateError::MissingMetadata(path) => Self::NotFound(path),
        }
    }
}
