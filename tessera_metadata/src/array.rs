use std::num::NonZeroU64;

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{ChunkKeyEncodingMetadata, CodecMetadata, DataType, FillValueMetadata};

/// The memory order of elements within a chunk, and the enumeration order of chunks.
#[derive(Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash, Debug, Display, Default)]
pub enum ArrayOrder {
    /// Row-major (C) order: the last dimension varies fastest.
    #[default]
    #[serde(rename = "C")]
    #[display("C")]
    C,
    /// Column-major (Fortran) order: the first dimension varies fastest.
    #[serde(rename = "F")]
    #[display("F")]
    F,
}

/// Array metadata.
///
/// Everything other than `shape` is fixed when the array is created.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct ArrayMetadata {
    /// The shape of the array.
    pub shape: Vec<u64>,
    /// The shape of every chunk.
    pub chunk_shape: Vec<NonZeroU64>,
    /// The element data type.
    pub data_type: DataType,
    /// The value of elements that have never been written.
    pub fill_value: FillValueMetadata,
    /// The codec applied to each chunk.
    pub codec: CodecMetadata,
    /// The element order within chunks.
    #[serde(default)]
    pub order: ArrayOrder,
    /// The mapping from chunk grid indices to store keys.
    #[serde(default)]
    pub chunk_key_encoding: ChunkKeyEncodingMetadata,
    /// The creation timestamp. Informational only.
    pub created: DateTime<Utc>,
}

impl ArrayMetadata {
    /// Create array metadata with row-major order and the default chunk key encoding, stamped with the current time.
    #[must_use]
    pub fn new(
        shape: Vec<u64>,
        chunk_shape: Vec<NonZeroU64>,
        data_type: DataType,
        fill_value: FillValueMetadata,
        codec: CodecMetadata,
    ) -> Self {
        Self {
            shape,
            chunk_shape,
            data_type,
            fill_value,
            codec,
            order: ArrayOrder::default(),
            chunk_key_encoding: ChunkKeyEncodingMetadata::default(),
            created: Utc::now(),
        }
    }

    /// Set the element order.
    #[must_use]
    pub fn with_order(mut self, order: ArrayOrder) -> Self {
        self.order = order;
        self
    }

    /// Set the chunk key encoding.
    #[must_use]
    pub fn with_chunk_key_encoding(mut self, chunk_key_encoding: ChunkKeyEncodingMetadata) -> Self {
        self.chunk_key_encoding = chunk_key_encoding;
        self
    }

    /// Return the dimensionality of the array.
    #[must_use]
    pub fn dimensionality(&self) -> usize {
        self.shape.len()
    }
}
