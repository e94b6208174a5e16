use std::fmt::Display;

use crate::node::NodePath;

use super::{ArrayOrder, ArrayShape, CodecMetadata, DataType, FillValueMetadata};

/// A summary of an array, returned by [`Array::info`](super::Array::info).
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayInfo {
    /// The node path.
    pub path: NodePath,
    /// The array shape.
    pub shape: ArrayShape,
    /// The chunk shape.
    pub chunk_shape: ArrayShape,
    /// The data type.
    pub data_type: DataType,
    /// The fill value.
    pub fill_value: FillValueMetadata,
    /// The codec.
    pub codec: CodecMetadata,
    /// The element order.
    pub order: ArrayOrder,
    /// The size in bytes of the array if every element were stored uncompressed.
    pub nbytes: u64,
    /// The total encoded size in bytes of the stored chunks.
    pub nbytes_stored: u64,
    /// The number of stored chunks within the chunk grid.
    pub chunks_initialized: u64,
    /// The number of chunks in the chunk grid.
    pub chunks_total: u64,
}

impl ArrayInfo {
    /// Return the ratio of uncompressed to stored bytes, or [`None`] if nothing is stored.
    #[must_use]
    pub fn storage_ratio(&self) -> Option<f64> {
        #[allow(clippy::cast_precision_loss)]
        (self.nbytes_stored > 0).then(|| self.nbytes as f64 / self.nbytes_stored as f64)
    }
}

impl Display for ArrayInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Path               : {}", self.path)?;
        writeln!(f, "Shape              : {:?}", self.shape)?;
        writeln!(f, "Chunk shape        : {:?}", self.chunk_shape)?;
        writeln!(f, "Data type          : {}", self.data_type)?;
        writeln!(f, "Fill value         : {}", self.fill_value)?;
        writeln!(f, "Codec              : {}", self.codec)?;
        writeln!(f, "Order              : {}", self.order)?;
        writeln!(f, "No. bytes          : {}", self.nbytes)?;
        writeln!(f, "No. bytes stored   : {}", self.nbytes_stored)?;
        match self.storage_ratio() {
            Some(ratio) => writeln!(f, "Storage ratio      : {ratio:.1}")?,
            None => writeln!(f, "Storage ratio      : -")?,
        }
        write!(
            f,
            "Chunks initialized : {}/{}",
            self.chunks_initialized, self.chunks_total
        )
    }
}
