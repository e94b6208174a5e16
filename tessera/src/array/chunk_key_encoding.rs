//! Chunk key encodings.
//!
//! The key for a chunk with grid indices `(k, j, i, …)` is relative to the array prefix:
//! - `default`: the prefix `c`, then for each dimension the separator followed by the decimal index, e.g. `c/1/23/45`,
//! - `v2`: the decimal indices joined by the separator, e.g. `1.23.45`.
//!
//! A zero dimensional array has the single chunk key `c` with the `default` encoding and `0` with the `v2` encoding.

use itertools::Itertools;

use crate::array::ArrayIndices;
use crate::metadata::{ChunkKeyEncodingMetadata, ChunkKeySeparator};

const DEFAULT_PREFIX: &str = "c";

/// A chunk key encoding.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ChunkKeyEncoding(ChunkKeyEncodingMetadata);

impl ChunkKeyEncoding {
    /// Create a chunk key encoding from metadata.
    #[must_use]
    pub const fn new(metadata: ChunkKeyEncodingMetadata) -> Self {
        Self(metadata)
    }

    /// Return the metadata of the chunk key encoding.
    #[must_use]
    pub const fn metadata(&self) -> ChunkKeyEncodingMetadata {
        self.0
    }

    fn separator(&self) -> ChunkKeySeparator {
        match self.0 {
            ChunkKeyEncodingMetadata::Default { separator }
            | ChunkKeyEncodingMetadata::V2 { separator } => separator,
        }
    }

    /// Encode chunk grid indices as a key relative to the array prefix.
    #[must_use]
    pub fn encode(&self, chunk_grid_indices: &[u64]) -> String {
        let mut separator_str: [u8; 4] = [0; 4];
        let separator_str: &str = self.separator().as_char().encode_utf8(&mut separator_str);
        let mut buffers = vec![itoa::Buffer::new(); chunk_grid_indices.len()];
        let mut indices = chunk_grid_indices
            .iter()
            .zip(&mut buffers)
            .map(|(&n, buffer)| buffer.format(n));
        match self.0 {
            ChunkKeyEncodingMetadata::Default { .. } => {
                [DEFAULT_PREFIX].into_iter().chain(indices).join(separator_str)
            }
            ChunkKeyEncodingMetadata::V2 { .. } => {
                if chunk_grid_indices.is_empty() {
                    "0".to_string()
                } else {
                    indices.join(separator_str)
                }
            }
        }
    }

    /// Decode a key relative to the array prefix into chunk grid indices of `dimensionality` dimensions.
    ///
    /// Returns [`None`] if `key` is not a chunk key of this encoding.
    #[must_use]
    pub fn decode(&self, key: &str, dimensionality: usize) -> Option<ArrayIndices> {
        let separator = self.separator().as_char();
        let indices = match self.0 {
            ChunkKeyEncodingMetadata::Default { .. } => {
                let rest = key.strip_prefix(DEFAULT_PREFIX)?;
                if rest.is_empty() {
                    return (dimensionality == 0).then(Vec::new);
                }
                rest.strip_prefix(separator)?
            }
            ChunkKeyEncodingMetadata::V2 { .. } => {
                if dimensionality == 0 {
                    return (key == "0").then(Vec::new);
                }
                key
            }
        };
        let indices: ArrayIndices = indices
            .split(separator)
            .map(|index| {
                if index.bytes().all(|byte| byte.is_ascii_digit()) {
                    index.parse::<u64>().ok()
                } else {
                    None
                }
            })
            .collect::<Option<_>>()?;
        (indices.len() == dimensionality).then_some(indices)
    }
}

impl Default for ChunkKeyEncoding {
    fn default() -> Self {
        Self(ChunkKeyEncodingMetadata::default())
    }
}
