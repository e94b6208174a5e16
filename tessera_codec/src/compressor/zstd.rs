use std::ops::RangeInclusive;

use super::{corrupt, read_bounded};
use crate::{CodecError, CompressorTraits};

/// The `zstd` algorithm.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZstdCompressor;

impl CompressorTraits for ZstdCompressor {
    fn name(&self) -> &'static str {
        "zstd"
    }

    fn levels(&self) -> RangeInclusive<i32> {
        -7..=22
    }

    fn default_level(&self) -> i32 {
        zstd::DEFAULT_COMPRESSION_LEVEL
    }

    fn compress(&self, decoded: &[u8], level: i32) -> Result<Vec<u8>, CodecError> {
        Ok(zstd::encode_all(decoded, level)?)
    }

    fn decompress(&self, encoded: &[u8], expected_len: usize) -> Result<Vec<u8>, CodecError> {
        let decoder = zstd::stream::read::Decoder::with_buffer(encoded)
            .map_err(|err| corrupt(self.name(), &err))?;
        read_bounded(self.name(), decoder, expected_len)
    }
}
