use std::ops::RangeInclusive;

use crate::{CodecError, CompressorTraits};

/// The `none` algorithm, which stores bytes as is.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoneCompressor;

impl CompressorTraits for NoneCompressor {
    fn name(&self) -> &'static str {
        "none"
    }

    fn levels(&self) -> RangeInclusive<i32> {
        i32::MIN..=i32::MAX
    }

    fn default_level(&self) -> i32 {
        0
    }

    fn compress(&self, decoded: &[u8], _level: i32) -> Result<Vec<u8>, CodecError> {
        Ok(decoded.to_vec())
    }

    fn decompress(&self, encoded: &[u8], _expected_len: usize) -> Result<Vec<u8>, CodecError> {
        Ok(encoded.to_vec())
    }
}
