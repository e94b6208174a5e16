use std::io::{Cursor, Read};
use std::ops::RangeInclusive;

use flate2::bufread::{ZlibDecoder, ZlibEncoder};

use super::read_bounded;
use crate::{CodecError, CompressorTraits};

/// The `zlib` algorithm.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZlibCompressor;

impl CompressorTraits for ZlibCompressor {
    fn name(&self) -> &'static str {
        "zlib"
    }

    fn levels(&self) -> RangeInclusive<i32> {
        0..=9
    }

    fn default_level(&self) -> i32 {
        6
    }

    fn compress(&self, decoded: &[u8], level: i32) -> Result<Vec<u8>, CodecError> {
        let level = u32::try_from(level)
            .map_err(|_| CodecError::InvalidConfiguration(format!("zlib level {level}")))?;
        let mut encoder = ZlibEncoder::new(Cursor::new(decoded), flate2::Compression::new(level));
        let mut out: Vec<u8> = Vec::new();
        encoder.read_to_end(&mut out)?;
        Ok(out)
    }

    fn decompress(&self, encoded: &[u8], expected_len: usize) -> Result<Vec<u8>, CodecError> {
        read_bounded(self.name(), ZlibDecoder::new(Cursor::new(encoded)), expected_len)
    }
}
