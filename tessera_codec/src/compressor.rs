//! Compression algorithms.
//!
//! Every algorithm implements [`CompressorTraits`]. The built-in algorithms are:
//!
//! | name   | type                 | levels    | default |
//! |--------|----------------------|-----------|---------|
//! | `none` | [`NoneCompressor`]   | ignored   |         |
//! | `gzip` | [`GzipCompressor`]   | 0..=9     | 6       |
//! | `zlib` | [`ZlibCompressor`]   | 0..=9     | 6       |
//! | `zstd` | [`ZstdCompressor`]   | -7..=22   | 3       |

mod gzip;
mod none;
mod zlib;
mod zstd;

pub use gzip::GzipCompressor;
pub use none::NoneCompressor;
pub use zlib::ZlibCompressor;
pub use zstd::ZstdCompressor;

use std::fmt::Debug;
use std::ops::RangeInclusive;
use std::sync::Arc;

use crate::CodecError;

/// A compression algorithm.
///
/// Implementations are stateless and may be used concurrently.
pub trait CompressorTraits: Debug + Send + Sync {
    /// The unique name of the algorithm, as stored in codec metadata.
    fn name(&self) -> &'static str;

    /// The supported compression levels.
    fn levels(&self) -> RangeInclusive<i32>;

    /// The level used when none is configured.
    fn default_level(&self) -> i32;

    /// Compress `decoded` at `level`.
    ///
    /// # Errors
    /// Returns a [`CodecError`] if compression fails.
    fn compress(&self, decoded: &[u8], level: i32) -> Result<Vec<u8>, CodecError>;

    /// Decompress `encoded`, which is expected to decompress to `expected_len` bytes.
    ///
    /// Implementations may stop decompressing once more than `expected_len` bytes are produced.
    ///
    /// # Errors
    /// Returns [`CodecError::CorruptChunk`] if `encoded` is not a valid stream.
    fn decompress(&self, encoded: &[u8], expected_len: usize) -> Result<Vec<u8>, CodecError>;
}

/// An [`Arc`] wrapped compressor.
pub type CompressorTraitsArc = Arc<dyn CompressorTraits>;

/// Map a decompression failure of the `name` algorithm to [`CodecError::CorruptChunk`].
fn corrupt(name: &str, err: &std::io::Error) -> CodecError {
    CodecError::CorruptChunk(format!("{name} stream is invalid: {err}"))
}

/// Read at most `expected_len + 1` bytes from a decoder so that oversized streams are detected without decoding them fully.
fn read_bounded(
    name: &str,
    decoder: impl std::io::Read,
    expected_len: usize,
) -> Result<Vec<u8>, CodecError> {
    use std::io::Read;
    let limit = u64::try_from(expected_len).map_or(u64::MAX, |len| len.saturating_add(1));
    let mut out = Vec::with_capacity(expected_len);
    decoder
        .take(limit)
        .read_to_end(&mut out)
        .map_err(|err| corrupt(name, &err))?;
    Ok(out)
}
