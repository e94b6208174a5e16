//! The chunk codec API for the [`tessera`](https://docs.rs/tessera/latest/tessera/index.html) crate.
//!
//! A [`Codec`] turns the raw bytes of a chunk into stored bytes and back:
//!  - an optional pre-filter ([`PreFilter::ByteShuffle`] or [`PreFilter::BitShuffle`]) reorders bytes to group similar bits of neighbouring elements,
//!  - a compressor (`none`, `gzip`, `zlib`, `zstd`) compresses the filtered bytes,
//!  - an optional crc32c checksum is appended.
//!
//! Compressors are looked up by name in a [`CodecRegistry`].
//! The registry is an ordinary value, so different arrays may use different sets of compressors and tests may register their own.
//!
//! ## Licence
//! `tessera_codec` is licensed under either of
//!  - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license <http://opensource.org/licenses/MIT>, at your option.

mod codec;
pub mod compressor;
mod options;
mod registry;
pub mod shuffle;

pub use codec::{Codec, CHECKSUM_SIZE};
pub use compressor::{CompressorTraits, CompressorTraitsArc};
pub use options::CodecOptions;
pub use registry::CodecRegistry;
pub use tessera_metadata::{CodecConfiguration, CodecMetadata, PreFilter};

use std::sync::Arc;

use thiserror::Error;

/// A codec error.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum CodecError {
    /// Stored bytes could not be decoded: a truncated or malformed stream, a checksum mismatch, or an unexpected decoded length.
    #[error("corrupt chunk: {_0}")]
    CorruptChunk(String),
    /// The compression algorithm is not registered.
    #[error("unsupported codec {_0}")]
    UnsupportedCodec(String),
    /// The codec configuration is invalid for the algorithm.
    #[error("invalid codec configuration: {_0}")]
    InvalidConfiguration(String),
    /// An IO error.
    #[error(transparent)]
    IOError(#[from] Arc<std::io::Error>),
}

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        Self::IOError(Arc::new(err))
    }
}
