use std::borrow::Cow;
use std::num::NonZeroUsize;

use tessera_metadata::{CodecConfiguration, CodecMetadata, PreFilter};

use crate::shuffle::{bit_shuffle, bit_unshuffle, byte_shuffle, byte_unshuffle};
use crate::{CodecError, CodecOptions, CodecRegistry, CompressorTraitsArc};

/// The size of the crc32c checksum appended to encoded chunks.
pub const CHECKSUM_SIZE: usize = size_of::<u32>();

/// A chunk codec: a pre-filter, a compressor and an optional checksum.
///
/// Encoding and decoding are stateless and safe to call concurrently.
#[derive(Clone, Debug)]
pub struct Codec {
    compressor: CompressorTraitsArc,
    configuration: CodecConfiguration,
    level: i32,
    pre_filter: Option<(PreFilter, NonZeroUsize)>,
}

impl Codec {
    /// Create a new codec from a compressor and configuration.
    ///
    /// # Errors
    /// Returns [`CodecError::InvalidConfiguration`] if the level is not supported by the compressor or a pre-filter is configured without an element width.
    pub fn new(
        compressor: CompressorTraitsArc,
        configuration: CodecConfiguration,
    ) -> Result<Self, CodecError> {
        let level = configuration
            .level
            .unwrap_or_else(|| compressor.default_level());
        if !compressor.levels().contains(&level) {
            return Err(CodecError::InvalidConfiguration(format!(
                "{} level {level} is not in {:?}",
                compressor.name(),
                compressor.levels()
            )));
        }
        let pre_filter = match (configuration.pre_filter, configuration.element_width) {
            (PreFilter::None, _) => None,
            (pre_filter, Some(element_width)) => Some((pre_filter, element_width)),
            (pre_filter, None) => {
                return Err(CodecError::InvalidConfiguration(format!(
                    "the {pre_filter} pre-filter requires an element width"
                )));
            }
        };
        Ok(Self {
            compressor,
            configuration,
            level,
            pre_filter,
        })
    }

    /// Create a new codec from metadata, looking up the algorithm in `registry`.
    ///
    /// # Errors
    /// Returns [`CodecError::UnsupportedCodec`] if the algorithm is not registered, or [`CodecError::InvalidConfiguration`] if the configuration is invalid.
    pub fn from_metadata(
        metadata: &CodecMetadata,
        registry: &CodecRegistry,
    ) -> Result<Self, CodecError> {
        let compressor = registry.get(&metadata.name)?.clone();
        Self::new(compressor, metadata.configuration)
    }

    /// Return the metadata of the codec.
    #[must_use]
    pub fn metadata(&self) -> CodecMetadata {
        CodecMetadata {
            name: self.compressor.name().to_string(),
            configuration: self.configuration,
        }
    }

    /// Return the name of the compression algorithm.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.compressor.name()
    }

    /// Return the effective compression level.
    #[must_use]
    pub fn level(&self) -> i32 {
        self.level
    }

    /// Encode the raw bytes of a chunk.
    ///
    /// # Errors
    /// Returns a [`CodecError`] if the compressor fails.
    pub fn encode(&self, decoded: &[u8]) -> Result<Vec<u8>, CodecError> {
        let filtered = match self.pre_filter {
            None | Some((PreFilter::None, _)) => Cow::Borrowed(decoded),
            Some((PreFilter::ByteShuffle, width)) => Cow::Owned(byte_shuffle(decoded, width)),
            Some((PreFilter::BitShuffle, width)) => Cow::Owned(bit_shuffle(decoded, width)),
        };
        let mut encoded = self.compressor.compress(&filtered, self.level)?;
        if self.configuration.checksum {
            let checksum = crc32c::crc32c(&encoded).to_le_bytes();
            encoded.extend_from_slice(&checksum);
        }
        Ok(encoded)
    }

    /// Decode the stored bytes of a chunk which holds `expected_len` raw bytes.
    ///
    /// # Errors
    /// Returns [`CodecError::CorruptChunk`] if `encoded` is truncated or malformed, the checksum does not match, or it decodes to other than `expected_len` bytes.
    pub fn decode(
        &self,
        encoded: &[u8],
        expected_len: usize,
        options: &CodecOptions,
    ) -> Result<Vec<u8>, CodecError> {
        let encoded = if self.configuration.checksum {
            let data_len = encoded.len().checked_sub(CHECKSUM_SIZE).ok_or_else(|| {
                CodecError::CorruptChunk(format!(
                    "{} bytes is too short to hold a checksum",
                    encoded.len()
                ))
            })?;
            let (data, checksum) = encoded.split_at(data_len);
            if options.validate_checksums() && crc32c::crc32c(data).to_le_bytes() != checksum {
                return Err(CodecError::CorruptChunk("the checksum is invalid".to_string()));
            }
            data
        } else {
            encoded
        };

        let decoded = self.compressor.decompress(encoded, expected_len)?;
        if decoded.len() != expected_len {
            return Err(CodecError::CorruptChunk(format!(
                "the chunk decoded to {} bytes, expected {expected_len}",
                decoded.len()
            )));
        }

        Ok(match self.pre_filter {
            None | Some((PreFilter::None, _)) => decoded,
            Some((PreFilter::ByteShuffle, width)) => byte_unshuffle(&decoded, width),
            Some((PreFilter::BitShuffle, width)) => bit_unshuffle(&decoded, width),
        })
    }
}
