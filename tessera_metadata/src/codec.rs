use std::num::NonZeroUsize;

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// A byte reordering filter applied before compression.
#[derive(Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash, Debug, Display, Default)]
#[serde(rename_all = "snake_case")]
pub enum PreFilter {
    /// No filter.
    #[default]
    #[display("none")]
    None,
    /// Group the `n`th byte of every element together.
    #[display("byte_shuffle")]
    ByteShuffle,
    /// Group the `n`th bit of every element together.
    #[display("bit_shuffle")]
    BitShuffle,
}

impl PreFilter {
    /// Returns true if the filter is [`PreFilter::None`].
    #[must_use]
    pub fn is_none(&self) -> bool {
        *self == Self::None
    }
}

/// Codec configuration parameters shared by every compression algorithm.
#[derive(Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Debug, Display, Default)]
#[serde(deny_unknown_fields)]
#[display("{}", serde_json::to_string(self).unwrap_or_default())]
pub struct CodecConfiguration {
    /// The compression level. The algorithm default is used if absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i32>,
    /// The pre-filter.
    #[serde(default, skip_serializing_if = "PreFilter::is_none")]
    pub pre_filter: PreFilter,
    /// The element width in bytes. Required by the shuffle pre-filters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_width: Option<NonZeroUsize>,
    /// Append a crc32c checksum of the encoded bytes.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub checksum: bool,
}

/// Codec metadata: an algorithm name and its configuration.
///
/// For example:
/// ```json
/// {
///     "name": "zstd",
///     "configuration": {
///         "level": 5,
///         "pre_filter": "bit_shuffle",
///         "element_width": 4,
///         "checksum": true
///     }
/// }
/// ```
#[derive(Serialize, Deserialize, Clone, Eq, PartialEq, Debug, Display)]
#[serde(deny_unknown_fields)]
#[display("{}", serde_json::to_string(self).unwrap_or_default())]
pub struct CodecMetadata {
    /// The compression algorithm name.
    pub name: String,
    /// The configuration.
    #[serde(default)]
    pub configuration: CodecConfiguration,
}

impl CodecMetadata {
    /// Create codec metadata with a default configuration.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            configuration: CodecConfiguration::default(),
        }
    }

    /// Metadata for the `none` algorithm, which stores bytes uncompressed.
    #[must_use]
    pub fn none() -> Self {
        Self::new("none")
    }

    /// Set the compression level.
    #[must_use]
    pub fn with_level(mut self, level: i32) -> Self {
        self.configuration.level = Some(level);
        self
    }

    /// Set the pre-filter and the element width it operates on.
    #[must_use]
    pub fn with_pre_filter(mut self, pre_filter: PreFilter, element_width: NonZeroUsize) -> Self {
        self.configuration.pre_filter = pre_filter;
        self.configuration.element_width = Some(element_width);
        self
    }

    /// Enable or disable the crc32c checksum.
    #[must_use]
    pub fn with_checksum(mut self, checksum: bool) -> Self {
        self.configuration.checksum = checksum;
        self
    }
}

impl Default for CodecMetadata {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_metadata_minimal() {
        let codec: CodecMetadata = serde_json::from_str(r#"{"name": "gzip"}"#).unwrap();
        assert_eq!(codec, CodecMetadata::new("gzip"));
        assert_eq!(codec.to_string(), r#"{"name":"gzip","configuration":{}}"#);
    }

    #[test]
    fn codec_metadata_full() {
        let codec: CodecMetadata = serde_json::from_str(
            r#"{
            "name": "zstd",
            "configuration": {
                "level": -3,
                "pre_filter": "bit_shuffle",
                "element_width": 8,
                "checksum": true
            }
        }"#,
        )
        .unwrap();
        assert_eq!(
            codec,
            CodecMetadata::new("zstd")
                .with_level(-3)
                .with_pre_filter(PreFilter::BitShuffle, NonZeroUsize::new(8).unwrap())
                .with_checksum(true)
        );
    }

    #[test]
    fn codec_metadata_invalid() {
        assert!(
            serde_json::from_str::<CodecMetadata>(
                r#"{"name": "zstd", "configuration": {"pre_filter": "delta"}}"#
            )
            .is_err()
        );
        assert!(
            serde_json::from_str::<CodecMetadata>(
                r#"{"name": "zstd", "configuration": {"element_width": 0}}"#
            )
            .is_err()
        );
        assert!(
            serde_json::from_str::<CodecMetadata>(r#"{"name": "zstd", "unknown": 1}"#).is_err()
        );
    }
}
