#![allow(missing_docs)]

use std::num::NonZeroUsize;
use std::ops::RangeInclusive;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tessera_codec::{
    Codec, CodecError, CodecMetadata, CodecOptions, CodecRegistry, CompressorTraits, PreFilter,
};

const SIZES: [usize; 6] = [0, 1, 7, 13, 1021, 4099];

fn buffers() -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(42);
    SIZES
        .iter()
        .flat_map(|&size| {
            [
                vec![0u8; size],
                vec![u8::MAX; size],
                (&mut rng).random_iter::<u8>().take(size).collect(),
            ]
        })
        .collect()
}

fn codecs() -> Vec<CodecMetadata> {
    let mut codecs = Vec::new();
    for name in ["none", "gzip", "zlib", "zstd"] {
        for checksum in [false, true] {
            codecs.push(CodecMetadata::new(name).with_checksum(checksum));
            for pre_filter in [PreFilter::ByteShuffle, PreFilter::BitShuffle] {
                for width in [1, 2, 4, 8] {
                    codecs.push(
                        CodecMetadata::new(name)
                            .with_pre_filter(pre_filter, NonZeroUsize::new(width).unwrap())
                            .with_checksum(checksum),
                    );
                }
            }
        }
    }
    codecs.push(CodecMetadata::new("gzip").with_level(0));
    codecs.push(CodecMetadata::new("zstd").with_level(-7));
    codecs.push(CodecMetadata::new("zstd").with_level(22));
    codecs
}

#[test]
fn codec_fidelity() {
    let registry = CodecRegistry::default();
    let options = CodecOptions::default();
    let buffers = buffers();
    for metadata in codecs() {
        let codec = Codec::from_metadata(&metadata, &registry).unwrap();
        assert_eq!(codec.metadata(), metadata);
        for decoded in &buffers {
            let encoded = codec.encode(decoded).unwrap();
            let round_trip = codec.decode(&encoded, decoded.len(), &options).unwrap();
            assert_eq!(&round_trip, decoded, "{metadata} {}", decoded.len());
        }
    }
}

#[test]
fn codec_shuffle_compresses_floats() {
    let registry = CodecRegistry::default();
    let mut rng = StdRng::seed_from_u64(0);
    let decoded: Vec<u8> = (0..50 * 50)
        .flat_map(|_| rng.random_range(0.0f32..1.0).to_le_bytes())
        .collect();
    let plain = Codec::from_metadata(&CodecMetadata::new("zstd"), &registry).unwrap();
    let shuffled = Codec::from_metadata(
        &CodecMetadata::new("zstd")
            .with_pre_filter(PreFilter::ByteShuffle, NonZeroUsize::new(4).unwrap()),
        &registry,
    )
    .unwrap();
    let plain_len = plain.encode(&decoded).unwrap().len();
    let shuffled_len = shuffled.encode(&decoded).unwrap().len();
    assert!(shuffled_len < decoded.len());
    assert!(shuffled_len < plain_len);
}

#[test]
fn codec_truncated() {
    let registry = CodecRegistry::default();
    let options = CodecOptions::default();
    let decoded: Vec<u8> = (0..4096u32).flat_map(u32::to_le_bytes).collect();
    for name in ["gzip", "zlib", "zstd"] {
        let codec = Codec::from_metadata(&CodecMetadata::new(name), &registry).unwrap();
        let encoded = codec.encode(&decoded).unwrap();
        let truncated = &encoded[..encoded.len() / 2];
        assert!(matches!(
            codec.decode(truncated, decoded.len(), &options),
            Err(CodecError::CorruptChunk(_))
        ));
        assert!(matches!(
            codec.decode(&[], decoded.len(), &options),
            Err(CodecError::CorruptChunk(_))
        ));
    }
}

#[test]
fn codec_unexpected_length() {
    let registry = CodecRegistry::default();
    let options = CodecOptions::default();
    let decoded = vec![1u8; 100];
    for name in ["none", "gzip", "zlib", "zstd"] {
        let codec = Codec::from_metadata(&CodecMetadata::new(name), &registry).unwrap();
        let encoded = codec.encode(&decoded).unwrap();
        assert!(matches!(
            codec.decode(&encoded, 99, &options),
            Err(CodecError::CorruptChunk(_))
        ));
        assert!(matches!(
            codec.decode(&encoded, 101, &options),
            Err(CodecError::CorruptChunk(_))
        ));
    }
}

#[test]
fn codec_checksum() {
    let registry = CodecRegistry::default();
    let codec =
        Codec::from_metadata(&CodecMetadata::new("none").with_checksum(true), &registry).unwrap();
    let decoded = vec![1u8, 2, 3, 4, 5];
    let mut encoded = codec.encode(&decoded).unwrap();
    assert_eq!(encoded.len(), decoded.len() + tessera_codec::CHECKSUM_SIZE);
    encoded[0] ^= 0xFF;

    let options = CodecOptions::default();
    assert!(matches!(
        codec.decode(&encoded, decoded.len(), &options),
        Err(CodecError::CorruptChunk(_))
    ));
    assert!(matches!(
        codec.decode(&encoded[..3], decoded.len(), &options),
        Err(CodecError::CorruptChunk(_))
    ));

    // the checksum is stripped but not validated
    let options = options.with_validate_checksums(false);
    let mut expected = decoded.clone();
    expected[0] ^= 0xFF;
    assert_eq!(
        codec.decode(&encoded, decoded.len(), &options).unwrap(),
        expected
    );
}

#[test]
fn codec_invalid_configuration() {
    let registry = CodecRegistry::default();
    assert!(matches!(
        Codec::from_metadata(&CodecMetadata::new("lz4"), &registry),
        Err(CodecError::UnsupportedCodec(_))
    ));
    assert!(matches!(
        Codec::from_metadata(&CodecMetadata::new("gzip").with_level(10), &registry),
        Err(CodecError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        Codec::from_metadata(&CodecMetadata::new("zstd").with_level(23), &registry),
        Err(CodecError::InvalidConfiguration(_))
    ));
    let mut metadata = CodecMetadata::new("zstd");
    metadata.configuration.pre_filter = PreFilter::BitShuffle;
    assert!(matches!(
        Codec::from_metadata(&metadata, &registry),
        Err(CodecError::InvalidConfiguration(_))
    ));
}

/// A compressor which reverses bytes.
#[derive(Debug)]
struct ReverseCompressor;

impl CompressorTraits for ReverseCompressor {
    fn name(&self) -> &'static str {
        "reverse"
    }

    fn levels(&self) -> RangeInclusive<i32> {
        0..=0
    }

    fn default_level(&self) -> i32 {
        0
    }

    fn compress(&self, decoded: &[u8], _level: i32) -> Result<Vec<u8>, CodecError> {
        Ok(decoded.iter().rev().copied().collect())
    }

    fn decompress(&self, encoded: &[u8], _expected_len: usize) -> Result<Vec<u8>, CodecError> {
        Ok(encoded.iter().rev().copied().collect())
    }
}

#[test]
fn codec_custom_registry() {
    let metadata = CodecMetadata::new("reverse");
    assert!(Codec::from_metadata(&metadata, &CodecRegistry::default()).is_err());

    let registry = CodecRegistry::new_empty().with(Arc::new(ReverseCompressor));
    let codec = Codec::from_metadata(&metadata, &registry).unwrap();
    assert_eq!(codec.encode(&[1, 2, 3]).unwrap(), vec![3, 2, 1]);
    assert_eq!(
        codec
            .decode(&[3, 2, 1], 3, &CodecOptions::default())
            .unwrap(),
        vec![1, 2, 3]
    );
}
