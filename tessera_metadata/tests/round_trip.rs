#![allow(missing_docs)]

use std::num::{NonZeroU64, NonZeroUsize};

use tessera_metadata::{
    ArrayMetadata, ArrayOrder, ChunkKeyEncodingMetadata, CodecMetadata, DataType, Endianness,
    FillValueMetadata, GroupMetadata, NodeMetadata, PreFilter,
};

fn chunk_shape(shape: &[u64]) -> Vec<NonZeroU64> {
    shape.iter().map(|&size| NonZeroU64::new(size).unwrap()).collect()
}

#[test]
fn array_metadata_round_trip() {
    let fill_values = [
        FillValueMetadata::from_f64(f64::NAN),
        FillValueMetadata::from_f64(f64::NEG_INFINITY),
        FillValueMetadata::from_f64(0.1),
        FillValueMetadata::from_f64(-1.5e300),
        FillValueMetadata::from_i64(-7),
        FillValueMetadata::UInt(u64::MAX),
        FillValueMetadata::Bool(true),
    ];
    for fill_value in fill_values {
        let metadata = NodeMetadata::Array(
            ArrayMetadata::new(
                vec![100, 0, 7],
                chunk_shape(&[50, 3, 7]),
                DataType::float64().with_endianness(Endianness::Big),
                fill_value,
                CodecMetadata::new("zstd")
                    .with_level(9)
                    .with_pre_filter(PreFilter::ByteShuffle, NonZeroUsize::new(8).unwrap())
                    .with_checksum(true),
            )
            .with_order(ArrayOrder::F)
            .with_chunk_key_encoding(ChunkKeyEncodingMetadata::v2()),
        );
        let bytes = metadata.to_json_vec().unwrap();
        let decoded = NodeMetadata::from_json_slice(&bytes).unwrap();
        assert_eq!(decoded, metadata);
        assert_eq!(decoded.to_json_vec().unwrap(), bytes);
    }
}

#[test]
fn array_metadata_json() {
    let json = r#"{
        "node_type": "array",
        "shape": [100, 100],
        "chunk_shape": [50, 50],
        "data_type": "<f4",
        "fill_value": 0.0,
        "codec": {"name": "gzip", "configuration": {"level": 5}},
        "created": "2024-01-01T00:00:00Z"
    }"#;
    let NodeMetadata::Array(metadata) = NodeMetadata::from_json_slice(json.as_bytes()).unwrap()
    else {
        panic!("expected array metadata");
    };
    assert_eq!(metadata.shape, vec![100, 100]);
    assert_eq!(metadata.data_type, DataType::float32());
    assert_eq!(metadata.fill_value, FillValueMetadata::Float(0.0));
    assert_eq!(metadata.codec.configuration.level, Some(5));
    assert_eq!(metadata.order, ArrayOrder::C);
    assert_eq!(metadata.chunk_key_encoding, ChunkKeyEncodingMetadata::default());
    assert_eq!(metadata.dimensionality(), 2);
}

#[test]
fn array_metadata_invalid() {
    // zero chunk shape
    let json = r#"{
        "node_type": "array",
        "shape": [10],
        "chunk_shape": [0],
        "data_type": "<f4",
        "fill_value": 0,
        "codec": {"name": "none"},
        "created": "2024-01-01T00:00:00Z"
    }"#;
    assert!(NodeMetadata::from_json_slice(json.as_bytes()).is_err());
    assert!(NodeMetadata::from_json_slice(br#"{"node_type": "table"}"#).is_err());
    assert!(NodeMetadata::from_json_slice(br#"{"shape": [1]}"#).is_err());
}

#[test]
fn group_metadata_round_trip() {
    let metadata = NodeMetadata::Group(GroupMetadata::new());
    let bytes = metadata.to_json_vec().unwrap();
    assert_eq!(NodeMetadata::from_json_slice(&bytes).unwrap(), metadata);

    let metadata = NodeMetadata::from_json_slice(br#"{"node_type": "group"}"#).unwrap();
    assert_eq!(metadata, NodeMetadata::Group(GroupMetadata { created: None }));
}
