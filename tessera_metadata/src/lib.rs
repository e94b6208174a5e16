//! Array and group metadata for the [`tessera`](https://docs.rs/tessera/latest/tessera/index.html) crate.
//!
//! Every node of a hierarchy stores one JSON document at `<node>/zarr.json`, discriminated by `node_type`:
//! ```json
//! {
//!     "node_type": "array",
//!     "shape": [100, 100],
//!     "chunk_shape": [50, 50],
//!     "data_type": "<f4",
//!     "fill_value": "NaN",
//!     "codec": {
//!         "name": "zstd",
//!         "configuration": { "level": 5, "pre_filter": "byte_shuffle", "element_width": 4 }
//!     },
//!     "order": "C",
//!     "chunk_key_encoding": { "name": "default", "separator": "/" },
//!     "created": "2024-01-01T00:00:00Z"
//! }
//! ```
//! Attributes are stored separately at `<node>/attributes.json` as a plain JSON object.
//!
//! ## Licence
//! `tessera_metadata` is licensed under either of
//!  - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license <http://opensource.org/licenses/MIT>, at your option.

mod array;
mod chunk_key_encoding;
mod codec;
mod data_type;
mod fill_value;
mod group;

pub use array::{ArrayMetadata, ArrayOrder};
pub use chunk_key_encoding::{ChunkKeyEncodingMetadata, ChunkKeySeparator};
pub use codec::{CodecConfiguration, CodecMetadata, PreFilter};
pub use data_type::{DataType, DataTypeKind, Endianness, UnsupportedDataTypeError};
pub use fill_value::{FillValueMetadata, NonFiniteFloat};
pub use group::GroupMetadata;

use serde::{Deserialize, Serialize};

/// The name of the metadata key of a node.
pub const METADATA_KEY: &str = "zarr.json";

/// The name of the attributes key of a node.
pub const ATTRIBUTES_KEY: &str = "attributes.json";

/// User attributes: a mapping from string keys to JSON values.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Node metadata, either array or group metadata discriminated by the `node_type` field.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, derive_more::From)]
#[serde(tag = "node_type", rename_all = "lowercase")]
pub enum NodeMetadata {
    /// Array metadata.
    Array(ArrayMetadata),
    /// Group metadata.
    Group(GroupMetadata),
}

impl NodeMetadata {
    /// Serialise the metadata to pretty-printed JSON bytes.
    ///
    /// # Errors
    /// Returns a [`serde_json::Error`] if the metadata cannot be serialised.
    pub fn to_json_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }

    /// Deserialise metadata from JSON bytes.
    ///
    /// # Errors
    /// Returns a [`serde_json::Error`] if `bytes` is not valid node metadata.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
