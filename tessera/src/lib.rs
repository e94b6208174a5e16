//! `tessera` is a Rust library for chunked, compressed, hierarchical storage of dense multidimensional arrays.
//!
//! An [`Array`](crate::array::Array) is partitioned into a regular grid of chunks.
//! Each chunk is compressed independently and stored under its own key in a key-value store, so reading or writing a small region only touches the chunks it overlaps.
//! Chunks that have never been written, or hold nothing but the fill value, are not stored at all.
//! Arrays are organised into a hierarchy of named [`Group`](crate::group::Group)s, and every node carries user attributes.
//!
//! ## Getting Started
//! - Create a store: [`MemoryStore`](crate::storage::store::MemoryStore), [`FilesystemStore`](crate::filesystem::FilesystemStore), or any [`object_store`](https://docs.rs/object_store/latest/object_store/) backend through `tessera_object_store`.
//! - Create a root [`Group`](crate::group::Group), then create child groups and arrays with an [`ArrayBuilder`](crate::array::ArrayBuilder).
//! - Read and write regions with [`Array::retrieve_array_subset`](crate::array::Array::retrieve_array_subset) and [`Array::store_array_subset`](crate::array::Array::store_array_subset) or their `_elements` variants.
//!
//! ## Storage Layout
//! A hierarchy stored at the root of a store looks like:
//! ```text
//! zarr.json               root group metadata
//! attributes.json         root group attributes (optional)
//! g1/zarr.json            group metadata
//! g1/a1/zarr.json         array metadata
//! g1/a1/c/0/0             chunk (0, 0)
//! g1/a1/c/1/0             chunk (1, 0)
//! ```
//! Keys starting with `__` are reserved and never interpreted as nodes.
//!
//! ## Codecs
//! Chunks are encoded by a [`Codec`](crate::array::Codec): an optional byte or bit shuffle pre-filter, a compressor (`none`, `gzip`, `zlib` or `zstd`) and an optional crc32c checksum.
//! Additional compressors can be registered in a [`CodecRegistry`](crate::array::CodecRegistry).
//!
//! ## Concurrency
//! Stores, arrays and groups are `Send + Sync`.
//! Every store `set` replaces a whole value, so a chunk is never observed half written.
//! Concurrent writes to different chunks never interfere.
//! Concurrent partial writes to the same chunk are merged with compare-and-set where the store supports it, and otherwise the last writer of the chunk wins.
//!
//! ## Example
//! ```rust
//! # use std::sync::Arc;
//! use tessera::array::{ArrayBuilder, ArraySubset, DataType};
//! use tessera::group::Group;
//! use tessera::node::NodeKind;
//!
//! let store = Arc::new(tessera::storage::store::MemoryStore::new());
//! let root = Group::create(store.clone(), "/", false)?;
//! let g1 = root.create_group("g1")?;
//! g1.attrs().set("description", "measurements")?;
//!
//! let array = g1.create_array(
//!     "a1",
//!     &ArrayBuilder::new(vec![4, 4], vec![2, 2], DataType::float32(), 0.0f32),
//! )?;
//! array.store_array_subset_elements::<f32>(
//!     &ArraySubset::new_with_ranges(&[1..3, 1..3]),
//!     &[1.0, 2.0, 3.0, 4.0],
//! )?;
//! let elements = array.retrieve_array_subset_elements::<f32>(
//!     &ArraySubset::new_with_ranges(&[0..2, 0..2]),
//! )?;
//! assert_eq!(elements, vec![0.0, 0.0, 0.0, 1.0]);
//! assert_eq!(array.stored_chunk_keys()?.len(), 4);
//!
//! assert_eq!(root.list_children()?[0].1, NodeKind::Group);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Logging
//! `tessera` logs information and warnings using the [`log`] crate.
//! A logging implementation must be enabled to capture logs.
//! See the [`log`] crate documentation for more details.
//!
//! ## Crate Features
//! #### Default
//!  - `filesystem`: Re-export `tessera_filesystem` as [`tessera::filesystem`](crate::filesystem).
//!
//! ## Licence
//! `tessera` is licensed under either of
//!  - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license <http://opensource.org/licenses/MIT>, at your option.
//!
//! Unless you explicitly state otherwise, any contribution intentionally submitted for inclusion in the work by you, as defined in the Apache-2.0 license, shall be dual licensed as above, without any additional terms or conditions.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(clippy::wildcard_enum_match_arm)]

pub mod array;
pub mod config;
pub mod group;
pub mod hierarchy;
pub mod node;

#[cfg(feature = "filesystem")]
pub use tessera_filesystem as filesystem;
pub use tessera_chunk_grid as chunk_grid;
pub use tessera_codec as codec;
pub use tessera_metadata as metadata;
pub use tessera_storage as storage;
