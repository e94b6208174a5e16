//! Stores included with `tessera_storage`.
//!
//! Filesystem and object store backends live in the `tessera_filesystem` and `tessera_object_store` crates.

mod memory_store;

pub use memory_store::MemoryStore;
