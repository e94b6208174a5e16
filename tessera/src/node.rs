//! Hierarchy nodes.
//!
//! A node is an [`Array`](crate::array::Array) or a [`Group`](crate::group::Group) at a [`NodePath`].
//! Every node has a metadata document at `<prefix>zarr.json` and optionally a user attributes document at `<prefix>attributes.json`.
//! The chunks of an array live under the array prefix, and the children of a group under the group prefix.
//!
//! Nodes are discovered by listing a store, so there is no separate index to keep consistent with the store.

mod node_attributes;
mod node_name;
mod node_path;
mod node_sync;

use std::sync::Arc;

use derive_more::Display;
use thiserror::Error;

pub use node_attributes::{NodeAttributes, NodeAttributesError};
pub use node_name::{NodeName, NodeNameError};
pub use node_path::{NodePath, NodePathError};
pub use node_sync::{get_all_nodes_of, get_child_nodes, node_exists};
pub use tessera_metadata::{NodeMetadata, ATTRIBUTES_KEY, METADATA_KEY};

use crate::storage::{ListableStorageTraits, ReadableStorageTraits, StorageError, StoreKey};

/// The kind of a node.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Display)]
pub enum NodeKind {
    /// An array.
    #[display("array")]
    Array,
    /// A group.
    #[display("group")]
    Group,
}

impl From<&NodeMetadata> for NodeKind {
    fn from(metadata: &NodeMetadata) -> Self {
        match metadata {
            NodeMetadata::Array(_) => Self::Array,
            NodeMetadata::Group(_) => Self::Group,
        }
    }
}

/// A store operation, reported with storage errors.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Display)]
pub enum StoreOperation {
    /// Retrieve a value.
    #[display("get")]
    Get,
    /// Store a value.
    #[display("set")]
    Set,
    /// Erase a value or prefix.
    #[display("erase")]
    Erase,
    /// List keys.
    #[display("list")]
    List,
    /// Compare-and-set a value.
    #[display("compare-and-set")]
    CompareAndSet,
}

/// A storage error annotated with the key (or prefix) and operation that failed.
#[derive(Clone, Debug, Error)]
#[error("failed to {operation} `{key}`: {source}")]
pub struct StoreOperationError {
    key: String,
    operation: StoreOperation,
    source: StorageError,
}

impl StoreOperationError {
    /// Create a new store operation error.
    #[must_use]
    pub fn new(key: impl ToString, operation: StoreOperation, source: StorageError) -> Self {
        Self {
            key: key.to_string(),
            operation,
            source,
        }
    }

    /// Return the key or prefix the operation targeted.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Return the operation that failed.
    #[must_use]
    pub fn operation(&self) -> StoreOperation {
        self.operation
    }

    /// Return the underlying storage error.
    #[must_use]
    pub fn storage_error(&self) -> &StorageError {
        &self.source
    }
}

pub(crate) trait StorageResultExt<T> {
    fn with_store_context(
        self,
        operation: StoreOperation,
        key: &impl ToString,
    ) -> Result<T, StoreOperationError>;
}

impl<T> StorageResultExt<T> for Result<T, StorageError> {
    fn with_store_context(
        self,
        operation: StoreOperation,
        key: &impl ToString,
    ) -> Result<T, StoreOperationError> {
        self.map_err(|err| StoreOperationError::new(key.to_string(), operation, err))
    }
}

/// A node creation error.
#[derive(Clone, Debug, Error)]
pub enum NodeCreateError {
    /// An invalid node path.
    #[error(transparent)]
    NodePathError(#[from] NodePathError),
    /// A storage error.
    #[error(transparent)]
    StorageError(#[from] StoreOperationError),
    /// The metadata document could not be parsed.
    #[error("invalid metadata at {0}: {1}")]
    InvalidMetadata(StoreKey, String),
    /// There is no node at the path.
    #[error("no node exists at {0}")]
    MissingMetadata(NodePath),
}

/// A node in a hierarchy, with its metadata and (optionally) its descendants.
#[derive(Clone, Debug)]
pub struct Node {
    path: NodePath,
    metadata: NodeMetadata,
    children: Vec<Node>,
}

impl Node {
    /// Open the node at `path` and read its metadata and all descendants from `storage`.
    ///
    /// # Errors
    /// Returns [`NodeCreateError`] if the path is invalid, there is no node at `path`, metadata is invalid, or there is a failure to list child nodes.
    pub fn open<TStorage: ?Sized + ReadableStorageTraits + ListableStorageTraits>(
        storage: &Arc<TStorage>,
        path: &str,
    ) -> Result<Self, NodeCreateError> {
        let path: NodePath = path.try_into()?;
        let metadata = Self::get_metadata(storage, &path)?;
        let children = match metadata {
            NodeMetadata::Array(_) => Vec::default(),
            NodeMetadata::Group(_) => get_child_nodes(storage, &path, true)?,
        };
        Ok(Self::new_with_metadata(path, metadata, children))
    }

    /// Create a new node at `path` with `metadata` and `children`.
    #[must_use]
    pub fn new_with_metadata(path: NodePath, metadata: NodeMetadata, children: Vec<Self>) -> Self {
        Self {
            path,
            metadata,
            children,
        }
    }

    /// Read the metadata of the node at `path`.
    ///
    /// # Errors
    /// Returns [`NodeCreateError::MissingMetadata`] if there is no node at `path`, or another [`NodeCreateError`] if the metadata could not be retrieved or parsed.
    pub fn get_metadata<TStorage: ?Sized + ReadableStorageTraits>(
        storage: &Arc<TStorage>,
        path: &NodePath,
    ) -> Result<NodeMetadata, NodeCreateError> {
        retrieve_metadata(&**storage, path)?
            .ok_or_else(|| NodeCreateError::MissingMetadata(path.clone()))
    }

    /// Returns the path of the node.
    #[must_use]
    pub fn path(&self) -> &NodePath {
        &self.path
    }

    /// Returns the name of the node, or an empty string for the root.
    #[must_use]
    pub fn name(&self) -> &str {
        self.path.name()
    }

    /// Returns the metadata of the node.
    #[must_use]
    pub fn metadata(&self) -> &NodeMetadata {
        &self.metadata
    }

    /// Returns the kind of the node.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        NodeKind::from(&self.metadata)
    }

    /// Returns the children of the node.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }
}

/// Retrieve and parse the metadata document at `path`, if it exists.
pub(crate) fn retrieve_metadata<TStorage: ?Sized + ReadableStorageTraits>(
    storage: &TStorage,
    path: &NodePath,
) -> Result<Option<NodeMetadata>, NodeCreateError> {
    let key = path.meta_key()?;
    let Some(bytes) = storage.get(&key).with_store_context(StoreOperation::Get, &key)? else {
        return Ok(None);
    };
    let metadata = NodeMetadata::from_json_slice(&bytes)
        .map_err(|err| NodeCreateError::InvalidMetadata(key, err.to_string()))?;
    Ok(Some(metadata))
}
