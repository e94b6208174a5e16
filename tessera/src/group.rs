//! Groups.
//!
//! A group is a node in a hierarchy which contains named child groups and arrays.
//! Its metadata document at `<prefix>zarr.json` marks the prefix as a group:
//! ```json
//! {
//!     "node_type": "group",
//!     "created": "2024-01-01T00:00:00Z"
//! }
//! ```
//!
//! Use [`Group::create`] to create a new group, or [`Group::open`] to open an existing group.
//! Children are created with [`Group::create_group`] and [`Group::create_array`], and enumerated with [`Group::list_children`].
//!
//! Group attributes are stored in a separate document, see [`Group::attrs`].

use std::sync::Arc;

use thiserror::Error;

use crate::array::{Array, ArrayBuilder, ArrayError, ArraySubset, OpenMode};
use crate::metadata::{Attributes, GroupMetadata};
use crate::node::{
    get_all_nodes_of, get_child_nodes, node_exists, retrieve_metadata, Node, NodeAttributes,
    NodeAttributesError, NodeCreateError, NodeKind, NodeMetadata, NodeName, NodeNameError,
    NodePath, NodePathError, StorageResultExt, StoreOperation, StoreOperationError,
};
use crate::storage::{
    ListableStorageTraits, ReadableStorageTraits, ReadableWritableListableStorageTraits,
    ReadableWritableStorageTraits, StoreKey, WritableStorageTraits,
};

/// A group error.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum GroupError {
    /// An invalid node path.
    #[error(transparent)]
    NodePathError(#[from] NodePathError),
    /// An invalid child name.
    #[error(transparent)]
    NodeNameError(#[from] NodeNameError),
    /// There is no group at the path.
    #[error("no group exists at {0}")]
    NotFound(NodePath),
    /// A node already exists at the path.
    #[error("a node already exists at {0}")]
    AlreadyExists(NodePath),
    /// The node at the path is an array.
    #[error("the node at {0} is not a group")]
    NotAGroup(NodePath),
    /// A write operation was attempted on a group opened read only.
    #[error("{0} was opened read only")]
    ReadOnly(NodePath),
    /// The group already has a child with the name.
    #[error("a child named {0} already exists")]
    DuplicateName(NodeName),
    /// The metadata document could not be parsed or serialised.
    #[error("invalid metadata at {0}: {1}")]
    InvalidMetadata(StoreKey, String),
    /// A storage error.
    #[error(transparent)]
    StorageError(#[from] StoreOperationError),
    /// An attributes error.
    #[error(transparent)]
    AttributesError(#[from] NodeAttributesError),
    /// An error creating, opening or writing a child array.
    #[error(transparent)]
    ArrayError(#[from] ArrayError),
}

impl From<NodeCreateError> for GroupError {
    fn from(err: NodeCreateError) -> Self {
        match err {
            NodeCreateError::NodePathError(err) => Self::NodePathError(err),
            NodeCreateError::StorageError(err) => Self::StorageError(err),
            NodeCreateError::InvalidMetadata(key, err) => Self::InvalidMetadata(key, err),
            NodeCreateError::MissingMetadata(path) => Self::NotFound(path),
        }
    }
}

/// A group.
#[derive(Clone, Debug)]
pub struct Group<TStorage: ?Sized> {
    /// The storage.
    storage: Arc<TStorage>,
    /// The path of the group in the store.
    path: NodePath,
    /// The access mode.
    mode: OpenMode,
    /// The metadata.
    metadata: GroupMetadata,
}

impl<TStorage: ?Sized> Group<TStorage> {
    /// Create a group in `storage` at `path` with `metadata`.
    /// This does **not** read or write the store, see [`Group::create`] and [`Group::open`].
    ///
    /// # Errors
    /// Returns [`GroupError::NodePathError`] if `path` is invalid.
    pub fn new_with_metadata(
        storage: Arc<TStorage>,
        path: &str,
        metadata: GroupMetadata,
        mode: OpenMode,
    ) -> Result<Self, GroupError> {
        Ok(Self {
            storage,
            path: NodePath::new(path)?,
            mode,
            metadata,
        })
    }

    /// Get the underlying storage backing the group.
    #[must_use]
    pub fn storage(&self) -> Arc<TStorage> {
        self.storage.clone()
    }

    /// Get path.
    #[must_use]
    pub fn path(&self) -> &NodePath {
        &self.path
    }

    /// Get the access mode.
    #[must_use]
    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    /// Get metadata.
    #[must_use]
    pub fn metadata(&self) -> &GroupMetadata {
        &self.metadata
    }

    /// Return the user attributes of the group.
    #[must_use]
    pub fn attrs(&self) -> NodeAttributes<'_, TStorage> {
        NodeAttributes::new(&*self.storage, &self.path, self.mode == OpenMode::ReadWrite)
    }

    fn check_writable(&self) -> Result<(), GroupError> {
        match self.mode {
            OpenMode::ReadWrite => Ok(()),
            OpenMode::ReadOnly => Err(GroupError::ReadOnly(self.path.clone())),
        }
    }

    fn child_path(&self, name: &str) -> Result<NodePath, GroupError> {
        Ok(self.path.child(&NodeName::new(name)?))
    }
}

impl<TStorage: ?Sized + ReadableStorageTraits> Group<TStorage> {
    /// Open the existing group at `path`.
    ///
    /// # Errors
    /// Returns [`GroupError::NotFound`] if there is no node at `path`, [`GroupError::NotAGroup`] if the node is an array, or another [`GroupError`] if the metadata is invalid or cannot be retrieved.
    pub fn open(storage: Arc<TStorage>, path: &str, mode: OpenMode) -> Result<Self, GroupError> {
        let node_path = NodePath::new(path)?;
        match retrieve_metadata(&*storage, &node_path)? {
            Some(NodeMetadata::Group(metadata)) => {
                Self::new_with_metadata(storage, path, metadata, mode)
            }
            Some(NodeMetadata::Array(_)) => Err(GroupError::NotAGroup(node_path)),
            None => Err(GroupError::NotFound(node_path)),
        }
    }

    /// Open the child group `name` with the access mode of this group.
    ///
    /// # Errors
    /// See [`Group::open`].
    pub fn open_group(&self, name: &str) -> Result<Self, GroupError> {
        let path = self.child_path(name)?;
        Self::open(self.storage.clone(), path.as_str(), self.mode)
    }

    /// Open the child array `name` with the access mode of this group.
    ///
    /// # Errors
    /// See [`Array::open`].
    pub fn open_array(&self, name: &str) -> Result<Array<TStorage>, GroupError> {
        let path = self.child_path(name)?;
        Ok(Array::open(self.storage.clone(), path.as_str(), self.mode)?)
    }

    /// Return all user attributes of the group.
    ///
    /// # Errors
    /// Returns a [`GroupError`] if the attributes cannot be retrieved or are invalid.
    pub fn attributes_map(&self) -> Result<Attributes, GroupError> {
        Ok(self.attrs().map()?)
    }
}

impl<TStorage: ?Sized + ReadableStorageTraits + ListableStorageTraits> Group<TStorage> {
    /// Return the name and kind of each direct child of the group, sorted by name.
    ///
    /// Child prefixes without node metadata are skipped.
    ///
    /// # Errors
    /// Returns a [`GroupError`] if there is an underlying store error or child metadata is invalid.
    pub fn list_children(&self) -> Result<Vec<(NodeName, NodeKind)>, GroupError> {
        get_child_nodes(&self.storage, &self.path, false)?
            .iter()
            .map(|node| -> Result<_, GroupError> {
                Ok((NodeName::new(node.name())?, node.kind()))
            })
            .collect()
    }

    /// Return the direct children of the group.
    ///
    /// # Errors
    /// Returns a [`GroupError`] if there is an underlying store error or child metadata is invalid.
    pub fn children(&self, recursive: bool) -> Result<Vec<Node>, GroupError> {
        Ok(get_child_nodes(&self.storage, &self.path, recursive)?)
    }

    /// Return every node below the group.
    ///
    /// # Errors
    /// Returns a [`GroupError`] if there is an underlying store error or metadata is invalid.
    pub fn traverse(&self) -> Result<Vec<Node>, GroupError> {
        Ok(get_all_nodes_of(&self.storage, &self.path)?)
    }
}

impl<TStorage: ?Sized + ReadableWritableStorageTraits + 'static> Group<TStorage> {
    /// Create a group at `path` and write its metadata to the store.
    ///
    /// If `overwrite` is true, any existing node at `path` is erased first, including all of its descendants.
    ///
    /// # Errors
    /// Returns [`GroupError::AlreadyExists`] if a node exists at `path` and `overwrite` is false, or another [`GroupError`] if there is an underlying store error.
    pub fn create(storage: Arc<TStorage>, path: &str, overwrite: bool) -> Result<Self, GroupError> {
        let group =
            Self::new_with_metadata(storage, path, GroupMetadata::new(), OpenMode::ReadWrite)?;
        if node_exists(&group.storage, &group.path)? {
            if !overwrite {
                return Err(GroupError::AlreadyExists(group.path));
            }
            let prefix = group.path.prefix()?;
            log::debug!("Overwriting the node at {}", group.path);
            group
                .storage
                .erase_prefix(&prefix)
                .with_store_context(StoreOperation::Erase, &prefix)?;
        }
        group.store_metadata()?;
        Ok(group)
    }

    /// Store metadata.
    ///
    /// # Errors
    /// Returns [`GroupError::ReadOnly`] if the group was opened read only, or a [`GroupError`] if there is an underlying store error.
    pub fn store_metadata(&self) -> Result<(), GroupError> {
        self.check_writable()?;
        let key = self.path.meta_key()?;
        let bytes = NodeMetadata::Group(self.metadata.clone())
            .to_json_vec()
            .map_err(|err| GroupError::InvalidMetadata(key.clone(), err.to_string()))?;
        self.storage
            .set(&key, bytes.into())
            .with_store_context(StoreOperation::Set, &key)?;
        Ok(())
    }

    fn check_new_child(&self, name: &str) -> Result<NodePath, GroupError> {
        self.check_writable()?;
        let name = NodeName::new(name)?;
        let path = self.path.child(&name);
        if node_exists(&self.storage, &path)? {
            return Err(GroupError::DuplicateName(name));
        }
        Ok(path)
    }

    /// Create the child group `name`.
    ///
    /// # Errors
    /// Returns [`GroupError::DuplicateName`] if a child named `name` exists, [`GroupError::NodeNameError`] if `name` is invalid, or another [`GroupError`] if the group was opened read only or there is an underlying store error.
    pub fn create_group(&self, name: &str) -> Result<Self, GroupError> {
        let path = self.check_new_child(name)?;
        let group = Self::new_with_metadata(
            self.storage.clone(),
            path.as_str(),
            GroupMetadata::new(),
            OpenMode::ReadWrite,
        )?;
        group.store_metadata()?;
        Ok(group)
    }

    /// Create the child array `name` configured by `builder`.
    ///
    /// # Errors
    /// Returns [`GroupError::DuplicateName`] if a child named `name` exists, [`GroupError::NodeNameError`] if `name` is invalid, or another [`GroupError`] if the array metadata is invalid, the group was opened read only or there is an underlying store error.
    pub fn create_array(
        &self,
        name: &str,
        builder: &ArrayBuilder,
    ) -> Result<Array<TStorage>, GroupError> {
        let path = self.check_new_child(name)?;
        Ok(builder.create(self.storage.clone(), path.as_str())?)
    }

    /// Create the child array `name` configured by `builder` and write `bytes` to the whole array.
    ///
    /// # Errors
    /// See [`Group::create_array`] and [`Array::store_array_subset`].
    /// If writing fails, the array is left in place with whatever was written.
    pub fn create_array_with_data(
        &self,
        name: &str,
        builder: &ArrayBuilder,
        bytes: &[u8],
    ) -> Result<Array<TStorage>, GroupError> {
        let array = self.create_array(name, builder)?;
        let subset = ArraySubset::new_with_shape(array.shape().to_vec());
        array.store_array_subset(&subset, bytes)?;
        Ok(array)
    }
}

impl<TStorage: ?Sized + ReadableWritableListableStorageTraits + 'static> Group<TStorage> {
    /// Delete the group and everything below it from the store.
    ///
    /// Arrays and groups opened below the group remain usable as handles, but read as if empty and their metadata is gone.
    ///
    /// # Errors
    /// Returns [`GroupError::ReadOnly`] if the group was opened read only, or a [`GroupError`] if there is an underlying store error.
    pub fn delete(self) -> Result<(), GroupError> {
        self.check_writable()?;
        let prefix = self.path.prefix()?;
        log::debug!("Deleting the group at {}", self.path);
        self.storage
            .erase_prefix(&prefix)
            .with_store_context(StoreOperation::Erase, &prefix)?;
        Ok(())
    }

    /// Delete the child node `name` and everything below it.
    ///
    /// Returns true if the child existed.
    ///
    /// # Errors
    /// Returns [`GroupError::NodeNameError`] if `name` is invalid, or another [`GroupError`] if the group was opened read only or there is an underlying store error.
    pub fn delete_child(&self, name: &str) -> Result<bool, GroupError> {
        self.check_writable()?;
        let path = self.child_path(name)?;
        let existed = node_exists(&self.storage, &path)?;
        let prefix = path.prefix()?;
        self.storage
            .erase_prefix(&prefix)
            .with_store_context(StoreOperation::Erase, &prefix)?;
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use crate::array::DataType;
    use crate::storage::store::MemoryStore;

    use super::*;

    #[test]
    fn group_open_errors() {
        let store = Arc::new(MemoryStore::new());
        assert!(matches!(
            Group::open(store.clone(), "/", OpenMode::ReadOnly),
            Err(GroupError::NotFound(_))
        ));
        let root = Group::create(store.clone(), "/", false).unwrap();
        root.create_array(
            "array",
            &ArrayBuilder::new(vec![4], vec![2], DataType::uint8(), 0u64),
        )
        .unwrap();
        assert!(matches!(
            Group::open(store.clone(), "/array", OpenMode::ReadOnly),
            Err(GroupError::NotAGroup(_))
        ));
        assert!(matches!(
            Group::create(store.clone(), "/", false),
            Err(GroupError::AlreadyExists(_))
        ));
        assert!(matches!(
            Group::open(store, "not/absolute", OpenMode::ReadOnly),
            Err(GroupError::NodePathError(_))
        ));
    }

    #[test]
    fn group_read_only() {
        let store = Arc::new(MemoryStore::new());
        Group::create(store.clone(), "/", false).unwrap();
        let root = Group::open(store, "/", OpenMode::ReadOnly).unwrap();
        assert!(matches!(root.create_group("g"), Err(GroupError::ReadOnly(_))));
        assert!(matches!(
            root.attrs().set("a", 1),
            Err(NodeAttributesError::ReadOnly(_))
        ));
        assert!(matches!(root.delete(), Err(GroupError::ReadOnly(_))));
    }

    #[test]
    fn group_overwrite() {
        let store = Arc::new(MemoryStore::new());
        let group = Group::create(store.clone(), "/g", false).unwrap();
        group.create_group("child").unwrap();
        let group = Group::create(store.clone(), "/g", true).unwrap();
        assert!(group.list_children().unwrap().is_empty());
    }

    #[test]
    fn group_delete_child() {
        let store = Arc::new(MemoryStore::new());
        let root = Group::create(store, "/", false).unwrap();
        root.create_group("child").unwrap();
        assert!(root.delete_child("child").unwrap());
        assert!(!root.delete_child("child").unwrap());
        assert!(matches!(
            root.delete_child("__reserved"),
            Err(GroupError::NodeNameError(_))
        ));
    }
}
