use serde_json::Value;
use thiserror::Error;

use crate::metadata::Attributes;
use crate::storage::{ReadableStorageTraits, StoreKey, WritableStorageTraits};

use super::{NodePath, NodePathError, StorageResultExt, StoreOperation, StoreOperationError};

/// An attributes error.
#[derive(Clone, Debug, Error)]
pub enum NodeAttributesError {
    /// An invalid node path.
    #[error(transparent)]
    NodePathError(#[from] NodePathError),
    /// A storage error.
    #[error(transparent)]
    StorageError(#[from] StoreOperationError),
    /// The attributes document is not a JSON object.
    #[error("invalid attributes at {0}: {1}")]
    InvalidAttributes(StoreKey, String),
    /// The node was opened read only.
    #[error("{0} was opened read only")]
    ReadOnly(NodePath),
}

/// The user attributes of a node.
///
/// Attributes are a JSON object stored in their own document beside the node metadata, so updating them never rewrites structural metadata.
/// Every call reads the current document from the store; nothing is cached.
#[derive(Debug)]
pub struct NodeAttributes<'a, TStorage: ?Sized> {
    storage: &'a TStorage,
    path: &'a NodePath,
    writable: bool,
}

impl<'a, TStorage: ?Sized> NodeAttributes<'a, TStorage> {
    pub(crate) fn new(storage: &'a TStorage, path: &'a NodePath, writable: bool) -> Self {
        Self {
            storage,
            path,
            writable,
        }
    }
}

impl<TStorage: ?Sized + ReadableStorageTraits> NodeAttributes<'_, TStorage> {
    /// Return all attributes.
    ///
    /// # Errors
    /// Returns a [`NodeAttributesError`] if the attributes cannot be retrieved or are not a JSON object.
    pub fn map(&self) -> Result<Attributes, NodeAttributesError> {
        let key = self.path.attributes_key()?;
        match self
            .storage
            .get(&key)
            .with_store_context(StoreOperation::Get, &key)?
        {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map_err(|err| NodeAttributesError::InvalidAttributes(key, err.to_string())),
            None => Ok(Attributes::new()),
        }
    }

    /// Return the attribute `name`, if it is set.
    ///
    /// # Errors
    /// Returns a [`NodeAttributesError`] if the attributes cannot be retrieved.
    pub fn get(&self, name: &str) -> Result<Option<Value>, NodeAttributesError> {
        Ok(self.map()?.remove(name))
    }

    /// Return the names of all attributes in insertion order.
    ///
    /// # Errors
    /// Returns a [`NodeAttributesError`] if the attributes cannot be retrieved.
    pub fn list(&self) -> Result<Vec<String>, NodeAttributesError> {
        Ok(self.map()?.into_iter().map(|(name, _)| name).collect())
    }
}

impl<TStorage: ?Sized + ReadableStorageTraits + WritableStorageTraits>
    NodeAttributes<'_, TStorage>
{
    /// Set the attribute `name` to `value`, returning the previous value.
    ///
    /// # Errors
    /// Returns a [`NodeAttributesError`] if the node is read only or the attributes cannot be retrieved or stored.
    pub fn set(
        &self,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, NodeAttributesError> {
        self.check_writable()?;
        let mut attributes = self.map()?;
        let previous = attributes.insert(name.to_string(), value.into());
        self.replace(&attributes)?;
        Ok(previous)
    }

    /// Delete the attribute `name`, returning its value. Deleting an absent attribute is not an error.
    ///
    /// # Errors
    /// Returns a [`NodeAttributesError`] if the node is read only or the attributes cannot be retrieved or stored.
    pub fn delete(&self, name: &str) -> Result<Option<Value>, NodeAttributesError> {
        self.check_writable()?;
        let mut attributes = self.map()?;
        let previous = attributes.shift_remove(name);
        if previous.is_some() {
            self.replace(&attributes)?;
        }
        Ok(previous)
    }

    /// Replace all attributes. An empty map erases the attributes document.
    ///
    /// # Errors
    /// Returns a [`NodeAttributesError`] if the node is read only or the attributes cannot be stored.
    pub fn replace(&self, attributes: &Attributes) -> Result<(), NodeAttributesError> {
        self.check_writable()?;
        let key = self.path.attributes_key()?;
        if attributes.is_empty() {
            self.storage
                .erase(&key)
                .with_store_context(StoreOperation::Erase, &key)?;
        } else {
            let bytes = serde_json::to_vec_pretty(attributes).map_err(|err| {
                NodeAttributesError::InvalidAttributes(key.clone(), err.to_string())
            })?;
            self.storage
                .set(&key, bytes.into())
                .with_store_context(StoreOperation::Set, &key)?;
        }
        Ok(())
    }

    fn check_writable(&self) -> Result<(), NodeAttributesError> {
        if self.writable {
            Ok(())
        } else {
            Err(NodeAttributesError::ReadOnly(self.path.clone()))
        }
    }
}
