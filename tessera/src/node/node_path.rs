use derive_more::Display;
use thiserror::Error;

use crate::storage::{StoreKey, StorePrefix};

use super::{NodeName, ATTRIBUTES_KEY, METADATA_KEY};

/// A hierarchy node path.
///
/// The root is `/`, every other path is `/`-separated node names starting with `/`, for example `/g1/a1`.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display)]
pub struct NodePath(String);

/// An invalid node path.
#[derive(Clone, Debug, Error)]
#[error("invalid node path {0}")]
pub struct NodePathError(String);

impl NodePath {
    /// Create a new node path from `path`.
    ///
    /// # Errors
    /// Returns [`NodePathError`] if `path` is not valid according to [`NodePath::validate`()].
    pub fn new(path: &str) -> Result<Self, NodePathError> {
        if Self::validate(path) {
            Ok(Self(path.to_string()))
        } else {
            Err(NodePathError(path.to_string()))
        }
    }

    /// The root node.
    #[must_use]
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Extracts a string slice containing the node path `String`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this is the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Validates a path:
    /// - a path always starts with `/`,
    /// - a non-root path cannot end with `/`,
    /// - no name between separators is invalid according to [`NodeName::validate`].
    #[must_use]
    pub fn validate(path: &str) -> bool {
        path == "/"
            || path
                .strip_prefix('/')
                .is_some_and(|names| names.split('/').all(NodeName::validate))
    }

    /// Returns the name of the node, or an empty string for the root.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.rsplit_once('/').map_or("", |(_, name)| name)
    }

    /// Returns the path of the parent node, or [`None`] for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        match self.0.rsplit_once('/') {
            Some(("", _)) | None => Some(Self::root()),
            Some((parent, _)) => Some(Self(parent.to_string())),
        }
    }

    /// Returns the path of the child node `name`.
    #[must_use]
    pub fn child(&self, name: &NodeName) -> Self {
        if self.is_root() {
            Self(format!("/{name}"))
        } else {
            Self(format!("{}/{name}", self.0))
        }
    }

    /// Returns the number of names in the path. The root has depth zero.
    #[must_use]
    pub fn depth(&self) -> usize {
        if self.is_root() {
            0
        } else {
            self.0.matches('/').count()
        }
    }

    /// Returns the store prefix holding the node and everything beneath it.
    ///
    /// # Errors
    /// Returns [`NodePathError`] if the path does not map to a valid store prefix.
    pub fn prefix(&self) -> Result<StorePrefix, NodePathError> {
        self.try_into()
    }

    /// Returns the key of the metadata document of the node.
    ///
    /// # Errors
    /// Returns [`NodePathError`] if the path does not map to a valid store key.
    pub fn meta_key(&self) -> Result<StoreKey, NodePathError> {
        self.key(METADATA_KEY)
    }

    /// Returns the key of the attributes document of the node.
    ///
    /// # Errors
    /// Returns [`NodePathError`] if the path does not map to a valid store key.
    pub fn attributes_key(&self) -> Result<StoreKey, NodePathError> {
        self.key(ATTRIBUTES_KEY)
    }

    /// Returns the key `name` relative to the node prefix.
    pub(crate) fn key(&self, name: &str) -> Result<StoreKey, NodePathError> {
        self.prefix()?
            .key(name)
            .map_err(|_| NodePathError(format!("{}/{name}", self.0)))
    }
}

impl TryFrom<&str> for NodePath {
    type Error = NodePathError;

    fn try_from(path: &str) -> Result<Self, Self::Error> {
        Self::new(path)
    }
}

impl TryFrom<&StorePrefix> for NodePath {
    type Error = NodePathError;

    fn try_from(prefix: &StorePrefix) -> Result<Self, Self::Error> {
        let path = prefix.as_str().strip_suffix('/').unwrap_or(prefix.as_str());
        Self::new(&format!("/{path}"))
    }
}

impl TryFrom<&NodePath> for StorePrefix {
    type Error = NodePathError;

    fn try_from(path: &NodePath) -> Result<Self, Self::Error> {
        if path.is_root() {
            Ok(Self::root())
        } else {
            let names = path.0.strip_prefix('/').unwrap_or(&path.0);
            Self::new(format!("{names}/")).map_err(|_| NodePathError(path.0.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_path() {
        assert!(NodePath::new("/").is_ok());
        assert!(NodePath::new("/a/b").is_ok());
        assert_eq!(NodePath::new("/a/b").unwrap().to_string(), "/a/b");
        assert!(NodePath::new("/a/b/").is_err());
        assert_eq!(
            NodePath::new("/a/b/").unwrap_err().to_string(),
            "invalid node path /a/b/"
        );
        assert!(NodePath::new("/a//b").is_err());
        assert!(NodePath::new("a/b").is_err());
        assert!(NodePath::new("/a/__b").is_err());
        assert!(NodePath::new("/a/..").is_err());
        assert!(NodePath::new("").is_err());
    }

    #[test]
    fn node_path_relations() {
        let path = NodePath::new("/g1/a1").unwrap();
        assert_eq!(path.name(), "a1");
        assert_eq!(path.depth(), 2);
        assert_eq!(path.parent(), Some(NodePath::new("/g1").unwrap()));
        assert_eq!(path.parent().unwrap().parent(), Some(NodePath::root()));
        assert_eq!(NodePath::root().parent(), None);
        assert_eq!(NodePath::root().name(), "");
        assert_eq!(NodePath::root().depth(), 0);

        let name = NodeName::new("b").unwrap();
        assert_eq!(NodePath::root().child(&name).as_str(), "/b");
        assert_eq!(path.child(&name).as_str(), "/g1/a1/b");
    }

    #[test]
    fn node_path_keys() {
        let root = NodePath::root();
        assert_eq!(root.prefix().unwrap(), StorePrefix::root());
        assert_eq!(root.meta_key().unwrap().as_str(), "zarr.json");
        assert_eq!(root.attributes_key().unwrap().as_str(), "attributes.json");

        let path = NodePath::new("/g1/a1").unwrap();
        assert_eq!(path.prefix().unwrap().as_str(), "g1/a1/");
        assert_eq!(path.meta_key().unwrap().as_str(), "g1/a1/zarr.json");
        assert_eq!(
            NodePath::try_from(&StorePrefix::new("g1/a1/").unwrap()).unwrap(),
            path
        );
        assert_eq!(
            NodePath::try_from(&StorePrefix::root()).unwrap(),
            NodePath::root()
        );
    }
}
