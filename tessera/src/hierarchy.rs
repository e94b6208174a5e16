//! Hierarchies.
//!
//! A [`Hierarchy`] holds the [`NodeMetadata`] of a node and every node below it, keyed by [`NodePath`].
//!
//! The [`Hierarchy::tree`] function can be used to create a string representation of the hierarchy.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::Arc;

pub use crate::node::{get_all_nodes_of, Node, NodeCreateError, NodePath, NodePathError};

pub use crate::metadata::NodeMetadata;

use crate::array::Array;
use crate::group::{Group, GroupError};
use crate::storage::{ListableStorageTraits, ReadableStorageTraits};

/// A hierarchy of groups and arrays.
#[derive(Clone, Debug, Default)]
pub struct Hierarchy(BTreeMap<NodePath, NodeMetadata>);

impl Hierarchy {
    fn insert_node(&mut self, node: &Node) {
        self.0.insert(node.path().clone(), node.metadata().clone());
    }

    fn insert_nodes<'a>(&mut self, nodes: impl Iterator<Item = &'a Node>) {
        for node in nodes {
            self.insert_node(node);
        }
    }

    /// Return the number of nodes in the hierarchy.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the hierarchy has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the metadata of the node at `path`, if it is in the hierarchy.
    #[must_use]
    pub fn get(&self, path: &NodePath) -> Option<&NodeMetadata> {
        self.0.get(path)
    }

    /// Iterate over the nodes of the hierarchy in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&NodePath, &NodeMetadata)> {
        self.0.iter()
    }

    /// Create a string representation of the hierarchy.
    #[must_use]
    pub fn tree(&self) -> String {
        self.tree_of(&NodePath::root())
    }

    /// Create a string representation of the hierarchy below `parent_path`.
    ///
    /// Each node is printed on its own line, indented by two spaces per level below `parent_path`.
    /// Arrays are followed by their shape and data type.
    #[must_use]
    pub fn tree_of(&self, parent_path: &NodePath) -> String {
        let mut s = String::from(parent_path.as_str());
        s.push('\n');

        let parent_depth = parent_path.depth();
        for (path, metadata) in self
            .0
            .iter()
            .filter(|(path, _)| path.depth() > parent_depth && is_descendant(parent_path, path))
        {
            let depth = path.depth() - parent_depth;
            s.push_str(&" ".repeat(depth * 2));
            match metadata {
                NodeMetadata::Array(array_metadata) => s.push_str(&format!(
                    "{} {:?} {}",
                    path.name(),
                    array_metadata.shape,
                    array_metadata.data_type
                )),
                NodeMetadata::Group(_) => s.push_str(path.name()),
            }
            s.push('\n');
        }
        s
    }

    /// Open a hierarchy at `path` and read metadata and children from `storage`.
    ///
    /// # Errors
    /// Returns [`NodeCreateError`] if there is no node at `path`, metadata is invalid or there is a failure to list child nodes.
    pub fn open<TStorage: ?Sized + ReadableStorageTraits + ListableStorageTraits>(
        storage: &Arc<TStorage>,
        path: &str,
    ) -> Result<Self, NodeCreateError> {
        let node = Node::open(storage, path)?;
        let mut hierarchy = Self::default();
        hierarchy.insert_node(&node);
        let nodes = match node.metadata() {
            NodeMetadata::Array(_) => Vec::default(),
            NodeMetadata::Group(_) => get_all_nodes_of(storage, node.path())?,
        };
        hierarchy.insert_nodes(nodes.iter());
        Ok(hierarchy)
    }
}

fn is_descendant(parent: &NodePath, path: &NodePath) -> bool {
    parent.is_root()
        || path
            .as_str()
            .strip_prefix(parent.as_str())
            .is_some_and(|rest| rest.starts_with('/'))
}

impl Display for Hierarchy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let root = self.0.keys().next().cloned().unwrap_or_else(NodePath::root);
        write!(f, "{}", self.tree_of(&root))
    }
}

impl<TStorage: ?Sized> TryFrom<&Group<TStorage>> for Hierarchy
where
    TStorage: ReadableStorageTraits + ListableStorageTraits,
{
    type Error = GroupError;

    fn try_from(group: &Group<TStorage>) -> Result<Self, Self::Error> {
        let mut hierarchy = Self::default();
        hierarchy.insert_node(&Node::new_with_metadata(
            group.path().clone(),
            NodeMetadata::Group(group.metadata().clone()),
            vec![],
        ));
        hierarchy.insert_nodes(group.traverse()?.iter());
        Ok(hierarchy)
    }
}

impl<TStorage: ?Sized> From<&Array<TStorage>> for Hierarchy {
    fn from(array: &Array<TStorage>) -> Self {
        let mut hierarchy = Self::default();
        hierarchy.insert_node(&Node::new_with_metadata(
            array.path().clone(),
            NodeMetadata::Array(array.metadata().clone()),
            vec![],
        ));
        hierarchy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::{ArrayBuilder, DataType};
    use crate::storage::{store::MemoryStore, StoreKey, WritableStorageTraits};

    const EXPECTED_TREE: &str = concat!(
        "/\n",
        "  array [10, 10] <f4\n",
        "  group\n",
        "    array [10, 10] <f4\n",
        "    subgroup\n",
        "      mysubarray [10, 10] <f4\n",
        "  group2\n",
    );

    fn helper_create_dataset(store: &Arc<MemoryStore>) -> Group<MemoryStore> {
        let root = Group::create(store.clone(), "/", false).unwrap();
        let array_builder =
            ArrayBuilder::new(vec![10, 10], vec![5, 5], DataType::float32(), 0.0f32);
        root.create_array("array", &array_builder).unwrap();
        let group = root.create_group("group").unwrap();
        group.create_array("array", &array_builder).unwrap();
        let subgroup = group.create_group("subgroup").unwrap();
        subgroup.create_array("mysubarray", &array_builder).unwrap();
        root.create_group("group2").unwrap();
        root
    }

    #[test]
    fn hierarchy_tree() {
        let store = Arc::new(MemoryStore::new());
        let root = helper_create_dataset(&store);
        let hierarchy = Hierarchy::open(&store, "/").unwrap();
        assert_eq!(hierarchy.len(), 7);
        assert_eq!(hierarchy.tree(), EXPECTED_TREE);
        assert_eq!(hierarchy.to_string(), EXPECTED_TREE);

        let hierarchy = Hierarchy::try_from(&root).unwrap();
        assert_eq!(hierarchy.tree(), EXPECTED_TREE);
    }

    #[test]
    fn hierarchy_tree_of() {
        let store = Arc::new(MemoryStore::new());
        helper_create_dataset(&store);
        let hierarchy = Hierarchy::open(&store, "/group").unwrap();
        assert_eq!(
            hierarchy.to_string(),
            "/group\n  array [10, 10] <f4\n  subgroup\n    mysubarray [10, 10] <f4\n"
        );
        let array = Array::open(store.clone(), "/array", crate::array::OpenMode::ReadOnly).unwrap();
        assert_eq!(Hierarchy::from(&array).to_string(), "/array\n");
    }

    #[test]
    fn hierarchy_try_from_invalid_metadata() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(&StoreKey::new("zarr.json").unwrap(), vec![0].into())
            .unwrap();
        assert!(matches!(
            Hierarchy::open(&store, "/"),
            Err(NodeCreateError::InvalidMetadata(_, _))
        ));
    }
}
