use std::sync::Arc;

use crate::storage::{discover_children, ListableStorageTraits, ReadableStorageTraits};

use super::{
    retrieve_metadata, Node, NodeCreateError, NodeMetadata, NodePath, StorageResultExt,
    StoreOperation,
};

/// Get the child nodes of the node at `path`, sorted by path.
///
/// Child prefixes without a metadata document are skipped with a warning.
/// If `recursive` is true, the children of child groups are also retrieved.
///
/// # Errors
/// Returns a [`NodeCreateError`] if there is an underlying error with the store or child metadata is invalid.
pub fn get_child_nodes<TStorage: ?Sized + ReadableStorageTraits + ListableStorageTraits>(
    storage: &Arc<TStorage>,
    path: &NodePath,
    recursive: bool,
) -> Result<Vec<Node>, NodeCreateError> {
    let prefix = path.prefix()?;
    let mut prefixes =
        discover_children(&**storage, &prefix).with_store_context(StoreOperation::List, &prefix)?;
    prefixes.sort();
    let mut nodes: Vec<Node> = Vec::with_capacity(prefixes.len());
    for prefix in &prefixes {
        let path: NodePath = prefix.try_into()?;
        let Some(child_metadata) = retrieve_metadata(&**storage, &path)? else {
            log::warn!("Object at {path} is not recognized as a component of a hierarchy. Ignoring.");
            continue;
        };
        let children = match child_metadata {
            NodeMetadata::Group(_) if recursive => get_child_nodes(storage, &path, true)?,
            NodeMetadata::Array(_) | NodeMetadata::Group(_) => vec![],
        };
        nodes.push(Node::new_with_metadata(path, child_metadata, children));
    }
    Ok(nodes)
}

/// Recursively get all nodes under `path`, excluding the node at `path`.
///
/// # Errors
/// Returns a [`NodeCreateError`] if there is an underlying error with the store or metadata is invalid.
pub fn get_all_nodes_of<TStorage: ?Sized + ReadableStorageTraits + ListableStorageTraits>(
    storage: &Arc<TStorage>,
    path: &NodePath,
) -> Result<Vec<Node>, NodeCreateError> {
    let mut nodes: Vec<Node> = Vec::new();
    for child in get_child_nodes(storage, path, false)? {
        if let NodeMetadata::Group(_) = child.metadata() {
            nodes.extend(get_all_nodes_of(storage, child.path())?);
        }
        nodes.push(child);
    }
    Ok(nodes)
}

/// Check if a node exists.
///
/// # Errors
/// Returns a [`NodeCreateError`] if there is an underlying error with the store.
pub fn node_exists<TStorage: ?Sized + ReadableStorageTraits>(
    storage: &Arc<TStorage>,
    path: &NodePath,
) -> Result<bool, NodeCreateError> {
    let key = path.meta_key()?;
    storage
        .exists(&key)
        .with_store_context(StoreOperation::Get, &key)
        .map_err(NodeCreateError::from)
}

#[cfg(test)]
mod tests {
    use crate::storage::{store::MemoryStore, StoreKey, WritableStorageTraits};
    use crate::node::NodeKind;

    use super::*;

    #[test]
    fn warning_get_child_nodes() {
        testing_logger::setup();
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                &StoreKey::new("zarr.json").unwrap(),
                br#"{"node_type":"group"}"#.to_vec().into(),
            )
            .unwrap();
        store
            .set(
                &StoreKey::new("group/zarr.json").unwrap(),
                br#"{"node_type":"group"}"#.to_vec().into(),
            )
            .unwrap();
        store
            .set(&StoreKey::new("stray/file").unwrap(), vec![0].into())
            .unwrap();
        store
            .set(&StoreKey::new("__reserved/file").unwrap(), vec![0].into())
            .unwrap();

        let nodes = get_child_nodes(&store, &NodePath::root(), true).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].path().as_str(), "/group");
        assert_eq!(nodes[0].kind(), NodeKind::Group);

        testing_logger::validate(|captured_logs| {
            assert_eq!(captured_logs.len(), 1);
            assert!(
                captured_logs[0]
                    .body
                    .contains("Object at /stray is not recognized as a component of a hierarchy. Ignoring.")
            );
            assert_eq!(captured_logs[0].level, log::Level::Warn);
        });
    }

    #[test]
    fn node_exists_and_invalid_metadata() {
        let store = Arc::new(MemoryStore::new());
        let path = NodePath::new("/a").unwrap();
        assert!(!node_exists(&store, &path).unwrap());
        store
            .set(&path.meta_key().unwrap(), b"{not json".to_vec().into())
            .unwrap();
        assert!(node_exists(&store, &path).unwrap());
        assert!(matches!(
            Node::open(&store, "/a"),
            Err(NodeCreateError::InvalidMetadata(_, _))
        ));
        assert!(matches!(
            Node::open(&store, "/b"),
            Err(NodeCreateError::MissingMetadata(_))
        ));
    }
}
