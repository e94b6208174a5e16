#![allow(missing_docs)]

use std::error::Error;
use std::sync::Arc;

use serde_json::json;
use tessera::array::{Array, ArrayBuilder, ArrayError, ArraySubset, DataType, OpenMode};
use tessera::group::{Group, GroupError};
use tessera::hierarchy::Hierarchy;
use tessera::metadata::Attributes;
use tessera::node::{NodeKind, NodeName};
use tessera::storage::store::MemoryStore;
use tessera::storage::{
    Bytes, ListableStorageTraits, ReadableStorageTraits, StoreKey, StorePrefix,
    WritableStorageTraits,
};

fn names(children: &[(NodeName, NodeKind)]) -> Vec<(&str, NodeKind)> {
    children
        .iter()
        .map(|(name, kind)| (name.as_str(), *kind))
        .collect()
}

fn stored_chunk_bytes(
    store: &MemoryStore,
    array: &Array<MemoryStore>,
) -> Result<Vec<(StoreKey, Option<Bytes>)>, Box<dyn Error>> {
    let mut chunks = Vec::new();
    for (key, _) in array.stored_chunks()? {
        let bytes = store.get(&key)?;
        chunks.push((key, bytes));
    }
    Ok(chunks)
}

#[test]
fn group_hierarchy() -> Result<(), Box<dyn Error>> {
    let store = Arc::new(MemoryStore::new());
    let root = Group::create(store.clone(), "/", false)?;
    let g1 = root.create_group("g1")?;
    let a1 = g1.create_array(
        "a1",
        &ArrayBuilder::new(vec![10, 10], vec![5, 5], DataType::float32(), 0.0f32),
    )?;
    a1.store_array_subset_elements(&ArraySubset::new_with_ranges(&[0..1, 0..1]), &[1.0f32])?;

    assert_eq!(names(&root.list_children()?), vec![("g1", NodeKind::Group)]);
    assert_eq!(names(&g1.list_children()?), vec![("a1", NodeKind::Array)]);

    let opened = Group::open(store.clone(), "/g1", OpenMode::ReadOnly)?;
    let a1 = opened.open_array("a1")?;
    assert_eq!(a1.mode(), OpenMode::ReadOnly);
    assert_eq!(
        a1.retrieve_array_subset_elements::<f32>(&ArraySubset::new_with_ranges(&[0..1, 0..2]))?,
        vec![1.0, 0.0]
    );

    // Deleting a group removes everything below it
    assert!(root.delete_child("g1")?);
    assert!(root.list_children()?.is_empty());
    assert!(store.list_prefix(&StorePrefix::new("g1/")?)?.is_empty());
    assert!(matches!(
        root.open_group("g1"),
        Err(GroupError::NotFound(_))
    ));
    assert!(!root.delete_child("g1")?);
    Ok(())
}

#[test]
fn group_delete() -> Result<(), Box<dyn Error>> {
    let store = Arc::new(MemoryStore::new());
    let root = Group::create(store.clone(), "/", false)?;
    let g1 = root.create_group("g1")?;
    g1.attrs().set("answer", 42)?;
    let g2 = g1.create_group("g2")?;
    g2.create_array(
        "a",
        &ArrayBuilder::new(vec![2], vec![2], DataType::uint8(), 0u64),
    )?;
    root.create_group("g10")?;

    g1.delete()?;
    assert_eq!(names(&root.list_children()?), vec![("g10", NodeKind::Group)]);
    assert_eq!(
        store.list()?,
        vec![StoreKey::new("g10/zarr.json")?, StoreKey::new("zarr.json")?]
    );

    root.delete()?;
    assert!(store.list()?.is_empty());
    Ok(())
}

#[test]
fn group_duplicate_name() -> Result<(), Box<dyn Error>> {
    let store = Arc::new(MemoryStore::new());
    let root = Group::create(store.clone(), "/", false)?;
    let builder = ArrayBuilder::new(vec![2], vec![2], DataType::uint8(), 0u64);
    root.create_group("a")?;
    root.create_array("b", &builder)?;

    assert!(matches!(
        root.create_group("a"),
        Err(GroupError::DuplicateName(name)) if name.as_str() == "a"
    ));
    assert!(matches!(
        root.create_array("a", &builder),
        Err(GroupError::DuplicateName(_))
    ));
    assert!(matches!(
        root.create_group("b"),
        Err(GroupError::DuplicateName(_))
    ));
    assert!(matches!(
        root.create_group("a/b"),
        Err(GroupError::NodeNameError(_))
    ));
    assert!(matches!(
        root.create_group("__reserved"),
        Err(GroupError::NodeNameError(_))
    ));
    assert_eq!(
        names(&root.list_children()?),
        vec![("a", NodeKind::Group), ("b", NodeKind::Array)]
    );
    Ok(())
}

#[test]
fn group_create_and_open() -> Result<(), Box<dyn Error>> {
    let store = Arc::new(MemoryStore::new());
    let root = Group::create(store.clone(), "/", false)?;
    root.create_array(
        "array",
        &ArrayBuilder::new(vec![2], vec![2], DataType::uint8(), 0u64),
    )?;

    assert!(matches!(
        Group::create(store.clone(), "/", false),
        Err(GroupError::AlreadyExists(_))
    ));
    assert!(matches!(
        Group::open(store.clone(), "/array", OpenMode::ReadOnly),
        Err(GroupError::NotAGroup(_))
    ));
    assert!(matches!(
        root.open_array("missing"),
        Err(GroupError::ArrayError(ArrayError::NotFound(_)))
    ));

    // Overwriting the root erases the hierarchy below it
    let root = Group::create(store.clone(), "/", true)?;
    assert!(root.list_children()?.is_empty());
    assert_eq!(store.list()?, vec![StoreKey::new("zarr.json")?]);
    Ok(())
}

#[test]
fn group_read_only() -> Result<(), Box<dyn Error>> {
    let store = Arc::new(MemoryStore::new());
    Group::create(store.clone(), "/", false)?.create_group("child")?;

    let root = Group::open(store.clone(), "/", OpenMode::ReadOnly)?;
    assert!(matches!(root.create_group("other"), Err(GroupError::ReadOnly(_))));
    assert!(matches!(root.delete_child("child"), Err(GroupError::ReadOnly(_))));
    assert!(root.attrs().set("key", "value").is_err());
    assert_eq!(root.open_group("child")?.mode(), OpenMode::ReadOnly);
    assert!(matches!(root.delete(), Err(GroupError::ReadOnly(_))));
    assert_eq!(store.list()?.len(), 2);
    Ok(())
}

#[test]
fn group_attributes() -> Result<(), Box<dyn Error>> {
    let store = Arc::new(MemoryStore::new());
    let root = Group::create(store.clone(), "/", false)?;
    let attrs = root.attrs();
    assert!(attrs.list()?.is_empty());
    assert_eq!(attrs.get("units")?, None);

    assert_eq!(attrs.set("units", "m")?, None);
    assert_eq!(attrs.set("scale", json!([1.0, 2.5]))?, None);
    assert_eq!(attrs.set("units", "km")?, Some(json!("m")));
    assert_eq!(attrs.get("units")?, Some(json!("km")));
    assert_eq!(attrs.list()?, vec!["units".to_string(), "scale".to_string()]);

    assert_eq!(attrs.delete("units")?, Some(json!("km")));
    assert_eq!(attrs.delete("units")?, None);
    assert_eq!(
        Group::open(store.clone(), "/", OpenMode::ReadOnly)?.attributes_map()?,
        serde_json::from_value::<Attributes>(json!({"scale": [1.0, 2.5]}))?
    );

    attrs.delete("scale")?;
    assert!(!store.exists(&StoreKey::new("attributes.json")?)?);
    Ok(())
}

#[test]
fn group_attribute_isolation() -> Result<(), Box<dyn Error>> {
    let store = Arc::new(MemoryStore::new());
    let root = Group::create(store.clone(), "/", false)?;
    let array = root.create_array(
        "array",
        &ArrayBuilder::new(vec![4], vec![2], DataType::int32(), 0),
    )?;
    array.store_array_subset_elements(&ArraySubset::new_with_shape(vec![4]), &[1i32, 2, 3, 4])?;

    let metadata_key = StoreKey::new("array/zarr.json")?;
    let metadata = store.get(&metadata_key)?;
    let chunks = stored_chunk_bytes(&store, &array)?;
    assert_eq!(chunks.len(), 2);

    // Group attribute updates leave the child array untouched
    root.attrs().set("title", "survey")?;
    root.attrs().set("version", 2)?;
    root.attrs().delete("version")?;
    assert_eq!(store.get(&metadata_key)?, metadata);
    assert_eq!(stored_chunk_bytes(&store, &array)?, chunks);
    assert!(array.attrs().list()?.is_empty());

    // Array attribute updates leave its structural metadata and chunks untouched
    array.attrs().set("description", "temperature")?;
    array.attrs().set("valid_range", json!([-50, 50]))?;
    array.attrs().delete("valid_range")?;
    assert_eq!(store.get(&metadata_key)?, metadata);
    assert_eq!(stored_chunk_bytes(&store, &array)?, chunks);

    let reopened = root.open_array("array")?;
    assert_eq!(reopened.metadata(), array.metadata());
    assert_eq!(
        reopened.retrieve_array_subset_elements::<i32>(&ArraySubset::new_with_shape(vec![4]))?,
        vec![1, 2, 3, 4]
    );
    assert_eq!(reopened.attrs().get("description")?, Some(json!("temperature")));
    assert_eq!(root.attrs().list()?, vec!["title".to_string()]);
    Ok(())
}

#[test]
fn group_invalid_attributes() -> Result<(), Box<dyn Error>> {
    let store = Arc::new(MemoryStore::new());
    let root = Group::create(store.clone(), "/", false)?;
    store.set(
        &StoreKey::new("attributes.json")?,
        Bytes::from_static(b"[1, 2]"),
    )?;
    assert!(matches!(
        root.attributes_map(),
        Err(GroupError::AttributesError(_))
    ));
    Ok(())
}

#[test]
fn group_unrecognised_children() -> Result<(), Box<dyn Error>> {
    testing_logger::setup();
    let store = Arc::new(MemoryStore::new());
    let root = Group::create(store.clone(), "/", false)?;
    root.create_group("group")?;
    store.set(&StoreKey::new("stray/data")?, Bytes::from_static(b"x"))?;
    store.set(&StoreKey::new("__internal/data")?, Bytes::from_static(b"x"))?;

    assert_eq!(names(&root.list_children()?), vec![("group", NodeKind::Group)]);
    testing_logger::validate(|captured_logs| {
        assert_eq!(captured_logs.len(), 1);
        assert!(captured_logs[0].body.contains("stray"));
        assert_eq!(captured_logs[0].level, log::Level::Warn);
    });
    Ok(())
}

#[test]
fn group_create_array_with_data() -> Result<(), Box<dyn Error>> {
    let store = Arc::new(MemoryStore::new());
    let root = Group::create(store.clone(), "/", false)?;
    let array = root.create_array_with_data(
        "array",
        &ArrayBuilder::new(vec![2, 3], vec![2, 2], DataType::uint8(), 0u64),
        &[1, 2, 3, 4, 5, 6],
    )?;
    assert_eq!(array.stored_chunks()?.len(), 2);

    let hierarchy = Hierarchy::open(&store, "/")?;
    assert_eq!(hierarchy.tree(), "/\n  array [2, 3] |u1\n");
    assert!(matches!(
        root.create_array_with_data(
            "other",
            &ArrayBuilder::new(vec![2, 3], vec![2, 2], DataType::uint8(), 0u64),
            &[1, 2, 3],
        ),
        Err(GroupError::ArrayError(ArrayError::ShapeMismatch { .. }))
    ));
    Ok(())
}
