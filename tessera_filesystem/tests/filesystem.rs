#![allow(missing_docs)]

use std::error::Error;

use tessera_filesystem::FilesystemStore;
use tessera_storage::{
    ListableStorageTraits, ReadableStorageTraits, StoreKey, StorePrefix, WritableStorageTraits,
};

#[test]
#[cfg_attr(miri, ignore)]
fn filesystem() -> Result<(), Box<dyn Error>> {
    let path = tempfile::TempDir::new()?;
    let store = FilesystemStore::new(path.path())?.sorted();
    tessera_storage::store_test::store_write(&store)?;
    tessera_storage::store_test::store_read(&store)?;
    tessera_storage::store_test::store_list(&store)?;
    tessera_storage::store_test::store_compare_and_set(&store)?;
    Ok(())
}

#[test]
#[cfg_attr(miri, ignore)]
fn filesystem_reopen() -> Result<(), Box<dyn Error>> {
    let path = tempfile::TempDir::new()?;
    {
        let store = FilesystemStore::new(path.path())?;
        store.set(&"a/b/c".try_into()?, vec![1, 2, 3].into())?;
    }
    let store = FilesystemStore::new(path.path())?;
    assert_eq!(store.get(&"a/b/c".try_into()?)?, Some(vec![1, 2, 3].into()));
    assert!(path.path().join("a").join("b").join("c").is_file());
    Ok(())
}

#[test]
#[cfg_attr(miri, ignore)]
fn filesystem_erase_root_keeps_base_directory() -> Result<(), Box<dyn Error>> {
    let path = tempfile::TempDir::new()?;
    let store = FilesystemStore::new(path.path())?;
    store.set(&"a/b".try_into()?, vec![0].into())?;
    store.set(&"c".try_into()?, vec![0].into())?;
    store.erase_prefix(&StorePrefix::root())?;
    assert!(path.path().is_dir());
    assert!(store.list()?.is_empty());
    store.set(&"c".try_into()?, vec![1].into())?;
    assert_eq!(store.list()?, vec![StoreKey::new("c")?]);
    Ok(())
}

#[test]
#[cfg_attr(miri, ignore)]
fn filesystem_base_path_is_file() -> Result<(), Box<dyn Error>> {
    let file = tempfile::NamedTempFile::new()?;
    assert!(FilesystemStore::new(file.path()).is_err());
    Ok(())
}

#[test]
#[cfg_attr(miri, ignore)]
fn filesystem_concurrent_set_get() -> Result<(), Box<dyn Error>> {
    let path = tempfile::TempDir::new()?;
    let store = FilesystemStore::new(path.path())?;
    let key: StoreKey = "chunk".try_into()?;
    let a = vec![1u8; 1 << 16];
    let b = vec![2u8; 1 << 16];
    store.set(&key, a.clone().into())?;
    std::thread::scope(|scope| {
        scope.spawn(|| {
            for _ in 0..32 {
                store.set(&key, b.clone().into()).unwrap();
                store.set(&key, a.clone().into()).unwrap();
            }
        });
        for _ in 0..32 {
            let value = store.get(&key).unwrap().unwrap();
            assert!(value == a || value == b, "observed a partially written value");
        }
    });
    Ok(())
}
