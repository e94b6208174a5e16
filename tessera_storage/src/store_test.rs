use std::error::Error;

use itertools::Itertools;

use crate::{
    ListableStorageTraits, ReadableStorageTraits, StoreKey, StorePrefix, WritableStorageTraits,
};

#[allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]
/// Create a store with the following data
/// ```text
/// - a/
///   - b [0, 1, 2, 3]
///   - c [0]
///   - d/
///     - e
///   - f/
///     - g
///     - h
/// - i/
///   - j/
///     - k [0, 1]
/// ```
pub fn store_write<T: WritableStorageTraits>(store: &T) -> Result<(), Box<dyn Error>> {
    store.erase_prefix(&StorePrefix::root())?;

    store.set(&"a/b".try_into()?, vec![255, 255, 255].into())?;
    store.set(&"a/b".try_into()?, vec![0, 1, 2, 3].into())?;

    store.set(&"a/c".try_into()?, vec![0].into())?;
    store.set(&"a/d/e".try_into()?, vec![].into())?;
    store.set(&"a/f/g".try_into()?, vec![].into())?;
    store.set(&"a/f/h".try_into()?, vec![].into())?;
    store.set(&"i/j/k".try_into()?, vec![0, 1].into())?;

    store.set(&"erase".try_into()?, vec![].into())?;
    store.erase(&"erase".try_into()?)?;
    store.erase(&"erase".try_into()?)?; // succeeds

    store.set(&"erase_values_0".try_into()?, vec![].into())?;
    store.set(&"erase_values_1".try_into()?, vec![].into())?;
    store.erase_values(&["erase_values_0".try_into()?, "erase_values_1".try_into()?])?;

    store.set(&"erase_prefix/0".try_into()?, vec![].into())?;
    store.set(&"erase_prefix/1/2".try_into()?, vec![].into())?;
    store.erase_prefix(&"erase_prefix/".try_into()?)?;
    store.erase_prefix(&"erase_prefix/".try_into()?)?; // succeeds

    Ok(())
}

#[allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]
/// Read from the store and check the data matches the expected values after [`store_write`].
pub fn store_read<T: ReadableStorageTraits>(store: &T) -> Result<(), Box<dyn Error>> {
    assert!(store.get(&"notfound".try_into()?)?.is_none());
    assert!(store.size_key(&"notfound".try_into()?)?.is_none());
    assert!(!store.exists(&"notfound".try_into()?)?);
    assert!(!store.exists(&"erase".try_into()?)?);
    assert!(store.exists(&"a/d/e".try_into()?)?);
    assert_eq!(
        store.get(&"a/b".try_into()?)?,
        Some(vec![0, 1, 2, 3].into())
    );
    assert_eq!(store.get(&"a/d/e".try_into()?)?, Some(vec![].into()));
    assert_eq!(store.size_key(&"a/b".try_into()?)?, Some(4));
    assert_eq!(store.size_key(&"a/c".try_into()?)?, Some(1));
    assert_eq!(store.size_key(&"i/j/k".try_into()?)?, Some(2));
    Ok(())
}

fn sorted_keys(keys: &[StoreKey]) -> Vec<&str> {
    keys.iter().map(StoreKey::as_str).sorted().collect()
}

#[allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]
/// List the store and check the data matches the expected values after [`store_write`].
///
/// Listings are compared irrespective of order.
pub fn store_list<T: ListableStorageTraits>(store: &T) -> Result<(), Box<dyn Error>> {
    assert_eq!(store.size()?, 7);
    assert_eq!(store.size_prefix(&"a/".try_into()?)?, 5);
    assert_eq!(store.size_prefix(&"i/".try_into()?)?, 2);
    assert_eq!(store.size_prefix(&"notfound/".try_into()?)?, 0);

    let all = ["a/b", "a/c", "a/d/e", "a/f/g", "a/f/h", "i/j/k"];
    assert_eq!(sorted_keys(&store.list()?), all);
    assert_eq!(sorted_keys(&store.list_prefix(&"".try_into()?)?), all);
    assert_eq!(
        sorted_keys(&store.list_prefix(&"a/".try_into()?)?),
        ["a/b", "a/c", "a/d/e", "a/f/g", "a/f/h"]
    );
    assert_eq!(sorted_keys(&store.list_prefix(&"i/".try_into()?)?), ["i/j/k"]);
    assert!(store.list_prefix(&"notfound/".try_into()?)?.is_empty());

    {
        let list_dir = store.list_dir(&"a/".try_into()?)?;
        assert_eq!(sorted_keys(list_dir.keys()), ["a/b", "a/c"]);
        let prefixes: Vec<&str> = list_dir
            .prefixes()
            .iter()
            .map(StorePrefix::as_str)
            .sorted()
            .collect();
        assert_eq!(prefixes, ["a/d/", "a/f/"]);
    }
    {
        let list_dir = store.list_dir(&StorePrefix::root())?;
        assert!(list_dir.keys().is_empty());
        let prefixes: Vec<&str> = list_dir
            .prefixes()
            .iter()
            .map(StorePrefix::as_str)
            .sorted()
            .collect();
        assert_eq!(prefixes, ["a/", "i/"]);
    }
    {
        let list_dir = store.list_dir(&"notfound/".try_into()?)?;
        assert!(list_dir.keys().is_empty());
        assert!(list_dir.prefixes().is_empty());
    }
    Ok(())
}

#[allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]
/// Check compare-and-set semantics for a store which supports it.
pub fn store_compare_and_set<T: ReadableStorageTraits + WritableStorageTraits>(
    store: &T,
) -> Result<(), Box<dyn Error>> {
    assert!(store.supports_compare_and_set());
    let key: StoreKey = "cas/value".try_into()?;
    store.erase(&key)?;

    // create only if absent
    assert!(store.compare_and_set(&key, None, Some(vec![1].into()))?);
    assert!(!store.compare_and_set(&key, None, Some(vec![2].into()))?);
    assert_eq!(store.get(&key)?, Some(vec![1].into()));

    // replace only if unchanged
    assert!(!store.compare_and_set(&key, Some(&[0]), Some(vec![3].into()))?);
    assert!(store.compare_and_set(&key, Some(&[1]), Some(vec![3].into()))?);
    assert_eq!(store.get(&key)?, Some(vec![3].into()));

    // erase only if unchanged
    assert!(!store.compare_and_set(&key, Some(&[1]), None)?);
    assert!(store.compare_and_set(&key, Some(&[3]), None)?);
    assert!(store.get(&key)?.is_none());
    Ok(())
}
