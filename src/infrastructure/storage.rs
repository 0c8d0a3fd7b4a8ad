//! Storage implementations for suppression state.
//!
//! Provides concurrent, sharded storage for the suppression registry.

use crate::application::ports::Storage;
use dashmap::DashMap;
use std::hash::Hash;

/// Thread-safe sharded storage backed by DashMap.
///
/// Each key lives in one shard, so a read-modify-write on one key is atomic
/// while unrelated keys proceed in parallel. Share it as
/// `Arc<ShardedStorage<_, _>>`.
#[derive(Debug)]
pub struct ShardedStorage<K, V>
where
    K: Eq + Hash + Clone,
{
    map: DashMap<K, V>,
}

impl<K, V> ShardedStorage<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create a new sharded storage instance.
    pub fn new() -> Self {
        Self {
            map: DashMap::new(),
        }
    }
}

impl<K, V> Default for ShardedStorage<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

// Implement the Storage port
impl<K, V> Storage<K, V> for ShardedStorage<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + std::fmt::Debug,
    V: Send + Sync + std::fmt::Debug,
{
    fn with_entry_mut<F, R>(&self, key: K, factory: impl FnOnce() -> V, accessor: F) -> R
    where
        F: FnOnce(&mut V) -> R,
    {
        let entry = self.map.entry(key);
        let mut value_ref = entry.or_insert_with(factory);
        accessor(&mut value_ref)
    }

    fn with_entry<F, R>(&self, key: &K, accessor: F) -> Option<R>
    where
        F: FnOnce(&V) -> R,
    {
        self.map.get(key).map(|value_ref| accessor(value_ref.value()))
    }

    fn remove_if<F>(&self, key: &K, predicate: F) -> Option<V>
    where
        F: FnOnce(&V) -> bool,
    {
        self.map
            .remove_if(key, |_, value| predicate(value))
            .map(|(_, value)| value)
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V),
    {
        for entry in self.map.iter() {
            f(entry.key(), entry.value());
        }
    }

    fn retain<F>(&self, f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        self.map.retain(f);
    }
}

// Implement Storage for Arc<ShardedStorage> to allow it to be used directly
impl<K, V> Storage<K, V> for std::sync::Arc<ShardedStorage<K, V>>
where
    K: Hash + Eq + Clone + Send + Sync + std::fmt::Debug,
    V: Send + Sync + std::fmt::Debug,
{
    fn with_entry_mut<F, R>(&self, key: K, factory: impl FnOnce() -> V, accessor: F) -> R
    where
        F: FnOnce(&mut V) -> R,
    {
        (**self).with_entry_mut(key, factory, accessor)
    }

    fn with_entry<F, R>(&self, key: &K, accessor: F) -> Option<R>
    where
        F: FnOnce(&V) -> R,
    {
        (**self).with_entry(key, accessor)
    }

    fn remove_if<F>(&self, key: &K, predicate: F) -> Option<V>
    where
        F: FnOnce(&V) -> bool,
    {
        (**self).remove_if(key, predicate)
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }

    fn for_each<F>(&self, f: F)
    where
        F: FnMut(&K, &V),
    {
        (**self).for_each(f)
    }

    fn retain<F>(&self, f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        (**self).retain(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_entry_created_once() {
        let storage: ShardedStorage<&str, u32> = ShardedStorage::new();

        let first = storage.with_entry_mut("key", || 1, |v| *v);
        let second = storage.with_entry_mut("key", || 99, |v| {
            *v += 1;
            *v
        });

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(Storage::len(&storage), 1);
    }

    #[test]
    fn test_with_entry_does_not_create() {
        let storage: ShardedStorage<&str, u32> = ShardedStorage::new();

        assert_eq!(storage.with_entry(&"missing", |v| *v), None);
        assert!(Storage::is_empty(&storage));

        storage.with_entry_mut("key", || 7, |_| ());
        assert_eq!(storage.with_entry(&"key", |v| *v), Some(7));
    }

    #[test]
    fn test_remove_if() {
        let storage: ShardedStorage<&str, u32> = ShardedStorage::new();
        storage.with_entry_mut("key", || 100, |_| ());

        assert_eq!(storage.remove_if(&"key", |v| *v == 1), None);
        assert_eq!(storage.with_entry(&"key", |v| *v), Some(100));

        assert_eq!(storage.remove_if(&"key", |v| *v == 100), Some(100));
        assert!(Storage::is_empty(&storage));

        assert_eq!(storage.remove_if(&"key", |_| true), None);
    }

    #[test]
    fn test_retain_and_for_each() {
        let storage: ShardedStorage<u32, u32> = ShardedStorage::new();
        for i in 0..10 {
            storage.with_entry_mut(i, || i * 10, |_| ());
        }

        storage.retain(|_, v| *v >= 50);

        let mut sum = 0;
        storage.for_each(|_, v| sum += *v);
        assert_eq!(sum, 50 + 60 + 70 + 80 + 90);
    }

    #[test]
    fn test_concurrent_access() {
        use std::thread;

        let storage: Arc<ShardedStorage<String, usize>> = Arc::new(ShardedStorage::new());
        let mut handles = vec![];

        for i in 0..10 {
            let storage_clone = Arc::clone(&storage);
            let handle = thread::spawn(move || {
                for j in 0..100 {
                    storage_clone.with_entry_mut(format!("key_{}_{}", i, j), || i * 100 + j, |_| ());
                }
            });
            handles.push(handle);
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(storage.len(), 1000);
    }
}
