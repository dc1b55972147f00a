use crate::error::KVStoreError;
use crate::ports::outbound::{BatchOperation, KeyValueStore, ScanResult};
use std::collections::HashMap;

/// In-memory key-value store.
///
/// Backs unit tests and the default node runtime. Batches are applied
/// while the caller holds exclusive access, so they are all-or-nothing.
#[derive(Default)]
pub struct InMemoryKVStore {
    data: HashMap<Vec<u8>, Vec<u8>>,
}

impl InMemoryKVStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl KeyValueStore for InMemoryKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.data.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.data.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
        self.data.remove(key);
        Ok(())
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        for op in operations {
            match op {
                BatchOperation::Put { key, value } => {
                    self.data.insert(key, value);
                }
                BatchOperation::Delete { key } => {
                    self.data.remove(&key);
                }
            }
        }
        Ok(())
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        Ok(self.data.contains_key(key))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError> {
        let results: Vec<_> = self
            .data
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_kv_store() {
        let mut store = InMemoryKVStore::new();

        store.put(b"miner:a", b"1").unwrap();
        store.put(b"miner:b", b"2").unwrap();

        assert_eq!(store.get(b"miner:a").unwrap(), Some(b"1".to_vec()));
        assert_eq!(store.get(b"miner:c").unwrap(), None);
        assert!(store.exists(b"miner:b").unwrap());

        store.delete(b"miner:a").unwrap();
        assert!(!store.exists(b"miner:a").unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_batch_write_applies_all() {
        let mut store = InMemoryKVStore::new();
        store.put(b"stale", b"x").unwrap();

        store
            .atomic_batch_write(vec![
                BatchOperation::put(b"checkpoint:200".to_vec(), b"cp".to_vec()),
                BatchOperation::put(b"checkpoint:pending".to_vec(), b"200".to_vec()),
                BatchOperation::delete(b"stale".to_vec()),
            ])
            .unwrap();

        assert!(store.exists(b"checkpoint:200").unwrap());
        assert!(store.exists(b"checkpoint:pending").unwrap());
        assert!(!store.exists(b"stale").unwrap());
    }

    #[test]
    fn test_prefix_scan() {
        let mut store = InMemoryKVStore::new();
        store.put(b"miner:a", b"1").unwrap();
        store.put(b"miner:b", b"2").unwrap();
        store.put(b"miners:count", b"2").unwrap();

        let hits = store.prefix_scan(b"miner:").unwrap();
        assert_eq!(hits.len(), 2);
    }
}
