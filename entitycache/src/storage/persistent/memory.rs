// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! In-memory storage driver implementation for testing

use super::traits::{StorageDriver, StorageTree};
use super::types::{StorageResult, StorageType};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// In-memory storage driver for testing
#[derive(Default)]
pub struct MemoryStorageDriver {
    trees: Arc<RwLock<HashMap<String, MemoryTree>>>,
}

/// In-memory tree implementation
///
/// Clones share the same underlying map, so a tree opened twice by name
/// observes its own writes.
#[derive(Clone, Default)]
pub struct MemoryTree {
    data: Arc<RwLock<HashMap<Vec<u8>, Vec<u8>>>>,
}

impl MemoryStorageDriver {
    /// Create a new memory storage driver
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryTree {
    /// Create a standalone tree that is not registered with any driver
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageTree for MemoryTree {
    fn insert(&self, key: &[u8], value: &[u8]) -> StorageResult<()> {
        self.data.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.data.read().get(key).cloned())
    }

    fn remove(&self, key: &[u8]) -> StorageResult<()> {
        self.data.write().remove(key);
        Ok(())
    }

    fn contains_key(&self, key: &[u8]) -> StorageResult<bool> {
        Ok(self.data.read().contains_key(key))
    }

    fn clear(&self) -> StorageResult<()> {
        self.data.write().clear();
        Ok(())
    }

    fn len(&self) -> StorageResult<usize> {
        Ok(self.data.read().len())
    }

    fn scan_prefix_keys(&self, prefix: &[u8]) -> StorageResult<Vec<Vec<u8>>> {
        let data = self.data.read();
        Ok(data
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn batch_get(&self, keys: &[&[u8]]) -> StorageResult<Vec<Option<Vec<u8>>>> {
        let data = self.data.read();
        let mut results = Vec::with_capacity(keys.len());
        for key in keys {
            results.push(data.get(*key).cloned());
        }
        Ok(results)
    }

    fn batch_insert(&self, entries: &[(&[u8], &[u8])]) -> StorageResult<()> {
        let mut data = self.data.write();
        for (key, value) in entries {
            data.insert(key.to_vec(), value.to_vec());
        }
        Ok(())
    }

    fn flush(&self) -> StorageResult<()> {
        // No-op for memory storage
        Ok(())
    }
}

impl StorageDriver for MemoryStorageDriver {
    type Tree = Box<dyn StorageTree>;

    fn open<P: AsRef<Path>>(_path: P) -> StorageResult<Self> {
        Ok(Self::new())
    }

    fn open_tree(&self, name: &str) -> StorageResult<Self::Tree> {
        let tree = self
            .trees
            .write()
            .entry(name.to_string())
            .or_default()
            .clone();
        Ok(Box::new(tree) as Box<dyn StorageTree>)
    }

    fn list_trees(&self) -> StorageResult<Vec<String>> {
        Ok(self.trees.read().keys().cloned().collect())
    }

    fn flush(&self) -> StorageResult<()> {
        Ok(())
    }

    fn storage_type(&self) -> StorageType {
        StorageType::Memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reopened_tree_shares_data() {
        let driver = MemoryStorageDriver::new();
        let first = driver.open_tree("rows").unwrap();
        first.insert(b"k", b"v").unwrap();

        let second = driver.open_tree("rows").unwrap();
        assert_eq!(second.get(b"k").unwrap(), Some(b"v".to_vec()));
        assert_eq!(driver.list_trees().unwrap(), vec!["rows".to_string()]);
    }

    #[test]
    fn test_scan_prefix_keys() {
        let tree = MemoryTree::new();
        tree.insert(b"a:1", b"x").unwrap();
        tree.insert(b"a:2", b"y").unwrap();
        tree.insert(b"b:1", b"z").unwrap();

        let mut keys = tree.scan_prefix_keys(b"a:").unwrap();
        keys.sort();
        assert_eq!(keys, vec![b"a:1".to_vec(), b"a:2".to_vec()]);
    }
}
