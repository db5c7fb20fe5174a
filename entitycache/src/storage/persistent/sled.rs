// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Sled storage driver implementation

use super::traits::{StorageDriver, StorageTree};
use super::types::{StorageDriverError, StorageResult, StorageType};
use std::path::Path;

fn backend(e: sled::Error) -> StorageDriverError {
    StorageDriverError::BackendSpecific(e.to_string())
}

/// Sled driver implementation
pub struct SledDriver {
    db: sled::Db,
}

/// Sled tree wrapper that implements StorageTree trait
pub struct SledTree {
    tree: sled::Tree,
}

impl StorageTree for SledTree {
    fn insert(&self, key: &[u8], value: &[u8]) -> StorageResult<()> {
        self.tree.insert(key, value).map_err(backend)?;
        Ok(())
    }

    fn get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        self.tree
            .get(key)
            .map_err(backend)
            .map(|opt| opt.map(|v| v.to_vec()))
    }

    fn remove(&self, key: &[u8]) -> StorageResult<()> {
        self.tree.remove(key).map_err(backend)?;
        Ok(())
    }

    fn contains_key(&self, key: &[u8]) -> StorageResult<bool> {
        self.tree.contains_key(key).map_err(backend)
    }

    fn clear(&self) -> StorageResult<()> {
        self.tree.clear().map_err(backend)
    }

    fn len(&self) -> StorageResult<usize> {
        Ok(self.tree.len())
    }

    fn scan_prefix_keys(&self, prefix: &[u8]) -> StorageResult<Vec<Vec<u8>>> {
        self.tree
            .scan_prefix(prefix)
            .keys()
            .map(|result| result.map(|k| k.to_vec()).map_err(backend))
            .collect()
    }

    fn batch_get(&self, keys: &[&[u8]]) -> StorageResult<Vec<Option<Vec<u8>>>> {
        let mut results = Vec::with_capacity(keys.len());
        for key in keys {
            results.push(self.get(key)?);
        }
        Ok(results)
    }

    fn batch_insert(&self, entries: &[(&[u8], &[u8])]) -> StorageResult<()> {
        let mut batch = sled::Batch::default();
        for (key, value) in entries {
            batch.insert(*key, *value);
        }
        self.tree.apply_batch(batch).map_err(backend)
    }

    fn flush(&self) -> StorageResult<()> {
        self.tree.flush().map_err(backend)?;
        Ok(())
    }
}

impl StorageDriver for SledDriver {
    type Tree = Box<dyn StorageTree>;

    fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let db = sled::open(path).map_err(backend)?;
        Ok(SledDriver { db })
    }

    fn open_tree(&self, name: &str) -> StorageResult<Self::Tree> {
        let tree = self.db.open_tree(name).map_err(backend)?;
        Ok(Box::new(SledTree { tree }) as Box<dyn StorageTree>)
    }

    fn list_trees(&self) -> StorageResult<Vec<String>> {
        let tree_names = self
            .db
            .tree_names()
            .into_iter()
            .map(|name| String::from_utf8_lossy(&name).to_string())
            .collect();
        Ok(tree_names)
    }

    fn flush(&self) -> StorageResult<()> {
        self.db.flush().map_err(backend)?;
        Ok(())
    }

    fn storage_type(&self) -> StorageType {
        StorageType::Sled
    }
}
