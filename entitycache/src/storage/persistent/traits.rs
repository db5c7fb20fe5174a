// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Storage driver traits
//!
//! Every key-value engine used for entity rows or persistent cache media
//! implements these two traits.

use super::types::{StorageResult, StorageType};
use std::path::Path;

/// Trait for a tree/column family in the storage driver
///
/// Represents a named collection of key-value pairs within a storage driver.
pub trait StorageTree: Send + Sync {
    /// Insert a key-value pair
    fn insert(&self, key: &[u8], value: &[u8]) -> StorageResult<()>;

    /// Get a value by key
    fn get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>>;

    /// Remove a key-value pair
    fn remove(&self, key: &[u8]) -> StorageResult<()>;

    /// Check if a key exists
    fn contains_key(&self, key: &[u8]) -> StorageResult<bool>;

    /// Clear all data in the tree
    fn clear(&self) -> StorageResult<()>;

    /// Number of entries in the tree
    fn len(&self) -> StorageResult<usize>;

    /// Check if the tree is empty
    fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Keys starting with `prefix`
    fn scan_prefix_keys(&self, prefix: &[u8]) -> StorageResult<Vec<Vec<u8>>>;

    /// Get multiple values by keys (batch get)
    fn batch_get(&self, keys: &[&[u8]]) -> StorageResult<Vec<Option<Vec<u8>>>>;

    /// Insert multiple key-value pairs (batch insert)
    fn batch_insert(&self, entries: &[(&[u8], &[u8])]) -> StorageResult<()>;

    /// Flush any pending writes to disk
    fn flush(&self) -> StorageResult<()>;
}

/// Main storage driver trait
pub trait StorageDriver: Send + Sync {
    /// Type of tree/column family used by this driver
    type Tree: StorageTree;

    /// Open or create a storage driver at the given path
    fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self>
    where
        Self: Sized;

    /// Open or create a named tree/column family
    fn open_tree(&self, name: &str) -> StorageResult<Self::Tree>;

    /// List all available trees/column families
    fn list_trees(&self) -> StorageResult<Vec<String>>;

    /// Flush all pending writes to disk
    fn flush(&self) -> StorageResult<()>;

    /// Get storage type
    fn storage_type(&self) -> StorageType;

    /// Explicitly close the storage driver and release any file locks
    fn shutdown(&mut self) -> StorageResult<()> {
        self.flush()
    }
}

// Lets boxed trees returned by the factory be used wherever a tree is expected
impl StorageTree for Box<dyn StorageTree> {
    fn insert(&self, key: &[u8], value: &[u8]) -> StorageResult<()> {
        (**self).insert(key, value)
    }

    fn get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn remove(&self, key: &[u8]) -> StorageResult<()> {
        (**self).remove(key)
    }

    fn contains_key(&self, key: &[u8]) -> StorageResult<bool> {
        (**self).contains_key(key)
    }

    fn clear(&self) -> StorageResult<()> {
        (**self).clear()
    }

    fn len(&self) -> StorageResult<usize> {
        (**self).len()
    }

    fn is_empty(&self) -> StorageResult<bool> {
        (**self).is_empty()
    }

    fn scan_prefix_keys(&self, prefix: &[u8]) -> StorageResult<Vec<Vec<u8>>> {
        (**self).scan_prefix_keys(prefix)
    }

    fn batch_get(&self, keys: &[&[u8]]) -> StorageResult<Vec<Option<Vec<u8>>>> {
        (**self).batch_get(keys)
    }

    fn batch_insert(&self, entries: &[(&[u8], &[u8])]) -> StorageResult<()> {
        (**self).batch_insert(entries)
    }

    fn flush(&self) -> StorageResult<()> {
        (**self).flush()
    }
}
