// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Cache media: keyed byte stores with expiry
//!
//! A medium only stores opaque bytes under a string key. Envelope encoding
//! and descriptor handling live in the result cache mapper. A zero TTL
//! means the value never expires, as does a TTL whose deadline cannot be
//! represented.

use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::error::{MediumError, MediumResult};
use crate::storage::StorageTree;

/// Keyed get/set with expiry
pub trait CacheMedium: Send + Sync {
    /// Stored bytes, or `None` when absent or expired
    fn get(&self, key: &str) -> MediumResult<Option<Vec<u8>>>;

    /// Replace the value under `key`
    fn set(&self, key: &str, value: &[u8], ttl: Duration) -> MediumResult<()>;

    fn remove(&self, key: &str) -> MediumResult<()>;

    /// Disabled media accept every call and store nothing
    fn is_enabled(&self) -> bool {
        true
    }
}

#[derive(Debug)]
struct MemoryEntry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl MemoryEntry {
    fn is_expired(&self) -> bool {
        self.expires_at
            .map(|deadline| Instant::now() >= deadline)
            .unwrap_or(false)
    }
}

/// Process-local medium backed by a hash map
#[derive(Debug, Default)]
pub struct MemoryMedium {
    entries: RwLock<HashMap<String, MemoryEntry>>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included until purged
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop expired entries, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        before - entries.len()
    }
}

impl CacheMedium for MemoryMedium {
    fn get(&self, key: &str) -> MediumResult<Option<Vec<u8>>> {
        {
            let entries = self.entries.read();
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired() => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }

        // A fresh value may have been stored since the read lock was released
        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(MemoryEntry::is_expired) {
            entries.remove(key);
        }
        Ok(None)
    }

    fn set(&self, key: &str, value: &[u8], ttl: Duration) -> MediumResult<()> {
        let expires_at = if ttl.is_zero() {
            None
        } else {
            Instant::now().checked_add(ttl)
        };
        self.entries.write().insert(
            key.to_string(),
            MemoryEntry {
                value: value.to_vec(),
                expires_at,
            },
        );
        Ok(())
    }

    fn remove(&self, key: &str) -> MediumResult<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

/// Medium that never stores anything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullMedium;

impl CacheMedium for NullMedium {
    fn get(&self, _key: &str) -> MediumResult<Option<Vec<u8>>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &[u8], _ttl: Duration) -> MediumResult<()> {
        Ok(())
    }

    fn remove(&self, _key: &str) -> MediumResult<()> {
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

/// On-disk record layout of [`TreeMedium`]
#[derive(Debug, Serialize, Deserialize)]
struct TreeRecord {
    /// Milliseconds since the epoch, `None` for no expiry
    expires_at_ms: Option<i64>,
    payload: Vec<u8>,
    checksum: u32,
}

/// Medium persisted in a [`StorageTree`] (sled, memory, ...)
///
/// Each record carries a CRC32 of its payload; a record that fails the
/// check is reported as corrupted rather than returned.
pub struct TreeMedium<T: StorageTree> {
    tree: T,
}

impl<T: StorageTree> TreeMedium<T> {
    pub fn new(tree: T) -> Self {
        Self { tree }
    }

    /// Remove every record whose key starts with `prefix`
    pub fn purge_prefix(&self, prefix: &str) -> MediumResult<usize> {
        let keys = self.tree.scan_prefix_keys(prefix.as_bytes())?;
        for key in &keys {
            self.tree.remove(key)?;
        }
        Ok(keys.len())
    }
}

impl<T: StorageTree> CacheMedium for TreeMedium<T> {
    fn get(&self, key: &str) -> MediumResult<Option<Vec<u8>>> {
        let bytes = match self.tree.get(key.as_bytes())? {
            Some(bytes) => bytes,
            None => return Ok(None),
        };

        let record: TreeRecord = bincode::deserialize(&bytes)?;
        if crc32fast::hash(&record.payload) != record.checksum {
            return Err(MediumError::Corrupted(format!(
                "checksum mismatch for '{}'",
                key
            )));
        }

        if let Some(deadline) = record.expires_at_ms {
            if Utc::now().timestamp_millis() >= deadline {
                self.tree.remove(key.as_bytes())?;
                return Ok(None);
            }
        }

        Ok(Some(record.payload))
    }

    fn set(&self, key: &str, value: &[u8], ttl: Duration) -> MediumResult<()> {
        let expires_at_ms = if ttl.is_zero() {
            None
        } else {
            i64::try_from(ttl.as_millis())
                .ok()
                .and_then(|ms| Utc::now().timestamp_millis().checked_add(ms))
        };
        let record = TreeRecord {
            expires_at_ms,
            payload: value.to_vec(),
            checksum: crc32fast::hash(value),
        };
        self.tree
            .insert(key.as_bytes(), &bincode::serialize(&record)?)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> MediumResult<()> {
        self.tree.remove(key.as_bytes())?;
        Ok(())
    }
}
