// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Backing store resolvers for entity identifiers
//!
//! The identifier cache never talks to storage directly. It asks an
//! [`IdResolver`] for rows on a miss; [`TreeIdResolver`] is the default
//! implementation on top of any [`StorageTree`].

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::{StoreError, StoreResult};
use super::id_cache::{EntityId, NO_ENTITY};
use super::key::EntityKey;
use crate::storage::StorageTree;

/// A resolved backing-store row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRow {
    pub id: EntityId,
    pub sort_key: Option<String>,
}

impl EntityRow {
    pub fn new(id: EntityId) -> Self {
        Self { id, sort_key: None }
    }

    pub fn with_sort_key(mut self, sort_key: impl Into<String>) -> Self {
        self.sort_key = Some(sort_key.into());
        self
    }
}

/// Slow lookup consulted by the identifier cache on a miss
///
/// `Ok(None)` means the store answered and no row exists. Errors mean the
/// store could not answer; nothing gets cached for them.
pub trait IdResolver: Send + Sync {
    /// Look up the row matching all four key fields
    fn lookup(&self, key: &EntityKey) -> StoreResult<Option<EntityRow>>;

    /// Look up several keys at once; answers are positional
    fn lookup_many(&self, keys: &[EntityKey]) -> StoreResult<Vec<Option<EntityRow>>> {
        keys.iter().map(|key| self.lookup(key)).collect()
    }
}

impl<R: IdResolver + ?Sized> IdResolver for Arc<R> {
    fn lookup(&self, key: &EntityKey) -> StoreResult<Option<EntityRow>> {
        (**self).lookup(key)
    }

    fn lookup_many(&self, keys: &[EntityKey]) -> StoreResult<Vec<Option<EntityRow>>> {
        (**self).lookup_many(keys)
    }
}

/// Resolver reading bincode-encoded [`EntityRow`]s from a storage tree
pub struct TreeIdResolver<T: StorageTree> {
    tree: T,
}

impl<T: StorageTree> TreeIdResolver<T> {
    pub fn new(tree: T) -> Self {
        Self { tree }
    }

    /// Write or replace the row for `key`
    pub fn insert_row(&self, key: &EntityKey, row: &EntityRow) -> StoreResult<()> {
        Self::check_row(key, row)?;
        let value = bincode::serialize(row)?;
        self.tree.insert(&key.encode(), &value)?;
        Ok(())
    }

    /// Write several rows in one batch
    pub fn insert_rows(&self, rows: &[(EntityKey, EntityRow)]) -> StoreResult<()> {
        let mut encoded = Vec::with_capacity(rows.len());
        for (key, row) in rows {
            Self::check_row(key, row)?;
            encoded.push((key.encode(), bincode::serialize(row)?));
        }
        let entries: Vec<(&[u8], &[u8])> = encoded
            .iter()
            .map(|(k, v)| (k.as_slice(), v.as_slice()))
            .collect();
        self.tree.batch_insert(&entries)?;
        Ok(())
    }

    /// Delete the row for `key`. Cached identifiers are not touched; callers
    /// must invalidate the identifier cache themselves.
    pub fn remove_row(&self, key: &EntityKey) -> StoreResult<()> {
        self.tree.remove(&key.encode())?;
        Ok(())
    }

    pub fn tree(&self) -> &T {
        &self.tree
    }

    fn check_row(key: &EntityKey, row: &EntityRow) -> StoreResult<()> {
        if row.id == NO_ENTITY {
            return Err(StoreError::InvalidRow {
                key: key.to_string(),
                reason: "identifier 0 is reserved for missing entities".to_string(),
            });
        }
        Ok(())
    }

    fn decode(key: &EntityKey, bytes: &[u8]) -> StoreResult<EntityRow> {
        bincode::deserialize(bytes).map_err(|e| StoreError::CorruptedRow {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }
}

impl<T: StorageTree> IdResolver for TreeIdResolver<T> {
    fn lookup(&self, key: &EntityKey) -> StoreResult<Option<EntityRow>> {
        match self.tree.get(&key.encode())? {
            Some(bytes) => Self::decode(key, &bytes).map(Some),
            None => Ok(None),
        }
    }

    fn lookup_many(&self, keys: &[EntityKey]) -> StoreResult<Vec<Option<EntityRow>>> {
        let encoded: Vec<Vec<u8>> = keys.iter().map(EntityKey::encode).collect();
        let refs: Vec<&[u8]> = encoded.iter().map(Vec::as_slice).collect();
        let values = self.tree.batch_get(&refs)?;

        keys.iter()
            .zip(values)
            .map(|(key, value)| match value {
                Some(bytes) => Self::decode(key, &bytes).map(Some),
                None => Ok(None),
            })
            .collect()
    }
}
