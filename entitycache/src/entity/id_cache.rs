// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Process-local entity identifier cache
//!
//! Maps [`EntityKey`]s to integer identifiers, remembering negative answers
//! as [`NO_ENTITY`]. The map is bounded: once an insertion pushes it past
//! `max_entries`, every entry is dropped at once. There is no recency
//! tracking and no partial eviction.

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::error::{StoreError, StoreResult};
use super::key::EntityKey;
use super::resolver::{EntityRow, IdResolver};
use crate::cache::cache_config::IdCacheConfig;

/// Integer identifier of an entity in the backing store
pub type EntityId = u64;

/// Identifier meaning "resolved: does not exist"
pub const NO_ENTITY: EntityId = 0;

/// Default entry threshold before the cache is bulk-cleared
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

/// Cached state of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachedId {
    /// Resolved to an existing entity
    Found(EntityId),
    /// Resolved, and known not to exist
    Missing,
    /// Never resolved in this session (or evicted since)
    Unresolved,
}

impl CachedId {
    fn from_raw(id: EntityId) -> Self {
        if id == NO_ENTITY {
            CachedId::Missing
        } else {
            CachedId::Found(id)
        }
    }

    /// Raw identifier, `Some(0)` for a negative entry, `None` if unresolved
    pub fn raw(self) -> Option<EntityId> {
        match self {
            CachedId::Found(id) => Some(id),
            CachedId::Missing => Some(NO_ENTITY),
            CachedId::Unresolved => None,
        }
    }

    pub fn is_resolved(self) -> bool {
        !matches!(self, CachedId::Unresolved)
    }
}

/// Identifier cache statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IdCacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Keys sent to the resolver
    pub lookups: u64,
    pub bulk_clears: u64,
    pub entries: usize,
}

impl IdCacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Default)]
struct CacheState {
    ids: HashMap<EntityKey, EntityId>,
    sort_keys: HashMap<EntityKey, String>,
    stats: IdCacheStats,
}

impl CacheState {
    fn install(
        &mut self,
        key: EntityKey,
        id: EntityId,
        sort_key: Option<String>,
        max_entries: usize,
    ) {
        match sort_key {
            Some(sort_key) => {
                self.sort_keys.insert(key.clone(), sort_key);
            }
            None => {
                self.sort_keys.remove(&key);
            }
        }
        self.ids.insert(key, id);

        if self.ids.len() > max_entries {
            log::debug!(
                "Identifier cache exceeded {} entries, clearing all {}",
                max_entries,
                self.ids.len()
            );
            self.ids.clear();
            self.sort_keys.clear();
            self.stats.bulk_clears += 1;
        }
    }

    fn remove(&mut self, key: &EntityKey) {
        self.ids.remove(key);
        self.sort_keys.remove(key);
    }

    fn clear(&mut self) {
        self.ids.clear();
        self.sort_keys.clear();
    }
}

/// Bounded cache in front of an [`IdResolver`]
///
/// All state sits behind one mutex, held across resolver calls so that
/// lookup, install and the size check happen atomically. Resolvers must not
/// call back into the cache that owns them.
pub struct IdCache {
    resolver: Arc<dyn IdResolver>,
    max_entries: usize,
    state: Mutex<CacheState>,
}

impl IdCache {
    pub fn new(resolver: Arc<dyn IdResolver>) -> Self {
        Self::with_max_entries(resolver, DEFAULT_MAX_ENTRIES)
    }

    pub fn with_config(resolver: Arc<dyn IdResolver>, config: &IdCacheConfig) -> Self {
        Self::with_max_entries(resolver, config.max_entries)
    }

    pub fn with_max_entries(resolver: Arc<dyn IdResolver>, max_entries: usize) -> Self {
        Self {
            resolver,
            max_entries,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Identifier for `key`, consulting the resolver only on a miss.
    ///
    /// Returns [`NO_ENTITY`] when the store has no matching row; that answer
    /// is cached too. Resolver errors propagate and leave the key unresolved.
    pub fn resolve(&self, key: &EntityKey) -> StoreResult<EntityId> {
        let mut state = self.state.lock();
        if let Some(&id) = state.ids.get(key) {
            state.stats.hits += 1;
            return Ok(id);
        }

        state.stats.misses += 1;
        state.stats.lookups += 1;
        let row = self.resolver.lookup(key)?;

        let (id, sort_key) = match row {
            Some(EntityRow { id, sort_key }) => (id, sort_key),
            None => (NO_ENTITY, None),
        };
        log::debug!("Resolved entity {} to id {}", key, id);
        state.install(key.clone(), id, sort_key, self.max_entries);
        Ok(id)
    }

    /// Cached state of `key` without consulting the resolver
    pub fn peek(&self, key: &EntityKey) -> CachedId {
        match self.state.lock().ids.get(key) {
            Some(&id) => CachedId::from_raw(id),
            None => CachedId::Unresolved,
        }
    }

    /// Cached sort key of `key`, if one was resolved or set
    pub fn sort_key(&self, key: &EntityKey) -> Option<String> {
        self.state.lock().sort_keys.get(key).cloned()
    }

    /// Install `id` for `key` unconditionally.
    ///
    /// A redirect key also marks its local companion (same label, namespace
    /// and sub-object, empty interwiki) as missing. No companion is written
    /// for any other interwiki value.
    pub fn set(&self, key: &EntityKey, id: EntityId) {
        self.set_entry(key, id, None);
    }

    /// Same as [`IdCache::set`], also caching the entity's sort key
    pub fn set_with_sort_key(&self, key: &EntityKey, id: EntityId, sort_key: impl Into<String>) {
        self.set_entry(key, id, Some(sort_key.into()));
    }

    fn set_entry(&self, key: &EntityKey, id: EntityId, sort_key: Option<String>) {
        let mut state = self.state.lock();
        state.install(key.clone(), id, sort_key, self.max_entries);
        if key.is_redirect() {
            state.install(key.local_companion(), NO_ENTITY, None, self.max_entries);
        }
    }

    /// Resolve every key that is not cached yet with a single batched
    /// resolver call. Returns the number of keys installed.
    pub fn warm_up(&self, keys: &[EntityKey]) -> StoreResult<usize> {
        let mut state = self.state.lock();

        let mut seen = HashSet::new();
        let pending: Vec<EntityKey> = keys
            .iter()
            .filter(|key| !state.ids.contains_key(*key) && seen.insert(*key))
            .cloned()
            .collect();
        if pending.is_empty() {
            return Ok(0);
        }

        state.stats.lookups += pending.len() as u64;
        let rows = self.resolver.lookup_many(&pending)?;
        if rows.len() != pending.len() {
            return Err(StoreError::BatchMismatch {
                expected: pending.len(),
                actual: rows.len(),
            });
        }

        let installed = pending.len();
        for (key, row) in pending.into_iter().zip(rows) {
            let (id, sort_key) = match row {
                Some(row) => (row.id, row.sort_key),
                None => (NO_ENTITY, None),
            };
            state.install(key, id, sort_key, self.max_entries);
        }
        log::debug!("Warmed identifier cache with {} keys", installed);
        Ok(installed)
    }

    /// Forget the entry for `key`
    pub fn invalidate(&self, key: &EntityKey) {
        self.state.lock().remove(key);
    }

    /// React to a page move.
    ///
    /// Sub-object entries of the moved page cannot be found without a label
    /// index, so the whole map is dropped regardless of the arguments.
    pub fn on_entity_moved(
        &self,
        old_label: &str,
        old_namespace: i32,
        new_label: &str,
        new_namespace: i32,
    ) {
        log::debug!(
            "Entity moved {}:{} -> {}:{}, clearing identifier cache",
            old_namespace,
            old_label,
            new_namespace,
            new_label
        );
        self.state.lock().clear();
    }

    pub fn clear(&self) {
        self.state.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.state.lock().ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> IdCacheStats {
        let state = self.state.lock();
        IdCacheStats {
            entries: state.ids.len(),
            ..state.stats.clone()
        }
    }

    pub fn reset_stats(&self) {
        self.state.lock().stats = IdCacheStats::default();
    }
}
