// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Named cache media shared by result cache mappers

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::cache_config::{ResultCacheConfig, DEFAULT_KEY_PREFIX};
use super::error::{MediumError, MediumResult};
use super::medium::CacheMedium;

/// Medium traffic statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MediumStats {
    pub hits: u64,
    pub misses: u64,
    pub writes: u64,
    pub failures: u64,
}

impl MediumStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Routes descriptor medium names to registered media
///
/// Slot keys have the form `{prefix}:{medium}:{id}`, so one physical medium
/// registered under two names keeps their slots apart.
pub struct CacheStore {
    media: RwLock<HashMap<String, Arc<dyn CacheMedium>>>,
    key_prefix: String,
    stats: Mutex<MediumStats>,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self {
            media: RwLock::new(HashMap::new()),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            stats: Mutex::new(MediumStats::default()),
        }
    }
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &ResultCacheConfig) -> Self {
        Self {
            key_prefix: config.key_prefix.clone(),
            ..Self::default()
        }
    }

    /// Builder form of [`CacheStore::register`]
    pub fn with_medium(self, name: impl Into<String>, medium: Arc<dyn CacheMedium>) -> Self {
        self.register(name, medium);
        self
    }

    /// Register `medium` under `name`, returning any medium it replaces
    pub fn register(
        &self,
        name: impl Into<String>,
        medium: Arc<dyn CacheMedium>,
    ) -> Option<Arc<dyn CacheMedium>> {
        self.media.write().insert(name.into(), medium)
    }

    pub fn has_medium(&self, name: &str) -> bool {
        self.media.read().contains_key(name)
    }

    pub fn medium(&self, name: &str) -> Option<Arc<dyn CacheMedium>> {
        self.media.read().get(name).cloned()
    }

    pub fn slot_key(&self, medium: &str, id: &str) -> String {
        format!("{}:{}:{}", self.key_prefix, medium, id)
    }

    /// Read a slot. Disabled media always miss and are left out of the
    /// statistics.
    pub fn get(&self, medium: &str, id: &str) -> MediumResult<Option<Vec<u8>>> {
        let result = match self.resolve(medium) {
            Ok(m) if !m.is_enabled() => return Ok(None),
            Ok(m) => m.get(&self.slot_key(medium, id)),
            Err(e) => Err(e),
        };

        let mut stats = self.stats.lock();
        match &result {
            Ok(Some(_)) => stats.hits += 1,
            Ok(None) => stats.misses += 1,
            Err(_) => {
                stats.misses += 1;
                stats.failures += 1;
            }
        }
        result
    }

    /// Write a slot; writes to disabled media are skipped
    pub fn set(&self, medium: &str, id: &str, value: &[u8], ttl: Duration) -> MediumResult<()> {
        let result = match self.resolve(medium) {
            Ok(m) if !m.is_enabled() => return Ok(()),
            Ok(m) => m.set(&self.slot_key(medium, id), value, ttl),
            Err(e) => Err(e),
        };

        let mut stats = self.stats.lock();
        match &result {
            Ok(()) => stats.writes += 1,
            Err(_) => stats.failures += 1,
        }
        result
    }

    pub fn remove(&self, medium: &str, id: &str) -> MediumResult<()> {
        self.resolve(medium)?.remove(&self.slot_key(medium, id))
    }

    pub fn stats(&self) -> MediumStats {
        self.stats.lock().clone()
    }

    fn resolve(&self, medium: &str) -> MediumResult<Arc<dyn CacheMedium>> {
        self.medium(medium)
            .ok_or_else(|| MediumError::UnknownMedium(medium.to_string()))
    }
}
