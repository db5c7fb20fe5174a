// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Central cache management and coordination
//!
//! One [`CacheManager`] per store session owns the identifier cache and the
//! result cache store, both built from a validated [`CacheConfig`].

use std::sync::Arc;

use super::{
    medium::MemoryMedium, CacheConfig, CacheDescriptor, CacheMedium, CacheStore, MediumStats,
};
use crate::collector::{CachedCollector, CollectorResult, ResultCollector};
use crate::entity::{IdCache, IdCacheStats, IdResolver};

/// Statistics across both caches
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GlobalCacheStats {
    pub identifiers: IdCacheStats,
    pub results: MediumStats,
}

impl GlobalCacheStats {
    pub fn overall_hit_rate(&self) -> f64 {
        let hits = self.identifiers.hits + self.results.hits;
        let total = hits + self.identifiers.misses + self.results.misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }
}

/// Session-scoped owner of the identifier cache and result store
pub struct CacheManager {
    config: CacheConfig,
    id_cache: Arc<IdCache>,
    store: Arc<CacheStore>,
}

impl CacheManager {
    /// Create a manager; the configured default medium is registered as an
    /// in-memory medium
    pub fn new(config: CacheConfig, resolver: Arc<dyn IdResolver>) -> Result<Self, String> {
        config.validate()?;

        let store = CacheStore::with_config(&config.result_cache).with_medium(
            config.result_cache.default_medium.clone(),
            Arc::new(MemoryMedium::new()),
        );
        let id_cache = IdCache::with_config(resolver, &config.id_cache);

        log::debug!(
            "Cache manager ready (id cache limit {}, default medium '{}')",
            config.id_cache.max_entries,
            config.result_cache.default_medium
        );

        Ok(Self {
            config,
            id_cache: Arc::new(id_cache),
            store: Arc::new(store),
        })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn id_cache(&self) -> &Arc<IdCache> {
        &self.id_cache
    }

    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }

    /// Register an additional medium, replacing any with the same name
    pub fn register_medium(&self, name: impl Into<String>, medium: Arc<dyn CacheMedium>) {
        self.store.register(name, medium);
    }

    /// Descriptor with this manager's default medium, expiry and switch
    pub fn descriptor(&self, id: impl Into<String>) -> CacheDescriptor {
        CacheDescriptor::from_config(id, &self.config.result_cache)
    }

    /// Wrap `collector` so it caches through this manager's store
    pub fn collector<C: ResultCollector>(&self, collector: C) -> CollectorResult<CachedCollector<C>> {
        CachedCollector::new(collector, self.store.clone())
    }

    /// Forward a page move to the identifier cache
    pub fn on_entity_moved(
        &self,
        old_label: &str,
        old_namespace: i32,
        new_label: &str,
        new_namespace: i32,
    ) {
        self.id_cache
            .on_entity_moved(old_label, old_namespace, new_label, new_namespace);
    }

    pub fn stats(&self) -> GlobalCacheStats {
        GlobalCacheStats {
            identifiers: self.id_cache.stats(),
            results: self.store.stats(),
        }
    }
}
