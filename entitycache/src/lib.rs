// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! entitycache - identifier and result caching for a knowledge store
//!
//! Two caches sit in front of expensive work:
//!
//! - **Identifier cache**: translates composite entity keys (label,
//!   namespace, interwiki, sub-object) into integer identifiers, remembering
//!   negative answers and clearing itself wholesale once it grows past its
//!   bound.
//! - **Result cache**: a cache-aside protocol that lets any collector
//!   computation serve previously stored results and report whether, and
//!   since when, they came from the cache.
//!
//! # Usage
//!
//! ```ignore
//! use entitycache::{CacheConfig, CacheManager, EntityKey, TreeIdResolver};
//! use entitycache::storage::MemoryTree;
//!
//! let resolver = Arc::new(TreeIdResolver::new(MemoryTree::new()));
//! let manager = CacheManager::new(CacheConfig::default(), resolver)?;
//!
//! let id = manager.id_cache().resolve(&EntityKey::page("Berlin", 0))?;
//! let mut stats = manager.collector(MyStatisticsCollector::new(store))?;
//! let run = stats.get_results()?;
//! println!("{} rows, cached: {}", run.count(), run.is_cached());
//! ```

pub mod cache;
pub mod collector;
pub mod entity;
pub mod storage;

pub use cache::{
    CacheConfig, CacheDescriptor, CacheManager, CacheMedium, CacheStore, CachedEnvelope,
    ResultCacheMapper,
};
pub use collector::{
    CachedCollector, CollectorError, CollectorResult, RequestOptions, ResultCollector, ResultSet,
    RunState,
};
pub use entity::{
    CachedId, EntityId, EntityKey, EntityRow, IdCache, IdResolver, StoreError, StoreResult,
    TreeIdResolver, NO_ENTITY, REDIRECT_INTERWIKI,
};

/// entitycache version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// entitycache crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
