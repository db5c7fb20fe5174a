// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Entity identifier resolution
//!
//! This module provides:
//! - Composite entity keys (label, namespace, interwiki, sub-object)
//! - A bounded identifier cache with negative results
//! - Resolver traits for the slow backing store

pub mod error;
pub mod id_cache;
pub mod key;
pub mod resolver;

pub use error::{StoreError, StoreResult};
pub use id_cache::{CachedId, EntityId, IdCache, IdCacheStats, DEFAULT_MAX_ENTRIES, NO_ENTITY};
pub use key::{EntityKey, REDIRECT_INTERWIKI};
pub use resolver::{EntityRow, IdResolver, TreeIdResolver};
