// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Result caching system
//!
//! This module provides:
//! - Cache descriptors naming a collector's result slot
//! - Cache media (in-memory, storage-tree backed, disabled)
//! - A store routing medium names to media
//! - The result cache mapper reading and writing timestamped envelopes
//! - A per-session manager owning the identifier cache and result store

pub mod cache_config;
pub mod cache_manager;
pub mod descriptor;
pub mod envelope;
pub mod error;
pub mod medium;
pub mod result_cache;
pub mod store;

pub use cache_config::{CacheConfig, IdCacheConfig, ResultCacheConfig};
pub use cache_manager::{CacheManager, GlobalCacheStats};
pub use descriptor::CacheDescriptor;
pub use envelope::{CachedEnvelope, Clock, FixedClock, SystemClock};
pub use error::{MediumError, MediumResult};
pub use medium::{CacheMedium, MemoryMedium, NullMedium, TreeMedium};
pub use result_cache::ResultCacheMapper;
pub use store::{CacheStore, MediumStats};
