// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Cacheable result collectors
//!
//! Collectors (statistics, property listings, ...) implement
//! [`ResultCollector`]; wrapping one in a [`CachedCollector`] gives it
//! cache-aside behaviour keyed by its own [`crate::cache::CacheDescriptor`].

pub mod cached;
pub mod error;
pub mod options;
pub mod traits;

pub use cached::{CachedCollector, RunState};
pub use error::{CollectorError, CollectorResult};
pub use options::{ConditionKind, RequestOptions, StringCondition};
pub use traits::{ResultCollector, ResultSet};
