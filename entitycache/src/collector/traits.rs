// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Collector strategy traits
//!
//! A collector supplies two things: the descriptor of its cache slot and a
//! computation producing an associative result set. Caching itself is done
//! by [`super::CachedCollector`]; strategies must not cache on their own.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use super::error::CollectorResult;
use super::options::RequestOptions;
use crate::cache::CacheDescriptor;

/// Result set a collector can compute and the cache can store
pub trait ResultSet: Serialize + DeserializeOwned + Clone {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> ResultSet for BTreeMap<K, V>
where
    K: Ord + Serialize + DeserializeOwned + Clone,
    V: Serialize + DeserializeOwned + Clone,
{
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }
}

impl<K, V, S> ResultSet for HashMap<K, V, S>
where
    K: Eq + Hash + Serialize + DeserializeOwned + Clone,
    V: Serialize + DeserializeOwned + Clone,
    S: BuildHasher + Default + Clone,
{
    fn len(&self) -> usize {
        HashMap::len(self)
    }
}

impl<T> ResultSet for Vec<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    fn len(&self) -> usize {
        Vec::len(self)
    }
}

/// A computation whose results are worth caching
///
/// Any backing-store handle the computation needs is passed to the
/// implementor's constructor, never looked up from ambient state.
pub trait ResultCollector {
    type Results: ResultSet;

    /// Descriptor of this collector's cache slot; must be stable for a
    /// given collector configuration
    fn cache_descriptor(&self) -> CacheDescriptor;

    /// Compute results from scratch
    fn collect(&self, options: Option<&RequestOptions>) -> CollectorResult<Self::Results>;
}
