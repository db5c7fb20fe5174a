// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Collector result caching
//!
//! [`ResultCacheMapper`] reads and writes [`CachedEnvelope`]s for one
//! [`CacheDescriptor`]. Medium failures never surface: a failed read is a
//! miss and a failed write is dropped with a warning.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use super::descriptor::CacheDescriptor;
use super::envelope::{CachedEnvelope, Clock, SystemClock};
use super::store::CacheStore;

/// Fetch-or-miss and recache for a single descriptor
pub struct ResultCacheMapper {
    descriptor: CacheDescriptor,
    store: Arc<CacheStore>,
    clock: Arc<dyn Clock>,
    cache_date: Option<DateTime<Utc>>,
}

impl ResultCacheMapper {
    pub fn new(descriptor: CacheDescriptor, store: Arc<CacheStore>) -> Self {
        Self {
            descriptor,
            store,
            clock: Arc::new(SystemClock),
            cache_date: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn descriptor(&self) -> &CacheDescriptor {
        &self.descriptor
    }

    /// Previously stored envelope, or `None` on a miss.
    ///
    /// Disabled descriptors always miss. Expired, undecodable or unreachable
    /// entries count as misses too.
    pub fn fetch_from_cache<T: DeserializeOwned>(&mut self) -> Option<CachedEnvelope<T>> {
        self.cache_date = None;
        if !self.descriptor.enabled {
            return None;
        }

        let CacheDescriptor { id, medium, .. } = &self.descriptor;
        let bytes = match self.store.get(medium, id) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                log::debug!("Result cache miss for '{}' on '{}'", id, medium);
                return None;
            }
            Err(e) => {
                log::warn!("Result cache read for '{}' on '{}' failed: {}", id, medium, e);
                return None;
            }
        };

        match serde_json::from_slice::<CachedEnvelope<T>>(&bytes) {
            Ok(envelope) => {
                log::debug!(
                    "Result cache hit for '{}' on '{}' (stored {})",
                    id,
                    medium,
                    envelope.stored_at
                );
                self.cache_date = Some(envelope.stored_at);
                Some(envelope)
            }
            Err(e) => {
                log::warn!("Discarding undecodable cache entry for '{}': {}", id, e);
                None
            }
        }
    }

    /// Store `results` stamped with the current time, replacing any earlier
    /// entry. Returns the store time when the write went through.
    pub fn recache<T: Serialize>(&mut self, results: &T) -> Option<DateTime<Utc>> {
        if !self.descriptor.enabled {
            return None;
        }

        let CacheDescriptor {
            id,
            medium,
            expiry,
            ..
        } = &self.descriptor;
        let envelope = CachedEnvelope {
            results,
            stored_at: self.clock.now(),
        };

        let bytes = match serde_json::to_vec(&envelope) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("Could not encode results for '{}': {}", id, e);
                return None;
            }
        };

        match self.store.set(medium, id, &bytes, *expiry) {
            Ok(()) => {
                log::debug!("Stored results for '{}' on '{}'", id, medium);
                Some(envelope.stored_at)
            }
            Err(e) => {
                log::warn!("Result cache write for '{}' on '{}' dropped: {}", id, medium, e);
                None
            }
        }
    }

    /// Drop the stored entry for this descriptor
    pub fn invalidate(&mut self) {
        self.cache_date = None;
        let CacheDescriptor { id, medium, .. } = &self.descriptor;
        if let Err(e) = self.store.remove(medium, id) {
            log::warn!("Result cache invalidation for '{}' failed: {}", id, e);
        }
    }

    /// Store time of the last fetched envelope; `None` after a miss
    pub fn cache_date(&self) -> Option<DateTime<Utc>> {
        self.cache_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::envelope::FixedClock;
    use crate::cache::medium::{MemoryMedium, NullMedium};
    use chrono::TimeZone;
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn store() -> Arc<CacheStore> {
        Arc::new(
            CacheStore::new()
                .with_medium("mem", Arc::new(MemoryMedium::new()))
                .with_medium("off", Arc::new(NullMedium)),
        )
    }

    fn descriptor() -> CacheDescriptor {
        CacheDescriptor::new("Foo", "mem", true, Duration::from_secs(3600))
    }

    #[test]
    fn test_recache_then_fetch() {
        let stored_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut mapper =
            ResultCacheMapper::new(descriptor(), store()).with_clock(Arc::new(FixedClock(stored_at)));

        let results: BTreeMap<String, u32> = [("a".to_string(), 1), ("b".to_string(), 2)].into();
        assert!(mapper.fetch_from_cache::<BTreeMap<String, u32>>().is_none());
        assert_eq!(mapper.cache_date(), None);

        assert_eq!(mapper.recache(&results), Some(stored_at));

        let envelope = mapper.fetch_from_cache::<BTreeMap<String, u32>>().unwrap();
        assert_eq!(envelope.results, results);
        assert_eq!(envelope.stored_at, stored_at);
        assert_eq!(mapper.cache_date(), Some(stored_at));
    }

    #[test]
    fn test_disabled_descriptor_always_misses() {
        let store = store();
        let mut enabled = ResultCacheMapper::new(descriptor(), store.clone());
        enabled.recache(&vec![1, 2, 3]);

        let mut disabled = ResultCacheMapper::new(descriptor().disabled(), store);
        assert!(disabled.fetch_from_cache::<Vec<u32>>().is_none());
        assert_eq!(disabled.recache(&vec![4]), None);
        assert!(enabled.fetch_from_cache::<Vec<u32>>().is_some());
    }

    #[test]
    fn test_medium_failures_degrade_to_miss() {
        let descriptor = descriptor().with_medium("unregistered");
        let mut mapper = ResultCacheMapper::new(descriptor, store());

        assert_eq!(mapper.recache(&vec![1]), None);
        assert!(mapper.fetch_from_cache::<Vec<u32>>().is_none());
    }

    #[test]
    fn test_undecodable_entry_is_a_miss() {
        let store = store();
        let mut writer = ResultCacheMapper::new(descriptor(), store.clone());
        writer.recache(&"not a list");

        let mut reader = ResultCacheMapper::new(descriptor(), store);
        assert!(reader.fetch_from_cache::<Vec<u32>>().is_none());
        assert_eq!(reader.cache_date(), None);
    }

    #[test]
    fn test_null_medium_never_hits() {
        let mut mapper = ResultCacheMapper::new(descriptor().with_medium("off"), store());
        assert!(mapper.recache(&vec![1]).is_some());
        assert!(mapper.fetch_from_cache::<Vec<u32>>().is_none());
    }

    #[test]
    fn test_invalidate() {
        let mut mapper = ResultCacheMapper::new(descriptor(), store());
        mapper.recache(&vec![1]);
        mapper.invalidate();
        assert!(mapper.fetch_from_cache::<Vec<u32>>().is_none());
    }
}
