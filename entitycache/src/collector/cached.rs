// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Cache-aside runner for collectors
//!
//! Every [`CachedCollector::get_results`] call walks the same path:
//!
//! ```text
//! Idle -> Fetching -> Hit                       (served from cache)
//!                  -> Miss-Computing -> Stored  (computed and recached)
//! ```

use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::error::{CollectorError, CollectorResult};
use super::options::RequestOptions;
use super::traits::{ResultCollector, ResultSet};
use crate::cache::{CacheDescriptor, CacheStore, CachedEnvelope, Clock, ResultCacheMapper};

/// Outcome of one `get_results` run
#[derive(Debug, Clone, PartialEq)]
pub struct RunState<R> {
    results: R,
    is_cached: bool,
    cache_date: Option<DateTime<Utc>>,
}

impl<R: ResultSet> RunState<R> {
    fn hit(envelope: CachedEnvelope<R>) -> Self {
        Self {
            results: envelope.results,
            is_cached: true,
            cache_date: Some(envelope.stored_at),
        }
    }

    fn stored(results: R) -> Self {
        Self {
            results,
            is_cached: false,
            cache_date: None,
        }
    }

    pub fn results(&self) -> &R {
        &self.results
    }

    pub fn into_results(self) -> R {
        self.results
    }

    pub fn is_cached(&self) -> bool {
        self.is_cached
    }

    pub fn cache_date(&self) -> Option<DateTime<Utc>> {
        self.cache_date
    }

    pub fn count(&self) -> usize {
        self.results.len()
    }
}

/// Runs a [`ResultCollector`] behind its own cache slot
pub struct CachedCollector<C: ResultCollector> {
    collector: C,
    mapper: ResultCacheMapper,
    options: Option<RequestOptions>,
    last_run: Option<RunState<C::Results>>,
}

impl<C: ResultCollector> CachedCollector<C> {
    /// Wrap `collector`, reading and validating its descriptor once.
    ///
    /// An enabled descriptor must name a medium registered in `store`.
    pub fn new(collector: C, store: Arc<CacheStore>) -> CollectorResult<Self> {
        let descriptor = collector.cache_descriptor();
        descriptor
            .validate()
            .map_err(CollectorError::InvalidDescriptor)?;
        if descriptor.enabled && !store.has_medium(&descriptor.medium) {
            return Err(CollectorError::InvalidDescriptor(format!(
                "cache descriptor '{}' names unknown medium '{}'",
                descriptor.id, descriptor.medium
            )));
        }

        Ok(Self {
            collector,
            mapper: ResultCacheMapper::new(descriptor, store),
            options: None,
            last_run: None,
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.mapper = self.mapper.with_clock(clock);
        self
    }

    /// Constraints for the next computation; a cache hit ignores them
    pub fn set_request_options(&mut self, options: RequestOptions) {
        self.options = Some(options);
    }

    pub fn request_options(&self) -> Option<&RequestOptions> {
        self.options.as_ref()
    }

    /// Serve cached results or compute and store fresh ones.
    ///
    /// Computation errors propagate and leave the stored entry untouched.
    pub fn get_results(&mut self) -> CollectorResult<&RunState<C::Results>> {
        let state = match self.mapper.fetch_from_cache::<C::Results>() {
            Some(envelope) => RunState::hit(envelope),
            None => {
                let results = self.collector.collect(self.options.as_ref())?;
                self.mapper.recache(&results);
                RunState::stored(results)
            }
        };

        let state: &RunState<C::Results> = self.last_run.insert(state);
        Ok(state)
    }

    /// Results of the last completed run
    pub fn results(&self) -> Option<&C::Results> {
        self.last_run.as_ref().map(RunState::results)
    }

    pub fn is_cached(&self) -> bool {
        self.last_run.as_ref().is_some_and(RunState::is_cached)
    }

    pub fn cache_date(&self) -> Option<DateTime<Utc>> {
        self.last_run.as_ref().and_then(RunState::cache_date)
    }

    pub fn count(&self) -> usize {
        self.last_run.as_ref().map_or(0, RunState::count)
    }

    /// Drop the stored results so the next run recomputes
    pub fn invalidate_cache(&mut self) {
        self.mapper.invalidate();
    }

    pub fn descriptor(&self) -> &CacheDescriptor {
        self.mapper.descriptor()
    }

    pub fn collector(&self) -> &C {
        &self.collector
    }
}
