//! Shared fixture for identifier cache and collector tests

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use entitycache::cache::{CacheStore, FixedClock, MemoryMedium};
use entitycache::collector::CollectorError;
use entitycache::entity::StoreError;
use entitycache::storage::MemoryTree;
use entitycache::{
    CacheDescriptor, CollectorResult, EntityKey, EntityRow, IdCache, IdResolver, RequestOptions,
    ResultCollector, StoreResult, TreeIdResolver,
};

/// Initialise logging once per test binary
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Tree-backed resolver that counts queries and can be switched off
pub struct CountingResolver {
    inner: TreeIdResolver<MemoryTree>,
    queries: AtomicUsize,
    down: AtomicBool,
}

impl CountingResolver {
    pub fn new() -> Self {
        Self {
            inner: TreeIdResolver::new(MemoryTree::new()),
            queries: AtomicUsize::new(0),
            down: AtomicBool::new(false),
        }
    }

    pub fn with_row(self, key: &EntityKey, id: u64) -> Self {
        self.inner
            .insert_row(key, &EntityRow::new(id))
            .expect("Failed to insert row");
        self
    }

    pub fn insert(&self, key: &EntityKey, row: EntityRow) {
        self.inner.insert_row(key, &row).expect("Failed to insert row");
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    fn check_up(&self) -> StoreResult<()> {
        if self.down.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("store is down".to_string()))
        } else {
            Ok(())
        }
    }
}

impl IdResolver for CountingResolver {
    fn lookup(&self, key: &EntityKey) -> StoreResult<Option<EntityRow>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.check_up()?;
        self.inner.lookup(key)
    }

    fn lookup_many(&self, keys: &[EntityKey]) -> StoreResult<Vec<Option<EntityRow>>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.check_up()?;
        self.inner.lookup_many(keys)
    }
}

/// Collector returning a fixed property table and counting its runs
pub struct PropertyCollector {
    pub descriptor: CacheDescriptor,
    pub table: BTreeMap<String, u64>,
    pub runs: Arc<AtomicUsize>,
    failing: AtomicBool,
}

impl PropertyCollector {
    pub fn new(descriptor: CacheDescriptor, table: &[(&str, u64)]) -> Self {
        Self {
            descriptor,
            table: table.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            runs: Arc::new(AtomicUsize::new(0)),
            failing: AtomicBool::new(false),
        }
    }

    /// Make subsequent computations fail
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

impl ResultCollector for PropertyCollector {
    type Results = BTreeMap<String, u64>;

    fn cache_descriptor(&self) -> CacheDescriptor {
        self.descriptor.clone()
    }

    fn collect(&self, options: Option<&RequestOptions>) -> CollectorResult<Self::Results> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(CollectorError::Computation("backend timed out".to_string()));
        }
        let Some(options) = options else {
            return Ok(self.table.clone());
        };
        let matching = self.table.iter().filter(|(k, _)| options.matches(k));
        Ok(options
            .window(matching)
            .map(|(k, v)| (k.clone(), *v))
            .collect())
    }
}

/// Identifier cache and result store over in-memory backends
pub struct TestFixture {
    pub resolver: Arc<CountingResolver>,
    pub id_cache: IdCache,
    pub store: Arc<CacheStore>,
    pub clock: Arc<FixedClock>,
}

impl TestFixture {
    pub fn new() -> Self {
        Self::with_resolver(CountingResolver::new())
    }

    pub fn with_resolver(resolver: CountingResolver) -> Self {
        init_logging();
        let resolver = Arc::new(resolver);
        let store = CacheStore::new().with_medium("mem", Arc::new(MemoryMedium::new()));
        Self {
            id_cache: IdCache::new(resolver.clone()),
            resolver,
            store: Arc::new(store),
            clock: Arc::new(FixedClock(Self::stored_at())),
        }
    }

    /// Time every fixture clock reports
    pub fn stored_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    pub fn descriptor(id: &str) -> CacheDescriptor {
        CacheDescriptor::new(id, "mem", true, Duration::from_secs(3600))
    }
}
