//! Identifier cache behaviour against a counting backing store
//!
//! Covers negative caching, the bulk clear past the entry limit, redirect
//! companions and page moves.

#[path = "testutils/mod.rs"]
mod testutils;

use entitycache::entity::{CachedId, IdCacheStats, DEFAULT_MAX_ENTRIES};
use entitycache::{EntityKey, EntityRow, IdCache, StoreError, NO_ENTITY, REDIRECT_INTERWIKI};
use testutils::test_fixture::{CountingResolver, TestFixture};

#[test]
fn test_resolve_hits_store_once_per_key() {
    let berlin = EntityKey::page("Berlin", 0);
    let fixture = TestFixture::with_resolver(CountingResolver::new().with_row(&berlin, 42));

    assert_eq!(fixture.id_cache.resolve(&berlin).unwrap(), 42);
    assert_eq!(fixture.id_cache.resolve(&berlin).unwrap(), 42);
    assert_eq!(fixture.resolver.queries(), 1);
    assert_eq!(fixture.id_cache.peek(&berlin), CachedId::Found(42));
}

#[test]
fn test_missing_entity_is_cached_as_zero() {
    let fixture = TestFixture::new();
    let nowhere = EntityKey::page("Nowhere", 0);

    assert_eq!(fixture.id_cache.resolve(&nowhere).unwrap(), NO_ENTITY);
    assert_eq!(fixture.id_cache.peek(&nowhere), CachedId::Missing);

    // The row shows up later, but the negative answer stays cached
    fixture.resolver.insert(&nowhere, EntityRow::new(7));
    assert_eq!(fixture.id_cache.resolve(&nowhere).unwrap(), NO_ENTITY);
    assert_eq!(fixture.resolver.queries(), 1);

    fixture.id_cache.invalidate(&nowhere);
    assert_eq!(fixture.id_cache.resolve(&nowhere).unwrap(), 7);
}

#[test]
fn test_all_four_fields_distinguish_keys() {
    let page = EntityKey::page("Berlin", 0);
    let talk = EntityKey::page("Berlin", 1);
    let sub = EntityKey::page("Berlin", 0).with_subobject("_QUERY1");
    let remote = EntityKey::page("Berlin", 0).with_interwiki("en");

    let resolver = CountingResolver::new()
        .with_row(&page, 1)
        .with_row(&talk, 2)
        .with_row(&sub, 3)
        .with_row(&remote, 4);
    let fixture = TestFixture::with_resolver(resolver);

    assert_eq!(fixture.id_cache.resolve(&page).unwrap(), 1);
    assert_eq!(fixture.id_cache.resolve(&talk).unwrap(), 2);
    assert_eq!(fixture.id_cache.resolve(&sub).unwrap(), 3);
    assert_eq!(fixture.id_cache.resolve(&remote).unwrap(), 4);
    assert_eq!(fixture.id_cache.len(), 4);
}

#[test]
fn test_store_failure_is_not_cached() {
    let berlin = EntityKey::page("Berlin", 0);
    let fixture = TestFixture::with_resolver(CountingResolver::new().with_row(&berlin, 42));

    fixture.resolver.set_down(true);
    assert!(matches!(
        fixture.id_cache.resolve(&berlin),
        Err(StoreError::Unavailable(_))
    ));
    assert_eq!(fixture.id_cache.peek(&berlin), CachedId::Unresolved);

    fixture.resolver.set_down(false);
    assert_eq!(fixture.id_cache.resolve(&berlin).unwrap(), 42);
}

#[test]
fn test_bulk_clear_after_limit_is_exceeded() {
    let fixture = TestFixture::new();

    for i in 0..DEFAULT_MAX_ENTRIES {
        fixture
            .id_cache
            .set(&EntityKey::page(format!("Page {}", i), 0), i as u64 + 1);
    }
    assert_eq!(fixture.id_cache.len(), DEFAULT_MAX_ENTRIES);

    // The 1001st distinct key pushes the map over the limit
    fixture.id_cache.set(&EntityKey::page("One too many", 0), 5000);
    assert_eq!(fixture.id_cache.len(), 0);
    assert_eq!(fixture.id_cache.stats().bulk_clears, 1);

    // Previously cached keys go back to the store
    assert_eq!(
        fixture.id_cache.resolve(&EntityKey::page("Page 0", 0)).unwrap(),
        NO_ENTITY
    );
    assert_eq!(fixture.resolver.queries(), 1);
}

#[test]
fn test_redirect_set_writes_local_companion() {
    let fixture = TestFixture::new();
    let redirect = EntityKey::page("Old name", 0).with_interwiki(REDIRECT_INTERWIKI);
    let local = EntityKey::page("Old name", 0);

    fixture.id_cache.set(&redirect, 99);

    assert_eq!(fixture.id_cache.peek(&redirect), CachedId::Found(99));
    assert_eq!(fixture.id_cache.peek(&local), CachedId::Missing);
    assert_eq!(fixture.id_cache.resolve(&local).unwrap(), NO_ENTITY);
    assert_eq!(fixture.resolver.queries(), 0);
}

#[test]
fn test_other_interwiki_has_no_companion() {
    let fixture = TestFixture::new();
    let remote = EntityKey::page("Berlin", 0).with_interwiki("de");

    fixture.id_cache.set(&remote, 11);

    assert_eq!(fixture.id_cache.len(), 1);
    assert_eq!(
        fixture.id_cache.peek(&EntityKey::page("Berlin", 0)),
        CachedId::Unresolved
    );
}

#[test]
fn test_page_move_empties_cache() {
    let fixture = TestFixture::new();
    fixture.id_cache.set(&EntityKey::page("Berlin", 0), 1);
    fixture
        .id_cache
        .set(&EntityKey::page("Berlin", 0).with_subobject("_ERR1"), 2);
    fixture.id_cache.set(&EntityKey::page("Unrelated", 14), 3);

    fixture.id_cache.on_entity_moved("Berlin", 0, "Berlin (city)", 0);

    assert!(fixture.id_cache.is_empty());
}

#[test]
fn test_warm_up_batches_uncached_keys() {
    let a = EntityKey::page("A", 0);
    let b = EntityKey::page("B", 0);
    let c = EntityKey::page("C", 0);
    let resolver = CountingResolver::new().with_row(&a, 1).with_row(&b, 2);
    let fixture = TestFixture::with_resolver(resolver);

    fixture.id_cache.resolve(&a).unwrap();
    let installed = fixture
        .id_cache
        .warm_up(&[a.clone(), b.clone(), c.clone(), b.clone()])
        .unwrap();

    assert_eq!(installed, 2);
    assert_eq!(fixture.resolver.queries(), 2);
    assert_eq!(fixture.id_cache.peek(&b), CachedId::Found(2));
    assert_eq!(fixture.id_cache.peek(&c), CachedId::Missing);
}

#[test]
fn test_sort_keys_travel_with_ids() {
    let berlin = EntityKey::page("Berlin", 0);
    let fixture = TestFixture::new();
    fixture
        .resolver
        .insert(&berlin, EntityRow::new(42).with_sort_key("Berlin"));

    fixture.id_cache.resolve(&berlin).unwrap();
    assert_eq!(fixture.id_cache.sort_key(&berlin).as_deref(), Some("Berlin"));

    let paris = EntityKey::page("Paris", 0);
    fixture.id_cache.set_with_sort_key(&paris, 43, "Paris, France");
    assert_eq!(
        fixture.id_cache.sort_key(&paris).as_deref(),
        Some("Paris, France")
    );
}

#[test]
fn test_stats_track_hits_and_misses() {
    let berlin = EntityKey::page("Berlin", 0);
    let fixture = TestFixture::with_resolver(CountingResolver::new().with_row(&berlin, 42));

    fixture.id_cache.resolve(&berlin).unwrap();
    fixture.id_cache.resolve(&berlin).unwrap();
    fixture.id_cache.resolve(&berlin).unwrap();

    let stats = fixture.id_cache.stats();
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.entries, 1);

    fixture.id_cache.reset_stats();
    assert_eq!(
        fixture.id_cache.stats(),
        IdCacheStats {
            entries: 1,
            ..IdCacheStats::default()
        }
    );
}

#[test]
fn test_concurrent_sets_clear_atomically() {
    let fixture = TestFixture::new();
    let cache = IdCache::with_max_entries(fixture.resolver.clone(), 100);

    // 4 threads x 250 distinct keys: one clear per 101 inserts
    std::thread::scope(|scope| {
        for t in 0..4 {
            let cache = &cache;
            scope.spawn(move || {
                for i in 0..250u64 {
                    cache.set(&EntityKey::page(format!("T{} page {}", t, i), 0), i + 1);
                    assert!(cache.len() <= 100);
                }
            });
        }
    });

    assert_eq!(cache.stats().bulk_clears, 9);
    assert_eq!(cache.len(), 1000 - 9 * 101);
}

#[test]
fn test_concurrent_resolves_share_one_entry() {
    let berlin = EntityKey::page("Berlin", 0);
    let fixture = TestFixture::with_resolver(CountingResolver::new().with_row(&berlin, 42));

    std::thread::scope(|scope| {
        for _ in 0..8 {
            let fixture = &fixture;
            let berlin = &berlin;
            scope.spawn(move || {
                assert_eq!(fixture.id_cache.resolve(berlin).unwrap(), 42);
            });
        }
    });

    assert_eq!(fixture.resolver.queries(), 1);
    assert_eq!(fixture.id_cache.len(), 1);
}
