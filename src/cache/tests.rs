//! Unit tests for the result cache

use super::*;
use serde_json::json;

fn sig(seasons: &[&str]) -> FilterSignature {
    FilterSignature::new().with_seasons(seasons.iter().copied())
}

fn key(entity: &str, seasons: &[&str]) -> VectorKey {
    VectorKey {
        entity: entity.to_string(),
        signature: sig(seasons),
    }
}

#[test]
fn test_signature_canonicalization() {
    let a = FilterSignature::new()
        .with_seasons(["2023-24", "2022-23", "2023-24"])
        .with_team_scope(["Rovers"]);
    let b = FilterSignature::new()
        .with_seasons(["2022-23", "2023-24"])
        .with_team_scope(["Rovers"]);
    assert_eq!(a, b);

    let c = b.clone().with_opponents(["United"]);
    assert_ne!(b, c);
}

#[test]
fn test_store_key_embeds_schema_version_and_entity() {
    let k = key("Ada", &["2023-24"]);
    let s = k.store_key();
    assert!(s.starts_with(&format!("v{SCHEMA_VERSION}|")));
    assert!(s.contains("Ada"));
    assert!(s.contains("2023-24"));
}

#[test]
fn test_grouped_key_distinguishes_dimension() {
    let base = sig(&["2023-24"]);
    let a = GroupedKey {
        entity: "Ada".to_string(),
        dimension: GroupDimension::Season,
        signature: base.clone(),
    };
    let b = GroupedKey {
        entity: "Ada".to_string(),
        dimension: GroupDimension::Opponent,
        signature: base,
    };
    assert_ne!(a.store_key(), b.store_key());
}

#[test]
fn test_memory_hit_without_store_round_trip() {
    let store = Arc::new(MemoryStore::new());
    let cache: ResultCache<VectorKey, StatVector> = ResultCache::new(8, store.clone());

    let k = key("Ada", &["2023-24"]);
    let v = StatVector {
        total_goals: 3,
        goals_and_assists: 3,
        ..Default::default()
    };
    cache.put(k.clone(), v);
    assert_eq!(cache.get(&k), Some(v));
    // Written through to the persistent tier as well.
    assert_eq!(store.len(), 1);
}

#[test]
fn test_store_hit_promotes_to_memory() {
    let store = Arc::new(MemoryStore::new());
    let v = StatVector {
        total_assists: 2,
        goals_and_assists: 2,
        ..Default::default()
    };
    let k = key("Ada", &["2023-24"]);
    store
        .set(
            &k.store_key(),
            &serde_json::to_value(v).unwrap(),
            chrono::Utc::now().timestamp(),
        )
        .unwrap();

    let cache: ResultCache<VectorKey, StatVector> = ResultCache::new(8, store);
    assert_eq!(cache.get(&k), Some(v));
    // Second read comes from memory even if the store is cleared.
    cache.store.clear().unwrap();
    assert_eq!(cache.get(&k), Some(v));
}

#[test]
fn test_expired_entries_are_misses_in_both_tiers() {
    let store = Arc::new(MemoryStore::new());
    let cache: ResultCache<VectorKey, StatVector> =
        ResultCache::new(8, store.clone()).with_ttl(60);

    let k = key("Ada", &["2023-24"]);
    let stale = chrono::Utc::now().timestamp() - 3600;
    store
        .set(
            &k.store_key(),
            &serde_json::to_value(StatVector::default()).unwrap(),
            stale,
        )
        .unwrap();
    assert_eq!(cache.get(&k), None);
}

#[test]
fn test_get_or_compute_caches_once() {
    let store = Arc::new(MemoryStore::new());
    let cache: ResultCache<VectorKey, StatVector> = ResultCache::new(8, store);
    let k = key("Ada", &["2023-24"]);

    let mut calls = 0;
    let v1 = cache.get_or_compute(&k, || {
        calls += 1;
        StatVector {
            total_goals: 1,
            goals_and_assists: 1,
            ..Default::default()
        }
    });
    let v2 = cache.get_or_compute(&k, || {
        calls += 1;
        StatVector::default()
    });
    assert_eq!(v1, v2);
    assert_eq!(calls, 1);
}

#[test]
fn test_schema_version_change_invalidates_implicitly() {
    // An entry stored under a different version prefix is simply never
    // looked up again: the key no longer matches.
    let store = Arc::new(MemoryStore::new());
    let k = key("Ada", &["2023-24"]);
    let old_key = k.store_key().replacen(
        &format!("v{SCHEMA_VERSION}"),
        &format!("v{}", SCHEMA_VERSION - 1),
        1,
    );
    store
        .set(&old_key, &json!({"bogus": true}), chrono::Utc::now().timestamp())
        .unwrap();

    let cache: ResultCache<VectorKey, StatVector> = ResultCache::new(8, store);
    assert_eq!(cache.get(&k), None);
}

#[test]
fn test_sqlite_store_round_trip() {
    let store = SqliteStore::new_in_memory().unwrap();
    let value = json!({"total_goals": 5});
    store.set("k1", &value, 1_700_000_000).unwrap();

    let entry = store.get("k1").unwrap().expect("entry present");
    assert_eq!(entry.value, value);
    assert_eq!(entry.stored_at, 1_700_000_000);

    // Overwrite keeps one row per key.
    store.set("k1", &json!({"total_goals": 6}), 1_700_000_100).unwrap();
    let entry = store.get("k1").unwrap().unwrap();
    assert_eq!(entry.stored_at, 1_700_000_100);

    store.clear().unwrap();
    assert!(store.get("k1").unwrap().is_none());
}

#[test]
fn test_sqlite_store_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.db");
    {
        let store = SqliteStore::open(&path).unwrap();
        store.set("k", &json!(42), 10).unwrap();
    }
    // Reopen and read back.
    let store = SqliteStore::open(&path).unwrap();
    let entry = store.get("k").unwrap().unwrap();
    assert_eq!(entry.value, json!(42));
}

#[test]
fn test_keeper_cache_is_a_separate_namespace() {
    let store = Arc::new(MemoryStore::new());
    let cache = StatsCache::new(store);
    let sig = sig(&["2023-24"]);
    let kk = KeeperKey {
        entity: "Kim".to_string(),
        signature: sig.clone(),
    };
    let vk = VectorKey {
        entity: "Kim".to_string(),
        signature: sig,
    };
    cache.keeper_vectors.put(
        kk.clone(),
        KeeperStatVector {
            clean_sheets: 4,
            ..Default::default()
        },
    );
    assert_eq!(
        cache.keeper_vectors.get(&kk).map(|v| v.clean_sheets),
        Some(4)
    );
    // The outfield cache never sees keeper entries.
    assert!(cache.vectors.get(&vk).is_none());
    assert_ne!(kk.store_key(), vk.store_key());
}

#[test]
fn test_stats_cache_clear_memory() {
    let store = Arc::new(MemoryStore::new());
    let cache = StatsCache::new(store.clone());
    let k = key("Ada", &["2023-24"]);
    cache.vectors.put(k.clone(), StatVector::default());
    cache.clear_memory();
    // Still served from the persistent tier.
    assert_eq!(cache.vectors.get(&k), Some(StatVector::default()));
}
