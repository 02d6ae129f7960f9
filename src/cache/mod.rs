//! Two-tier result cache for computed stat vectors.
//!
//! - L1: in-memory LRU for repeated interactive filter changes.
//! - L2: a persistent key-value collaborator behind [`PersistentStore`].
//!
//! Keys are structured values (entity plus a canonicalized
//! [`FilterSignature`]), never ad hoc string concatenation; the string form
//! handed to the persistent store embeds a schema-version tag so a schema
//! change implicitly invalidates every prior entry. The 24-hour TTL is
//! enforced here on read: expired entries are treated as misses in both
//! tiers.

use chrono::{NaiveDate, Utc};
use lru::LruCache;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use crate::aggregate::GroupDimension;
use crate::model::{KeeperStatVector, StatVector};

pub mod store;

#[cfg(test)]
mod tests;

pub use store::{MemoryStore, PersistentStore, SqliteStore, StoredEntry};

/// Bumped whenever the stat-vector shape or key encoding changes; persisted
/// entries written under an older version are simply never found again.
pub const SCHEMA_VERSION: u32 = 3;

/// Default time-to-live for cached results: 24 hours.
pub const DEFAULT_TTL_SECS: i64 = 24 * 60 * 60;

/// A canonical, comparable encoding of the active filter combination.
///
/// Construction sorts and dedupes every list so two filter states that mean
/// the same thing produce the same signature (and therefore the same cache
/// key and the same staleness comparisons).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSignature {
    seasons: Vec<String>,
    competitions: Vec<String>,
    opponents: Vec<String>,
    team_scope: Vec<String>,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
}

impl FilterSignature {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seasons<I, S>(mut self, seasons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.seasons = canonical_list(seasons);
        self
    }

    pub fn with_competitions<I, S>(mut self, competitions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.competitions = canonical_list(competitions);
        self
    }

    pub fn with_opponents<I, S>(mut self, opponents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.opponents = canonical_list(opponents);
        self
    }

    pub fn with_team_scope<I, S>(mut self, teams: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.team_scope = canonical_list(teams);
        self
    }

    pub fn with_date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    /// Canonical text form, used inside store keys.
    fn canonical(&self) -> String {
        format!(
            "s={};c={};o={};t={};d={}..{}",
            self.seasons.join(","),
            self.competitions.join(","),
            self.opponents.join(","),
            self.team_scope.join(","),
            self.date_from.map(|d| d.to_string()).unwrap_or_default(),
            self.date_to.map(|d| d.to_string()).unwrap_or_default(),
        )
    }
}

fn canonical_list<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut v: Vec<String> = items.into_iter().map(Into::into).collect();
    v.sort();
    v.dedup();
    v
}

/// A structured cache key that can be rendered for the persistent store.
pub trait CacheKey: Hash + Eq + Clone {
    /// String form for the key-value collaborator; must embed
    /// [`SCHEMA_VERSION`].
    fn store_key(&self) -> String;
}

/// Key for a single entity's stat vector under one filter combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VectorKey {
    pub entity: String,
    pub signature: FilterSignature,
}

impl CacheKey for VectorKey {
    fn store_key(&self) -> String {
        format!(
            "v{}|vector|{}|{}",
            SCHEMA_VERSION,
            self.entity,
            self.signature.canonical()
        )
    }
}

/// Key for a grouped result (one vector per dimension value).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupedKey {
    pub entity: String,
    pub dimension: GroupDimension,
    pub signature: FilterSignature,
}

impl CacheKey for GroupedKey {
    fn store_key(&self) -> String {
        let dim = match self.dimension {
            GroupDimension::Competition => "competition",
            GroupDimension::Season => "season",
            GroupDimension::Opponent => "opponent",
        };
        format!(
            "v{}|grouped:{}|{}|{}",
            SCHEMA_VERSION,
            dim,
            self.entity,
            self.signature.canonical()
        )
    }
}

/// Key for a goalkeeper stat vector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeeperKey {
    pub entity: String,
    pub signature: FilterSignature,
}

impl CacheKey for KeeperKey {
    fn store_key(&self) -> String {
        format!(
            "v{}|keeper|{}|{}",
            SCHEMA_VERSION,
            self.entity,
            self.signature.canonical()
        )
    }
}

#[derive(Debug, Clone)]
struct CachedValue<V> {
    value: V,
    stored_at: i64,
}

/// One memoization tier pair: LRU memory in front of the persistent store.
pub struct ResultCache<K, V>
where
    K: CacheKey,
    V: Clone + Serialize + DeserializeOwned,
{
    memory: Mutex<LruCache<K, CachedValue<V>>>,
    store: Arc<dyn PersistentStore>,
    ttl_secs: i64,
}

impl<K, V> ResultCache<K, V>
where
    K: CacheKey,
    V: Clone + Serialize + DeserializeOwned,
{
    pub fn new(capacity: usize, store: Arc<dyn PersistentStore>) -> Self {
        Self {
            memory: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity.max(1)).unwrap(),
            )),
            store,
            ttl_secs: DEFAULT_TTL_SECS,
        }
    }

    #[cfg(test)]
    fn with_ttl(mut self, ttl_secs: i64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    /// Look up a value, enforcing the TTL in both tiers. A persistent hit is
    /// promoted into memory.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = Utc::now().timestamp();

        {
            let mut mem = self.memory.lock().unwrap();
            if let Some(entry) = mem.get(key) {
                if !self.expired(entry.stored_at, now) {
                    log::debug!("cache hit (memory): {}", key.store_key());
                    return Some(entry.value.clone());
                }
                // Evict on read once the entry has aged out.
                mem.pop(key);
            }
        }

        let stored = match self.store.get(&key.store_key()) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("persistent cache read failed: {e}");
                None
            }
        }?;
        if self.expired(stored.stored_at, now) {
            return None;
        }
        let value: V = serde_json::from_value(stored.value).ok()?;
        log::debug!("cache hit (store): {}", key.store_key());
        self.memory.lock().unwrap().put(
            key.clone(),
            CachedValue {
                value: value.clone(),
                stored_at: stored.stored_at,
            },
        );
        Some(value)
    }

    /// Store a value in both tiers. A persistent-store failure degrades to
    /// memory-only caching with a warning.
    pub fn put(&self, key: K, value: V) {
        let now = Utc::now().timestamp();
        match serde_json::to_value(&value) {
            Ok(json) => {
                if let Err(e) = self.store.set(&key.store_key(), &json, now) {
                    log::warn!("persistent cache write failed: {e}");
                }
            }
            Err(e) => log::warn!("cache value serialization failed: {e}"),
        }
        self.memory.lock().unwrap().put(
            key,
            CachedValue {
                value,
                stored_at: now,
            },
        );
    }

    /// Fetch-or-compute convenience used at the aggregator call sites.
    pub fn get_or_compute(&self, key: &K, compute: impl FnOnce() -> V) -> V {
        if let Some(v) = self.get(key) {
            return v;
        }
        log::debug!("cache miss: {}", key.store_key());
        let v = compute();
        self.put(key.clone(), v.clone());
        v
    }

    pub fn clear_memory(&self) {
        self.memory.lock().unwrap().clear();
    }

    fn expired(&self, stored_at: i64, now: i64) -> bool {
        now - stored_at >= self.ttl_secs
    }
}

/// The injected cache service bundling one tier pair per result shape.
pub struct StatsCache {
    pub vectors: ResultCache<VectorKey, StatVector>,
    pub grouped: ResultCache<GroupedKey, Vec<(String, StatVector)>>,
    pub keeper_vectors: ResultCache<KeeperKey, KeeperStatVector>,
}

impl StatsCache {
    pub fn new(store: Arc<dyn PersistentStore>) -> Self {
        Self {
            vectors: ResultCache::new(512, store.clone()),
            grouped: ResultCache::new(128, store.clone()),
            keeper_vectors: ResultCache::new(256, store),
        }
    }

    /// Drop every in-memory entry; persistent entries age out via TTL or
    /// become unreachable on a schema bump.
    pub fn clear_memory(&self) {
        self.vectors.clear_memory();
        self.grouped.clear_memory();
        self.keeper_vectors.clear_memory();
    }
}
