//! Match-log statistics aggregation engine
//!
//! Aggregates per-player and per-goalkeeper performance statistics from
//! normalized sports match-event logs under arbitrary filter combinations,
//! grouped by competition, season, or opponent, with memoized results for
//! interactive filter changes.
//!
//! ## Pipeline
//!
//! raw tables → [`ingest::load_tables`] → [`index::build_indices`] →
//! [`aggregate::compute_stats`] / [`aggregate::compute_grouped`] →
//! [`cache::StatsCache`] → caller. Goalkeeper tallies run through
//! [`keeper::compute_keeper_stats`], which resolves each conceded goal to
//! exactly one keeper appearance.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use footstats::{
//!     build_indices, compute_stats, load_tables, FilterSignature, MemoryStore,
//!     StatsCache, TeamScope, VectorKey,
//! };
//!
//! # fn example(raw: [Vec<serde_json::Value>; 4]) {
//! let [matches, lineups, actions, keepers] = raw;
//! let tables = load_tables(&matches, &lineups, &actions, &keepers);
//! let indices = build_indices(&tables);
//!
//! // The caller resolves season/competition/opponent/date filters into a
//! // candidate match-id set before asking for stats.
//! let candidates = tables.matches.iter().map(|m| m.id.clone()).collect();
//!
//! let cache = StatsCache::new(Arc::new(MemoryStore::new()));
//! let key = VectorKey {
//!     entity: "Ada".to_string(),
//!     signature: FilterSignature::new(),
//! };
//! let vector = cache.vectors.get_or_compute(&key, || {
//!     compute_stats("Ada", &TeamScope::any(), &candidates, &tables, Some(&indices))
//! });
//! assert_eq!(vector.goals_and_assists, vector.total_goals + vector.total_assists);
//! # }
//! ```

pub mod aggregate;
pub mod batch;
pub mod cache;
pub mod error;
pub mod index;
pub mod ingest;
pub mod keeper;
pub mod model;

// Re-export the operations and types most callers touch.
pub use aggregate::{compute_grouped, compute_stats, GroupDimension, TeamScope};
pub use batch::{compute_batch_inline, BatchRequest, BatchResponse, BatchRunner};
pub use cache::{
    FilterSignature, GroupedKey, KeeperKey, MemoryStore, PersistentStore, SqliteStore, StatsCache,
    VectorKey,
};
pub use error::{Result, StatsError};
pub use index::{build_indices, CandidateSet, IndexSet};
pub use ingest::load_tables;
pub use keeper::{attribute_goal, attribute_goalkeeper, compute_keeper_stats, ConcededGoal};
pub use model::{
    ActionEvent, ActionKind, GoalkeeperAppearance, KeeperRole, KeeperStatVector, LineupAppearance,
    Match, MatchId, StatVector, Tables,
};
