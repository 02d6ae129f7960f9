//! Lookup structures over the flat event tables.
//!
//! Grouped stat computation calls the aggregator once per dimension value, so
//! per-call work has to be proportional to the candidate match set, not to
//! the table sizes. `IndexSet` is built in one linear pass per table and then
//! answers every entity/match lookup through maps.
//!
//! Indices are rebuilt wholesale after a table refresh and released via
//! [`IndexSet::dispose`]; they are never patched in place while reads might
//! be in flight.

use std::collections::{HashMap, HashSet};

use crate::model::{
    ActionEvent, ActionKind, GoalkeeperAppearance, LineupAppearance, Match, MatchId, Tables,
};


/// The set of match ids surviving every filter except entity identity and
/// team scope.
pub type CandidateSet = HashSet<MatchId>;

/// Row indices into one table, keyed by entity then match.
type EntityMatchMap = HashMap<String, HashMap<MatchId, Vec<usize>>>;

/// Lookup maps over one [`Tables`] snapshot.
///
/// Stored values are row indices into the snapshot the set was built from;
/// accessors take the tables by reference so the index never outlives or
/// clones the data.
#[derive(Debug, Default)]
pub struct IndexSet {
    lineups_by_player: EntityMatchMap,
    actions_by_player: EntityMatchMap,
    keepers_by_player: EntityMatchMap,
    actions_by_match: HashMap<MatchId, Vec<usize>>,
    keepers_by_match: HashMap<MatchId, Vec<usize>>,
    match_by_id: HashMap<MatchId, usize>,
    matches_by_competition: HashMap<String, Vec<MatchId>>,
    matches_by_season: HashMap<String, Vec<MatchId>>,
    matches_by_team: HashMap<String, Vec<MatchId>>,
}

/// Build the full index set in one linear pass per table.
pub fn build_indices(tables: &Tables) -> IndexSet {
    let mut idx = IndexSet::default();

    for (row, m) in tables.matches.iter().enumerate() {
        idx.match_by_id.insert(m.id.clone(), row);
        if !m.competition.is_empty() {
            idx.matches_by_competition
                .entry(m.competition.clone())
                .or_default()
                .push(m.id.clone());
        }
        if !m.season.is_empty() {
            idx.matches_by_season
                .entry(m.season.clone())
                .or_default()
                .push(m.id.clone());
        }
        for team in [&m.home_team, &m.away_team] {
            if !team.is_empty() {
                idx.matches_by_team
                    .entry(team.clone())
                    .or_default()
                    .push(m.id.clone());
            }
        }
    }

    for (row, l) in tables.lineups.iter().enumerate() {
        // Orphan rows referencing no known match are dropped, not errors.
        if l.player.is_empty() || !idx.match_by_id.contains_key(&l.match_id) {
            continue;
        }
        idx.lineups_by_player
            .entry(l.player.clone())
            .or_default()
            .entry(l.match_id.clone())
            .or_default()
            .push(row);
    }

    for (row, a) in tables.actions.iter().enumerate() {
        if a.player.is_empty() || !idx.match_by_id.contains_key(&a.match_id) {
            continue;
        }
        idx.actions_by_player
            .entry(a.player.clone())
            .or_default()
            .entry(a.match_id.clone())
            .or_default()
            .push(row);
        idx.actions_by_match
            .entry(a.match_id.clone())
            .or_default()
            .push(row);
    }

    for (row, k) in tables.keepers.iter().enumerate() {
        if k.player.is_empty() || !idx.match_by_id.contains_key(&k.match_id) {
            continue;
        }
        idx.keepers_by_player
            .entry(k.player.clone())
            .or_default()
            .entry(k.match_id.clone())
            .or_default()
            .push(row);
        idx.keepers_by_match
            .entry(k.match_id.clone())
            .or_default()
            .push(row);
    }

    idx
}

impl IndexSet {
    /// Lineup rows for one entity restricted to a candidate set, resolved in
    /// O(|candidates|).
    pub fn lineups_for<'a>(
        &self,
        tables: &'a Tables,
        entity: &str,
        candidates: &CandidateSet,
    ) -> Vec<&'a LineupAppearance> {
        Self::rows_for(&self.lineups_by_player, &tables.lineups, entity, candidates)
    }

    /// Action rows for one entity restricted to a candidate set, optionally
    /// narrowed to one exact kind.
    pub fn actions_for<'a>(
        &self,
        tables: &'a Tables,
        entity: &str,
        candidates: &CandidateSet,
        kind: Option<ActionKind>,
    ) -> Vec<&'a ActionEvent> {
        let rows = Self::rows_for(&self.actions_by_player, &tables.actions, entity, candidates);
        match kind {
            Some(k) => rows.into_iter().filter(|a| a.kind == k).collect(),
            None => rows,
        }
    }

    /// Goalkeeper appearance rows for one entity restricted to a candidate
    /// set.
    pub fn keeper_apps_for<'a>(
        &self,
        tables: &'a Tables,
        entity: &str,
        candidates: &CandidateSet,
    ) -> Vec<&'a GoalkeeperAppearance> {
        Self::rows_for(&self.keepers_by_player, &tables.keepers, entity, candidates)
    }

    /// All action rows in one match, in source order.
    pub fn actions_in_match<'a>(&self, tables: &'a Tables, id: &MatchId) -> Vec<&'a ActionEvent> {
        self.actions_by_match
            .get(id)
            .map(|rows| rows.iter().map(|&r| &tables.actions[r]).collect())
            .unwrap_or_default()
    }

    /// All goalkeeper appearance rows in one match, in source order.
    pub fn keepers_in_match<'a>(
        &self,
        tables: &'a Tables,
        id: &MatchId,
    ) -> Vec<&'a GoalkeeperAppearance> {
        self.keepers_by_match
            .get(id)
            .map(|rows| rows.iter().map(|&r| &tables.keepers[r]).collect())
            .unwrap_or_default()
    }

    pub fn match_by_id<'a>(&self, tables: &'a Tables, id: &MatchId) -> Option<&'a Match> {
        self.match_by_id.get(id).map(|&r| &tables.matches[r])
    }

    pub fn match_ids_for_competition(&self, competition: &str) -> &[MatchId] {
        self.matches_by_competition
            .get(competition)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn match_ids_for_season(&self, season: &str) -> &[MatchId] {
        self.matches_by_season
            .get(season)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Matches a team played in, home or away.
    pub fn match_ids_for_team(&self, team: &str) -> &[MatchId] {
        self.matches_by_team
            .get(team)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Release all map contents. Callers rebuild after a table refresh
    /// rather than mutating a live index.
    pub fn dispose(&mut self) {
        self.lineups_by_player.clear();
        self.actions_by_player.clear();
        self.keepers_by_player.clear();
        self.actions_by_match.clear();
        self.keepers_by_match.clear();
        self.match_by_id.clear();
        self.matches_by_competition.clear();
        self.matches_by_season.clear();
        self.matches_by_team.clear();
    }

    fn rows_for<'a, T>(
        map: &EntityMatchMap,
        table: &'a [T],
        entity: &str,
        candidates: &CandidateSet,
    ) -> Vec<&'a T> {
        let Some(by_match) = map.get(entity) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for id in candidates {
            if let Some(rows) = by_match.get(id) {
                out.extend(rows.iter().map(|&r| &table[r]));
            }
        }
        out
    }
}
