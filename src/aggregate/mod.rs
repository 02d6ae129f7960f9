//! The stat-vector aggregator.
//!
//! `compute_stats` reduces the rows for one entity, restricted to a
//! pre-filtered candidate match set and an optional team scope, into the
//! fixed 18-counter [`StatVector`]. The candidate set is assumed to already
//! encode every other filter (season, competition, opponent, date range);
//! this function never re-derives those.
//!
//! The function is total: unknown entities, empty tables, and malformed
//! fields all produce an all-zero vector or coerced contributions, never an
//! error.

use std::collections::{HashMap, HashSet};

use crate::index::{CandidateSet, IndexSet};
use crate::model::{ActionEvent, ActionKind, LineupAppearance, MatchId, StatVector, Tables};

pub mod grouped;


pub use grouped::{compute_grouped, GroupDimension};

/// Optional restriction to a set of teams.
///
/// An empty scope allows every row; a non-empty scope admits only rows whose
/// team is in the set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamScope(HashSet<String>);

impl TeamScope {
    /// The unrestricted scope.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn of<I, S>(teams: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(teams.into_iter().map(Into::into).collect())
    }

    pub fn allows(&self, team: &str) -> bool {
        self.0.is_empty() || self.0.contains(team)
    }

    pub fn is_unrestricted(&self) -> bool {
        self.0.is_empty()
    }

    pub fn teams(&self) -> &HashSet<String> {
        &self.0
    }
}

/// Compute the canonical stat vector for one entity.
///
/// When `indices` is present, rows are resolved through the lookup maps in
/// O(|candidates|); without it the tables are scanned linearly with identical
/// restriction semantics. Grouped computation calls this once per dimension
/// value, so the indexed path is the one that matters for latency.
pub fn compute_stats(
    entity: &str,
    scope: &TeamScope,
    candidates: &CandidateSet,
    tables: &Tables,
    indices: Option<&IndexSet>,
) -> StatVector {
    if entity.is_empty() || tables.is_empty() || candidates.is_empty() {
        return StatVector::default();
    }

    let lineups = match indices {
        Some(idx) => idx.lineups_for(tables, entity, candidates),
        None => lineups_linear(tables, entity, candidates),
    };
    let actions = match indices {
        Some(idx) => idx.actions_for(tables, entity, candidates, None),
        None => actions_linear(tables, entity, candidates),
    };

    let lineups: Vec<_> = lineups
        .into_iter()
        .filter(|l| scope.allows(&l.team))
        .collect();
    let actions: Vec<_> = actions
        .into_iter()
        .filter(|a| scope.allows(&a.team))
        .collect();

    let mut v = StatVector {
        matches_played: lineups.len() as u32,
        total_minutes: lineups.iter().map(|l| l.minutes).sum(),
        ..Default::default()
    };

    // Partition the goal/assist families and tally per match for the
    // multi-goal and multi-assist counters.
    let mut goals_per_match: HashMap<&MatchId, u32> = HashMap::new();
    let mut assists_per_match: HashMap<&MatchId, u32> = HashMap::new();
    for a in &actions {
        if a.kind.is_goal() {
            v.total_goals += 1;
            *goals_per_match.entry(&a.match_id).or_default() += 1;
            match a.kind {
                ActionKind::PenaltyGoal => v.penalty_goals += 1,
                ActionKind::FreeKickGoal => v.free_kick_goals += 1,
                _ => {}
            }
        } else if a.kind.is_assist() {
            v.total_assists += 1;
            *assists_per_match.entry(&a.match_id).or_default() += 1;
        }
    }
    for count in goals_per_match.values() {
        match count {
            2 => v.brace += 1,
            3 => v.hat_trick += 1,
            n if *n >= 4 => v.super_hat_trick += 1,
            _ => {}
        }
    }
    for count in assists_per_match.values() {
        match count {
            2 => v.assists2 += 1,
            3 => v.assists3 += 1,
            n if *n >= 4 => v.assists4_plus += 1,
            _ => {}
        }
    }

    // Assigned only after both totals are final.
    v.goals_and_assists = v.total_goals + v.total_assists;

    // The remaining counters are independent exact-kind filters over the same
    // restricted action rows, not reuses of the goal/assist partition.
    v.penalty_assist_goals = count_kind(&actions, ActionKind::PenaltyAssist);
    v.penalty_missed = count_kind(&actions, ActionKind::PenaltyMissed);
    v.penalty_assist_missed = count_kind(&actions, ActionKind::PenaltyAssistMissed);
    v.penalty_commit_goal = count_kind(&actions, ActionKind::PenaltyConcededGoal);
    v.penalty_commit_missed = count_kind(&actions, ActionKind::PenaltyConcededMissed);

    v
}

fn count_kind(actions: &[&ActionEvent], kind: ActionKind) -> u32 {
    actions.iter().filter(|a| a.kind == kind).count() as u32
}

/// Linear-scan fallback with the same restriction semantics as the indexed
/// path, including the drop of rows referencing unknown match ids.
fn lineups_linear<'a>(
    tables: &'a Tables,
    entity: &str,
    candidates: &CandidateSet,
) -> Vec<&'a LineupAppearance> {
    let known = known_match_ids(tables);
    tables
        .lineups
        .iter()
        .filter(|l| {
            l.player == entity && candidates.contains(&l.match_id) && known.contains(&l.match_id)
        })
        .collect()
}

fn actions_linear<'a>(
    tables: &'a Tables,
    entity: &str,
    candidates: &CandidateSet,
) -> Vec<&'a ActionEvent> {
    let known = known_match_ids(tables);
    tables
        .actions
        .iter()
        .filter(|a| {
            a.player == entity && candidates.contains(&a.match_id) && known.contains(&a.match_id)
        })
        .collect()
}

fn known_match_ids(tables: &Tables) -> HashSet<&MatchId> {
    tables.matches.iter().map(|m| &m.id).collect()
}
