//! Goal-to-goalkeeper attribution and goalkeeper stats.
//!
//! A conceded-goal event names only the scorer, team, and minute. When the
//! defending side used two goalkeepers in a match, each goal must land on
//! exactly one of the two appearances before per-keeper conceded, penalty,
//! and clean-sheet tallies can be computed. Attribution works off the
//! substitution minutes recorded on the appearances, with deterministic
//! fallbacks for every incomplete-data shape.

use std::collections::{HashMap, HashSet};

use crate::index::{CandidateSet, IndexSet};
use crate::model::{
    ActionEvent, ActionKind, GoalkeeperAppearance, KeeperRole, KeeperStatVector, MatchId, Tables,
};
use crate::TeamScope;

#[cfg(test)]
mod tests;

/// One attributed conceded goal: the resolved (scorer, minute, match,
/// conceding keeper) tuple. `kind` is joined back from the source event so
/// penalty and free-kick subtypes survive attribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcededGoal {
    pub match_id: MatchId,
    pub scorer: String,
    /// Parsed minute; 0 means the source carried no usable minute.
    pub minute: u32,
    pub kind: ActionKind,
    pub keeper: String,
}

/// Resolve which of the given appearances conceded a goal at `minute`
/// (0 = unknown). Returns `None` only when no appearance is supplied; such
/// goals are excluded from attribution entirely.
///
/// The appearances must all belong to the defending team in one match, in
/// source order.
pub fn attribute_goal<'a>(
    minute: u32,
    keepers: &[&'a GoalkeeperAppearance],
) -> Option<&'a GoalkeeperAppearance> {
    match keepers.len() {
        0 => None,
        1 => Some(keepers[0]),
        2 => {
            let (starter, substitute) = split_pair(keepers[0], keepers[1]);
            Some(resolve_pair(minute, starter, substitute))
        }
        _ => {
            // Anomalous row count: fall back to the first tagged
            // starter/substitute pair, else the first row in source order.
            let starter = keepers
                .iter()
                .copied()
                .find(|k| k.role == Some(KeeperRole::Starter));
            let substitute = keepers
                .iter()
                .copied()
                .find(|k| k.role == Some(KeeperRole::Substitute));
            match (starter, substitute) {
                (Some(s), Some(u)) => Some(resolve_pair(minute, s, u)),
                _ => {
                    log::warn!(
                        "{} keeper appearances with no tagged pair in match {}, \
                         attributing to first row",
                        keepers.len(),
                        keepers[0].match_id
                    );
                    Some(keepers[0])
                }
            }
        }
    }
}

/// Convenience form over [`attribute_goal`]: keeper name or none.
pub fn attribute_goalkeeper(
    goal: &ActionEvent,
    keepers: &[&GoalkeeperAppearance],
) -> Option<String> {
    attribute_goal(goal.parsed_minute(), keepers).map(|k| k.player.clone())
}

/// Decide starter/substitute sides for an exactly-two pair, tolerating
/// missing or duplicated role tags: an explicit tag wins, otherwise the
/// first row in source order is treated as the starter.
fn split_pair<'a>(
    a: &'a GoalkeeperAppearance,
    b: &'a GoalkeeperAppearance,
) -> (&'a GoalkeeperAppearance, &'a GoalkeeperAppearance) {
    if a.role == Some(KeeperRole::Starter) || b.role == Some(KeeperRole::Substitute) {
        (a, b)
    } else if b.role == Some(KeeperRole::Starter) || a.role == Some(KeeperRole::Substitute) {
        (b, a)
    } else {
        (a, b)
    }
}

fn resolve_pair<'a>(
    minute: u32,
    starter: &'a GoalkeeperAppearance,
    substitute: &'a GoalkeeperAppearance,
) -> &'a GoalkeeperAppearance {
    if minute == 0 {
        // Unknown minute: the starter carries it.
        return starter;
    }
    match (starter.usable_sub_minute(), substitute.usable_sub_minute()) {
        (Some(exit), Some(entry)) => {
            if minute < exit {
                starter
            } else if minute >= entry {
                substitute
            } else {
                // Minute falls between exit and entry, which the source data
                // should not allow; the substitute takes it.
                substitute
            }
        }
        (Some(exit), None) => {
            if minute < exit {
                starter
            } else {
                substitute
            }
        }
        (None, Some(entry)) => {
            if minute < entry {
                starter
            } else {
                substitute
            }
        }
        (None, None) => starter,
    }
}

/// Attribute every goal conceded by `team` in one match.
///
/// Goals are the goal-family actions by the opposing side, deduplicated by
/// (match, scorer, minute) before attribution so repeated source rows do not
/// inflate conceded totals.
pub fn attribute_match_goals(
    team: &str,
    match_id: &MatchId,
    tables: &Tables,
    indices: Option<&IndexSet>,
) -> Vec<ConcededGoal> {
    let keepers: Vec<&GoalkeeperAppearance> = match indices {
        Some(idx) => idx
            .keepers_in_match(tables, match_id)
            .into_iter()
            .filter(|k| k.team == team)
            .collect(),
        None => tables
            .keepers
            .iter()
            .filter(|k| &k.match_id == match_id && k.team == team)
            .collect(),
    };

    let actions: Vec<&ActionEvent> = match indices {
        Some(idx) => idx.actions_in_match(tables, match_id),
        None => tables
            .actions
            .iter()
            .filter(|a| &a.match_id == match_id)
            .collect(),
    };

    let mut seen: HashSet<(String, u32)> = HashSet::new();
    let mut out = Vec::new();
    for a in actions {
        if !a.kind.is_goal() || a.team == team || a.team.is_empty() {
            continue;
        }
        let minute = a.parsed_minute();
        // Duplicate identical (scorer, minute) tuples collapse to one.
        if !seen.insert((a.player.clone(), minute)) {
            continue;
        }
        if let Some(keeper) = attribute_goal(minute, &keepers) {
            out.push(ConcededGoal {
                match_id: match_id.clone(),
                scorer: a.player.clone(),
                minute,
                kind: a.kind,
                keeper: keeper.player.clone(),
            });
        }
    }
    out
}

/// Goalkeeper-specific aggregation: conceded, penalty-conceded, clean-sheet
/// and streak counters for one keeper over a candidate match set.
///
/// Same contract as the outfield aggregator: candidates are pre-filtered by
/// every other criterion, team scope restricts contributing appearances, and
/// the function is total (unknown keeper → all-zero vector).
pub fn compute_keeper_stats(
    entity: &str,
    scope: &TeamScope,
    candidates: &CandidateSet,
    tables: &Tables,
    indices: Option<&IndexSet>,
) -> KeeperStatVector {
    if entity.is_empty() || tables.is_empty() || candidates.is_empty() {
        return KeeperStatVector::default();
    }

    let appearances: Vec<&GoalkeeperAppearance> = match indices {
        Some(idx) => idx.keeper_apps_for(tables, entity, candidates),
        None => tables
            .keepers
            .iter()
            .filter(|k| k.player == entity && candidates.contains(&k.match_id))
            .collect(),
    };
    let appearances: Vec<_> = appearances
        .into_iter()
        .filter(|k| scope.allows(&k.team))
        .collect();

    let lineup_minutes: u32 = match indices {
        Some(idx) => idx.lineups_for(tables, entity, candidates),
        None => tables
            .lineups
            .iter()
            .filter(|l| l.player == entity && candidates.contains(&l.match_id))
            .collect(),
    }
    .into_iter()
    .filter(|l| scope.allows(&l.team))
    .map(|l| l.minutes)
    .sum();

    let mut v = KeeperStatVector {
        matches_played: appearances.len() as u32,
        total_minutes: lineup_minutes,
        ..Default::default()
    };

    // Per-appearance results, keyed for the streak scan.
    struct MatchResult {
        date: Option<chrono::NaiveDate>,
        conceded: u32,
        clean_sheet: bool,
    }
    let mut results: Vec<MatchResult> = Vec::new();

    for app in &appearances {
        let attributed = attribute_match_goals(&app.team, &app.match_id, tables, indices);
        let mine: Vec<&ConcededGoal> = attributed
            .iter()
            .filter(|g| g.keeper == app.player)
            .collect();
        let conceded = mine.len() as u32;
        let penalties = mine
            .iter()
            .filter(|g| g.kind == ActionKind::PenaltyGoal)
            .count() as u32;

        if conceded != app.goals_conceded {
            log::warn!(
                "keeper {} match {}: attributed {} conceded goals, source row says {}",
                app.player,
                app.match_id,
                conceded,
                app.goals_conceded
            );
        }

        let teammates = match indices {
            Some(idx) => idx
                .keepers_in_match(tables, &app.match_id)
                .into_iter()
                .filter(|k| k.team == app.team)
                .count(),
            None => tables
                .keepers
                .iter()
                .filter(|k| k.match_id == app.match_id && k.team == app.team)
                .count(),
        };
        // A shared match credits neither keeper with the clean sheet.
        let clean_sheet = conceded == 0 && teammates == 1;

        v.goals_conceded += conceded;
        v.penalties_conceded += penalties;
        if clean_sheet {
            v.clean_sheets += 1;
        }

        let date = match indices {
            Some(idx) => idx.match_by_id(tables, &app.match_id).and_then(|m| m.date),
            None => tables
                .matches
                .iter()
                .find(|m| m.id == app.match_id)
                .and_then(|m| m.date),
        };
        results.push(MatchResult {
            date,
            conceded,
            clean_sheet,
        });
    }

    // Streaks: date-ascending scan with running counters. Undated matches
    // sort first.
    results.sort_by_key(|r| r.date);
    let mut conceding_run = 0u32;
    let mut clean_run = 0u32;
    for r in &results {
        if r.conceded > 0 {
            conceding_run += 1;
            v.longest_conceding_run = v.longest_conceding_run.max(conceding_run);
        } else {
            conceding_run = 0;
        }
        if r.clean_sheet {
            clean_run += 1;
            v.longest_clean_sheet_run = v.longest_clean_sheet_run.max(clean_run);
        } else {
            clean_run = 0;
        }
    }

    v
}

/// Attribute every conceded goal across a candidate set, for all teams that
/// fielded a keeper. Useful for building per-keeper tables in one pass.
pub fn attribute_all(
    candidates: &CandidateSet,
    tables: &Tables,
    indices: Option<&IndexSet>,
) -> Vec<ConcededGoal> {
    let mut out = Vec::new();
    for id in candidates {
        let teams: HashSet<&str> = match indices {
            Some(idx) => idx
                .keepers_in_match(tables, id)
                .into_iter()
                .map(|k| k.team.as_str())
                .collect(),
            None => tables
                .keepers
                .iter()
                .filter(|k| &k.match_id == id)
                .map(|k| k.team.as_str())
                .collect(),
        };
        for team in teams {
            out.extend(attribute_match_goals(team, id, tables, indices));
        }
    }
    out
}

/// Per-keeper conceded counts over a candidate set, for data-quality
/// reporting.
pub fn conceded_by_keeper(
    candidates: &CandidateSet,
    tables: &Tables,
    indices: Option<&IndexSet>,
) -> HashMap<String, u32> {
    let mut counts: HashMap<String, u32> = HashMap::new();
    for goal in attribute_all(candidates, tables, indices) {
        *counts.entry(goal.keeper).or_default() += 1;
    }
    counts
}
