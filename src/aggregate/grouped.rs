//! Dimensional grouping over the stat aggregator.
//!
//! For one dimension (competition, season, opponent), enumerate the values
//! present among the candidate matches, run the aggregator over each value's
//! slice of the candidate set, drop all-zero vectors, and order the result
//! per dimension-specific rules.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::index::{CandidateSet, IndexSet};
use crate::model::{Match, StatVector, Tables};

use super::{compute_stats, TeamScope};

/// The grouping dimensions exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupDimension {
    Competition,
    Season,
    Opponent,
}

/// Compute one stat vector per dimension value present in the candidate set.
///
/// `competition_priority` supplies the fixed competition ordering: ranked
/// competitions sort first in list order, unranked ones after, alphabetical
/// among themselves. It is ignored for the other dimensions.
pub fn compute_grouped(
    entity: &str,
    dimension: GroupDimension,
    scope: &TeamScope,
    candidates: &CandidateSet,
    tables: &Tables,
    indices: Option<&IndexSet>,
    competition_priority: &[String],
) -> Vec<(String, StatVector)> {
    if entity.is_empty() || tables.is_empty() || candidates.is_empty() {
        return Vec::new();
    }

    let own_teams = own_teams(entity, scope, candidates, tables, indices);

    // value -> candidate matches carrying that value
    let mut by_value: HashMap<String, CandidateSet> = HashMap::new();
    for id in candidates {
        let m = match indices {
            Some(idx) => idx.match_by_id(tables, id),
            None => tables.matches.iter().find(|m| &m.id == id),
        };
        let Some(m) = m else { continue };
        let Some(value) = dimension_value(m, dimension, &own_teams) else {
            continue;
        };
        by_value.entry(value).or_default().insert(id.clone());
    }

    let mut entries: Vec<(String, StatVector)> = by_value
        .into_iter()
        .map(|(value, ids)| {
            let v = compute_stats(entity, scope, &ids, tables, indices);
            (value, v)
        })
        .filter(|(_, v)| !v.is_zero())
        .collect();

    match dimension {
        GroupDimension::Season => entries.sort_by(|a, b| season_order(&a.0, &b.0)),
        GroupDimension::Competition => {
            entries.sort_by(|a, b| competition_order(&a.0, &b.0, competition_priority))
        }
        GroupDimension::Opponent => entries.sort_by(|a, b| {
            // Descending by combined goal involvement; name breaks ties so
            // the order is reproducible across runs.
            b.1.goals_and_assists
                .cmp(&a.1.goals_and_assists)
                .then_with(|| a.0.cmp(&b.0))
        }),
    }

    entries
}

/// The teams the computation is "about": the team scope when one is set,
/// otherwise the teams the entity appears for within the candidate set.
/// Opponent values are the non-own side of each match.
fn own_teams(
    entity: &str,
    scope: &TeamScope,
    candidates: &CandidateSet,
    tables: &Tables,
    indices: Option<&IndexSet>,
) -> HashSet<String> {
    if !scope.is_unrestricted() {
        return scope.teams().clone();
    }
    let lineups = match indices {
        Some(idx) => idx.lineups_for(tables, entity, candidates),
        None => tables
            .lineups
            .iter()
            .filter(|l| l.player == entity && candidates.contains(&l.match_id))
            .collect(),
    };
    lineups
        .into_iter()
        .filter(|l| !l.team.is_empty())
        .map(|l| l.team.clone())
        .collect()
}

fn dimension_value(
    m: &Match,
    dimension: GroupDimension,
    own_teams: &HashSet<String>,
) -> Option<String> {
    match dimension {
        GroupDimension::Competition if !m.competition.is_empty() => Some(m.competition.clone()),
        GroupDimension::Season if !m.season.is_empty() => Some(m.season.clone()),
        GroupDimension::Opponent => {
            if own_teams.contains(&m.home_team) && !m.away_team.is_empty() {
                Some(m.away_team.clone())
            } else if own_teams.contains(&m.away_team) && !m.home_team.is_empty() {
                Some(m.home_team.clone())
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Descending by the 4-digit year in the label; labels without one sort
/// after all dated labels, in descending lexicographic order.
fn season_order(a: &str, b: &str) -> Ordering {
    match (season_year(a), season_year(b)) {
        (Some(ya), Some(yb)) => yb.cmp(&ya).then_with(|| b.cmp(a)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.cmp(a),
    }
}

/// First run of exactly four consecutive digits in a season label, e.g.
/// `"2023-24"` → 2023.
fn season_year(label: &str) -> Option<u32> {
    let bytes = label.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i - start == 4 {
                return label[start..i].parse().ok();
            }
        } else {
            i += 1;
        }
    }
    None
}

/// Ascending by position in the priority list; unlisted competitions after
/// all listed ones, alphabetical among themselves.
fn competition_order(a: &str, b: &str, priority: &[String]) -> Ordering {
    let ra = priority.iter().position(|p| p == a);
    let rb = priority.iter().position(|p| p == b);
    match (ra, rb) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}
