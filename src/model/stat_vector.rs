//! The fixed-shape stat vectors produced per entity/filter combination.

use serde::{Deserialize, Serialize};

/// The canonical 18-counter record produced by the stat aggregator.
///
/// `Default` is the all-zero vector, which is also the result for an unknown
/// or empty entity; callers never see an error or a missing value for a
/// well-formed request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatVector {
    pub matches_played: u32,
    pub total_minutes: u32,
    /// Always `total_goals + total_assists`; assigned after both totals are
    /// final, never accumulated incrementally.
    pub goals_and_assists: u32,
    pub total_goals: u32,
    pub total_assists: u32,
    /// Matches with exactly 2 goals.
    pub brace: u32,
    /// Matches with exactly 3 goals.
    pub hat_trick: u32,
    /// Matches with 4 or more goals.
    pub super_hat_trick: u32,
    /// Matches with exactly 2 assists.
    pub assists2: u32,
    /// Matches with exactly 3 assists.
    pub assists3: u32,
    /// Matches with 4 or more assists.
    pub assists4_plus: u32,
    pub penalty_goals: u32,
    pub penalty_assist_goals: u32,
    pub penalty_missed: u32,
    pub penalty_assist_missed: u32,
    pub penalty_commit_goal: u32,
    pub penalty_commit_missed: u32,
    pub free_kick_goals: u32,
}

impl StatVector {
    /// True when every counter is zero. Grouped results drop such entries.
    pub fn is_zero(&self) -> bool {
        *self == StatVector::default()
    }
}

/// Goalkeeper-specific stat record.
///
/// Conceded/penalty/clean-sheet tallies come from goal attribution, not from
/// the source's per-appearance conceded column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeeperStatVector {
    pub matches_played: u32,
    pub total_minutes: u32,
    pub goals_conceded: u32,
    pub penalties_conceded: u32,
    pub clean_sheets: u32,
    /// Longest run of consecutive matches (date ascending) conceding at
    /// least one goal.
    pub longest_conceding_run: u32,
    /// Longest run of consecutive clean-sheet matches.
    pub longest_clean_sheet_run: u32,
}

impl KeeperStatVector {
    pub fn is_zero(&self) -> bool {
        *self == KeeperStatVector::default()
    }
}
