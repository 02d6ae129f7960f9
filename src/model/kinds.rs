//! Action-event and goalkeeper-role enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a recorded in-match action.
///
/// `PenaltyGoal` and `FreeKickGoal` are subtypes of the goal family and count
/// toward goal totals as well as their own counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Goal,
    PenaltyGoal,
    FreeKickGoal,
    Assist,
    PenaltyAssist,
    PenaltyMissed,
    PenaltyAssistMissed,
    PenaltyConcededGoal,
    PenaltyConcededMissed,
}

impl ActionKind {
    /// True for any goal-family kind.
    pub fn is_goal(&self) -> bool {
        matches!(
            self,
            ActionKind::Goal | ActionKind::PenaltyGoal | ActionKind::FreeKickGoal
        )
    }

    /// True only for the plain assist kind; penalty-assist variants are
    /// tracked as their own counters, not as assists.
    pub fn is_assist(&self) -> bool {
        matches!(self, ActionKind::Assist)
    }

    /// Parse the normalized source-log token for an action kind.
    ///
    /// Returns `None` for unknown tokens; ingestion skips those rows with a
    /// data-quality warning rather than failing the load.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "goal" => Some(ActionKind::Goal),
            "penalty_goal" => Some(ActionKind::PenaltyGoal),
            "free_kick_goal" => Some(ActionKind::FreeKickGoal),
            "assist" => Some(ActionKind::Assist),
            "penalty_assist" => Some(ActionKind::PenaltyAssist),
            "penalty_missed" => Some(ActionKind::PenaltyMissed),
            "penalty_assist_missed" => Some(ActionKind::PenaltyAssistMissed),
            "penalty_conceded_goal" => Some(ActionKind::PenaltyConcededGoal),
            "penalty_conceded_missed" => Some(ActionKind::PenaltyConcededMissed),
            _ => None,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionKind::Goal => "goal",
            ActionKind::PenaltyGoal => "penalty_goal",
            ActionKind::FreeKickGoal => "free_kick_goal",
            ActionKind::Assist => "assist",
            ActionKind::PenaltyAssist => "penalty_assist",
            ActionKind::PenaltyMissed => "penalty_missed",
            ActionKind::PenaltyAssistMissed => "penalty_assist_missed",
            ActionKind::PenaltyConcededGoal => "penalty_conceded_goal",
            ActionKind::PenaltyConcededMissed => "penalty_conceded_missed",
        };
        write!(f, "{s}")
    }
}

/// Role of a goalkeeper appearance within one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeeperRole {
    Starter,
    Substitute,
}

impl KeeperRole {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "starter" => Some(KeeperRole::Starter),
            "substitute" => Some(KeeperRole::Substitute),
            _ => None,
        }
    }
}

impl fmt::Display for KeeperRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeeperRole::Starter => write!(f, "starter"),
            KeeperRole::Substitute => write!(f, "substitute"),
        }
    }
}
