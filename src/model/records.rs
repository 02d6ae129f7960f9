//! Normalized record types for the four source tables.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ActionKind, KeeperRole, MatchId};

/// One match, immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    /// `None` when the source date is absent or unparseable; such matches
    /// sort before dated ones in date-ascending scans.
    pub date: Option<NaiveDate>,
    pub season: String,
    pub competition: String,
    pub home_team: String,
    pub away_team: String,
    pub result_code: String,
}

impl Match {
    /// The opposing team for a given side, or `None` when the team did not
    /// play in this match.
    pub fn opponent_of(&self, team: &str) -> Option<&str> {
        if self.home_team == team {
            Some(&self.away_team)
        } else if self.away_team == team {
            Some(&self.home_team)
        } else {
            None
        }
    }
}

/// One player's participation record in one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineupAppearance {
    pub player: String,
    pub match_id: MatchId,
    pub team: String,
    /// Minutes played, coerced from text; non-numeric source values become 0.
    pub minutes: u32,
}

/// A single recorded in-match occurrence tied to a player, match, and team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEvent {
    pub player: String,
    pub match_id: MatchId,
    pub team: String,
    pub kind: ActionKind,
    /// Raw minute text from the source; may be absent or carry stoppage-time
    /// notation like `"90+3"`.
    pub minute: Option<String>,
}

impl ActionEvent {
    /// Minute as an integer. Leading digits are taken (so `"90+3"` → 90);
    /// absent or unparseable minutes become 0, which attribution treats as
    /// "unknown".
    pub fn parsed_minute(&self) -> u32 {
        parse_minute(self.minute.as_deref())
    }
}

/// A goalkeeper's participation record in one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalkeeperAppearance {
    pub player: String,
    pub match_id: MatchId,
    pub team: String,
    /// `None` when the source row carries no recognizable role tag;
    /// attribution falls back to source order for untagged rows.
    pub role: Option<KeeperRole>,
    /// Exit minute for a starter, entry minute for a substitute. `None` or 0
    /// means no usable substitution minute was recorded.
    pub sub_minute: Option<u32>,
    /// Goals conceded as recorded in the source for this appearance. Used as
    /// a cross-check against attributed counts, not as the tally itself.
    pub goals_conceded: u32,
}

impl GoalkeeperAppearance {
    /// Substitution minute when present and positive; 0 is treated as
    /// unrecorded.
    pub fn usable_sub_minute(&self) -> Option<u32> {
        self.sub_minute.filter(|m| *m > 0)
    }
}

/// Parse a source minute string, taking leading digits only.
pub(crate) fn parse_minute(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return 0;
    };
    let digits: String = raw.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}
