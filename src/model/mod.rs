//! Normalized, typed records for match-event data.
//!
//! Everything downstream of ingestion works on these types; aggregation code
//! never branches on raw field names or column variants.

pub mod ids;
pub mod kinds;
pub mod records;
pub mod stat_vector;


pub use ids::MatchId;
pub use kinds::{ActionKind, KeeperRole};
pub use records::{ActionEvent, GoalkeeperAppearance, LineupAppearance, Match};
pub use stat_vector::{KeeperStatVector, StatVector};

/// A read-only snapshot of the four event tables.
///
/// Tables are immutable for the duration of a computation; a data refresh
/// replaces the whole snapshot and rebuilds indices wholesale rather than
/// mutating structures a read might be traversing.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub matches: Vec<Match>,
    pub lineups: Vec<LineupAppearance>,
    pub actions: Vec<ActionEvent>,
    pub keepers: Vec<GoalkeeperAppearance>,
}

impl Tables {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
            && self.lineups.is_empty()
            && self.actions.is_empty()
            && self.keepers.is_empty()
    }
}
