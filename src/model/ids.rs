//! ID types for match-event records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type-safe wrapper for match identifiers.
///
/// Source logs key matches by an opaque string id; wrapping it prevents
/// mixing match ids with player or team names in lookup maps.
///
/// # Examples
///
/// ```rust
/// use footstats::MatchId;
///
/// let id = MatchId::new("2023-05-28-away");
/// assert_eq!(id.as_str(), "2023-05-28-away");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchId(pub String);

impl MatchId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MatchId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
