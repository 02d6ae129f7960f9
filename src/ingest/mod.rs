//! Schema adapter: raw field-keyed records → normalized typed tables.
//!
//! The data-access collaborator hands over arrays of plain JSON objects whose
//! fields may be absent or carry numbers as text. All coercion happens here,
//! once, at load time: missing numerics become 0, missing strings become
//! empty, and rows without the keys a table requires are skipped. Nothing
//! downstream ever probes alternative field names.

use chrono::NaiveDate;
use serde_json::Value;

use crate::model::{
    ActionEvent, ActionKind, GoalkeeperAppearance, KeeperRole, LineupAppearance, Match, MatchId,
    Tables,
};


/// Build a normalized [`Tables`] snapshot from raw record arrays.
///
/// Skipped rows (missing player name or match id, unrecognized action kind)
/// are dropped silently apart from a data-quality warning; a malformed field
/// on a surviving row is coerced and the row still contributes everywhere
/// else.
pub fn load_tables(
    matches: &[Value],
    lineups: &[Value],
    actions: &[Value],
    keepers: &[Value],
) -> Tables {
    Tables {
        matches: matches.iter().filter_map(parse_match).collect(),
        lineups: lineups.iter().filter_map(parse_lineup).collect(),
        actions: actions.iter().filter_map(parse_action).collect(),
        keepers: keepers.iter().filter_map(parse_keeper).collect(),
    }
}

fn parse_match(rec: &Value) -> Option<Match> {
    let id = non_empty_str(rec, "match_id")?;
    Some(Match {
        id: MatchId::new(id),
        date: str_field(rec, "date")
            .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        season: str_field(rec, "season").unwrap_or_default(),
        competition: str_field(rec, "competition").unwrap_or_default(),
        home_team: str_field(rec, "home_team").unwrap_or_default(),
        away_team: str_field(rec, "away_team").unwrap_or_default(),
        result_code: str_field(rec, "result").unwrap_or_default(),
    })
}

fn parse_lineup(rec: &Value) -> Option<LineupAppearance> {
    let player = non_empty_str(rec, "player")?;
    let match_id = non_empty_str(rec, "match_id")?;
    Some(LineupAppearance {
        player,
        match_id: MatchId::new(match_id),
        team: str_field(rec, "team").unwrap_or_default(),
        minutes: u32_field(rec, "minutes"),
    })
}

fn parse_action(rec: &Value) -> Option<ActionEvent> {
    let player = non_empty_str(rec, "player")?;
    let match_id = non_empty_str(rec, "match_id")?;
    let kind_token = str_field(rec, "kind").unwrap_or_default();
    let Some(kind) = ActionKind::from_token(&kind_token) else {
        log::warn!("skipping action row with unknown kind {kind_token:?} (match {match_id})");
        return None;
    };
    Some(ActionEvent {
        player,
        match_id: MatchId::new(match_id),
        team: str_field(rec, "team").unwrap_or_default(),
        kind,
        minute: str_field(rec, "minute").filter(|m| !m.is_empty()),
    })
}

fn parse_keeper(rec: &Value) -> Option<GoalkeeperAppearance> {
    let player = non_empty_str(rec, "player")?;
    let match_id = non_empty_str(rec, "match_id")?;
    Some(GoalkeeperAppearance {
        player,
        match_id: MatchId::new(match_id),
        team: str_field(rec, "team").unwrap_or_default(),
        role: str_field(rec, "role").and_then(|r| KeeperRole::from_token(&r)),
        sub_minute: match u32_field(rec, "sub_minute") {
            0 => None,
            m => Some(m),
        },
        goals_conceded: u32_field(rec, "goals_conceded"),
    })
}

/// String field, trimmed; `None` when absent or not a string/number.
fn str_field(rec: &Value, key: &str) -> Option<String> {
    match rec.get(key)? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty_str(rec: &Value, key: &str) -> Option<String> {
    str_field(rec, key).filter(|s| !s.is_empty())
}

/// Numeric field coerced from a JSON number or numeric text; anything else
/// becomes 0.
fn u32_field(rec: &Value, key: &str) -> u32 {
    match rec.get(key) {
        // Spreadsheet numerics sometimes arrive as floats; truncate.
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0)
            .min(u32::MAX as u64) as u32,
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}
