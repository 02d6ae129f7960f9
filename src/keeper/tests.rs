//! Unit tests for goalkeeper attribution and keeper stats

use super::*;
use crate::index::build_indices;
use crate::model::{LineupAppearance, Match};
use chrono::NaiveDate;

fn mk_keeper(
    player: &str,
    match_id: &str,
    team: &str,
    role: Option<KeeperRole>,
    sub_minute: Option<u32>,
) -> GoalkeeperAppearance {
    GoalkeeperAppearance {
        player: player.to_string(),
        match_id: MatchId::new(match_id),
        team: team.to_string(),
        role,
        sub_minute,
        goals_conceded: 0,
    }
}

fn mk_goal(player: &str, match_id: &str, team: &str, minute: Option<&str>) -> ActionEvent {
    ActionEvent {
        player: player.to_string(),
        match_id: MatchId::new(match_id),
        team: team.to_string(),
        kind: ActionKind::Goal,
        minute: minute.map(str::to_string),
    }
}

fn mk_match(id: &str, date: Option<(i32, u32, u32)>) -> Match {
    Match {
        id: MatchId::new(id),
        date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        season: "2023-24".to_string(),
        competition: "League".to_string(),
        home_team: "Rovers".to_string(),
        away_team: "United".to_string(),
        result_code: String::new(),
    }
}

fn pair(starter_exit: Option<u32>, sub_entry: Option<u32>) -> Vec<GoalkeeperAppearance> {
    vec![
        mk_keeper("Kim", "m1", "Rovers", Some(KeeperRole::Starter), starter_exit),
        mk_keeper("Lee", "m1", "Rovers", Some(KeeperRole::Substitute), sub_entry),
    ]
}

fn attributed(minute: u32, keepers: &[GoalkeeperAppearance]) -> Option<String> {
    let refs: Vec<&GoalkeeperAppearance> = keepers.iter().collect();
    attribute_goal(minute, &refs).map(|k| k.player.clone())
}

#[test]
fn test_zero_appearances_excluded() {
    assert_eq!(attributed(30, &[]), None);
}

#[test]
fn test_single_appearance_always_responsible() {
    let keepers = vec![mk_keeper("Kim", "m1", "Rovers", None, None)];
    assert_eq!(attributed(0, &keepers).as_deref(), Some("Kim"));
    assert_eq!(attributed(90, &keepers).as_deref(), Some("Kim"));
}

#[test]
fn test_pair_unknown_minute_defaults_to_starter() {
    assert_eq!(attributed(0, &pair(Some(55), Some(55))).as_deref(), Some("Kim"));
}

#[test]
fn test_pair_both_minutes_recorded() {
    // Goal at 60 with exit=55/entry=55 lands on the substitute; at 50 on
    // the starter.
    let keepers = pair(Some(55), Some(55));
    assert_eq!(attributed(60, &keepers).as_deref(), Some("Lee"));
    assert_eq!(attributed(50, &keepers).as_deref(), Some("Kim"));
    // Boundary: minute equal to the entry minute is the substitute's.
    assert_eq!(attributed(55, &keepers).as_deref(), Some("Lee"));
}

#[test]
fn test_pair_inconsistent_window_goes_to_substitute() {
    // Exit before entry leaves a gap the data should not allow.
    let keepers = pair(Some(40), Some(60));
    assert_eq!(attributed(50, &keepers).as_deref(), Some("Lee"));
}

#[test]
fn test_pair_only_starter_exit_recorded() {
    let keepers = pair(Some(55), None);
    assert_eq!(attributed(54, &keepers).as_deref(), Some("Kim"));
    assert_eq!(attributed(55, &keepers).as_deref(), Some("Lee"));
}

#[test]
fn test_pair_only_substitute_entry_recorded() {
    let keepers = pair(None, Some(70));
    assert_eq!(attributed(69, &keepers).as_deref(), Some("Kim"));
    assert_eq!(attributed(70, &keepers).as_deref(), Some("Lee"));
}

#[test]
fn test_pair_no_minutes_starter_owns_match() {
    let keepers = pair(None, None);
    assert_eq!(attributed(85, &keepers).as_deref(), Some("Kim"));
}

#[test]
fn test_pair_zero_sub_minute_treated_as_unrecorded() {
    let keepers = pair(Some(0), Some(0));
    assert_eq!(attributed(85, &keepers).as_deref(), Some("Kim"));
}

#[test]
fn test_untagged_pair_uses_source_order() {
    let keepers = vec![
        mk_keeper("Kim", "m1", "Rovers", None, Some(55)),
        mk_keeper("Lee", "m1", "Rovers", None, Some(55)),
    ];
    // First row is treated as the starter.
    assert_eq!(attributed(50, &keepers).as_deref(), Some("Kim"));
    assert_eq!(attributed(60, &keepers).as_deref(), Some("Lee"));
}

#[test]
fn test_three_appearances_uses_tagged_pair() {
    let keepers = vec![
        mk_keeper("Extra", "m1", "Rovers", None, None),
        mk_keeper("Kim", "m1", "Rovers", Some(KeeperRole::Starter), Some(55)),
        mk_keeper("Lee", "m1", "Rovers", Some(KeeperRole::Substitute), Some(55)),
    ];
    assert_eq!(attributed(50, &keepers).as_deref(), Some("Kim"));
    assert_eq!(attributed(60, &keepers).as_deref(), Some("Lee"));
}

#[test]
fn test_three_untagged_appearances_falls_back_to_first_row() {
    let keepers = vec![
        mk_keeper("A", "m1", "Rovers", None, None),
        mk_keeper("B", "m1", "Rovers", None, None),
        mk_keeper("C", "m1", "Rovers", None, None),
    ];
    assert_eq!(attributed(50, &keepers).as_deref(), Some("A"));
}

#[test]
fn test_attribute_goalkeeper_uses_parsed_minute() {
    let keepers = pair(Some(55), Some(55));
    let refs: Vec<&GoalkeeperAppearance> = keepers.iter().collect();
    let goal = mk_goal("Striker", "m1", "United", Some("57"));
    assert_eq!(attribute_goalkeeper(&goal, &refs).as_deref(), Some("Lee"));
    let unknown = mk_goal("Striker", "m1", "United", Some("n/a"));
    assert_eq!(attribute_goalkeeper(&unknown, &refs).as_deref(), Some("Kim"));
}

fn match_tables() -> Tables {
    Tables {
        matches: vec![
            mk_match("m1", Some((2024, 3, 2))),
            mk_match("m2", Some((2024, 3, 9))),
            mk_match("m3", Some((2024, 3, 16))),
        ],
        lineups: vec![LineupAppearance {
            player: "Kim".to_string(),
            match_id: MatchId::new("m1"),
            team: "Rovers".to_string(),
            minutes: 90,
        }],
        actions: Vec::new(),
        keepers: Vec::new(),
    }
}

fn candidates(ids: &[&str]) -> CandidateSet {
    ids.iter().map(|s| MatchId::new(*s)).collect()
}

#[test]
fn test_duplicate_goal_rows_counted_once() {
    let mut tables = match_tables();
    tables.keepers = vec![mk_keeper("Kim", "m1", "Rovers", Some(KeeperRole::Starter), None)];
    tables.actions = vec![
        mk_goal("Striker", "m1", "United", Some("20")),
        mk_goal("Striker", "m1", "United", Some("20")), // exact duplicate
        mk_goal("Striker", "m1", "United", Some("75")),
    ];
    let idx = build_indices(&tables);

    let goals = attribute_match_goals("Rovers", &MatchId::new("m1"), &tables, Some(&idx));
    assert_eq!(goals.len(), 2);

    let v = compute_keeper_stats(
        "Kim",
        &TeamScope::any(),
        &candidates(&["m1"]),
        &tables,
        Some(&idx),
    );
    assert_eq!(v.goals_conceded, 2);
}

#[test]
fn test_penalty_subtype_survives_attribution() {
    let mut tables = match_tables();
    tables.keepers = vec![mk_keeper("Kim", "m1", "Rovers", Some(KeeperRole::Starter), None)];
    tables.actions = vec![
        mk_goal("Striker", "m1", "United", Some("20")),
        ActionEvent {
            player: "Striker".to_string(),
            match_id: MatchId::new("m1"),
            team: "United".to_string(),
            kind: ActionKind::PenaltyGoal,
            minute: Some("65".to_string()),
        },
    ];
    let idx = build_indices(&tables);
    let v = compute_keeper_stats(
        "Kim",
        &TeamScope::any(),
        &candidates(&["m1"]),
        &tables,
        Some(&idx),
    );
    assert_eq!(v.goals_conceded, 2);
    assert_eq!(v.penalties_conceded, 1);
}

#[test]
fn test_shared_match_credits_no_clean_sheet() {
    let mut tables = match_tables();
    tables.keepers = vec![
        mk_keeper("Kim", "m1", "Rovers", Some(KeeperRole::Starter), Some(55)),
        mk_keeper("Lee", "m1", "Rovers", Some(KeeperRole::Substitute), Some(55)),
    ];
    // The only goal falls after the change, so Kim conceded nothing.
    tables.actions = vec![mk_goal("Striker", "m1", "United", Some("80"))];
    let idx = build_indices(&tables);

    let kim = compute_keeper_stats(
        "Kim",
        &TeamScope::any(),
        &candidates(&["m1"]),
        &tables,
        Some(&idx),
    );
    assert_eq!(kim.goals_conceded, 0);
    assert_eq!(kim.clean_sheets, 0);

    let lee = compute_keeper_stats(
        "Lee",
        &TeamScope::any(),
        &candidates(&["m1"]),
        &tables,
        Some(&idx),
    );
    assert_eq!(lee.goals_conceded, 1);
    assert_eq!(lee.clean_sheets, 0);
}

#[test]
fn test_sole_keeper_clean_sheet() {
    let mut tables = match_tables();
    tables.keepers = vec![mk_keeper("Kim", "m1", "Rovers", Some(KeeperRole::Starter), None)];
    let idx = build_indices(&tables);
    let v = compute_keeper_stats(
        "Kim",
        &TeamScope::any(),
        &candidates(&["m1"]),
        &tables,
        Some(&idx),
    );
    assert_eq!(v.matches_played, 1);
    assert_eq!(v.total_minutes, 90);
    assert_eq!(v.clean_sheets, 1);
    assert_eq!(v.longest_clean_sheet_run, 1);
}

#[test]
fn test_streaks_scan_by_date_ascending() {
    let mut tables = match_tables();
    tables.keepers = vec![
        mk_keeper("Kim", "m1", "Rovers", Some(KeeperRole::Starter), None),
        mk_keeper("Kim", "m2", "Rovers", Some(KeeperRole::Starter), None),
        mk_keeper("Kim", "m3", "Rovers", Some(KeeperRole::Starter), None),
    ];
    // Conceded in m1 and m2, clean in m3.
    tables.actions = vec![
        mk_goal("Striker", "m1", "United", Some("10")),
        mk_goal("Striker", "m2", "United", Some("10")),
        mk_goal("Other", "m2", "United", Some("40")),
    ];
    let idx = build_indices(&tables);
    let v = compute_keeper_stats(
        "Kim",
        &TeamScope::any(),
        &candidates(&["m1", "m2", "m3"]),
        &tables,
        Some(&idx),
    );
    assert_eq!(v.goals_conceded, 3);
    assert_eq!(v.longest_conceding_run, 2);
    assert_eq!(v.clean_sheets, 1);
    assert_eq!(v.longest_clean_sheet_run, 1);
}

#[test]
fn test_unknown_keeper_is_all_zero() {
    let tables = match_tables();
    let idx = build_indices(&tables);
    let v = compute_keeper_stats(
        "Nobody",
        &TeamScope::any(),
        &candidates(&["m1"]),
        &tables,
        Some(&idx),
    );
    assert!(v.is_zero());
}

#[test]
fn test_keeper_indexed_and_linear_paths_agree() {
    let mut tables = match_tables();
    tables.keepers = vec![
        mk_keeper("Kim", "m1", "Rovers", Some(KeeperRole::Starter), Some(55)),
        mk_keeper("Lee", "m1", "Rovers", Some(KeeperRole::Substitute), Some(55)),
        mk_keeper("Kim", "m2", "Rovers", Some(KeeperRole::Starter), None),
    ];
    tables.actions = vec![
        mk_goal("Striker", "m1", "United", Some("60")),
        mk_goal("Striker", "m2", "United", Some("30")),
    ];
    let idx = build_indices(&tables);
    let ids = candidates(&["m1", "m2", "m3"]);

    for entity in ["Kim", "Lee"] {
        let with_idx = compute_keeper_stats(entity, &TeamScope::any(), &ids, &tables, Some(&idx));
        let without = compute_keeper_stats(entity, &TeamScope::any(), &ids, &tables, None);
        assert_eq!(with_idx, without);
    }
}

#[test]
fn test_conceded_by_keeper_rollup() {
    let mut tables = match_tables();
    tables.keepers = vec![
        mk_keeper("Kim", "m1", "Rovers", Some(KeeperRole::Starter), Some(55)),
        mk_keeper("Lee", "m1", "Rovers", Some(KeeperRole::Substitute), Some(55)),
    ];
    tables.actions = vec![
        mk_goal("Striker", "m1", "United", Some("30")),
        mk_goal("Striker", "m1", "United", Some("70")),
    ];
    let idx = build_indices(&tables);
    let counts = conceded_by_keeper(&candidates(&["m1"]), &tables, Some(&idx));
    assert_eq!(counts.get("Kim"), Some(&1));
    assert_eq!(counts.get("Lee"), Some(&1));
}
