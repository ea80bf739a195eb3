use std::fs;
use std::path::PathBuf;

use football_radar::dataset::{self, Datasets};
use football_radar::error::{EmptySelection, LoadError};
use football_radar::selection::{self, SelectionQuery};

fn fixture_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path
}

fn load() -> Datasets {
    Datasets::load(&fixture_dir()).expect("fixture datasets should load")
}

#[test]
fn loads_players_metrics_and_names() {
    let ds = load();
    assert_eq!(ds.players.len(), 11);
    assert_eq!(ds.position_metrics.get("FW").map(|m| m.len()), Some(6));
    assert_eq!(ds.position_metrics.get("GK").map(|m| m.len()), Some(2));
    assert_eq!(ds.metric_names.get("Sh90").map(String::as_str), Some("Shots per 90"));

    let jackson = ds
        .players
        .iter()
        .find(|p| p.player == "Nicolas Jackson")
        .expect("row present");
    assert_eq!(jackson.value("xG90"), None);
    assert_eq!(jackson.value("Sh90"), Some(3.2));
}

#[test]
fn lists_are_sorted_and_distinct() {
    let ds = load();
    assert_eq!(
        selection::competitions(&ds),
        vec!["La Liga".to_string(), "Premier League".to_string()]
    );
    assert_eq!(
        selection::teams(&ds, "Premier League"),
        vec!["Arsenal".to_string(), "Chelsea".to_string()]
    );
    assert_eq!(
        selection::players(&ds, "Premier League", "Arsenal"),
        vec![
            "Bukayo Saka".to_string(),
            "David Raya".to_string(),
            "Declan Rice".to_string(),
            "Gabriel Jesus".to_string(),
        ]
    );
    assert!(selection::teams(&ds, "Serie A").is_empty());
}

#[test]
fn candidates_apply_each_given_filter() {
    let ds = load();
    assert_eq!(selection::candidates(&ds, None, None, None).len(), 11);
    assert_eq!(
        selection::candidates(&ds, Some("La Liga"), None, None).len(),
        5
    );
    assert_eq!(
        selection::candidates(&ds, Some("La Liga"), Some("Real Madrid"), None).len(),
        3
    );
    assert_eq!(
        selection::candidates(&ds, Some("La Liga"), Some("Real Madrid"), Some("Endrick")).len(),
        1
    );
}

#[test]
fn cohort_respects_position_threshold_and_drops_non_numeric_rows() {
    let ds = load();
    let query = SelectionQuery::new("Premier League", "Arsenal", "Bukayo Saka", 5);
    let sel = selection::select(&ds, &query).expect("selection resolves");

    assert_eq!(sel.focal.player, "Bukayo Saka");
    assert_eq!(sel.metrics.len(), 6);
    assert_eq!(sel.metrics[0].label, "Goals per 90");
    // No display name: label falls back to the column id.
    assert_eq!(sel.metrics[5].label, "Tkl90");

    let names: Vec<&str> = sel.cohort.members.iter().map(|r| r.player.as_str()).collect();
    assert_eq!(sel.cohort.len(), 5);
    assert!(names.contains(&"Robert Lewandowski"), "cohort spans competitions");
    assert!(!names.contains(&"Endrick"), "below the match threshold");
    assert!(!names.contains(&"Nicolas Jackson"), "non-numeric xG90");
    assert_eq!(sel.cohort.dropped, 1);
    for member in &sel.cohort.members {
        assert_eq!(member.position, "FW");
        assert!(member.matches.unwrap_or(0.0) >= 5.0);
    }

    let mut shots = sel.cohort.values("Sh90");
    shots.sort_by(f64::total_cmp);
    assert_eq!(shots, vec![0.0, 1.0, 2.0, 3.0, 10.0]);
}

#[test]
fn raising_the_threshold_shrinks_the_cohort() {
    let ds = load();
    let low = selection::select(&ds, &SelectionQuery::new("Premier League", "Arsenal", "Bukayo Saka", 1))
        .expect("low threshold");
    let high = selection::select(&ds, &SelectionQuery::new("Premier League", "Arsenal", "Bukayo Saka", 21))
        .expect("high threshold");
    assert_eq!(low.cohort.len(), 6);
    assert_eq!(high.cohort.len(), 3);
}

#[test]
fn threshold_above_every_candidate_is_empty_cohort() {
    let ds = load();
    let query = SelectionQuery::new("Premier League", "Arsenal", "Bukayo Saka", 38);
    let err = selection::select(&ds, &query).expect_err("nobody has 38 matches");
    assert_eq!(
        err,
        EmptySelection::EmptyCohort {
            position: "FW".to_string(),
            min_matches: 38
        }
    );
}

#[test]
fn threshold_is_clamped_to_supported_range() {
    assert_eq!(SelectionQuery::new("a", "b", "c", 0).min_matches, 1);
    assert_eq!(SelectionQuery::new("a", "b", "c", 99).min_matches, 38);
}

#[test]
fn empty_filter_steps_are_reported() {
    let ds = load();
    assert!(matches!(
        selection::select(&ds, &SelectionQuery::new("Serie A", "Inter", "Lautaro", 5)),
        Err(EmptySelection::NoTeams { .. })
    ));
    assert!(matches!(
        selection::select(&ds, &SelectionQuery::new("La Liga", "Girona", "Someone", 5)),
        Err(EmptySelection::NoPlayers { .. })
    ));
    assert!(matches!(
        selection::select(&ds, &SelectionQuery::new("La Liga", "Barcelona", "Pedri", 5)),
        Err(EmptySelection::PlayerNotFound { .. })
    ));
    assert!(matches!(
        selection::select(&ds, &SelectionQuery::new("Premier League", "Arsenal", "Declan Rice", 5)),
        Err(EmptySelection::NoMetrics { .. })
    ));
    assert_eq!(
        selection::select(&Datasets::default(), &SelectionQuery::new("x", "y", "z", 5)).err(),
        Some(EmptySelection::NoCompetitions)
    );
}

#[test]
fn goalkeeper_cohort_uses_its_own_metrics() {
    let ds = load();
    let sel = selection::select(&ds, &SelectionQuery::new("La Liga", "Real Madrid", "Thibaut Courtois", 5))
        .expect("gk selection");
    assert_eq!(
        sel.metrics.iter().map(|m| m.id.as_str()).collect::<Vec<_>>(),
        vec!["Saves90", "Cmp%"]
    );
    assert_eq!(sel.cohort.len(), 2);
}

#[test]
fn missing_file_is_a_load_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = Datasets::load(dir.path()).expect_err("no files");
    assert!(matches!(err, LoadError::Missing(path) if path.ends_with(dataset::PLAYERS_FILE)));
}

#[test]
fn missing_required_column_is_a_load_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join(dataset::PLAYERS_FILE),
        "Player,Squad,Competition,Matches\nA,B,C,10\n",
    )
    .expect("write players");
    let err = Datasets::load(dir.path()).expect_err("no position column");
    assert!(matches!(err, LoadError::MissingColumn { column: "Pos", .. }));
}

#[test]
fn parse_number_rejects_blank_and_non_finite() {
    assert_eq!(dataset::parse_number(" 4.5 "), Some(4.5));
    assert_eq!(dataset::parse_number(""), None);
    assert_eq!(dataset::parse_number("n/a"), None);
    assert_eq!(dataset::parse_number("NaN"), None);
    assert_eq!(dataset::parse_number("inf"), None);
}

#[test]
fn matches_column_can_be_charted_as_a_metric() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join(dataset::PLAYERS_FILE),
        "Player,Squad,Competition,Pos,Matches,Goals\n\
         Ann,Lions,League,FW,10,4\n\
         Bea,Tigers,League,FW,20,9\n",
    )
    .expect("write players");
    fs::write(
        dir.path().join(dataset::POSITION_METRICS_FILE),
        "FW\nGoals\nMatches\n",
    )
    .expect("write metrics");
    fs::write(
        dir.path().join(dataset::METRIC_NAMES_FILE),
        "column,display_name\nGoals,Goals scored\n",
    )
    .expect("write names");

    let ds = Datasets::load(dir.path()).expect("datasets");
    let sel = selection::select(&ds, &SelectionQuery::new("League", "Lions", "Ann", 1))
        .expect("matches is numeric for every row");
    assert_eq!(sel.cohort.len(), 2);
    assert_eq!(sel.cohort.dropped, 0);
    assert_eq!(
        sel.metrics.iter().map(|m| m.id.as_str()).collect::<Vec<_>>(),
        vec!["Goals", "Matches"]
    );
    assert_eq!(sel.focal.value("Matches"), Some(10.0));
    let mut matches = sel.cohort.values("Matches");
    matches.sort_by(f64::total_cmp);
    assert_eq!(matches, vec![10.0, 20.0]);
}
