use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use football_radar::dataset::Datasets;
use football_radar::error::{ExportError, LoadError, PageError};
use chrono::NaiveDate;

use football_radar::fixtures_api::{Fixture, TeamRef, parse_fixtures_json};
use football_radar::pipeline::{self, RequestContext};
use football_radar::results::SeasonDiscovery;
use football_radar::selection::SelectionQuery;
use football_radar::state::{AppState, ExportKind, ExportState, Screen, StatsFocus};

fn fixture_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path
}

fn team(id: u32, name: &str) -> TeamRef {
    TeamRef {
        id,
        name: name.to_string(),
    }
}

fn meeting(
    id: u64,
    date: &str,
    home: TeamRef,
    away: TeamRef,
    goals: Option<(u32, u32)>,
) -> Fixture {
    Fixture {
        id,
        date: date.to_string(),
        league: "Premier League".to_string(),
        home,
        away,
        home_goals: goals.map(|g| g.0),
        away_goals: goals.map(|g| g.1),
    }
}

fn results_state_with_arsenal_loaded() -> AppState {
    let mut state = AppState::new(5, true);
    state.apply_discovery(Ok(Some(SeasonDiscovery {
        season: 2024,
        seasons: vec![2024, 2023],
        teams: vec![team(42, "Arsenal"), team(49, "Chelsea")],
    })));
    let raw = std::fs::read_to_string(fixture_dir().join("api_fixtures.json")).expect("fixture");
    let fixtures = parse_fixtures_json(&raw).expect("parse");
    let older = meeting(
        900,
        "2023-12-01T15:00:00+00:00",
        team(42, "Arsenal"),
        team(49, "Chelsea"),
        Some((0, 1)),
    );
    state.apply_fixtures(Ok(vec![(2024, fixtures), (2023, vec![older])]));
    state
}

fn loaded_state() -> (AppState, Datasets) {
    let ds = Datasets::load(&fixture_dir()).expect("fixture datasets should load");
    let mut state = AppState::new(5, false);
    state.apply_load(Ok(&ds));
    (state, ds)
}

fn render_current(state: &mut AppState, ds: &Datasets, out: &Path) {
    let query = state.current_query().expect("full selection");
    let ctx = RequestContext {
        query,
        data_dir: fixture_dir(),
        output_dir: out.to_path_buf(),
        seed: 5,
    };
    state.apply_render(pipeline::render(&ctx, ds));
}

#[test]
fn load_fills_the_cascade_with_first_entries() {
    let (state, _) = loaded_state();
    assert!(state.fatal.is_none());
    assert_eq!(state.competitions.current(), Some("La Liga"));
    assert_eq!(state.teams.current(), Some("Barcelona"));
    assert_eq!(
        state.players.items,
        vec![
            "Marc-André ter Stegen".to_string(),
            "Robert Lewandowski".to_string()
        ]
    );
    assert!(state.logs.back().is_some_and(|l| l.starts_with("[INFO] Loaded 11")));
}

#[test]
fn changing_an_upstream_list_resets_downstream_choices() {
    let (mut state, ds) = loaded_state();

    state.focus = StatsFocus::Player;
    state.select_next(&ds);
    assert_eq!(state.players.current(), Some("Robert Lewandowski"));

    state.focus = StatsFocus::Competition;
    state.select_next(&ds);
    assert_eq!(state.competitions.current(), Some("Premier League"));
    assert_eq!(state.teams.current(), Some("Arsenal"));
    assert_eq!(state.players.current(), Some("Bukayo Saka"));

    state.focus_next();
    assert_eq!(state.focus, StatsFocus::Team);
    state.select_next(&ds);
    assert_eq!(state.teams.current(), Some("Chelsea"));
    assert_eq!(state.players.current(), Some("Cole Palmer"));

    // Wraps around.
    state.focus_prev();
    state.select_next(&ds);
    assert_eq!(state.competitions.current(), Some("La Liga"));
}

#[test]
fn threshold_stays_within_range() {
    let empty = Datasets::default();
    let mut state = AppState::new(40, false);
    assert_eq!(state.min_matches, 38);
    state.raise_threshold(&empty);
    assert_eq!(state.min_matches, 38);
    state.lower_threshold(&empty);
    assert_eq!(state.min_matches, 37);

    let mut state = AppState::new(0, false);
    assert_eq!(state.min_matches, 1);
    state.lower_threshold(&empty);
    assert_eq!(state.min_matches, 1);
}

#[test]
fn load_failure_halts_the_page() {
    let mut state = AppState::new(5, false);
    state.apply_load(Err(LoadError::Missing(PathBuf::from("data/players.csv"))));
    assert!(state.fatal.as_deref().is_some_and(|m| m.contains("players.csv")));
    assert!(state.logs.back().is_some_and(|l| l.starts_with("[ERROR]")));
}

#[test]
fn empty_cohort_is_a_status_message_not_a_failure() {
    let out = tempfile::tempdir().expect("tempdir");
    let (mut state, ds) = loaded_state();
    state.min_matches = 38;
    render_current(&mut state, &ds, out.path());

    assert!(state.fatal.is_none());
    assert!(state.last_artifact.is_none());
    assert!(state.status.as_deref().is_some_and(|m| m.contains("at least 38")));
    assert!(state.logs.back().is_some_and(|l| l.starts_with("[INFO]")));
}

#[test]
fn bars_follow_the_current_selection_only() {
    let out = tempfile::tempdir().expect("tempdir");
    let (mut state, ds) = loaded_state();
    state.focus = StatsFocus::Competition;
    state.select_next(&ds);
    render_current(&mut state, &ds, out.path());

    assert!(state.current_artifact().is_some());
    // Jackson's "n/a" row is reported as dropped.
    assert!(state.logs.iter().any(|l| l.starts_with("[WARN] 1 cohort rows dropped")));
    let bars = state.normalized_bars();
    assert_eq!(bars.len(), 6);
    assert_eq!(bars[0].0, "Goals per 90");
    assert!(bars.iter().all(|(_, v)| *v <= 100));

    state.raise_threshold(&ds);
    assert!(state.current_artifact().is_none());
    assert!(state.normalized_bars().is_empty());
    state.lower_threshold(&ds);
    assert!(state.current_artifact().is_some());
}

#[test]
fn export_without_a_render_is_reported() {
    let (mut state, _) = loaded_state();
    state.apply_export(ExportKind::Pdf, Err(PageError::Export(ExportError::NotRendered)));
    assert!(state.export.done);
    assert!(state.export.path.is_none());
    assert!(state.export.message.starts_with("PDF failed"));
    assert!(state.fatal.is_none());
    assert!(state.logs.back().is_some_and(|l| l.starts_with("[WARN]")));

    state.apply_export(ExportKind::Workbook, Ok(PathBuf::from("out/cohort_x.xlsx")));
    assert_eq!(state.export.path, Some(PathBuf::from("out/cohort_x.xlsx")));
    assert!(state.export.message.starts_with("Workbook saved"));
}

#[test]
fn export_banner_clears_after_its_window() {
    let mut export = ExportState::default();
    export.finish("PDF saved", None);
    let start = export.last_updated.expect("timestamp");
    export.clear_if_done_for(start + Duration::from_secs(2), 8);
    assert!(export.done);
    export.clear_if_done_for(start + Duration::from_secs(9), 8);
    assert!(!export.done);
    assert!(export.message.is_empty());

    let mut idle = ExportState::default();
    idle.clear_if_done_for(Instant::now(), 0);
    assert!(!idle.done);
}

#[test]
fn log_is_bounded() {
    let mut state = AppState::new(5, false);
    for i in 0..250 {
        state.push_log(format!("line {i}"));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.front().map(String::as_str), Some("line 50"));
}

#[test]
fn results_screen_needs_a_key() {
    let mut disabled = AppState::new(5, false);
    disabled.toggle_screen();
    assert_eq!(disabled.screen, Screen::Stats);
    assert!(disabled.logs.back().is_some_and(|l| l.starts_with("[WARN]")));

    let mut enabled = AppState::new(5, true);
    enabled.toggle_screen();
    assert_eq!(enabled.screen, Screen::Results);
    enabled.toggle_screen();
    assert_eq!(enabled.screen, Screen::Stats);
}

#[test]
fn fixtures_fill_results_for_the_selected_team() {
    let mut state = AppState::new(5, true);
    state.apply_discovery(Ok(Some(SeasonDiscovery {
        season: 2024,
        seasons: vec![2024, 2023],
        teams: vec![TeamRef {
            id: 42,
            name: "Arsenal".to_string(),
        }],
    })));
    assert_eq!(state.results.selected_team().map(|t| t.id), Some(42));

    let raw = std::fs::read_to_string(fixture_dir().join("api_fixtures.json")).expect("fixture");
    let fixtures = parse_fixtures_json(&raw).expect("parse");
    state.apply_fixtures(Ok(vec![(2024, fixtures)]));
    assert_eq!(state.results.rows.len(), 4);
    assert_eq!(state.results.summaries[0].record.wins, 2);
    assert!(state.results.status.is_none());

    state.results.cycle_league();
    assert_eq!(state.results.league_name(), "La Liga");
    assert!(state.results.teams().is_empty());
    assert!(state.results.rows.is_empty());
}

#[test]
fn missing_season_is_a_results_status() {
    let mut state = AppState::new(5, true);
    state.apply_discovery(Ok(None));
    assert!(
        state
            .results
            .status
            .as_deref()
            .is_some_and(|m| m.contains("Premier League"))
    );
    // Without a team, fixture results are ignored.
    state.apply_fixtures(Ok(Vec::new()));
    assert!(state.results.rows.is_empty());
}

#[test]
fn query_mirrors_the_pick_lists() {
    let (state, _) = loaded_state();
    assert_eq!(
        state.current_query(),
        Some(SelectionQuery::new(
            "La Liga",
            "Barcelona",
            "Marc-André ter Stegen",
            5
        ))
    );
}

#[test]
fn preview_tracks_the_selection_before_any_render() {
    let (mut state, ds) = loaded_state();
    let gk = state.preview.clone().expect("goalkeeper preview");
    assert_eq!(gk.position, "GK");
    assert_eq!(gk.cohort_size, 2);
    assert_eq!(gk.metrics, vec!["Saves per 90", "Pass completion %"]);
    assert!(state.last_artifact.is_none());

    state.focus = StatsFocus::Competition;
    state.select_next(&ds);
    let fw = state.preview.clone().expect("forward preview");
    assert_eq!(fw.position, "FW");
    assert_eq!(fw.cohort_size, 5);
    assert_eq!(fw.dropped, 1);
    assert_eq!(fw.metrics.len(), 6);
    assert_eq!(fw.metrics[0], "Goals per 90");

    state.min_matches = 37;
    state.raise_threshold(&ds);
    assert!(state.preview.is_none());
    assert!(state.status.as_deref().is_some_and(|m| m.contains("at least 38")));

    state.min_matches = 6;
    state.lower_threshold(&ds);
    assert_eq!(state.preview.map(|p| p.cohort_size), Some(5));
    assert!(state.status.is_none());
}

#[test]
fn season_series_run_oldest_first() {
    let state = results_state_with_arsenal_loaded();
    let [wins, draws, losses] = state.results.outcome_series();
    assert_eq!(wins, vec![(2023.0, 0.0), (2024.0, 2.0)]);
    assert_eq!(draws, vec![(2023.0, 0.0), (2024.0, 1.0)]);
    assert_eq!(losses, vec![(2023.0, 1.0), (2024.0, 0.0)]);
    assert_eq!(state.results.goal_totals(), vec![(2023, 0, 1), (2024, 4, 1)]);
}

#[test]
fn head_to_head_needs_a_loaded_team_and_another_highlighted_one() {
    let mut state = results_state_with_arsenal_loaded();
    assert_eq!(state.results.loaded_team.as_ref().map(|t| t.id), Some(42));
    assert!(state.results.opponent().is_none(), "loaded team is highlighted");

    state.results.select_team_next();
    let opponent = state.results.opponent().cloned().expect("Chelsea highlighted");
    assert_eq!(opponent.name, "Chelsea");

    let (arsenal, chelsea) = (team(42, "Arsenal"), team(49, "Chelsea"));
    let meetings = vec![
        meeting(1, "2025-03-01T15:00:00+00:00", arsenal.clone(), chelsea.clone(), Some((2, 1))),
        meeting(2, "2024-09-01T15:00:00+00:00", chelsea.clone(), arsenal.clone(), Some((1, 1))),
        meeting(3, "2019-01-01T15:00:00+00:00", arsenal.clone(), chelsea.clone(), Some((0, 1))),
        meeting(4, "2026-02-01T15:00:00+00:00", chelsea.clone(), arsenal.clone(), None),
    ];
    let today = NaiveDate::from_ymd_opt(2026, 10, 18).expect("date");
    state.apply_head_to_head(opponent, Ok(meetings), 5, today);

    let h2h = state.results.head_to_head.clone().expect("view");
    assert_eq!(h2h.opponent.id, 49);
    let [ours, theirs] = &h2h.totals;
    assert_eq!((ours.record.wins, ours.record.draws, ours.record.losses), (1, 1, 0));
    assert_eq!((ours.record.goals_for, ours.record.goals_against), (3, 2));
    assert_eq!(theirs.record.losses, 1);
    let years: Vec<i32> = h2h.by_year.iter().map(|(y, _)| *y).collect();
    assert_eq!(years, vec![2026, 2025, 2024], "2019 is outside the window");
    assert_eq!(h2h.by_year[0].1.played(), 0);
    assert_eq!(h2h.by_year[1].1.wins, 1);
    assert!(state.logs.back().is_some_and(|l| l.contains("2 meetings")));

    state.apply_head_to_head(team(49, "Chelsea"), Err(anyhow::anyhow!("timeout")), 5, today);
    assert!(state.results.head_to_head.is_none());
    assert!(state.results.status.as_deref().is_some_and(|m| m.contains("timeout")));
}
