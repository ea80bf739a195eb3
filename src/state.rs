use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Instant;

use chrono::NaiveDate;

use crate::config::{clamp_min_matches, MIN_MATCHES_RANGE};
use crate::dataset::Datasets;
use crate::error::{LoadError, PageError};
use crate::fixtures_api::{Fixture, TeamRef, LEAGUES};
use crate::pipeline::RenderedArtifact;
use crate::results::{self, HeadToHead, MatchRow, Record, SeasonDiscovery, SeasonSummary};
use crate::selection::{self, SelectionQuery};

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Stats,
    Results,
}

/// Which of the three cascading pick lists receives arrow keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsFocus {
    Competition,
    Team,
    Player,
}

impl StatsFocus {
    pub fn next(self) -> Self {
        match self {
            StatsFocus::Competition => StatsFocus::Team,
            StatsFocus::Team => StatsFocus::Player,
            StatsFocus::Player => StatsFocus::Competition,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            StatsFocus::Competition => StatsFocus::Player,
            StatsFocus::Team => StatsFocus::Competition,
            StatsFocus::Player => StatsFocus::Team,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PickList {
    pub items: Vec<String>,
    pub selected: usize,
}

impl PickList {
    pub fn replace(&mut self, items: Vec<String>) {
        let keep = self.current().map(str::to_string);
        self.items = items;
        self.selected = keep
            .and_then(|name| self.items.iter().position(|i| *i == name))
            .unwrap_or(0);
    }

    pub fn current(&self) -> Option<&str> {
        self.items.get(self.selected).map(String::as_str)
    }

    pub fn select_next(&mut self) {
        if self.items.is_empty() {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn select_prev(&mut self) {
        if self.items.is_empty() {
            self.selected = 0;
            return;
        }
        if self.selected == 0 {
            self.selected = self.items.len() - 1;
        } else {
            self.selected -= 1;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Pdf,
    Workbook,
}

#[derive(Debug, Clone, Default)]
pub struct ExportState {
    pub done: bool,
    pub path: Option<PathBuf>,
    pub message: String,
    pub last_updated: Option<Instant>,
}

impl ExportState {
    pub fn finish(&mut self, message: impl Into<String>, path: Option<PathBuf>) {
        self.done = true;
        self.path = path;
        self.message = message.into();
        self.last_updated = Some(Instant::now());
    }

    pub fn clear_if_done_for(&mut self, now: Instant, keep_secs: u64) {
        if !self.done {
            return;
        }
        let Some(last) = self.last_updated else {
            return;
        };
        if now.duration_since(last).as_secs() >= keep_secs {
            *self = Self::default();
        }
    }
}

/// What the current pick lists resolve to, before anything is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionPreview {
    pub position: String,
    pub cohort_size: usize,
    pub dropped: usize,
    pub metrics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadToHeadView {
    pub opponent: TeamRef,
    /// Loaded team first.
    pub totals: [HeadToHead; 2],
    /// Loaded team's record per calendar year, newest first.
    pub by_year: Vec<(i32, Record)>,
}

#[derive(Debug, Clone, Default)]
pub struct ResultsState {
    pub league_idx: usize,
    pub discovery: Option<SeasonDiscovery>,
    pub team_selected: usize,
    /// Team whose fixtures are shown.
    pub loaded_team: Option<TeamRef>,
    pub by_season: Vec<(i32, Vec<Fixture>)>,
    pub summaries: Vec<SeasonSummary>,
    pub rows: Vec<MatchRow>,
    pub head_to_head: Option<HeadToHeadView>,
    pub scroll: u16,
    pub status: Option<String>,
}

impl ResultsState {
    pub fn league_id(&self) -> u32 {
        LEAGUES[self.league_idx % LEAGUES.len()].id
    }

    pub fn league_name(&self) -> &'static str {
        LEAGUES[self.league_idx % LEAGUES.len()].name
    }

    pub fn teams(&self) -> &[TeamRef] {
        self.discovery
            .as_ref()
            .map(|d| d.teams.as_slice())
            .unwrap_or_default()
    }

    pub fn selected_team(&self) -> Option<&TeamRef> {
        self.teams().get(self.team_selected)
    }

    pub fn cycle_league(&mut self) {
        *self = Self {
            league_idx: (self.league_idx + 1) % LEAGUES.len(),
            ..Self::default()
        };
    }

    pub fn select_team_next(&mut self) {
        let total = self.teams().len();
        if total > 0 {
            self.team_selected = (self.team_selected + 1) % total;
        }
    }

    pub fn select_team_prev(&mut self) {
        let total = self.teams().len();
        if total == 0 {
            return;
        }
        self.team_selected = if self.team_selected == 0 {
            total - 1
        } else {
            self.team_selected - 1
        };
    }

    pub fn clear_team_results(&mut self) {
        self.loaded_team = None;
        self.by_season.clear();
        self.summaries.clear();
        self.rows.clear();
        self.head_to_head = None;
        self.scroll = 0;
    }

    /// Highlighted team when it differs from the loaded one.
    pub fn opponent(&self) -> Option<&TeamRef> {
        let loaded = self.loaded_team.as_ref()?;
        self.selected_team().filter(|t| t.id != loaded.id)
    }

    /// Win, draw and loss counts per season, oldest season first, as chart
    /// points `(season, count)`.
    pub fn outcome_series(&self) -> [Vec<(f64, f64)>; 3] {
        let mut series: [Vec<(f64, f64)>; 3] = Default::default();
        for s in self.summaries.iter().rev() {
            let x = f64::from(s.season);
            series[0].push((x, f64::from(s.record.wins)));
            series[1].push((x, f64::from(s.record.draws)));
            series[2].push((x, f64::from(s.record.losses)));
        }
        series
    }

    /// `(season, goals for, goals against)`, oldest season first.
    pub fn goal_totals(&self) -> Vec<(i32, u64, u64)> {
        self.summaries
            .iter()
            .rev()
            .map(|s| {
                (
                    s.season,
                    u64::from(s.record.goals_for),
                    u64::from(s.record.goals_against),
                )
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub focus: StatsFocus,
    pub competitions: PickList,
    pub teams: PickList,
    pub players: PickList,
    pub min_matches: u32,
    /// Recoverable message for the current selection (empty filter, render
    /// or export failure).
    pub status: Option<String>,
    /// Set when the datasets could not be loaded; the stats page halts.
    pub fatal: Option<String>,
    pub preview: Option<SelectionPreview>,
    pub last_artifact: Option<RenderedArtifact>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub export: ExportState,
    pub results: ResultsState,
    pub results_enabled: bool,
}

impl AppState {
    pub fn new(min_matches: u32, results_enabled: bool) -> Self {
        Self {
            screen: Screen::Stats,
            focus: StatsFocus::Competition,
            competitions: PickList::default(),
            teams: PickList::default(),
            players: PickList::default(),
            min_matches: clamp_min_matches(min_matches),
            status: None,
            fatal: None,
            preview: None,
            last_artifact: None,
            logs: VecDeque::new(),
            help_overlay: false,
            export: ExportState::default(),
            results: ResultsState::default(),
            results_enabled,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn maybe_clear_export(&mut self, now: Instant) {
        self.export.clear_if_done_for(now, 8);
    }

    pub fn toggle_screen(&mut self) {
        self.screen = match self.screen {
            Screen::Stats if self.results_enabled => Screen::Results,
            Screen::Stats => {
                self.push_log("[WARN] Results page needs API_FOOTBALL_KEY");
                Screen::Stats
            }
            Screen::Results => Screen::Stats,
        };
    }

    pub fn apply_load(&mut self, result: Result<&Datasets, LoadError>) {
        match result {
            Ok(ds) => {
                self.fatal = None;
                self.load_lists(ds);
                self.push_log(format!(
                    "[INFO] Loaded {} player rows, {} competitions",
                    ds.players.len(),
                    self.competitions.items.len()
                ));
            }
            Err(err) => self.apply_page_error(err.into()),
        }
    }

    /// Refill every pick list from the datasets, keeping current choices
    /// where they still exist.
    pub fn load_lists(&mut self, ds: &Datasets) {
        self.competitions.replace(selection::competitions(ds));
        self.refresh_teams(ds);
        self.refresh_preview(ds);
        if self.competitions.items.is_empty() {
            self.status = Some(crate::error::EmptySelection::NoCompetitions.to_string());
        }
    }

    fn refresh_teams(&mut self, ds: &Datasets) {
        let teams = self
            .competitions
            .current()
            .map(|c| selection::teams(ds, c))
            .unwrap_or_default();
        self.teams.replace(teams);
        self.refresh_players(ds);
    }

    fn refresh_players(&mut self, ds: &Datasets) {
        let players = match (self.competitions.current(), self.teams.current()) {
            (Some(c), Some(t)) => selection::players(ds, c, t),
            _ => Vec::new(),
        };
        self.players.replace(players);
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn select_next(&mut self, ds: &Datasets) {
        self.move_selection(ds, true);
    }

    pub fn select_prev(&mut self, ds: &Datasets) {
        self.move_selection(ds, false);
    }

    fn move_selection(&mut self, ds: &Datasets, forward: bool) {
        let list = match self.focus {
            StatsFocus::Competition => &mut self.competitions,
            StatsFocus::Team => &mut self.teams,
            StatsFocus::Player => &mut self.players,
        };
        if forward {
            list.select_next();
        } else {
            list.select_prev();
        }
        match self.focus {
            StatsFocus::Competition => {
                self.teams = PickList::default();
                self.players = PickList::default();
                self.refresh_teams(ds);
            }
            StatsFocus::Team => {
                self.players = PickList::default();
                self.refresh_players(ds);
            }
            StatsFocus::Player => {}
        }
        self.refresh_preview(ds);
    }

    pub fn raise_threshold(&mut self, ds: &Datasets) {
        self.min_matches = (self.min_matches + 1).min(MIN_MATCHES_RANGE.1);
        self.refresh_preview(ds);
    }

    pub fn lower_threshold(&mut self, ds: &Datasets) {
        self.min_matches = self.min_matches.saturating_sub(1).max(MIN_MATCHES_RANGE.0);
        self.refresh_preview(ds);
    }

    /// Resolve the current selection without rendering. An empty filter step
    /// becomes the status message.
    pub fn refresh_preview(&mut self, ds: &Datasets) {
        self.preview = None;
        self.status = None;
        let Some(query) = self.current_query() else {
            return;
        };
        match selection::select(ds, &query) {
            Ok(sel) => {
                self.preview = Some(SelectionPreview {
                    position: sel.focal.position.clone(),
                    cohort_size: sel.cohort.len(),
                    dropped: sel.cohort.dropped,
                    metrics: sel.metrics.iter().map(|m| m.label.clone()).collect(),
                });
            }
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    pub fn current_query(&self) -> Option<SelectionQuery> {
        Some(SelectionQuery::new(
            self.competitions.current()?,
            self.teams.current()?,
            self.players.current()?,
            self.min_matches,
        ))
    }

    /// The last chart, only while it still matches what is selected.
    pub fn current_artifact(&self) -> Option<&RenderedArtifact> {
        let query = self.current_query()?;
        self.last_artifact.as_ref().filter(|a| a.query == query)
    }

    pub fn apply_render(&mut self, result: Result<RenderedArtifact, PageError>) {
        match result {
            Ok(artifact) => {
                self.push_log(format!(
                    "[INFO] Rendered {} ({} comparables) -> {}",
                    artifact.query.player,
                    artifact.chart.header.cohort_size,
                    artifact.png_path.display()
                ));
                if artifact.dropped > 0 {
                    self.push_log(format!(
                        "[WARN] {} cohort rows dropped for non-numeric metrics",
                        artifact.dropped
                    ));
                }
                self.status = None;
                self.last_artifact = Some(artifact);
            }
            Err(err) => self.apply_page_error(err),
        }
    }

    pub fn apply_export(&mut self, kind: ExportKind, result: Result<PathBuf, PageError>) {
        let label = match kind {
            ExportKind::Pdf => "PDF",
            ExportKind::Workbook => "Workbook",
        };
        match result {
            Ok(path) => {
                self.push_log(format!("[INFO] {label} written: {}", path.display()));
                self.export
                    .finish(format!("{label} saved: {}", path.display()), Some(path));
            }
            Err(err) => {
                self.export.finish(format!("{label} failed: {err}"), None);
                self.apply_page_error(err);
            }
        }
    }

    fn apply_page_error(&mut self, err: PageError) {
        let message = err.to_string();
        if err.is_fatal() {
            self.push_log(format!("[ERROR] {message}"));
            self.fatal = Some(message);
            return;
        }
        let level = match err {
            PageError::Empty(_) => "[INFO]",
            _ => "[WARN]",
        };
        self.push_log(format!("{level} {message}"));
        self.status = Some(message);
    }

    /// Normalised focal values per metric, in percent, for the bar panel.
    pub fn normalized_bars(&self) -> Vec<(String, u64)> {
        let Some(artifact) = self.current_artifact() else {
            return Vec::new();
        };
        artifact
            .chart
            .layout
            .sectors
            .iter()
            .map(|s| (s.label.clone(), (s.normalized() * 100.0).round() as u64))
            .collect()
    }

    pub fn apply_discovery(&mut self, result: anyhow::Result<Option<SeasonDiscovery>>) {
        let league = self.results.league_name();
        match result {
            Ok(Some(discovery)) => {
                self.push_log(format!(
                    "[INFO] {league}: season {} with {} teams",
                    discovery.season,
                    discovery.teams.len()
                ));
                self.results.discovery = Some(discovery);
                self.results.team_selected = 0;
                self.results.status = None;
            }
            Ok(None) => {
                self.results.discovery = None;
                self.results.status = Some(format!("No teams available for {league}"));
                self.push_log(format!("[WARN] No teams available for {league}"));
            }
            Err(err) => {
                self.results.status = Some(format!("Fixtures API failed: {err:#}"));
                self.push_log(format!("[WARN] Fixtures API failed: {err:#}"));
            }
        }
    }

    pub fn apply_fixtures(&mut self, result: anyhow::Result<Vec<(i32, Vec<Fixture>)>>) {
        let Some(team) = self.results.selected_team().cloned() else {
            return;
        };
        self.results.clear_team_results();
        match result {
            Ok(by_season) => {
                self.results.loaded_team = Some(team.clone());
                self.results.summaries = results::season_summaries(&by_season, team.id);
                self.results.rows = results::match_rows(&by_season, team.id);
                self.push_log(format!(
                    "[INFO] {}: {} matches over {} seasons",
                    team.name,
                    self.results.rows.len(),
                    by_season.len()
                ));
                self.results.status = if by_season.is_empty() {
                    Some(format!("No fixtures found for {}", team.name))
                } else {
                    None
                };
                self.results.by_season = by_season;
            }
            Err(err) => {
                self.results.status = Some(format!("Fixtures API failed: {err:#}"));
                self.push_log(format!("[WARN] Fixtures API failed: {err:#}"));
            }
        }
    }

    /// Meetings between the loaded team and `opponent`, kept to the last
    /// `years` calendar years.
    pub fn apply_head_to_head(
        &mut self,
        opponent: TeamRef,
        result: anyhow::Result<Vec<Fixture>>,
        years: u32,
        today: NaiveDate,
    ) {
        let Some(team) = self.results.loaded_team.clone() else {
            return;
        };
        match result {
            Ok(fixtures) => {
                let grouped = results::group_by_year(&fixtures, years, today);
                let recent: Vec<Fixture> = grouped.values().flatten().cloned().collect();
                let totals = results::head_to_head_summary(&recent, &team.name, &opponent.name);
                let by_year = grouped
                    .iter()
                    .rev()
                    .map(|(year, list)| {
                        let [ours, _] =
                            results::head_to_head_summary(list, &team.name, &opponent.name);
                        (*year, ours.record)
                    })
                    .collect();
                self.push_log(format!(
                    "[INFO] {} vs {}: {} meetings in {years} years",
                    team.name,
                    opponent.name,
                    totals[0].record.played()
                ));
                self.results.head_to_head = Some(HeadToHeadView {
                    opponent,
                    totals,
                    by_year,
                });
            }
            Err(err) => {
                self.results.head_to_head = None;
                self.results.status = Some(format!("Fixtures API failed: {err:#}"));
                self.push_log(format!("[WARN] Fixtures API failed: {err:#}"));
            }
        }
    }
}
