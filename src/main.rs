use std::fs;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph,
    Wrap,
};
use tracing_subscriber::EnvFilter;

use football_radar::config::AppConfig;
use football_radar::dataset::{self, Datasets};
use football_radar::error::ExportError;
use football_radar::fixtures_api::{ApiFootball, FixturesSource};
use football_radar::pipeline::{self, RequestContext};
use football_radar::results::{self, Record};
use football_radar::state::{AppState, ExportKind, HeadToHeadView, PickList, Screen, StatsFocus};

struct App {
    config: AppConfig,
    state: AppState,
    datasets: Option<&'static Datasets>,
    source: Option<ApiFootball>,
    should_quit: bool,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let source = config
            .api_key
            .as_ref()
            .map(|key| ApiFootball::new(config.api_base.clone(), key.clone()));
        Self {
            state: AppState::new(config.min_matches, source.is_some()),
            config,
            datasets: None,
            source,
            should_quit: false,
        }
    }

    fn load_datasets(&mut self) {
        let result = dataset::datasets(&self.config.data_dir);
        if let Ok(ds) = &result {
            self.datasets = Some(*ds);
        }
        self.state.apply_load(result);
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Tab => {
                self.state.toggle_screen();
                if self.state.screen == Screen::Results && self.state.results.discovery.is_none() {
                    self.discover_season();
                }
            }
            _ => match self.state.screen {
                Screen::Stats => self.on_stats_key(key),
                Screen::Results => self.on_results_key(key),
            },
        }
    }

    fn on_stats_key(&mut self, key: KeyEvent) {
        if self.state.fatal.is_some() {
            return;
        }
        let Some(ds) = self.datasets else {
            return;
        };
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(ds),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(ds),
            KeyCode::Char('l') | KeyCode::Right => self.state.focus_next(),
            KeyCode::Char('h') | KeyCode::Left => self.state.focus_prev(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.state.raise_threshold(ds),
            KeyCode::Char('-') => self.state.lower_threshold(ds),
            KeyCode::Char('g') | KeyCode::Enter => self.render_chart(ds),
            KeyCode::Char('p') => self.export_pdf(),
            KeyCode::Char('x') => self.export_workbook(ds),
            _ => {}
        }
    }

    fn on_results_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('l') => {
                self.state.results.cycle_league();
                self.discover_season();
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.results.select_team_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.results.select_team_prev(),
            KeyCode::Enter => self.load_team_fixtures(),
            KeyCode::Char('o') => self.load_head_to_head(),
            KeyCode::PageDown => {
                self.state.results.scroll = self.state.results.scroll.saturating_add(5);
            }
            KeyCode::PageUp => {
                self.state.results.scroll = self.state.results.scroll.saturating_sub(5);
            }
            _ => {}
        }
    }

    fn render_chart(&mut self, ds: &Datasets) {
        let Some(query) = self.state.current_query() else {
            self.state.push_log("[INFO] Pick a competition, team and player first");
            return;
        };
        let ctx = RequestContext::new(&self.config, query);
        let started = Instant::now();
        let result = pipeline::render(&ctx, ds);
        tracing::debug!(elapsed_ms = started.elapsed().as_millis() as u64, "render pass");
        self.state.apply_render(result);
    }

    fn export_pdf(&mut self) {
        let result = match self.state.current_query() {
            Some(query) => pipeline::export_pdf(
                self.state.last_artifact.as_ref(),
                &query,
                &self.config.output_dir,
            ),
            None => Err(ExportError::NotRendered.into()),
        };
        self.state.apply_export(ExportKind::Pdf, result);
    }

    fn export_workbook(&mut self, ds: &Datasets) {
        let result = match self.state.current_query() {
            Some(query) => {
                let ctx = RequestContext::new(&self.config, query);
                pipeline::export_workbook(&ctx, ds, self.state.last_artifact.as_ref())
            }
            None => Err(ExportError::NotRendered.into()),
        };
        self.state.apply_export(ExportKind::Workbook, result);
    }

    fn discover_season(&mut self) {
        let Some(source) = self.source.as_ref() else {
            return;
        };
        let league = self.state.results.league_id();
        self.state.push_log(format!(
            "[INFO] Looking up current season for {}",
            self.state.results.league_name()
        ));
        let result = results::discover_season(source, league);
        self.state.apply_discovery(result);
    }

    fn load_team_fixtures(&mut self) {
        let Some(source) = self.source.as_ref() else {
            return;
        };
        let (Some(team), Some(discovery)) = (
            self.state.results.selected_team(),
            self.state.results.discovery.as_ref(),
        ) else {
            return;
        };
        let seasons: Vec<i32> = discovery
            .seasons
            .iter()
            .copied()
            .take(self.config.results_years as usize)
            .collect();
        let result = results::fixtures_by_season(
            source,
            self.state.results.league_id(),
            &seasons,
            team.id,
        );
        self.state.apply_fixtures(result);
    }

    fn load_head_to_head(&mut self) {
        let Some(source) = self.source.as_ref() else {
            return;
        };
        let (Some(team), Some(opponent)) = (
            self.state.results.loaded_team.clone(),
            self.state.results.opponent().cloned(),
        ) else {
            self.state
                .push_log("[INFO] Load a team, then highlight an opponent and press o");
            return;
        };
        let result = source.head_to_head(team.id, opponent.id);
        let today = chrono::Local::now().date_naive();
        self.state
            .apply_head_to_head(opponent, result, self.config.results_years, today);
    }
}

fn init_tracing(output_dir: &Path) -> io::Result<()> {
    fs::create_dir_all(output_dir)?;
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(output_dir.join("dashboard.log"))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // The terminal is in raw mode, so logs go to a file instead of stderr.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let config = AppConfig::from_env();
    if let Err(err) = init_tracing(&config.output_dir) {
        eprintln!("warning: file logging disabled: {err}");
    }
    tracing::info!(data_dir = %config.data_dir.display(), "dashboard starting");

    let mut app = App::new(config);
    app.load_datasets();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        app.state.maybe_clear_export(Instant::now());
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Stats => render_stats(frame, chunks[1], &app.state),
        Screen::Results => render_results(frame, chunks[1], &app.state),
    }

    let footer = Paragraph::new(footer_text(&app.state))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let title = match state.screen {
        Screen::Stats => format!("PLAYER RADAR | Min matches: {}", state.min_matches),
        Screen::Results => format!("TEAM RESULTS | {}", state.results.league_name()),
    };
    let line2 = if state.export.done {
        state.export.message.as_str()
    } else {
        ""
    };
    format!("  (o)  {title}\n        {line2}")
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Stats => {
            "h/l Focus | j/k Move | +/- Min matches | g Render | p PDF | x Workbook | Tab Results | ? Help | q Quit".to_string()
        }
        Screen::Results => {
            "l League | j/k Team | Enter Load | o Head-to-head | PgUp/PgDn Scroll | Tab Stats | ? Help | q Quit".to_string()
        }
    }
}

fn render_stats(frame: &mut Frame, area: Rect, state: &AppState) {
    if let Some(message) = &state.fatal {
        let text = format!("Data could not be loaded.\n\n{message}\n\nFix the files under DATA_DIR and restart.");
        let p = Paragraph::new(text)
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: false })
            .block(Block::default().title("Error").borders(Borders::ALL));
        frame.render_widget(p, area);
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(32), Constraint::Percentage(68)])
        .split(area);

    let lists = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(35),
            Constraint::Percentage(40),
        ])
        .split(columns[0]);
    render_pick_list(frame, lists[0], "Competition", &state.competitions, state.focus == StatsFocus::Competition);
    render_pick_list(frame, lists[1], "Team", &state.teams, state.focus == StatsFocus::Team);
    render_pick_list(frame, lists[2], "Player", &state.players, state.focus == StatsFocus::Player);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Min(5),
            Constraint::Length(5),
        ])
        .split(columns[1]);

    let summary = Paragraph::new(summary_text(state))
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Selection").borders(Borders::ALL));
    frame.render_widget(summary, right[0]);

    let bars = state.normalized_bars();
    let block = Block::default()
        .title("Normalised values (%)")
        .borders(Borders::ALL);
    if bars.is_empty() {
        let p = Paragraph::new("Press g to render the radar for this player.").block(block);
        frame.render_widget(p, right[1]);
    } else {
        frame.render_widget(normalized_bar_chart(&bars).block(block), right[1]);
    }

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, right[2]);
}

fn render_pick_list(frame: &mut Frame, area: Rect, title: &str, list: &PickList, focused: bool) {
    let visible = area.height.saturating_sub(2) as usize;
    let (start, end) = visible_range(list.selected, list.items.len(), visible);
    let lines: Vec<Line> = list.items[start..end]
        .iter()
        .enumerate()
        .map(|(offset, item)| {
            let selected = start + offset == list.selected;
            let style = match (selected, focused) {
                (true, true) => Style::default().fg(Color::Black).bg(Color::Cyan),
                (true, false) => Style::default().add_modifier(Modifier::BOLD),
                _ => Style::default(),
            };
            Line::styled(item.clone(), style)
        })
        .collect();
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .title(format!("{title} ({})", list.items.len()))
        .borders(Borders::ALL)
        .border_style(border_style);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn summary_text(state: &AppState) -> String {
    let mut lines = Vec::new();
    match state.current_query() {
        Some(q) => lines.push(format!("{} | {} | {}", q.player, q.team, q.competition)),
        None => lines.push("No player selected".to_string()),
    }
    if let Some(preview) = &state.preview {
        lines.push(format!(
            "{} | {} comparables | {} metrics",
            preview.position,
            preview.cohort_size,
            preview.metrics.len()
        ));
        lines.push(format!("Metrics: {}", preview.metrics.join(", ")));
        if preview.dropped > 0 {
            lines.push(format!("{} rows dropped (non-numeric values)", preview.dropped));
        }
    }
    if let Some(artifact) = state.current_artifact() {
        lines.push(format!("Image: {}", artifact.png_path.display()));
    }
    if let Some(status) = &state.status {
        lines.push(status.clone());
    }
    lines.join("\n")
}

fn normalized_bar_chart(values: &[(String, u64)]) -> BarChart<'static> {
    let bars: Vec<Bar<'static>> = values
        .iter()
        .map(|(label, value)| {
            Bar::default()
                .value(*value)
                .label(Line::from(label.clone()))
                .text_value(format!("{value}"))
                .style(Style::default().fg(Color::LightBlue))
        })
        .collect();

    BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .group_gap(0)
        .max(100)
}

fn render_results(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(28), Constraint::Percentage(72)])
        .split(area);

    let teams = state.results.teams();
    let visible = columns[0].height.saturating_sub(2) as usize;
    let (start, end) = visible_range(state.results.team_selected, teams.len(), visible);
    let lines: Vec<Line> = teams[start..end]
        .iter()
        .enumerate()
        .map(|(offset, team)| {
            let style = if start + offset == state.results.team_selected {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default()
            };
            Line::styled(team.name.clone(), style)
        })
        .collect();
    let title = match &state.results.discovery {
        Some(d) => format!("Teams {}", d.season),
        None => "Teams".to_string(),
    };
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().title(title).borders(Borders::ALL)),
        columns[0],
    );

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9),
            Constraint::Length(12),
            Constraint::Min(3),
        ])
        .split(columns[1]);

    frame.render_widget(
        Paragraph::new(season_summary_text(state))
            .block(Block::default().title("Per season").borders(Borders::ALL)),
        right[0],
    );

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(right[1]);
    let series = state.results.outcome_series();
    if series[0].is_empty() {
        let empty = Block::default().borders(Borders::ALL);
        frame.render_widget(empty.clone().title("Results per season"), charts[0]);
        frame.render_widget(empty.title("Goals for vs against"), charts[1]);
    } else {
        frame.render_widget(outcome_chart(&series), charts[0]);
        frame.render_widget(goals_bar_chart(&state.results.goal_totals()), charts[1]);
    }

    let bottom = match &state.results.head_to_head {
        Some(_) => Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(right[2]),
        None => Layout::default()
            .constraints([Constraint::Percentage(100)])
            .split(right[2]),
    };
    frame.render_widget(
        Paragraph::new(match_rows_text(state))
            .scroll((state.results.scroll, 0))
            .block(Block::default().title("Matches").borders(Borders::ALL)),
        bottom[0],
    );
    if let Some(h2h) = &state.results.head_to_head {
        frame.render_widget(
            Paragraph::new(head_to_head_text(h2h)).block(
                Block::default()
                    .title(format!("Head-to-head vs {}", h2h.opponent.name))
                    .borders(Borders::ALL),
            ),
            bottom[1],
        );
    }
}

/// Win/draw/loss lines across seasons.
fn outcome_chart(series: &[Vec<(f64, f64)>; 3]) -> Chart<'_> {
    let seasons: Vec<f64> = series[0].iter().map(|(x, _)| *x).collect();
    let first = seasons.first().copied().unwrap_or_default();
    let last = seasons.last().copied().unwrap_or(first);
    let top = series
        .iter()
        .flatten()
        .map(|(_, y)| *y)
        .fold(1.0, f64::max)
        .ceil();

    let datasets = vec![
        outcome_line("W", Color::Green, &series[0]),
        outcome_line("D", Color::Yellow, &series[1]),
        outcome_line("L", Color::Red, &series[2]),
    ];
    Chart::new(datasets)
        .block(
            Block::default()
                .title("Results per season")
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .bounds([first - 0.5, last + 0.5])
                .labels(vec![
                    Span::raw(format!("{first:.0}")),
                    Span::raw(format!("{last:.0}")),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("Matches")
                .bounds([0.0, top])
                .labels(vec![Span::raw("0"), Span::raw(format!("{top:.0}"))]),
        )
}

fn outcome_line<'a>(name: &'static str, color: Color, data: &'a [(f64, f64)]) -> Dataset<'a> {
    Dataset::default()
        .name(name)
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(data)
}

/// Goals scored and conceded side by side per season.
fn goals_bar_chart(totals: &[(i32, u64, u64)]) -> BarChart<'static> {
    let mut chart = BarChart::default()
        .block(
            Block::default()
                .title("Goals for (green) vs against (red)")
                .borders(Borders::ALL),
        )
        .bar_width(3)
        .bar_gap(1)
        .group_gap(2);
    for (season, scored, conceded) in totals {
        let bars = [
            Bar::default()
                .value(*scored)
                .text_value(format!("{scored}"))
                .style(Style::default().fg(Color::Green)),
            Bar::default()
                .value(*conceded)
                .text_value(format!("{conceded}"))
                .style(Style::default().fg(Color::Red)),
        ];
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(season.to_string()))
                .bars(&bars),
        );
    }
    chart
}

fn head_to_head_text(h2h: &HeadToHeadView) -> String {
    let row = |name: &str, r: &Record| {
        format!(
            "{:<14.14}{:>3}{:>3}{:>3}{:>4}{:>4}",
            name, r.wins, r.draws, r.losses, r.goals_for, r.goals_against
        )
    };
    let mut lines = vec![format!(
        "{:<14}{:>3}{:>3}{:>3}{:>4}{:>4}",
        "", "W", "D", "L", "GF", "GA"
    )];
    for side in &h2h.totals {
        lines.push(row(&side.team, &side.record));
    }
    if h2h.by_year.is_empty() {
        lines.push(String::new());
        lines.push("No meetings in range".to_string());
        return lines.join("\n");
    }
    lines.push(String::new());
    for (year, record) in &h2h.by_year {
        lines.push(row(&year.to_string(), record));
    }
    lines.join("\n")
}

fn season_summary_text(state: &AppState) -> String {
    if let Some(status) = &state.results.status {
        return status.clone();
    }
    if state.results.summaries.is_empty() {
        return "Select a team and press Enter".to_string();
    }
    let mut lines = vec![format!(
        "{:<8}{:>4}{:>4}{:>4}{:>5}{:>5}",
        "Season", "W", "D", "L", "GF", "GA"
    )];
    for s in &state.results.summaries {
        lines.push(format!(
            "{:<8}{:>4}{:>4}{:>4}{:>5}{:>5}",
            s.season,
            s.record.wins,
            s.record.draws,
            s.record.losses,
            s.record.goals_for,
            s.record.goals_against
        ));
    }
    lines.join("\n")
}

fn match_rows_text(state: &AppState) -> Text<'static> {
    let lines: Vec<Line> = state
        .results
        .rows
        .iter()
        .map(|row| {
            let color = match row.result {
                'W' => Color::Green,
                'D' => Color::Yellow,
                'L' => Color::Red,
                _ => Color::DarkGray,
            };
            Line::from(vec![
                Span::raw(format!("{}  ", row.date)),
                Span::styled(row.result.to_string(), Style::default().fg(color)),
                Span::raw(format!("  {}  ({})", row.score_line, row.competition)),
            ])
        })
        .collect();
    Text::from(lines)
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Football Radar - Help",
        "",
        "Global:",
        "  Tab          Switch Stats / Results",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Stats:",
        "  h/l or ←/→   Focus competition / team / player",
        "  j/k or ↑/↓   Move within the focused list",
        "  + / -        Minimum matches (1-38)",
        "  g / Enter    Render radar image",
        "  p            Export PDF summary",
        "  x            Export cohort workbook",
        "",
        "Results:",
        "  l            Cycle league",
        "  j/k          Move team",
        "  Enter        Load team fixtures",
        "  o            Head-to-head: loaded team vs highlighted team",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
