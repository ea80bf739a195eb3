use std::collections::HashMap;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use once_cell::sync::OnceCell;
use tracing::{debug, info};

use crate::error::LoadError;

pub const PLAYERS_FILE: &str = "players.csv";
pub const POSITION_METRICS_FILE: &str = "metrics_by_position.csv";
pub const METRIC_NAMES_FILE: &str = "metric_names.csv";

const COMPETITION_COLUMNS: &[&str] = &["Competition", "Competicion"];
const TEAM_COLUMNS: &[&str] = &["Squad", "Team"];
const PLAYER_COLUMNS: &[&str] = &["Player"];
const POSITION_COLUMNS: &[&str] = &["Pos", "Position"];
const MATCHES_COLUMNS: &[&str] = &["Matches", "Partidos"];
const NAME_ID_COLUMNS: &[&str] = &["column", "columna_original"];
const NAME_LABEL_COLUMNS: &[&str] = &["display_name", "nombre_visual"];

static DATASETS: OnceCell<Datasets> = OnceCell::new();

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub competition: String,
    pub team: String,
    pub player: String,
    pub position: String,
    pub matches: Option<f64>,
    /// Every column, identity ones included -> value; `None` when the cell
    /// was empty or not numeric.
    pub values: HashMap<String, Option<f64>>,
}

impl PlayerRecord {
    pub fn value(&self, metric: &str) -> Option<f64> {
        self.values.get(metric).copied().flatten()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PositionMetrics {
    columns: Vec<(String, Vec<String>)>,
}

impl PositionMetrics {
    pub fn get(&self, position: &str) -> Option<&[String]> {
        self.columns
            .iter()
            .find(|(pos, _)| pos == position)
            .map(|(_, metrics)| metrics.as_slice())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Datasets {
    pub players: Vec<PlayerRecord>,
    pub position_metrics: PositionMetrics,
    pub metric_names: HashMap<String, String>,
}

impl Datasets {
    pub fn load(dir: &Path) -> Result<Self, LoadError> {
        let players = load_players(&dir.join(PLAYERS_FILE))?;
        let position_metrics = load_position_metrics(&dir.join(POSITION_METRICS_FILE))?;
        let metric_names = load_metric_names(&dir.join(METRIC_NAMES_FILE))?;
        info!(
            players = players.len(),
            positions = position_metrics.columns.len(),
            names = metric_names.len(),
            dir = %dir.display(),
            "datasets loaded"
        );
        Ok(Self {
            players,
            position_metrics,
            metric_names,
        })
    }
}

/// Process-wide dataset cache. The first successful load wins; the files are
/// not expected to change while the dashboard runs.
pub fn datasets(dir: &Path) -> Result<&'static Datasets, LoadError> {
    DATASETS.get_or_try_init(|| Datasets::load(dir))
}

pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn open_reader(path: &Path) -> Result<csv::Reader<std::fs::File>, LoadError> {
    if !path.exists() {
        return Err(LoadError::Missing(path.to_path_buf()));
    }
    ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(|source| csv_error(path, source))
}

fn csv_error(path: &Path, source: csv::Error) -> LoadError {
    LoadError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

fn find_column(
    headers: &StringRecord,
    aliases: &[&'static str],
    path: &Path,
) -> Result<usize, LoadError> {
    aliases
        .iter()
        .find_map(|alias| headers.iter().position(|h| h.eq_ignore_ascii_case(alias)))
        .ok_or_else(|| LoadError::MissingColumn {
            path: path.to_path_buf(),
            column: aliases[0],
        })
}

fn load_players(path: &Path) -> Result<Vec<PlayerRecord>, LoadError> {
    let mut reader = open_reader(path)?;
    let headers = reader
        .headers()
        .map_err(|source| csv_error(path, source))?
        .clone();

    let competition_idx = find_column(&headers, COMPETITION_COLUMNS, path)?;
    let team_idx = find_column(&headers, TEAM_COLUMNS, path)?;
    let player_idx = find_column(&headers, PLAYER_COLUMNS, path)?;
    let position_idx = find_column(&headers, POSITION_COLUMNS, path)?;
    let matches_idx = find_column(&headers, MATCHES_COLUMNS, path)?;
    // Identity columns stay addressable as metrics too (Matches is numeric).
    let metric_columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(_, name)| !name.is_empty())
        .map(|(idx, name)| (idx, name.to_string()))
        .collect();

    let mut out = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|source| csv_error(path, source))?;
        let cell = |idx: usize| row.get(idx).unwrap_or_default().to_string();
        let values = metric_columns
            .iter()
            .map(|(idx, name)| (name.clone(), row.get(*idx).and_then(parse_number)))
            .collect();
        out.push(PlayerRecord {
            competition: cell(competition_idx),
            team: cell(team_idx),
            player: cell(player_idx),
            position: cell(position_idx),
            matches: row.get(matches_idx).and_then(parse_number),
            values,
        });
    }
    debug!(rows = out.len(), metrics = metric_columns.len(), "player table parsed");
    Ok(out)
}

fn load_position_metrics(path: &Path) -> Result<PositionMetrics, LoadError> {
    let mut reader = open_reader(path)?;
    let headers = reader
        .headers()
        .map_err(|source| csv_error(path, source))?
        .clone();
    let mut columns: Vec<(String, Vec<String>)> = headers
        .iter()
        .filter(|h| !h.is_empty())
        .map(|h| (h.to_string(), Vec::new()))
        .collect();
    let header_idx: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !h.is_empty())
        .map(|(idx, _)| idx)
        .collect();

    for row in reader.records() {
        let row = row.map_err(|source| csv_error(path, source))?;
        for (slot, idx) in header_idx.iter().enumerate() {
            let Some(metric) = row.get(*idx) else {
                continue;
            };
            if metric.is_empty() {
                continue;
            }
            columns[slot].1.push(metric.to_string());
        }
    }
    Ok(PositionMetrics { columns })
}

fn load_metric_names(path: &Path) -> Result<HashMap<String, String>, LoadError> {
    let mut reader = open_reader(path)?;
    let headers = reader
        .headers()
        .map_err(|source| csv_error(path, source))?
        .clone();
    let id_idx = find_column(&headers, NAME_ID_COLUMNS, path)?;
    let label_idx = find_column(&headers, NAME_LABEL_COLUMNS, path)?;

    let mut out = HashMap::new();
    for row in reader.records() {
        let row = row.map_err(|source| csv_error(path, source))?;
        let (Some(id), Some(label)) = (row.get(id_idx), row.get(label_idx)) else {
            continue;
        };
        if id.is_empty() || label.is_empty() {
            continue;
        }
        out.insert(id.to_string(), label.to_string());
    }
    Ok(out)
}

