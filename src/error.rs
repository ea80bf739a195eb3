use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("dataset file not found: {}", .0.display())]
    Missing(PathBuf),
    #[error("failed reading {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{}: missing required column {column:?}", path.display())]
    MissingColumn { path: PathBuf, column: &'static str },
}

/// A filter step produced no candidates. Not a failure: the page shows the
/// message and waits for a different selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmptySelection {
    #[error("no competitions in the player dataset")]
    NoCompetitions,
    #[error("no teams for competition {competition}")]
    NoTeams { competition: String },
    #[error("no players for {team} ({competition})")]
    NoPlayers { competition: String, team: String },
    #[error("player {player} not found in {team} ({competition})")]
    PlayerNotFound {
        competition: String,
        team: String,
        player: String,
    },
    #[error("no metrics listed for position {position}")]
    NoMetrics { position: String },
    #[error("no comparable {position} players with at least {min_matches} matches")]
    EmptyCohort { position: String, min_matches: u32 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("no metrics to lay out")]
    NoMetrics,
    #[error("comparison cohort is empty")]
    EmptyCohort,
    #[error("{player} has no numeric value for {metric}")]
    MissingValue { player: String, metric: String },
    #[error("cohort has no numeric values for {metric}")]
    NoCohortValues { metric: String },
    #[error("could not allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },
    #[error("text layer failed: {0}")]
    Text(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no chart rendered for the current selection")]
    NotRendered,
    #[error("chart image not found: {}", .0.display())]
    MissingImage(PathBuf),
    #[error("failed writing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed encoding {}: {message}", path.display())]
    Png { path: PathBuf, message: String },
    #[error("failed writing workbook {}: {source}", path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },
}

/// Everything the statistics page can surface to the user.
#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Empty(#[from] EmptySelection),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl PageError {
    /// Load failures halt the page; everything else is recoverable by the user.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PageError::Load(_))
    }
}
