use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::AppConfig;
use crate::dataset::Datasets;
use crate::error::{ExportError, PageError};
use crate::export;
use crate::radar::{self, RadarChart, RadarInput};
use crate::selection::{self, SelectionQuery};

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub query: SelectionQuery,
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub seed: u64,
}

impl RequestContext {
    pub fn new(config: &AppConfig, query: SelectionQuery) -> Self {
        Self {
            query,
            data_dir: config.data_dir.clone(),
            output_dir: config.output_dir.clone(),
            seed: config.jitter_seed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderedArtifact {
    pub key: String,
    pub query: SelectionQuery,
    pub chart: RadarChart,
    pub png_path: PathBuf,
    /// Cohort rows discarded for a non-numeric metric value.
    pub dropped: usize,
}

/// One synchronous pass: select, compose, write the image.
pub fn render(ctx: &RequestContext, ds: &Datasets) -> Result<RenderedArtifact, PageError> {
    let selection = selection::select(ds, &ctx.query)?;
    let input = RadarInput::from_selection(&selection, ctx.seed);
    let chart = radar::compose(&input)?;
    let key = export::artifact_key(
        &ctx.query.competition,
        &ctx.query.team,
        &ctx.query.player,
    );
    let png_path = export::write_png(&chart, &ctx.output_dir, &key)?;
    info!(
        player = %ctx.query.player,
        cohort = selection.cohort.len(),
        path = %png_path.display(),
        "chart rendered"
    );
    Ok(RenderedArtifact {
        key,
        query: ctx.query.clone(),
        chart,
        png_path,
        dropped: selection.cohort.dropped,
    })
}

/// Cohort workbook for the artifact rendered for `ctx.query`.
pub fn export_workbook(
    ctx: &RequestContext,
    ds: &Datasets,
    artifact: Option<&RenderedArtifact>,
) -> Result<PathBuf, PageError> {
    let artifact = artifact
        .filter(|a| a.query == ctx.query)
        .ok_or(ExportError::NotRendered)?;
    let selection = selection::select(ds, &ctx.query)?;
    let path =
        export::write_cohort_workbook(&selection, &artifact.chart, &ctx.output_dir, &artifact.key)?;
    Ok(path)
}

pub fn export_pdf(
    artifact: Option<&RenderedArtifact>,
    query: &SelectionQuery,
    dir: &Path,
) -> Result<PathBuf, PageError> {
    Ok(export::export_pdf(artifact, query, dir)?)
}
