use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

use football_radar::config::AppConfig;
use football_radar::dataset;
use football_radar::pipeline::{self, RequestContext};
use football_radar::selection::{self, SelectionQuery};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let mut config = AppConfig::from_env();
    if let Some(dir) = parse_path_arg("--data") {
        config.data_dir = dir;
    }
    if let Some(dir) = parse_path_arg("--out") {
        config.output_dir = dir;
    }
    if let Some(seed) = parse_u64_arg("--seed") {
        config.jitter_seed = seed;
    }
    let min_matches = parse_u64_arg("--min-matches")
        .map(|v| v.min(u32::MAX as u64) as u32)
        .unwrap_or(config.min_matches);

    let ds = dataset::datasets(&config.data_dir)
        .with_context(|| format!("failed loading datasets from {}", config.data_dir.display()))?;

    let competition = parse_string_arg("--competition");
    let team = parse_string_arg("--team");
    let player = parse_string_arg("--player");

    if has_flag("--list") {
        let names = match (&competition, &team) {
            (None, _) => selection::competitions(ds),
            (Some(c), None) => selection::teams(ds, c),
            (Some(c), Some(t)) => selection::players(ds, c, t),
        };
        for name in names {
            println!("{name}");
        }
        return Ok(());
    }

    let (Some(competition), Some(team), Some(player)) = (competition, team, player) else {
        return Err(anyhow!(
            "--competition, --team and --player are required (use --list to browse)"
        ));
    };

    let query = SelectionQuery::new(competition, team, player, min_matches);
    let ctx = RequestContext::new(&config, query);
    let artifact = pipeline::render(&ctx, ds).context("render failed")?;
    println!("image: {}", artifact.png_path.display());
    println!(
        "cohort: {} {} players (min {} matches), {} dropped",
        artifact.chart.header.cohort_size,
        artifact.chart.header.position,
        ctx.query.min_matches,
        artifact.dropped
    );
    for sector in &artifact.chart.layout.sectors {
        println!(
            "  {:<40} {:>10.3}  [{:.3}, {:.3}]  {:>5.1}%",
            sector.label,
            sector.value,
            sector.lower,
            sector.upper,
            sector.normalized() * 100.0
        );
    }

    if has_flag("--pdf") {
        let path = pipeline::export_pdf(Some(&artifact), &ctx.query, &ctx.output_dir)
            .context("pdf export failed")?;
        println!("pdf: {}", path.display());
    }
    if has_flag("--xlsx") {
        let path = pipeline::export_workbook(&ctx, ds, Some(&artifact))
            .context("workbook export failed")?;
        println!("workbook: {}", path.display());
    }
    Ok(())
}

fn parse_string_arg(name: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&format!("{name}="))
            && !raw.trim().is_empty()
        {
            return Some(raw.trim().to_string());
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

fn parse_path_arg(name: &str) -> Option<PathBuf> {
    parse_string_arg(name).map(PathBuf::from)
}

fn parse_u64_arg(name: &str) -> Option<u64> {
    parse_string_arg(name).and_then(|raw| raw.parse::<u64>().ok())
}

fn has_flag(name: &str) -> bool {
    std::env::args().skip(1).any(|arg| arg == name)
}
