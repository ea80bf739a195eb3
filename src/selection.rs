use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::config::clamp_min_matches;
use crate::dataset::{Datasets, PlayerRecord};
use crate::error::EmptySelection;
use crate::metrics::{self, MetricSpec};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionQuery {
    pub competition: String,
    pub team: String,
    pub player: String,
    pub min_matches: u32,
}

impl SelectionQuery {
    pub fn new(
        competition: impl Into<String>,
        team: impl Into<String>,
        player: impl Into<String>,
        min_matches: u32,
    ) -> Self {
        Self {
            competition: competition.into(),
            team: team.into(),
            player: player.into(),
            min_matches: clamp_min_matches(min_matches),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Cohort<'a> {
    pub members: Vec<&'a PlayerRecord>,
    /// Rows that passed position + matches but had a non-numeric metric.
    pub dropped: usize,
    pub position: String,
    pub min_matches: u32,
}

impl Cohort<'_> {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn values(&self, metric: &str) -> Vec<f64> {
        self.members
            .iter()
            .filter_map(|record| record.value(metric))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct Selection<'a> {
    pub focal: &'a PlayerRecord,
    pub metrics: Vec<MetricSpec>,
    pub cohort: Cohort<'a>,
}

pub fn competitions(ds: &Datasets) -> Vec<String> {
    distinct(ds.players.iter().map(|r| r.competition.as_str()))
}

pub fn teams(ds: &Datasets, competition: &str) -> Vec<String> {
    distinct(
        ds.players
            .iter()
            .filter(|r| r.competition == competition)
            .map(|r| r.team.as_str()),
    )
}

pub fn players(ds: &Datasets, competition: &str, team: &str) -> Vec<String> {
    distinct(
        ds.players
            .iter()
            .filter(|r| r.competition == competition && r.team == team)
            .map(|r| r.player.as_str()),
    )
}

/// Records matching every filter that is given; `None` leaves that step open.
pub fn candidates<'a>(
    ds: &'a Datasets,
    competition: Option<&str>,
    team: Option<&str>,
    player: Option<&str>,
) -> Vec<&'a PlayerRecord> {
    ds.players
        .iter()
        .filter(|r| competition.is_none_or(|c| r.competition == c))
        .filter(|r| team.is_none_or(|t| r.team == t))
        .filter(|r| player.is_none_or(|p| r.player == p))
        .collect()
}

/// Same-position players across every competition with enough matches.
/// Any row with a non-numeric value in one of `metrics` is dropped whole.
pub fn build_cohort<'a>(
    ds: &'a Datasets,
    position: &str,
    min_matches: u32,
    metrics: &[MetricSpec],
) -> Cohort<'a> {
    let threshold = f64::from(min_matches);
    let mut members = Vec::new();
    let mut dropped = 0usize;
    for record in &ds.players {
        if record.position != position {
            continue;
        }
        if !record.matches.is_some_and(|m| m >= threshold) {
            continue;
        }
        if metrics.iter().all(|m| record.value(&m.id).is_some()) {
            members.push(record);
        } else {
            dropped += 1;
        }
    }
    if dropped > 0 {
        debug!(position, dropped, "cohort rows dropped for non-numeric metrics");
    }
    Cohort {
        members,
        dropped,
        position: position.to_string(),
        min_matches,
    }
}

pub fn select<'a>(
    ds: &'a Datasets,
    query: &SelectionQuery,
) -> Result<Selection<'a>, EmptySelection> {
    if competitions(ds).is_empty() {
        return Err(EmptySelection::NoCompetitions);
    }
    if teams(ds, &query.competition).is_empty() {
        return Err(EmptySelection::NoTeams {
            competition: query.competition.clone(),
        });
    }
    if players(ds, &query.competition, &query.team).is_empty() {
        return Err(EmptySelection::NoPlayers {
            competition: query.competition.clone(),
            team: query.team.clone(),
        });
    }
    let Some(focal) = candidates(
        ds,
        Some(&query.competition),
        Some(&query.team),
        Some(&query.player),
    )
    .into_iter()
    .next() else {
        return Err(EmptySelection::PlayerNotFound {
            competition: query.competition.clone(),
            team: query.team.clone(),
            player: query.player.clone(),
        });
    };

    let metrics = metrics::resolve(ds, &focal.position);
    if metrics.is_empty() {
        return Err(EmptySelection::NoMetrics {
            position: focal.position.clone(),
        });
    }

    let cohort = build_cohort(ds, &focal.position, query.min_matches, &metrics);
    if cohort.is_empty() {
        return Err(EmptySelection::EmptyCohort {
            position: focal.position.clone(),
            min_matches: query.min_matches,
        });
    }

    info!(
        player = %focal.player,
        position = %focal.position,
        cohort = cohort.len(),
        dropped = cohort.dropped,
        metrics = metrics.len(),
        "selection resolved"
    );
    Ok(Selection {
        focal,
        metrics,
        cohort,
    })
}

fn distinct<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    names
        .filter(|name| !name.trim().is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
