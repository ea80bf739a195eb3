use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use tracing::{debug, info};

use crate::fixtures_api::{Fixture, FixturesSource, TeamRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    pub fn letter(self) -> char {
        match self {
            Outcome::Win => 'W',
            Outcome::Draw => 'D',
            Outcome::Loss => 'L',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonDiscovery {
    pub season: i32,
    /// Every season the league reports, newest first.
    pub seasons: Vec<i32>,
    pub teams: Vec<TeamRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}

impl Record {
    pub fn played(&self) -> u32 {
        self.wins + self.draws + self.losses
    }

    fn add(&mut self, outcome: Outcome, scored: u32, conceded: u32) {
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::Loss => self.losses += 1,
        }
        self.goals_for += scored;
        self.goals_against += conceded;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonSummary {
    pub season: i32,
    pub record: Record,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRow {
    pub date: String,
    pub competition: String,
    /// `W`/`D`/`L` for the selected team, `-` when unplayed.
    pub result: char,
    pub score_line: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadToHead {
    pub team: String,
    pub record: Record,
}

/// Newest season that has a non-empty team list.
pub fn discover_season<S: FixturesSource + ?Sized>(
    source: &S,
    league: u32,
) -> Result<Option<SeasonDiscovery>> {
    let mut seasons = source.league_seasons(league)?;
    seasons.sort_unstable_by(|a, b| b.cmp(a));
    for &season in &seasons {
        let teams = source.teams_by_league(league, season)?;
        if !teams.is_empty() {
            info!(league, season, teams = teams.len(), "season discovered");
            return Ok(Some(SeasonDiscovery {
                season,
                seasons: seasons.clone(),
                teams,
            }));
        }
        debug!(league, season, "season has no teams yet");
    }
    Ok(None)
}

/// Per season (in the order given) the team's fixtures, newest first.
/// Seasons without fixtures for the team are left out.
pub fn fixtures_by_season<S: FixturesSource + ?Sized>(
    source: &S,
    league: u32,
    seasons: &[i32],
    team_id: u32,
) -> Result<Vec<(i32, Vec<Fixture>)>> {
    let mut out = Vec::new();
    for &season in seasons {
        let mut fixtures: Vec<Fixture> = source
            .team_fixtures(league, season, team_id)?
            .into_iter()
            .filter(|f| f.involves(team_id))
            .collect();
        if fixtures.is_empty() {
            continue;
        }
        fixtures.sort_by(|a, b| b.date.cmp(&a.date));
        out.push((season, fixtures));
    }
    Ok(out)
}

/// Result and `(scored, conceded)` from `team_id`'s side. `None` when the
/// fixture has no score or the team did not play in it.
pub fn outcome_for(fixture: &Fixture, team_id: u32) -> Option<(Outcome, u32, u32)> {
    let (home, away) = fixture.score()?;
    let (scored, conceded) = if fixture.home.id == team_id {
        (home, away)
    } else if fixture.away.id == team_id {
        (away, home)
    } else {
        return None;
    };
    let outcome = match scored.cmp(&conceded) {
        std::cmp::Ordering::Greater => Outcome::Win,
        std::cmp::Ordering::Equal => Outcome::Draw,
        std::cmp::Ordering::Less => Outcome::Loss,
    };
    Some((outcome, scored, conceded))
}

/// Newest season first.
pub fn season_summaries(by_season: &[(i32, Vec<Fixture>)], team_id: u32) -> Vec<SeasonSummary> {
    let mut out: Vec<SeasonSummary> = by_season
        .iter()
        .map(|(season, fixtures)| {
            let mut record = Record::default();
            for fixture in fixtures {
                if let Some((outcome, scored, conceded)) = outcome_for(fixture, team_id) {
                    record.add(outcome, scored, conceded);
                }
            }
            SeasonSummary {
                season: *season,
                record,
            }
        })
        .collect();
    out.sort_by(|a, b| b.season.cmp(&a.season));
    out
}

pub fn match_rows(by_season: &[(i32, Vec<Fixture>)], team_id: u32) -> Vec<MatchRow> {
    by_season
        .iter()
        .flat_map(|(_, fixtures)| fixtures.iter())
        .map(|fixture| {
            let result = outcome_for(fixture, team_id)
                .map(|(o, _, _)| o.letter())
                .unwrap_or('-');
            let score = match fixture.score() {
                Some((h, a)) => format!("{h} - {a}"),
                None => "vs".to_string(),
            };
            MatchRow {
                date: fixture.day().to_string(),
                competition: fixture.league.clone(),
                result,
                score_line: format!("{} {score} {}", fixture.home.name, fixture.away.name),
            }
        })
        .collect()
}

/// Fixtures from the last `years` calendar years (current year included),
/// keyed by year.
pub fn group_by_year(
    fixtures: &[Fixture],
    years: u32,
    today: NaiveDate,
) -> BTreeMap<i32, Vec<Fixture>> {
    let min_year = today.year() - years as i32 + 1;
    let mut out: BTreeMap<i32, Vec<Fixture>> = BTreeMap::new();
    for fixture in fixtures {
        let Some(year) = fixture.year() else {
            continue;
        };
        if year >= min_year {
            out.entry(year).or_default().push(fixture.clone());
        }
    }
    out
}

/// Tallies for both sides over a set of meetings, matched by team name.
/// Unplayed meetings are skipped.
pub fn head_to_head_summary(fixtures: &[Fixture], team_a: &str, team_b: &str) -> [HeadToHead; 2] {
    let mut a = Record::default();
    let mut b = Record::default();
    for fixture in fixtures {
        let Some((home, away)) = fixture.score() else {
            continue;
        };
        let (a_goals, b_goals) = if fixture.home.name == team_a {
            (home, away)
        } else {
            (away, home)
        };
        let a_outcome = match a_goals.cmp(&b_goals) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Equal => Outcome::Draw,
            std::cmp::Ordering::Less => Outcome::Loss,
        };
        let b_outcome = match a_outcome {
            Outcome::Win => Outcome::Loss,
            Outcome::Draw => Outcome::Draw,
            Outcome::Loss => Outcome::Win,
        };
        a.add(a_outcome, a_goals, b_goals);
        b.add(b_outcome, b_goals, a_goals);
    }
    [
        HeadToHead {
            team: team_a.to_string(),
            record: a,
        },
        HeadToHead {
            team: team_b.to_string(),
            record: b,
        },
    ]
}
