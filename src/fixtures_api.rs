use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::http_client::http_client;

const API_KEY_HEADER: &str = "x-apisports-key";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct League {
    pub name: &'static str,
    pub id: u32,
}

pub const LEAGUES: [League; 5] = [
    League {
        name: "Premier League",
        id: 39,
    },
    League {
        name: "La Liga",
        id: 140,
    },
    League {
        name: "Serie A",
        id: 135,
    },
    League {
        name: "Bundesliga",
        id: 78,
    },
    League {
        name: "Ligue 1",
        id: 61,
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TeamRef {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    pub id: u64,
    /// ISO-8601 kickoff as sent by the API.
    pub date: String,
    pub league: String,
    pub home: TeamRef,
    pub away: TeamRef,
    pub home_goals: Option<u32>,
    pub away_goals: Option<u32>,
}

impl Fixture {
    pub fn day(&self) -> &str {
        self.date.get(..10).unwrap_or(&self.date)
    }

    pub fn year(&self) -> Option<i32> {
        self.date.get(..4)?.parse().ok()
    }

    pub fn involves(&self, team_id: u32) -> bool {
        self.home.id == team_id || self.away.id == team_id
    }

    pub fn score(&self) -> Option<(u32, u32)> {
        Some((self.home_goals?, self.away_goals?))
    }
}

/// Where the results page gets its data. `ApiFootball` in production, canned
/// responses in tests.
pub trait FixturesSource {
    /// Season years, newest first.
    fn league_seasons(&self, league: u32) -> Result<Vec<i32>>;
    fn teams_by_league(&self, league: u32, season: i32) -> Result<Vec<TeamRef>>;
    fn team_fixtures(&self, league: u32, season: i32, team: u32) -> Result<Vec<Fixture>>;
    fn head_to_head(&self, team_a: u32, team_b: u32) -> Result<Vec<Fixture>>;
}

#[derive(Debug, Clone)]
pub struct ApiFootball {
    base: String,
    key: String,
}

impl ApiFootball {
    pub fn new(base: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            key: key.into(),
        }
    }

    /// `None` on a non-success status; the caller treats that as "no data".
    fn get(&self, path: &str, params: &[(&str, String)]) -> Result<Option<String>> {
        let client = http_client()?;
        let url = format!("{}/{path}", self.base);
        let resp = client
            .get(&url)
            .header(API_KEY_HEADER, &self.key)
            .query(params)
            .send()
            .with_context(|| format!("request failed: {url}"))?;
        let status = resp.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "fixtures api returned non-success");
            return Ok(None);
        }
        let body = resp.text().context("failed reading response body")?;
        debug!(%url, bytes = body.len(), "fixtures api response");
        Ok(Some(body))
    }
}

impl FixturesSource for ApiFootball {
    fn league_seasons(&self, league: u32) -> Result<Vec<i32>> {
        match self.get("leagues", &[("id", league.to_string())])? {
            Some(body) => parse_seasons_json(&body),
            None => Ok(Vec::new()),
        }
    }

    fn teams_by_league(&self, league: u32, season: i32) -> Result<Vec<TeamRef>> {
        let params = [("league", league.to_string()), ("season", season.to_string())];
        match self.get("teams", &params)? {
            Some(body) => parse_teams_json(&body),
            None => Ok(Vec::new()),
        }
    }

    fn team_fixtures(&self, league: u32, season: i32, team: u32) -> Result<Vec<Fixture>> {
        let params = [
            ("league", league.to_string()),
            ("season", season.to_string()),
            ("team", team.to_string()),
        ];
        match self.get("fixtures", &params)? {
            Some(body) => parse_fixtures_json(&body),
            None => Ok(Vec::new()),
        }
    }

    fn head_to_head(&self, team_a: u32, team_b: u32) -> Result<Vec<Fixture>> {
        let params = [("h2h", format!("{team_a}-{team_b}"))];
        match self.get("fixtures/headtohead", &params)? {
            Some(body) => parse_fixtures_json(&body),
            None => Ok(Vec::new()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default = "Vec::new")]
    response: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct LeagueEntry {
    #[serde(default)]
    seasons: Vec<SeasonEntry>,
}

#[derive(Debug, Deserialize)]
struct SeasonEntry {
    year: i32,
}

#[derive(Debug, Deserialize)]
struct TeamEntry {
    team: TeamRef,
}

#[derive(Debug, Deserialize)]
struct FixtureEntry {
    fixture: FixtureInfo,
    #[serde(default)]
    league: Option<LeagueInfo>,
    teams: FixtureTeams,
    #[serde(default)]
    goals: Option<Goals>,
}

#[derive(Debug, Deserialize)]
struct FixtureInfo {
    id: u64,
    #[serde(default)]
    date: String,
}

#[derive(Debug, Deserialize)]
struct LeagueInfo {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct FixtureTeams {
    home: TeamRef,
    away: TeamRef,
}

#[derive(Debug, Deserialize)]
struct Goals {
    home: Option<u32>,
    away: Option<u32>,
}

fn parse_envelope<T: for<'de> Deserialize<'de>>(raw: &str, what: &str) -> Result<Vec<T>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let env: Envelope<T> =
        serde_json::from_str(trimmed).with_context(|| format!("invalid {what} json"))?;
    Ok(env.response)
}

/// Seasons of the first league entry, newest first.
pub fn parse_seasons_json(raw: &str) -> Result<Vec<i32>> {
    let leagues: Vec<LeagueEntry> = parse_envelope(raw, "leagues")?;
    let mut years: Vec<i32> = leagues
        .into_iter()
        .next()
        .map(|l| l.seasons.into_iter().map(|s| s.year).collect())
        .unwrap_or_default();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    Ok(years)
}

/// Teams sorted by name.
pub fn parse_teams_json(raw: &str) -> Result<Vec<TeamRef>> {
    let entries: Vec<TeamEntry> = parse_envelope(raw, "teams")?;
    let mut teams: Vec<TeamRef> = entries.into_iter().map(|e| e.team).collect();
    teams.sort_by(|a, b| a.name.cmp(&b.name));
    teams.dedup_by_key(|t| t.id);
    Ok(teams)
}

pub fn parse_fixtures_json(raw: &str) -> Result<Vec<Fixture>> {
    let entries: Vec<FixtureEntry> = parse_envelope(raw, "fixtures")?;
    Ok(entries
        .into_iter()
        .map(|e| {
            let goals = e.goals.unwrap_or(Goals {
                home: None,
                away: None,
            });
            Fixture {
                id: e.fixture.id,
                date: e.fixture.date,
                league: e.league.map(|l| l.name).unwrap_or_default(),
                home: e.teams.home,
                away: e.teams.away,
                home_goals: goals.home,
                away_goals: goals.away,
            }
        })
        .collect())
}
