//! Types shared by the extraction pipeline, the filters and the client.
//!
//! Payloads stay as `serde_json::Value`: understat changes its record
//! fields often, and callers filter on whatever fields they need.

use crate::constants::LEAGUE_TABLE_HEADERS;
use crate::error::AppError;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Exact-match expectations: field name to expected value.
pub type Criteria = Map<String, Value>;

/// Identifier of a `<marker> = JSON.parse('...')` assignment in a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataMarker {
    /// Home page: per-league monthly stats (array)
    StatData,
    /// League page: team id to team with `history` (object)
    TeamsData,
    /// League and team pages: player season rows (array)
    PlayersData,
    /// League and team pages: fixtures and results (array)
    DatesData,
    /// Player page: shots (array). Match page: `{h: [...], a: [...]}`
    ShotsData,
    /// Player page: match rows (array)
    MatchesData,
    /// Player page: position to min/max/avg stats (object)
    MinMaxPlayerStats,
    /// Player page: grouped season stats (object)
    GroupsData,
    /// Team page: situation/formation breakdowns (object)
    StatisticsData,
    /// Match page: match summary (object)
    MatchInfo,
    /// Match page: `{h: {id: player}, a: {id: player}}`
    RostersData,
}

impl DataMarker {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataMarker::StatData => "statData",
            DataMarker::TeamsData => "teamsData",
            DataMarker::PlayersData => "playersData",
            DataMarker::DatesData => "datesData",
            DataMarker::ShotsData => "shotsData",
            DataMarker::MatchesData => "matchesData",
            DataMarker::MinMaxPlayerStats => "minMaxPlayerStats",
            DataMarker::GroupsData => "groupsData",
            DataMarker::StatisticsData => "statisticsData",
            DataMarker::MatchInfo => "match_info",
            DataMarker::RostersData => "rostersData",
        }
    }
}

impl fmt::Display for DataMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which matches of a team's season feed into a league table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Venue {
    #[default]
    Overall,
    Home,
    Away,
}

impl Venue {
    /// Value of the `h_a` field selected by this venue, if any.
    pub fn side_code(&self) -> Option<&'static str> {
        match self {
            Venue::Overall => None,
            Venue::Home => Some("h"),
            Venue::Away => Some("a"),
        }
    }
}

impl FromStr for Venue {
    type Err = AppError;

    /// Only the first letter counts, so "h", "home" and "Home" are equivalent.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('o') => Ok(Venue::Overall),
            Some('h') => Ok(Venue::Home),
            Some('a') => Ok(Venue::Away),
            _ => Err(AppError::config_error(format!(
                "Unknown venue '{s}', expected overall, home or away"
            ))),
        }
    }
}

/// Options for building a league table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueTableOptions {
    /// Prepend the column names as the first row
    pub with_headers: bool,
    pub venue: Venue,
    /// Inclusive lower date bound, `YYYY-MM-DD`
    pub start_date: Option<String>,
    /// Inclusive upper date bound, `YYYY-MM-DD`
    pub end_date: Option<String>,
}

impl Default for LeagueTableOptions {
    fn default() -> Self {
        Self {
            with_headers: true,
            venue: Venue::Overall,
            start_date: None,
            end_date: None,
        }
    }
}

impl LeagueTableOptions {
    pub fn has_date_window(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }
}

/// One team's aggregated season line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeagueTableRow {
    pub team: String,
    pub matches: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals: u32,
    pub goals_against: u32,
    pub points: u32,
    pub xg: f64,
    pub npxg: f64,
    pub xga: f64,
    pub npxga: f64,
    pub npxgd: f64,
    pub ppda: f64,
    pub oppda: f64,
    pub deep_completions: u32,
    pub deep_completions_allowed: u32,
    pub expected_points: f64,
}

impl LeagueTableRow {
    pub fn goal_difference(&self) -> i64 {
        i64::from(self.goals) - i64::from(self.goals_against)
    }

    /// Row values in header order.
    pub fn to_values(&self) -> Vec<Value> {
        vec![
            Value::from(self.team.clone()),
            Value::from(self.matches),
            Value::from(self.wins),
            Value::from(self.draws),
            Value::from(self.losses),
            Value::from(self.goals),
            Value::from(self.goals_against),
            Value::from(self.points),
            Value::from(self.xg),
            Value::from(self.npxg),
            Value::from(self.xga),
            Value::from(self.npxga),
            Value::from(self.npxgd),
            Value::from(self.ppda),
            Value::from(self.oppda),
            Value::from(self.deep_completions),
            Value::from(self.deep_completions_allowed),
            Value::from(self.expected_points),
        ]
    }
}

/// Ranked league table, freshly built on every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeagueTable {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<Vec<&'static str>>,
    pub rows: Vec<LeagueTableRow>,
}

impl LeagueTable {
    pub fn new(rows: Vec<LeagueTableRow>, with_headers: bool) -> Self {
        Self {
            header: with_headers.then(|| LEAGUE_TABLE_HEADERS.to_vec()),
            rows,
        }
    }

    /// Table as a list of rows, the header row first when present.
    pub fn to_rows(&self) -> Vec<Vec<Value>> {
        let header = self
            .header
            .iter()
            .map(|names| names.iter().map(|name| Value::from(*name)).collect());
        header
            .chain(self.rows.iter().map(LeagueTableRow::to_values))
            .collect()
    }
}
