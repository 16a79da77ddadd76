use super::fetch_utils::{RetryPolicy, fetch_text};
use super::urls::{
    LeagueCodePolicy, build_home_url, build_league_url, build_match_url, build_player_url,
    build_team_url, to_league_name,
};
use crate::config::Config;
use crate::data_fetcher::extraction::{ExtractionStrategy, extract};
use crate::data_fetcher::models::{Criteria, DataMarker, LeagueTable, LeagueTableOptions};
use crate::data_fetcher::processors::{
    build_league_table, filter_by_equality, filter_by_positions, filter_sides, split_results,
};
use crate::error::AppError;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument};

/// Async client for understat.com pages.
///
/// Every call fetches one page, pulls the payload for its marker out of an
/// inline script and shapes it. Nothing is cached between calls. The HTTP
/// client is supplied by the caller and only borrowed for each request.
///
/// # Example
/// ```no_run
/// use understat::Understat;
///
/// # async fn run() -> Result<(), understat::AppError> {
/// let understat = Understat::new(reqwest::Client::new());
/// let teams = understat.get_teams("epl", 2018, None).await?;
/// println!("{} teams", teams.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Understat {
    client: Client,
    base_url: String,
    retry_policy: RetryPolicy,
    league_codes: LeagueCodePolicy,
    extraction: ExtractionStrategy,
}

impl Understat {
    /// Facade over the public site with default settings: fail-fast
    /// fetching, pass-through league codes and document scanning.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: crate::constants::DEFAULT_BASE_URL.to_string(),
            retry_policy: RetryPolicy::fail_fast(),
            league_codes: LeagueCodePolicy::default(),
            extraction: ExtractionStrategy::default(),
        }
    }

    /// Facade configured from a loaded [`Config`].
    pub fn with_config(client: Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            retry_policy: config.retry_policy(),
            league_codes: config.league_code_policy(),
            extraction: config.extraction,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn with_league_code_policy(mut self, policy: LeagueCodePolicy) -> Self {
        self.league_codes = policy;
        self
    }

    pub fn with_extraction(mut self, strategy: ExtractionStrategy) -> Self {
        self.extraction = strategy;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_payload(&self, url: &str, marker: DataMarker) -> Result<Value, AppError> {
        let document = fetch_text(&self.client, url, &self.retry_policy).await?;
        let payload = extract(&document, marker.as_str(), self.extraction)?;
        debug!("Decoded {marker} from {url}");
        Ok(payload)
    }

    async fn fetch_records(&self, url: &str, marker: DataMarker) -> Result<Vec<Value>, AppError> {
        match self.fetch_payload(url, marker).await? {
            Value::Array(records) => Ok(records),
            other => Err(unexpected_shape(marker, "an array", &other)),
        }
    }

    fn league_url(&self, league: &str, season: i32) -> Result<String, AppError> {
        let name = to_league_name(league, self.league_codes)?;
        Ok(build_league_url(&self.base_url, &name, season))
    }

    /// League overview records from the home page (`statData`).
    #[instrument(skip(self))]
    pub async fn get_stats(&self, criteria: Option<&Criteria>) -> Result<Vec<Value>, AppError> {
        let url = build_home_url(&self.base_url);
        let stats = self.fetch_records(&url, DataMarker::StatData).await?;
        Ok(filter_by_equality(stats, criteria))
    }

    /// Teams of a league season, one record per team including its match history.
    #[instrument(skip(self))]
    pub async fn get_teams(
        &self,
        league: &str,
        season: i32,
        criteria: Option<&Criteria>,
    ) -> Result<Vec<Value>, AppError> {
        let url = self.league_url(league, season)?;
        let teams = match self.fetch_payload(&url, DataMarker::TeamsData).await? {
            Value::Object(teams) => teams.into_iter().map(|(_, team)| team).collect(),
            other => return Err(unexpected_shape(DataMarker::TeamsData, "an object", &other)),
        };
        Ok(filter_by_equality(teams, criteria))
    }

    #[instrument(skip(self))]
    pub async fn get_league_players(
        &self,
        league: &str,
        season: i32,
        criteria: Option<&Criteria>,
    ) -> Result<Vec<Value>, AppError> {
        let url = self.league_url(league, season)?;
        let players = self.fetch_records(&url, DataMarker::PlayersData).await?;
        Ok(filter_by_equality(players, criteria))
    }

    /// Played matches of a league season.
    #[instrument(skip(self))]
    pub async fn get_league_results(
        &self,
        league: &str,
        season: i32,
        criteria: Option<&Criteria>,
    ) -> Result<Vec<Value>, AppError> {
        let url = self.league_url(league, season)?;
        let dates = self.fetch_records(&url, DataMarker::DatesData).await?;
        Ok(filter_by_equality(split_results(dates, true), criteria))
    }

    /// Matches of a league season still to be played.
    #[instrument(skip(self))]
    pub async fn get_league_fixtures(
        &self,
        league: &str,
        season: i32,
        criteria: Option<&Criteria>,
    ) -> Result<Vec<Value>, AppError> {
        let url = self.league_url(league, season)?;
        let dates = self.fetch_records(&url, DataMarker::DatesData).await?;
        Ok(filter_by_equality(split_results(dates, false), criteria))
    }

    /// Standings aggregated from every team's match history.
    #[instrument(skip(self))]
    pub async fn get_league_table(
        &self,
        league: &str,
        season: i32,
        options: &LeagueTableOptions,
    ) -> Result<LeagueTable, AppError> {
        let url = self.league_url(league, season)?;
        let teams = self.fetch_payload(&url, DataMarker::TeamsData).await?;
        build_league_table(&teams, season, options)
    }

    #[instrument(skip(self))]
    pub async fn get_player_shots(
        &self,
        player_id: u32,
        criteria: Option<&Criteria>,
    ) -> Result<Vec<Value>, AppError> {
        let url = build_player_url(&self.base_url, player_id);
        let shots = self.fetch_records(&url, DataMarker::ShotsData).await?;
        Ok(filter_by_equality(shots, criteria))
    }

    #[instrument(skip(self))]
    pub async fn get_player_matches(
        &self,
        player_id: u32,
        criteria: Option<&Criteria>,
    ) -> Result<Vec<Value>, AppError> {
        let url = build_player_url(&self.base_url, player_id);
        let matches = self.fetch_records(&url, DataMarker::MatchesData).await?;
        Ok(filter_by_equality(matches, criteria))
    }

    /// Per-position stat records, each tagged with its `"position"` label.
    #[instrument(skip(self))]
    pub async fn get_player_stats(
        &self,
        player_id: u32,
        positions: Option<&[&str]>,
    ) -> Result<Vec<Value>, AppError> {
        let url = build_player_url(&self.base_url, player_id);
        let stats = self.fetch_payload(&url, DataMarker::MinMaxPlayerStats).await?;
        if !stats.is_object() {
            return Err(unexpected_shape(DataMarker::MinMaxPlayerStats, "an object", &stats));
        }
        Ok(filter_by_positions(&stats, positions))
    }

    #[instrument(skip(self))]
    pub async fn get_player_grouped_stats(&self, player_id: u32) -> Result<Value, AppError> {
        let url = build_player_url(&self.base_url, player_id);
        let groups = self.fetch_payload(&url, DataMarker::GroupsData).await?;
        expect_object(groups, DataMarker::GroupsData)
    }

    #[instrument(skip(self))]
    pub async fn get_team_stats(&self, team_name: &str, season: i32) -> Result<Value, AppError> {
        let url = build_team_url(&self.base_url, team_name, season);
        let stats = self.fetch_payload(&url, DataMarker::StatisticsData).await?;
        expect_object(stats, DataMarker::StatisticsData)
    }

    #[instrument(skip(self))]
    pub async fn get_team_results(
        &self,
        team_name: &str,
        season: i32,
        criteria: Option<&Criteria>,
    ) -> Result<Vec<Value>, AppError> {
        let url = build_team_url(&self.base_url, team_name, season);
        let dates = self.fetch_records(&url, DataMarker::DatesData).await?;
        Ok(filter_by_equality(split_results(dates, true), criteria))
    }

    #[instrument(skip(self))]
    pub async fn get_team_fixtures(
        &self,
        team_name: &str,
        season: i32,
        criteria: Option<&Criteria>,
    ) -> Result<Vec<Value>, AppError> {
        let url = build_team_url(&self.base_url, team_name, season);
        let dates = self.fetch_records(&url, DataMarker::DatesData).await?;
        Ok(filter_by_equality(split_results(dates, false), criteria))
    }

    #[instrument(skip(self))]
    pub async fn get_team_players(
        &self,
        team_name: &str,
        season: i32,
        criteria: Option<&Criteria>,
    ) -> Result<Vec<Value>, AppError> {
        let url = build_team_url(&self.base_url, team_name, season);
        let players = self.fetch_records(&url, DataMarker::PlayersData).await?;
        Ok(filter_by_equality(players, criteria))
    }

    #[instrument(skip(self))]
    pub async fn get_match_stats(&self, match_id: u32) -> Result<Value, AppError> {
        let url = build_match_url(&self.base_url, match_id);
        let info = self.fetch_payload(&url, DataMarker::MatchInfo).await?;
        expect_object(info, DataMarker::MatchInfo)
    }

    /// Rosters keyed `"h"` and `"a"`, each side an id-to-record mapping.
    #[instrument(skip(self))]
    pub async fn get_match_players(
        &self,
        match_id: u32,
        criteria: Option<&Criteria>,
    ) -> Result<Value, AppError> {
        let url = build_match_url(&self.base_url, match_id);
        let rosters = self.fetch_payload(&url, DataMarker::RostersData).await?;
        let rosters = expect_object(rosters, DataMarker::RostersData)?;
        Ok(filter_sides(rosters, criteria))
    }

    /// Shots keyed `"h"` and `"a"`, each side a list of shot records.
    #[instrument(skip(self))]
    pub async fn get_match_shots(
        &self,
        match_id: u32,
        criteria: Option<&Criteria>,
    ) -> Result<Value, AppError> {
        let url = build_match_url(&self.base_url, match_id);
        let shots = self.fetch_payload(&url, DataMarker::ShotsData).await?;
        let shots = expect_object(shots, DataMarker::ShotsData)?;
        Ok(filter_sides(shots, criteria))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn unexpected_shape(marker: DataMarker, expected: &str, found: &Value) -> AppError {
    AppError::unexpected_structure(
        marker.as_str(),
        format!("expected {expected}, found {}", json_kind(found)),
    )
}

fn expect_object(value: Value, marker: DataMarker) -> Result<Value, AppError> {
    if value.is_object() {
        Ok(value)
    } else {
        Err(unexpected_shape(marker, "an object", &value))
    }
}
