//! League table aggregation over the per-team season history in `teamsData`.

use super::date_range::filter_by_date_range;
use super::filters::filter_by_equality;
use crate::data_fetcher::models::{
    Criteria, DataMarker, LeagueTable, LeagueTableOptions, LeagueTableRow,
};
use crate::error::AppError;
use serde_json::Value;
use tracing::debug;

const MARKER: DataMarker = DataMarker::TeamsData;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        round2(numerator / denominator)
    }
}

/// Reads a numeric field that may be a JSON number or a numeric string.
fn number(record: &Value, key: &str) -> Result<f64, AppError> {
    let value = record.get(key).ok_or_else(|| {
        AppError::unexpected_structure(MARKER.as_str(), format!("history entry missing '{key}'"))
    })?;
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        AppError::unexpected_structure(
            MARKER.as_str(),
            format!("'{key}' is not numeric: {value}"),
        )
    })
}

fn pressing(record: &Value, key: &str) -> Result<(f64, f64), AppError> {
    let pressing = record.get(key).ok_or_else(|| {
        AppError::unexpected_structure(MARKER.as_str(), format!("history entry missing '{key}'"))
    })?;
    Ok((number(pressing, "att")?, number(pressing, "def")?))
}

#[derive(Debug, Default)]
struct Totals {
    matches: u32,
    wins: f64,
    draws: f64,
    losses: f64,
    scored: f64,
    missed: f64,
    points: f64,
    xg: f64,
    npxg: f64,
    xga: f64,
    npxga: f64,
    npxgd: f64,
    deep: f64,
    deep_allowed: f64,
    xpts: f64,
    passes: f64,
    defensive_actions: f64,
    passes_allowed: f64,
    defensive_actions_forced: f64,
}

impl Totals {
    fn add(&mut self, record: &Value) -> Result<(), AppError> {
        self.matches += 1;
        self.wins += number(record, "wins")?;
        self.draws += number(record, "draws")?;
        self.losses += number(record, "loses")?;
        self.scored += number(record, "scored")?;
        self.missed += number(record, "missed")?;
        self.points += number(record, "pts")?;
        self.xg += number(record, "xG")?;
        self.npxg += number(record, "npxG")?;
        self.xga += number(record, "xGA")?;
        self.npxga += number(record, "npxGA")?;
        self.npxgd += number(record, "npxGD")?;
        self.deep += number(record, "deep")?;
        self.deep_allowed += number(record, "deep_allowed")?;
        self.xpts += number(record, "xpts")?;

        let (att, def) = pressing(record, "ppda")?;
        self.passes += att;
        self.defensive_actions += def;
        let (att, def) = pressing(record, "ppda_allowed")?;
        self.passes_allowed += att;
        self.defensive_actions_forced += def;
        Ok(())
    }

    fn into_row(self, team: String) -> LeagueTableRow {
        let count = |value: f64| value.round().max(0.0) as u32;
        LeagueTableRow {
            team,
            matches: self.matches,
            wins: count(self.wins),
            draws: count(self.draws),
            losses: count(self.losses),
            goals: count(self.scored),
            goals_against: count(self.missed),
            points: count(self.points),
            xg: round2(self.xg),
            npxg: round2(self.npxg),
            xga: round2(self.xga),
            npxga: round2(self.npxga),
            npxgd: round2(self.npxgd),
            ppda: ratio(self.passes, self.defensive_actions),
            oppda: ratio(self.passes_allowed, self.defensive_actions_forced),
            deep_completions: count(self.deep),
            deep_completions_allowed: count(self.deep_allowed),
            expected_points: round2(self.xpts),
        }
    }
}

fn team_row(team: &Value, season: i32, options: &LeagueTableOptions) -> Result<LeagueTableRow, AppError> {
    let title = team
        .get("title")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::unexpected_structure(MARKER.as_str(), "team without title"))?;
    let mut history = team
        .get("history")
        .and_then(Value::as_array)
        .cloned()
        .ok_or_else(|| {
            AppError::unexpected_structure(MARKER.as_str(), format!("{title} has no history"))
        })?;

    if options.has_date_window() {
        history = filter_by_date_range(
            history,
            season,
            options.start_date.as_deref(),
            options.end_date.as_deref(),
        )?;
    }
    if let Some(side) = options.venue.side_code() {
        let mut venue = Criteria::new();
        venue.insert("h_a".to_string(), Value::from(side));
        history = filter_by_equality(history, Some(&venue));
    }

    let mut totals = Totals::default();
    for record in &history {
        totals.add(record)?;
    }
    Ok(totals.into_row(title.to_string()))
}

/// Aggregates every team's season history into ranked table rows.
///
/// Rows are ordered by points, then goal difference, both descending; teams
/// level on both keep their payload order. PPDA and OPPDA are 0 for a team
/// with no defensive actions in the window.
pub fn build_league_table(
    teams: &Value,
    season: i32,
    options: &LeagueTableOptions,
) -> Result<LeagueTable, AppError> {
    let teams = teams.as_object().ok_or_else(|| {
        AppError::unexpected_structure(MARKER.as_str(), "expected an object keyed by team id")
    })?;

    let mut rows = teams
        .values()
        .map(|team| team_row(team, season, options))
        .collect::<Result<Vec<_>, _>>()?;

    rows.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| b.goal_difference().cmp(&a.goal_difference()))
    });
    debug!("Built league table with {} teams", rows.len());

    Ok(LeagueTable::new(rows, options.with_headers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::models::Venue;
    use crate::testing_utils::history_entry;
    use serde_json::json;

    fn teams() -> Value {
        json!({
            "1": {"id": "1", "title": "Leeds", "history": [
                history_entry("2022-08-06 14:00:00", "h", 2, 1),
                history_entry("2022-08-13 14:00:00", "a", 0, 0),
            ]},
            "2": {"id": "2", "title": "Arsenal", "history": [
                history_entry("2022-08-05 19:00:00", "a", 2, 0),
                history_entry("2022-08-13 14:00:00", "h", 4, 2),
            ]},
            "3": {"id": "3", "title": "Brentford", "history": [
                history_entry("2022-08-07 14:00:00", "a", 4, 0),
                history_entry("2022-08-13 14:00:00", "h", 0, 0),
            ]},
            "4": {"id": "4", "title": "Newcomers", "history": []}
        })
    }

    #[test]
    fn test_sorted_by_points_then_goal_difference() {
        let table = build_league_table(&teams(), 2022, &LeagueTableOptions::default()).unwrap();
        let order: Vec<_> = table.rows.iter().map(|row| row.team.as_str()).collect();
        // Arsenal 6 pts; Brentford and Leeds 4 pts, Brentford ahead on GD
        assert_eq!(order, vec!["Arsenal", "Brentford", "Leeds", "Newcomers"]);

        let arsenal = &table.rows[0];
        assert_eq!(arsenal.matches, 2);
        assert_eq!(arsenal.wins, 2);
        assert_eq!(arsenal.goals, 6);
        assert_eq!(arsenal.goals_against, 2);
        assert_eq!(arsenal.points, 6);
    }

    #[test]
    fn test_header_row() {
        let table = build_league_table(&teams(), 2022, &LeagueTableOptions::default()).unwrap();
        let rows = table.to_rows();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0][0], "Team");
        assert_eq!(rows[0][17], "ExpectedPoints");

        let options = LeagueTableOptions {
            with_headers: false,
            ..LeagueTableOptions::default()
        };
        let table = build_league_table(&teams(), 2022, &options).unwrap();
        assert!(table.header.is_none());
        assert_eq!(table.to_rows()[0][0], "Arsenal");
    }

    #[test]
    fn test_zero_match_team_has_zero_ratios() {
        let table = build_league_table(&teams(), 2022, &LeagueTableOptions::default()).unwrap();
        let newcomers = table.rows.iter().find(|row| row.team == "Newcomers").unwrap();
        assert_eq!(newcomers.matches, 0);
        assert_eq!(newcomers.ppda, 0.0);
        assert_eq!(newcomers.oppda, 0.0);
    }

    #[test]
    fn test_ratios_and_rounding() {
        let teams = json!({"9": {"title": "Pressers", "history": [
            {"h_a": "h", "date": "2022-08-06", "wins": 1, "draws": 0, "loses": 0,
             "scored": 1, "missed": 0, "pts": 3, "xG": 1.004, "npxG": 0.5, "xGA": 0.333,
             "npxGA": 0.333, "npxGD": 0.167, "deep": 5, "deep_allowed": 1, "xpts": 2.111,
             "ppda": {"att": 200, "def": 30}, "ppda_allowed": {"att": 100, "def": 0}}
        ]}});
        let table = build_league_table(&teams, 2022, &LeagueTableOptions::default()).unwrap();
        let row = &table.rows[0];
        assert_eq!(row.xg, 1.0);
        assert_eq!(row.expected_points, 2.11);
        assert_eq!(row.ppda, 6.67);
        assert_eq!(row.oppda, 0.0);
        assert_eq!(row.deep_completions, 5);
    }

    #[test]
    fn test_home_and_away_split() {
        let options = LeagueTableOptions {
            venue: Venue::Home,
            ..LeagueTableOptions::default()
        };
        let table = build_league_table(&teams(), 2022, &options).unwrap();
        let leeds = table.rows.iter().find(|row| row.team == "Leeds").unwrap();
        assert_eq!(leeds.matches, 1);
        assert_eq!(leeds.points, 3);

        let options = LeagueTableOptions {
            venue: Venue::Away,
            ..LeagueTableOptions::default()
        };
        let table = build_league_table(&teams(), 2022, &options).unwrap();
        assert_eq!(table.rows[0].team, "Brentford");
        assert_eq!(table.rows[0].goals, 4);
    }

    #[test]
    fn test_date_window() {
        let options = LeagueTableOptions {
            start_date: Some("2022-08-10".to_string()),
            ..LeagueTableOptions::default()
        };
        let table = build_league_table(&teams(), 2022, &options).unwrap();
        for row in &table.rows {
            assert!(row.matches <= 1, "{} has {} matches", row.team, row.matches);
        }
        assert_eq!(table.rows[0].team, "Arsenal");

        let options = LeagueTableOptions {
            end_date: Some("August 10".to_string()),
            ..LeagueTableOptions::default()
        };
        assert!(matches!(
            build_league_table(&teams(), 2022, &options),
            Err(AppError::InvalidDateFormat { .. })
        ));
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let mut entry = history_entry("2022-08-06", "h", 1, 0);
        entry["xG"] = json!("1.25");
        let teams = json!({"1": {"title": "Strings", "history": [entry]}});
        let table = build_league_table(&teams, 2022, &LeagueTableOptions::default()).unwrap();
        assert_eq!(table.rows[0].xg, 1.25);
    }

    #[test]
    fn test_malformed_payloads() {
        assert!(matches!(
            build_league_table(&json!([]), 2022, &LeagueTableOptions::default()),
            Err(AppError::UnexpectedStructure { .. })
        ));
        assert!(matches!(
            build_league_table(&json!({"1": {"history": []}}), 2022, &LeagueTableOptions::default()),
            Err(AppError::UnexpectedStructure { .. })
        ));

        let mut entry = history_entry("2022-08-06", "h", 1, 0);
        entry.as_object_mut().unwrap().remove("ppda");
        let teams = json!({"1": {"title": "Broken", "history": [entry]}});
        assert!(matches!(
            build_league_table(&teams, 2022, &LeagueTableOptions::default()),
            Err(AppError::UnexpectedStructure { .. })
        ));
    }
}
