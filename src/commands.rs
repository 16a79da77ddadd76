use crate::cli::Command;
use serde_json::Value;
use std::io::{Write, stdout};
use tracing::info;
use understat::{AppError, Config, LeagueTableOptions, Understat, Venue};

/// Handles the --list-config command.
pub async fn handle_list_config_command() -> Result<(), AppError> {
    Config::display().await
}

/// Runs one subcommand against the facade and returns its output as JSON.
pub async fn run_command(understat: &Understat, command: Command) -> Result<Value, AppError> {
    info!("Running {command:?}");
    let output = match command {
        Command::Stats { filter } => {
            Value::from(understat.get_stats(filter.criteria().as_ref()).await?)
        }
        Command::Teams { target, filter } => Value::from(
            understat
                .get_teams(&target.league, target.season, filter.criteria().as_ref())
                .await?,
        ),
        Command::LeaguePlayers { target, filter } => Value::from(
            understat
                .get_league_players(&target.league, target.season, filter.criteria().as_ref())
                .await?,
        ),
        Command::Results { target, filter } => Value::from(
            understat
                .get_league_results(&target.league, target.season, filter.criteria().as_ref())
                .await?,
        ),
        Command::Fixtures { target, filter } => Value::from(
            understat
                .get_league_fixtures(&target.league, target.season, filter.criteria().as_ref())
                .await?,
        ),
        Command::Table {
            target,
            venue,
            start_date,
            end_date,
            no_headers,
        } => {
            let options = LeagueTableOptions {
                with_headers: !no_headers,
                venue: venue.parse::<Venue>()?,
                start_date,
                end_date,
            };
            let table = understat
                .get_league_table(&target.league, target.season, &options)
                .await?;
            serde_json::to_value(table.to_rows())?
        }
        Command::PlayerShots { player_id, filter } => Value::from(
            understat
                .get_player_shots(player_id, filter.criteria().as_ref())
                .await?,
        ),
        Command::PlayerMatches { player_id, filter } => Value::from(
            understat
                .get_player_matches(player_id, filter.criteria().as_ref())
                .await?,
        ),
        Command::PlayerStats {
            player_id,
            positions,
        } => {
            let positions: Vec<&str> = positions.iter().map(String::as_str).collect();
            Value::from(
                understat
                    .get_player_stats(player_id, Some(positions.as_slice()))
                    .await?,
            )
        }
        Command::PlayerGroups { player_id } => {
            understat.get_player_grouped_stats(player_id).await?
        }
        Command::TeamStats { target } => {
            understat.get_team_stats(&target.team, target.season).await?
        }
        Command::TeamResults { target, filter } => Value::from(
            understat
                .get_team_results(&target.team, target.season, filter.criteria().as_ref())
                .await?,
        ),
        Command::TeamFixtures { target, filter } => Value::from(
            understat
                .get_team_fixtures(&target.team, target.season, filter.criteria().as_ref())
                .await?,
        ),
        Command::TeamPlayers { target, filter } => Value::from(
            understat
                .get_team_players(&target.team, target.season, filter.criteria().as_ref())
                .await?,
        ),
        Command::MatchStats { match_id } => understat.get_match_stats(match_id).await?,
        Command::MatchPlayers { match_id, filter } => {
            understat
                .get_match_players(match_id, filter.criteria().as_ref())
                .await?
        }
        Command::MatchShots { match_id, filter } => {
            understat
                .get_match_shots(match_id, filter.criteria().as_ref())
                .await?
        }
    };
    Ok(output)
}

/// Writes `value` as pretty JSON followed by a newline.
pub fn print_json(value: &Value) -> Result<(), AppError> {
    let mut out = stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use clap::Parser;
    use serde_json::json;
    use understat::testing_utils::PageBuilder;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn command(argv: &[&str]) -> Command {
        Args::try_parse_from(argv)
            .ok()
            .and_then(|args| args.command)
            .expect("command should parse")
    }

    #[tokio::test]
    async fn test_run_command_filters_records() {
        let server = MockServer::start().await;
        let page = PageBuilder::new()
            .payload(
                "playersData",
                &json!([{"id": "1", "position": "GK"}, {"id": "2", "position": "F S"}]),
            )
            .build();
        Mock::given(method("GET"))
            .and(path("/team/Real_Madrid/2019"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page))
            .mount(&server)
            .await;

        let understat = Understat::new(reqwest::Client::new()).with_base_url(server.uri());
        let output = run_command(
            &understat,
            command(&["understat", "team-players", "Real Madrid", "2019", "-f", "position=GK"]),
        )
        .await
        .unwrap();
        assert_eq!(output, json!([{"id": "1", "position": "GK"}]));
    }

    #[tokio::test]
    async fn test_run_command_rejects_bad_venue() {
        let understat = Understat::new(reqwest::Client::new());
        let result = run_command(
            &understat,
            command(&["understat", "table", "epl", "2018", "--venue", "neutral"]),
        )
        .await;
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
