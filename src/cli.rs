use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde_json::Value;
use understat::Criteria;

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// Parses one filter. `key=value` compares against the string `value`,
/// which is how understat sends ids and counts. `key:=json` parses the value
/// as JSON for numbers, booleans and nested objects.
pub fn parse_filter(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value or key:=json, got '{raw}'"))?;
    let (key, value) = match key.strip_suffix(':') {
        Some(key) => {
            let value = serde_json::from_str(value)
                .map_err(|e| format!("invalid JSON in '{raw}': {e}"))?;
            (key.trim(), value)
        }
        None => (key.trim(), Value::from(value)),
    };
    if key.is_empty() {
        return Err(format!("missing key in '{raw}'"));
    }
    Ok((key.to_string(), value))
}

/// Football statistics from understat.com
///
/// Fetches understat pages, decodes the data embedded in them and prints
/// it as JSON. Use `--filter key=value` to keep only records with matching
/// fields.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// List current configuration settings
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// Also write logs to stderr.
    #[arg(long = "debug", global = true, help_heading = "Debug")]
    pub debug: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", global = true, help_heading = "Debug")]
    pub log_file: Option<String>,
}

/// Equality filters shared by the record commands.
#[derive(ClapArgs, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Keep records whose field equals the value (repeatable).
    /// `key=value` matches a string; `key:=json` matches a JSON value, e.g. `isResult:=true`
    #[arg(long = "filter", short = 'f', value_name = "KEY=VALUE", value_parser = parse_filter)]
    pub filters: Vec<(String, Value)>,
}

impl FilterArgs {
    pub fn criteria(&self) -> Option<Criteria> {
        if self.filters.is_empty() {
            None
        } else {
            Some(self.filters.iter().cloned().collect())
        }
    }
}

#[derive(ClapArgs, Debug, Clone)]
pub struct LeagueSeason {
    /// League code (epl, la_liga, bundesliga, serie_a, ligue_1, rfpl)
    pub league: String,
    /// Starting year of the season, e.g. 2018 for 2018/19
    pub season: i32,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct TeamSeason {
    /// Team name as shown on understat, e.g. "Manchester United"
    pub team: String,
    pub season: i32,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// League overview from the home page
    Stats {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Teams of a league season
    Teams {
        #[command(flatten)]
        target: LeagueSeason,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Players of a league season
    LeaguePlayers {
        #[command(flatten)]
        target: LeagueSeason,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Played matches of a league season
    Results {
        #[command(flatten)]
        target: LeagueSeason,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Upcoming matches of a league season
    Fixtures {
        #[command(flatten)]
        target: LeagueSeason,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// League table built from team histories
    Table {
        #[command(flatten)]
        target: LeagueSeason,
        /// overall, home or away
        #[arg(long, default_value = "overall")]
        venue: String,
        /// First day to include (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<String>,
        /// Last day to include (YYYY-MM-DD)
        #[arg(long)]
        end_date: Option<String>,
        /// Omit the header row
        #[arg(long)]
        no_headers: bool,
    },
    /// Shots taken by a player
    PlayerShots {
        player_id: u32,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Matches played by a player
    PlayerMatches {
        player_id: u32,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Per-position stats of a player
    PlayerStats {
        player_id: u32,
        /// Positions to keep, e.g. FW or Sub (repeatable)
        #[arg(long = "position")]
        positions: Vec<String>,
    },
    /// Grouped stats of a player (season, position, situation, ...)
    PlayerGroups { player_id: u32 },
    /// Season stats of a team
    TeamStats {
        #[command(flatten)]
        target: TeamSeason,
    },
    /// Played matches of a team
    TeamResults {
        #[command(flatten)]
        target: TeamSeason,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Upcoming matches of a team
    TeamFixtures {
        #[command(flatten)]
        target: TeamSeason,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Players of a team season
    TeamPlayers {
        #[command(flatten)]
        target: TeamSeason,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Summary of a match
    MatchStats { match_id: u32 },
    /// Rosters of a match, split into home and away
    MatchPlayers {
        match_id: u32,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Shots of a match, split into home and away
    MatchShots {
        match_id: u32,
        #[command(flatten)]
        filter: FilterArgs,
    },
}
