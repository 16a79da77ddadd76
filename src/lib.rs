//! Async client for the football statistics published on understat.com
//!
//! Understat pages carry their data as escaped JSON literals assigned in
//! inline scripts (`var teamsData = JSON.parse('...')`). This library fetches
//! a page, decodes the payload for a given variable and shapes it into
//! records, optionally filtered by field equality. It also aggregates team
//! histories into a league table.
//!
//! # Examples
//!
//! ```rust,no_run
//! use understat::{AppError, LeagueTableOptions, Understat};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let understat = Understat::new(reqwest::Client::new());
//!
//!     let criteria = serde_json::json!({"team_title": "Manchester United"});
//!     let players = understat
//!         .get_league_players("epl", 2018, criteria.as_object())
//!         .await?;
//!     println!("{} players", players.len());
//!
//!     let table = understat
//!         .get_league_table("epl", 2018, &LeagueTableOptions::default())
//!         .await?;
//!     for row in table.to_rows() {
//!         println!("{row:?}");
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod constants;
pub mod data_fetcher;
pub mod error;
pub mod testing_utils;

// Re-export commonly used types for convenience
pub use config::Config;
pub use data_fetcher::api::{LeagueCodePolicy, RetryPolicy, Understat};
pub use data_fetcher::extraction::ExtractionStrategy;
pub use data_fetcher::models::{
    Criteria, DataMarker, LeagueTable, LeagueTableOptions, LeagueTableRow, Venue,
};
pub use error::AppError;

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
