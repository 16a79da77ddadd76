pub mod api;
pub mod extraction;
pub mod models;
pub mod processors;

pub use api::Understat;
pub use models::{Criteria, DataMarker, LeagueTable, LeagueTableOptions, LeagueTableRow, Venue};
