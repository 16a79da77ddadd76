pub mod date_range;
pub mod filters;
pub mod league_table;

// Re-export the helpers the client composes
pub use date_range::{filter_by_date_range, parse_record_date};
pub use filters::{
    filter_by_equality, filter_by_positions, filter_sides, matches_criteria, split_results,
};
pub use league_table::build_league_table;
