//! URL building and league code normalization

use crate::error::AppError;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Short league codes and the names understat uses in its URLs.
static LEAGUE_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("epl", "EPL"),
        ("la_liga", "La_liga"),
        ("bundesliga", "Bundesliga"),
        ("serie_a", "Serie_A"),
        ("ligue_1", "Ligue_1"),
        ("rfpl", "RFPL"),
    ])
});

/// What to do with a league code missing from the lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeagueCodePolicy {
    /// Use the code as given, so canonical names like "EPL" keep working
    #[default]
    PassThrough,
    /// Fail with `UnknownLeagueCode`
    Strict,
}

/// Maps a short league code to its canonical name. Keys are case-sensitive.
///
/// # Example
/// ```
/// use understat::data_fetcher::api::{LeagueCodePolicy, to_league_name};
///
/// assert_eq!(to_league_name("serie_a", LeagueCodePolicy::PassThrough).unwrap(), "Serie_A");
/// assert_eq!(to_league_name("EPL", LeagueCodePolicy::PassThrough).unwrap(), "EPL");
/// assert!(to_league_name("EPL", LeagueCodePolicy::Strict).is_err());
/// ```
pub fn to_league_name(code: &str, policy: LeagueCodePolicy) -> Result<String, AppError> {
    match (LEAGUE_NAMES.get(code), policy) {
        (Some(name), _) => Ok((*name).to_string()),
        (None, LeagueCodePolicy::PassThrough) => Ok(code.to_string()),
        (None, LeagueCodePolicy::Strict) => Err(AppError::unknown_league_code(code)),
    }
}

/// Builds the home page URL, which carries `statData`.
pub fn build_home_url(base_url: &str) -> String {
    format!("{}/", base_url.trim_end_matches('/'))
}

/// Builds a league page URL, e.g. `https://understat.com/league/EPL/2018`.
pub fn build_league_url(base_url: &str, league_name: &str, season: i32) -> String {
    format!(
        "{}/league/{league_name}/{season}",
        base_url.trim_end_matches('/')
    )
}

/// Builds a player page URL, e.g. `https://understat.com/player/619`.
pub fn build_player_url(base_url: &str, player_id: u32) -> String {
    format!("{}/player/{player_id}", base_url.trim_end_matches('/'))
}

/// Builds a team page URL. Spaces in the display name become underscores.
///
/// # Example
/// ```
/// use understat::data_fetcher::api::build_team_url;
///
/// let url = build_team_url("https://understat.com", "Manchester United", 2018);
/// assert_eq!(url, "https://understat.com/team/Manchester_United/2018");
/// ```
pub fn build_team_url(base_url: &str, team_name: &str, season: i32) -> String {
    format!(
        "{}/team/{}/{season}",
        base_url.trim_end_matches('/'),
        team_name.replace(' ', "_")
    )
}

/// Builds a match page URL, e.g. `https://understat.com/match/11670`.
pub fn build_match_url(base_url: &str, match_id: u32) -> String {
    format!("{}/match/{match_id}", base_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_league_name_known_codes() {
        let codes = ["epl", "la_liga", "bundesliga", "serie_a", "ligue_1", "rfpl"];
        let names: Vec<String> = codes
            .iter()
            .map(|code| to_league_name(code, LeagueCodePolicy::PassThrough).unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["EPL", "La_liga", "Bundesliga", "Serie_A", "Ligue_1", "RFPL"]
        );
    }

    #[test]
    fn test_to_league_name_pass_through() {
        assert_eq!(
            to_league_name("La_liga", LeagueCodePolicy::PassThrough).unwrap(),
            "La_liga"
        );
        // Keys are case-sensitive
        assert_eq!(
            to_league_name("Epl", LeagueCodePolicy::PassThrough).unwrap(),
            "Epl"
        );
    }

    #[test]
    fn test_to_league_name_strict() {
        assert_eq!(
            to_league_name("rfpl", LeagueCodePolicy::Strict).unwrap(),
            "RFPL"
        );
        let err = to_league_name("mls", LeagueCodePolicy::Strict).unwrap_err();
        assert!(matches!(err, AppError::UnknownLeagueCode { ref code } if code == "mls"));
    }

    #[test]
    fn test_build_urls() {
        let base = "https://understat.com";
        assert_eq!(build_home_url(base), "https://understat.com/");
        assert_eq!(
            build_league_url(base, "EPL", 2018),
            "https://understat.com/league/EPL/2018"
        );
        assert_eq!(build_player_url(base, 619), "https://understat.com/player/619");
        assert_eq!(build_match_url(base, 11670), "https://understat.com/match/11670");
    }

    #[test]
    fn test_build_urls_trailing_slash_base() {
        let base = "http://127.0.0.1:8080/";
        assert_eq!(build_home_url(base), "http://127.0.0.1:8080/");
        assert_eq!(
            build_team_url(base, "Real Madrid", 2020),
            "http://127.0.0.1:8080/team/Real_Madrid/2020"
        );
    }
}
