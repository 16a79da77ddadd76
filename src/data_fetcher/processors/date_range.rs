//! Date-window filtering of season records.

use crate::error::AppError;
use chrono::NaiveDate;
use serde_json::Value;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| AppError::invalid_date_format(value))
}

fn january_first(year: i32) -> Result<NaiveDate, AppError> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| AppError::invalid_date_format(format!("{year}-01-01")))
}

/// Reads the date part of a record's `"date"` field (`YYYY-MM-DD[ HH:MM:SS]`).
pub fn parse_record_date(record: &Value) -> Result<NaiveDate, AppError> {
    let raw = record
        .get("date")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::invalid_date_format(format!("record without date: {record}")))?;
    let date_part = raw.split_whitespace().next().unwrap_or_default();
    parse_date(date_part).map_err(|_| AppError::invalid_date_format(raw))
}

/// Keeps records dated within `[start, end]`, both inclusive.
///
/// Missing bounds default to January 1 of `season` and January 1 of
/// `season + 2`, which covers a season crossing the calendar year. A bound or
/// record date that does not parse fails the whole call; nothing is skipped.
pub fn filter_by_date_range(
    records: Vec<Value>,
    season: i32,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<Vec<Value>, AppError> {
    let start = match start {
        Some(start) => parse_date(start)?,
        None => january_first(season)?,
    };
    let end = match end {
        Some(end) => parse_date(end)?,
        None => {
            let year = season
                .checked_add(2)
                .ok_or_else(|| AppError::invalid_date_format(format!("season {season}")))?;
            january_first(year)?
        }
    };

    let mut kept = Vec::with_capacity(records.len());
    for record in records {
        let date = parse_record_date(&record)?;
        if (start..=end).contains(&date) {
            kept.push(record);
        }
    }
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn season_records() -> Vec<Value> {
        vec![
            json!({"xG": 0.639599, "xGA": 2.57262, "date": "2022-03-16 17:30:00", "wins": 0}),
            json!({"xG": 1.65069, "xGA": 1.62777, "date": "2022-07-27 15:00:00", "wins": 0}),
            json!({"xG": 0.855926, "xGA": 1.25668, "date": "2022-09-05 20:00:00", "wins": 1}),
        ]
    }

    #[test]
    fn test_default_window_spans_two_years() {
        let filtered = filter_by_date_range(season_records(), 2021, None, None).unwrap();
        assert_eq!(filtered, season_records());
    }

    #[test]
    fn test_explicit_window_end_is_inclusive() {
        let filtered =
            filter_by_date_range(season_records(), 2021, Some("2022-04-01"), Some("2022-09-05"))
                .unwrap();
        assert_eq!(filtered, season_records()[1..].to_vec());
    }

    #[test]
    fn test_start_is_inclusive() {
        let filtered =
            filter_by_date_range(season_records(), 2021, Some("2022-07-27"), None).unwrap();
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_default_bounds_exclude_other_seasons() {
        let records = vec![
            json!({"date": "2020-12-31 20:00:00"}),
            json!({"date": "2021-01-01"}),
            json!({"date": "2023-01-01 12:00:00"}),
            json!({"date": "2023-01-02 12:00:00"}),
        ];
        let filtered = filter_by_date_range(records, 2021, None, None).unwrap();
        assert_eq!(
            filtered,
            vec![json!({"date": "2021-01-01"}), json!({"date": "2023-01-01 12:00:00"})]
        );
    }

    #[test]
    fn test_invalid_bound_format() {
        let err = filter_by_date_range(season_records(), 2021, Some("01/04/2022"), None)
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidDateFormat { ref value } if value == "01/04/2022"));

        let err = filter_by_date_range(season_records(), 2021, None, Some("2022-13-01"))
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidDateFormat { .. }));
    }

    #[test]
    fn test_bad_record_date_aborts() {
        let mut records = season_records();
        records.push(json!({"date": "soon"}));
        let err = filter_by_date_range(records, 2021, None, None).unwrap_err();
        assert!(matches!(err, AppError::InvalidDateFormat { ref value } if value == "soon"));

        let err = filter_by_date_range(vec![json!({"xG": 1.0})], 2021, None, None).unwrap_err();
        assert!(matches!(err, AppError::InvalidDateFormat { .. }));
    }

    #[test]
    fn test_season_out_of_range_is_an_error() {
        let err = filter_by_date_range(season_records(), i32::MAX, Some("2022-01-01"), None)
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidDateFormat { .. }));

        let err = filter_by_date_range(season_records(), i32::MAX - 1, None, None).unwrap_err();
        assert!(matches!(err, AppError::InvalidDateFormat { .. }));
    }

    #[test]
    fn test_parse_record_date_ignores_time() {
        let date = parse_record_date(&json!({"date": "2022-09-05 20:00:00"})).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2022, 9, 5).unwrap());
    }
}
