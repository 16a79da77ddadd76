//! Equality filtering and reshaping of decoded payloads.

use crate::data_fetcher::models::Criteria;
use serde_json::{Map, Value};

/// True when `record` is an object holding every criteria key with an equal value.
/// Nested values compare structurally.
pub fn matches_criteria(record: &Value, criteria: &Criteria) -> bool {
    criteria
        .iter()
        .all(|(key, expected)| record.get(key) == Some(expected))
}

/// Keeps the records matching every criterion, preserving order.
///
/// With no criteria (or an empty mapping) the input is returned unchanged.
///
/// # Example
/// ```
/// use serde_json::json;
/// use understat::data_fetcher::processors::filter_by_equality;
///
/// let leagues = vec![
///     json!({"league": "epl", "players": 600}),
///     json!({"league": "la_liga", "players": 300}),
/// ];
/// let criteria = json!({"players": 600}).as_object().cloned().unwrap();
/// let filtered = filter_by_equality(leagues, Some(&criteria));
/// assert_eq!(filtered, vec![json!({"league": "epl", "players": 600})]);
/// ```
pub fn filter_by_equality(records: Vec<Value>, criteria: Option<&Criteria>) -> Vec<Value> {
    match criteria {
        Some(criteria) if !criteria.is_empty() => records
            .into_iter()
            .filter(|record| matches_criteria(record, criteria))
            .collect(),
        _ => records,
    }
}

/// Turns a position-keyed mapping into records tagged with `"position"`.
///
/// With no positions (or an empty list) every entry is kept; otherwise only
/// the listed labels. Order follows the mapping. Entries that are not objects
/// and non-object input are skipped.
pub fn filter_by_positions(position_map: &Value, positions: Option<&[&str]>) -> Vec<Value> {
    let Some(entries) = position_map.as_object() else {
        return Vec::new();
    };
    let wanted = positions.filter(|positions| !positions.is_empty());

    entries
        .iter()
        .filter(|(label, _)| wanted.is_none_or(|wanted| wanted.contains(&label.as_str())))
        .filter_map(|(label, stats)| {
            let mut record = stats.as_object()?.clone();
            record.insert("position".to_string(), Value::from(label.as_str()));
            Some(Value::Object(record))
        })
        .collect()
}

/// Splits a combined fixtures/results feed on its `isResult` flag.
/// `completed = true` keeps played matches, `false` keeps upcoming fixtures.
pub fn split_results(records: Vec<Value>, completed: bool) -> Vec<Value> {
    records
        .into_iter()
        .filter(|record| {
            let is_result = record
                .get("isResult")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            is_result == completed
        })
        .collect()
}

/// Filters each side of a `{"h": ..., "a": ...}` match payload.
///
/// Array sides are filtered record by record; object sides (id to record)
/// keep the entries whose record matches. Other values pass through.
pub fn filter_sides(payload: Value, criteria: Option<&Criteria>) -> Value {
    let criteria = match criteria {
        Some(criteria) if !criteria.is_empty() => criteria,
        _ => return payload,
    };
    let Value::Object(sides) = payload else {
        return payload;
    };

    let filtered: Map<String, Value> = sides
        .into_iter()
        .map(|(side, value)| {
            let value = match value {
                Value::Array(records) => {
                    Value::Array(filter_by_equality(records, Some(criteria)))
                }
                Value::Object(entries) => Value::Object(
                    entries
                        .into_iter()
                        .filter(|(_, record)| matches_criteria(record, criteria))
                        .collect(),
                ),
                other => other,
            };
            (side, value)
        })
        .collect();

    Value::Object(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn criteria(value: Value) -> Criteria {
        value.as_object().cloned().unwrap()
    }

    fn leagues() -> Vec<Value> {
        vec![
            json!({"league": "epl", "players": 600}),
            json!({"league": "la_liga", "players": 300}),
            json!({"league": "bundesliga", "players": 400}),
            json!({"league": "serie_a", "players": 500}),
            json!({"league": "ligue_1", "players": 600}),
            json!({"league": "rfpl", "players": 700}),
        ]
    }

    #[test]
    fn test_filter_by_equality_single_key() {
        let filtered = filter_by_equality(leagues(), Some(&criteria(json!({"league": "epl"}))));
        assert_eq!(filtered, vec![json!({"league": "epl", "players": 600})]);
    }

    #[test]
    fn test_filter_by_equality_keeps_order() {
        let filtered = filter_by_equality(leagues(), Some(&criteria(json!({"players": 600}))));
        assert_eq!(
            filtered,
            vec![
                json!({"league": "epl", "players": 600}),
                json!({"league": "ligue_1", "players": 600}),
            ]
        );
    }

    #[test]
    fn test_filter_by_equality_identity() {
        assert_eq!(filter_by_equality(leagues(), None), leagues());
        assert_eq!(filter_by_equality(leagues(), Some(&Criteria::new())), leagues());
        assert!(filter_by_equality(Vec::new(), None).is_empty());
    }

    #[test]
    fn test_filter_by_equality_is_exact() {
        // No substring or type coercion
        let filtered = filter_by_equality(leagues(), Some(&criteria(json!({"league": "ep"}))));
        assert!(filtered.is_empty());
        let filtered = filter_by_equality(leagues(), Some(&criteria(json!({"players": "600"}))));
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_filter_by_equality_requires_every_key() {
        let records = vec![
            json!({"side": "h", "result": "w"}),
            json!({"side": "h", "result": "l"}),
            json!({"side": "h"}),
            json!("not a record"),
        ];
        let filtered = filter_by_equality(
            records,
            Some(&criteria(json!({"side": "h", "result": "w"}))),
        );
        assert_eq!(filtered, vec![json!({"side": "h", "result": "w"})]);
    }

    #[test]
    fn test_filter_by_equality_nested_value() {
        let records = vec![
            json!({"id": "1", "h": {"id": "89", "title": "Manchester United", "short_title": "MUN"}}),
            json!({"id": "2", "h": {"id": "87", "title": "Liverpool", "short_title": "LIV"}}),
        ];
        let filtered = filter_by_equality(
            records,
            Some(&criteria(json!({
                "h": {"id": "89", "title": "Manchester United", "short_title": "MUN"}
            }))),
        );
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0]["id"], "1");
    }

    #[test]
    fn test_filter_by_positions_all() {
        let data = json!({"FW": {"goals": {"avg": 0.0042}}, "Sub": {"goals": {"avg": 0.0026}}});
        assert_eq!(
            filter_by_positions(&data, None),
            vec![
                json!({"goals": {"avg": 0.0042}, "position": "FW"}),
                json!({"goals": {"avg": 0.0026}, "position": "Sub"}),
            ]
        );
        assert_eq!(filter_by_positions(&data, Some(&[])).len(), 2);
    }

    #[test]
    fn test_filter_by_positions_selected() {
        let data = json!({"FW": {"goals": {"avg": 0.0042}}, "Sub": {"goals": {"avg": 0.0026}}});
        assert_eq!(
            filter_by_positions(&data, Some(&["FW"])),
            vec![json!({"goals": {"avg": 0.0042}, "position": "FW"})]
        );
        assert!(filter_by_positions(&data, Some(&["GK"])).is_empty());
    }

    #[test]
    fn test_filter_by_positions_follows_mapping_order() {
        let data = json!({"Sub": {}, "AM": {}, "FW": {}});
        let labels: Vec<_> = filter_by_positions(&data, None)
            .iter()
            .map(|record| record["position"].clone())
            .collect();
        assert_eq!(labels, vec![json!("Sub"), json!("AM"), json!("FW")]);
    }

    #[test]
    fn test_filter_by_positions_non_object() {
        assert!(filter_by_positions(&json!([1, 2]), None).is_empty());
    }

    #[test]
    fn test_split_results() {
        let dates = vec![
            json!({"id": "1", "isResult": true}),
            json!({"id": "2", "isResult": false}),
            json!({"id": "3"}),
        ];
        let results = split_results(dates.clone(), true);
        assert_eq!(results, vec![json!({"id": "1", "isResult": true})]);

        let fixtures = split_results(dates, false);
        assert_eq!(fixtures.len(), 2);
        assert_eq!(fixtures[0]["id"], "2");
    }

    #[test]
    fn test_filter_sides_arrays_and_objects() {
        let shots = json!({
            "h": [{"player": "A", "result": "Goal"}, {"player": "B", "result": "SavedShot"}],
            "a": [{"player": "C", "result": "Goal"}]
        });
        let filtered = filter_sides(shots, Some(&criteria(json!({"result": "Goal"}))));
        assert_eq!(filtered["h"], json!([{"player": "A", "result": "Goal"}]));
        assert_eq!(filtered["a"], json!([{"player": "C", "result": "Goal"}]));

        let rosters = json!({
            "h": {"1": {"player": "A", "position": "GK"}, "2": {"player": "B", "position": "FW"}},
            "a": {"3": {"player": "C", "position": "GK"}}
        });
        let filtered = filter_sides(rosters, Some(&criteria(json!({"position": "GK"}))));
        assert_eq!(filtered["h"], json!({"1": {"player": "A", "position": "GK"}}));
        assert_eq!(filtered["a"], json!({"3": {"player": "C", "position": "GK"}}));
    }

    #[test]
    fn test_filter_sides_without_criteria_is_identity() {
        let shots = json!({"h": [{"x": 1}], "a": []});
        assert_eq!(filter_sides(shots.clone(), None), shots);
    }
}
