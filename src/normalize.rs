//! Reconciles the field names the mood API uses across its endpoints into a
//! single [`MoodEntry`] shape.
//!
//! The backend has shipped records as `{date, score, note}`,
//! `{entryDate, moodScore, description}` and mixes of both. Aliases are
//! resolved left to right; a `null` counts as absent.

use crate::models::{DEFAULT_SCORE, MAX_SCORE, MIN_SCORE, MoodEntry};
use serde_json::Value;

const DATE_KEYS: [&str; 2] = ["date", "entryDate"];
const SCORE_KEYS: [&str; 3] = ["moodScore", "score", "mood"];
const NOTE_KEYS: [&str; 2] = ["note", "description"];

pub fn normalize_mood(raw: &Value) -> MoodEntry {
    MoodEntry {
        id: raw.get("id").and_then(as_integer).unwrap_or_default(),
        date: first_present(raw, &DATE_KEYS)
            .map(as_text)
            .unwrap_or_default(),
        score: first_present(raw, &SCORE_KEYS)
            .and_then(as_integer)
            .filter(|score| (i64::from(MIN_SCORE)..=i64::from(MAX_SCORE)).contains(score))
            .map(|score| score as u8)
            .unwrap_or(DEFAULT_SCORE),
        note: first_present(raw, &NOTE_KEYS).map(as_text),
    }
}

/// Accepts either a bare array of records or a page object exposing them
/// under `content`. Any other shape is an empty list.
pub fn normalize_list(raw: &Value) -> Vec<MoodEntry> {
    let items: &[Value] = match raw {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get("content") {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        },
        _ => &[],
    };

    items.iter().map(normalize_mood).collect()
}

fn first_present<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| raw.get(key))
        .find(|value| !value.is_null())
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.fract() == 0.0)
                .map(|float| float as i64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_date_aliases_resolve_to_empty() {
        let entry = normalize_mood(&json!({ "id": 1, "score": 4 }));
        assert_eq!(entry.date, "");

        let entry = normalize_mood(&json!({ "id": 1, "date": null, "entryDate": null }));
        assert_eq!(entry.date, "");
    }

    #[test]
    fn missing_score_aliases_default_to_three() {
        let entry = normalize_mood(&json!({ "id": 7, "date": "2026-01-05" }));
        assert_eq!(entry.score, 3);
        assert_eq!(entry.id, 7);
        assert_eq!(entry.note, None);
    }

    #[test]
    fn score_alias_precedence() {
        let entry = normalize_mood(&json!({ "id": 1, "moodScore": 5, "score": 2, "mood": 1 }));
        assert_eq!(entry.score, 5);

        let entry = normalize_mood(&json!({ "id": 1, "score": 2, "mood": 1 }));
        assert_eq!(entry.score, 2);

        let entry = normalize_mood(&json!({ "id": 1, "mood": 1 }));
        assert_eq!(entry.score, 1);

        let entry = normalize_mood(&json!({ "id": 1, "moodScore": null, "score": 4 }));
        assert_eq!(entry.score, 4);
    }

    #[test]
    fn out_of_range_or_malformed_scores_fall_back() {
        assert_eq!(normalize_mood(&json!({ "moodScore": 9 })).score, 3);
        assert_eq!(normalize_mood(&json!({ "moodScore": 0 })).score, 3);
        assert_eq!(normalize_mood(&json!({ "moodScore": "great" })).score, 3);
        assert_eq!(normalize_mood(&json!({ "moodScore": "4" })).score, 4);
        assert_eq!(normalize_mood(&json!({ "moodScore": 2.0 })).score, 2);
    }

    #[test]
    fn date_and_note_aliases() {
        let entry = normalize_mood(&json!({
            "id": 3,
            "entryDate": "2026-02-01",
            "description": "slept well"
        }));
        assert_eq!(entry.date, "2026-02-01");
        assert_eq!(entry.note.as_deref(), Some("slept well"));

        let entry = normalize_mood(&json!({
            "id": 3,
            "date": "2026-02-02",
            "entryDate": "2026-02-01",
            "note": "walk",
            "description": "ignored"
        }));
        assert_eq!(entry.date, "2026-02-02");
        assert_eq!(entry.note.as_deref(), Some("walk"));
    }

    #[test]
    fn list_accepts_both_shapes() {
        let bare = json!([{ "id": 1, "date": "2026-01-01", "score": 2 }]);
        let paged = json!({ "content": [{ "id": 1, "entryDate": "2026-01-01", "moodScore": 2 }] });

        assert_eq!(normalize_list(&bare), normalize_list(&paged));
        assert_eq!(normalize_list(&bare).len(), 1);
        assert!(normalize_list(&json!({ "items": [] })).is_empty());
        assert!(normalize_list(&Value::Null).is_empty());
    }
}
