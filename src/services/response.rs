//! Tolerant readers for relay response bodies.
//!
//! The generators behind the relay change their output shape from time to
//! time, so every field is looked up under a list of aliases and anything
//! unexpected degrades to `None` or an empty list instead of an error.

use serde_json::Value;

use super::backend::{Greeting, Prediction, SavedSymbol};

const GREETING_KEYS: &[&str] = &["greeting", "message", "text", "result"];
const RATIONALE_KEYS: &[&str] = &["rationale", "reason"];
const PREDICTION_LIST_KEYS: &[&str] = &["predicted_signs", "predictions", "signs"];
const PREDICTION_LABEL_KEYS: &[&str] = &["sign_name", "label", "name"];
const PREDICTION_IMAGE_KEYS: &[&str] = &["image_url", "imageSource", "image", "imagePath"];
const REWARD_IMAGE_KEYS: &[&str] = &["image", "image_url", "url"];
const ERROR_KEYS: &[&str] = &["error", "message"];

/// First non-empty string found under any of `keys`.
fn first_string(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(key))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Greeting text and optional rationale.
pub fn greeting_from(value: &Value) -> Option<Greeting> {
    let text = match value {
        Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
        _ => first_string(value, GREETING_KEYS)?,
    };

    Some(Greeting {
        text,
        rationale: first_string(value, RATIONALE_KEYS),
    })
}

/// Predicted signs, in response order, at most `limit`.
///
/// Accepts a bare array or an array under one of the list aliases. Entries
/// may be plain strings or objects carrying a label and optional image.
pub fn predictions_from(value: &Value, limit: usize) -> Vec<Prediction> {
    let list = match value {
        Value::Array(items) => Some(items),
        _ => PREDICTION_LIST_KEYS
            .iter()
            .filter_map(|key| value.get(key))
            .find_map(Value::as_array),
    };

    let Some(list) = list else {
        return Vec::new();
    };

    list.iter()
        .filter_map(prediction_from_entry)
        .take(limit)
        .collect()
}

fn prediction_from_entry(entry: &Value) -> Option<Prediction> {
    match entry {
        Value::String(s) => {
            let label = s.trim();
            (!label.is_empty()).then(|| Prediction::new(label))
        }
        Value::Number(n) => Some(Prediction::new(n.to_string())),
        Value::Object(_) => {
            let label = first_string(entry, PREDICTION_LABEL_KEYS)?;
            Some(Prediction {
                label,
                image_source: first_string(entry, PREDICTION_IMAGE_KEYS),
            })
        }
        _ => None,
    }
}

/// Generated reward image URI.
pub fn reward_image_from(value: &Value) -> Option<String> {
    first_string(value, REWARD_IMAGE_KEYS)
}

/// Committed symbol location; `None` unless the relay reported success.
pub fn saved_symbol_from(value: &Value) -> Option<SavedSymbol> {
    if !value.get("success").and_then(Value::as_bool).unwrap_or(false) {
        return None;
    }

    Some(SavedSymbol {
        path: first_string(value, &["path"])?,
        html_url: first_string(value, &["html_url"]),
    })
}

/// Error text from an error body, including `details` when present.
pub fn error_message_from(value: &Value) -> Option<String> {
    let error = first_string(value, ERROR_KEYS)?;
    match first_string(value, &["details"]) {
        Some(details) => Some(format!("{error}: {details}")),
        None => Some(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_greeting_aliases() {
        let g = greeting_from(&json!({"greeting": "Hello Sam!"})).unwrap();
        assert_eq!(g.text, "Hello Sam!");
        assert_eq!(g.rationale, None);

        let g = greeting_from(&json!({"message": "Hi", "reason": "lunch time"})).unwrap();
        assert_eq!(g.text, "Hi");
        assert_eq!(g.rationale.as_deref(), Some("lunch time"));

        let g = greeting_from(&json!({"result": "Hey", "text": ""})).unwrap();
        assert_eq!(g.text, "Hey");

        assert!(greeting_from(&json!({"unrelated": 1})).is_none());
        assert_eq!(greeting_from(&json!("plain")).unwrap().text, "plain");
    }

    #[test]
    fn test_predictions_shapes() {
        let bare = predictions_from(&json!(["Apple", "Water"]), 3);
        assert_eq!(bare.len(), 2);
        assert_eq!(bare[0].label, "Apple");

        let keyed = predictions_from(
            &json!({"predicted_signs": [
                {"sign_name": "Juice", "image_url": "https://img/juice.png"},
                {"label": "Toast"},
                {"name": "Milk", "imagePath": "/symbols/milk.png"},
                {"nothing": true},
                null
            ]}),
            6,
        );
        let labels: Vec<&str> = keyed.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Juice", "Toast", "Milk"]);
        assert_eq!(keyed[0].image_source.as_deref(), Some("https://img/juice.png"));
        assert_eq!(keyed[1].image_source, None);
        assert_eq!(keyed[2].image_source.as_deref(), Some("/symbols/milk.png"));

        let alt = predictions_from(&json!({"signs": ["A", "B", "C", "D"]}), 3);
        assert_eq!(alt.len(), 3);
    }

    #[test]
    fn test_predictions_garbage_is_empty() {
        assert!(predictions_from(&json!({"predictions": "nope"}), 3).is_empty());
        assert!(predictions_from(&json!(42), 3).is_empty());
        assert!(predictions_from(&json!({}), 3).is_empty());
    }

    #[test]
    fn test_reward_image() {
        assert_eq!(
            reward_image_from(&json!({"image": "https://img/r.png"})).as_deref(),
            Some("https://img/r.png")
        );
        assert_eq!(reward_image_from(&json!({"image": ""})), None);
    }

    #[test]
    fn test_saved_symbol() {
        let saved = saved_symbol_from(&json!({
            "success": true,
            "path": "public/symbols/juice.png",
            "html_url": "https://github.com/o/r/blob/main/public/symbols/juice.png"
        }))
        .unwrap();
        assert_eq!(saved.path, "public/symbols/juice.png");
        assert!(saved.html_url.is_some());

        assert!(saved_symbol_from(&json!({"success": false, "path": "x"})).is_none());
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message_from(&json!({"error": "GitHub commit failed", "details": "409"})).as_deref(),
            Some("GitHub commit failed: 409")
        );
        assert_eq!(
            error_message_from(&json!({"message": "Too many requests"})).as_deref(),
            Some("Too many requests")
        );
        assert_eq!(error_message_from(&json!({})), None);
    }
}
