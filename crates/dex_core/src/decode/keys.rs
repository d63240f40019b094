//! Key naming conversion for bundled JSON.
//!
//! Bundled resources use snake_case keys; the typed model decodes camelCase.
//! The conversion is a pure string transform applied to every key.

use serde_json::{Map, Value};
use std::borrow::Cow;

/// Converts one snake_case key to camelCase.
///
/// - Keys without an inner `_` are returned unchanged.
/// - Leading and trailing underscores are preserved.
/// - Runs of inner underscores collapse; the first word is lowercased and
///   every following word is capitalized.
pub fn convert_from_snake_case(key: &str) -> Cow<'_, str> {
    let start = key.len() - key.trim_start_matches('_').len();
    let end = key.trim_end_matches('_').len();
    if start >= end {
        return Cow::Borrowed(key);
    }

    let body = &key[start..end];
    if !body.contains('_') {
        return Cow::Borrowed(key);
    }

    let mut converted = String::with_capacity(key.len());
    converted.push_str(&key[..start]);
    for (index, word) in body.split('_').filter(|word| !word.is_empty()).enumerate() {
        if index == 0 {
            converted.push_str(&word.to_lowercase());
        } else {
            push_capitalized(&mut converted, word);
        }
    }
    converted.push_str(&key[end..]);
    Cow::Owned(converted)
}

fn push_capitalized(target: &mut String, word: &str) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        target.extend(first.to_uppercase());
        target.push_str(&chars.as_str().to_lowercase());
    }
}

/// Rewrites every object key in `value`, recursing into arrays and objects.
pub fn convert_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, nested)| {
                    (
                        convert_from_snake_case(&key).into_owned(),
                        convert_keys(nested),
                    )
                })
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(convert_keys).collect()),
        other => other,
    }
}
