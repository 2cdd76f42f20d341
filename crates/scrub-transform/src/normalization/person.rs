//! People and placeholder-bearing free text.

use scrub_model::{Value, is_placeholder};

/// Extra tokens that mean "nobody" in people fields.
const UNASSIGNED_TOKENS: &[&str] = &["unassigned"];

fn is_nobody(raw: &str) -> bool {
    let folded = raw.trim().to_lowercase();
    is_placeholder(&folded) || UNASSIGNED_TOKENS.contains(&folded.as_str())
}

/// Trimmed pass-through; placeholders become `fallback`.
pub fn normalize_person(value: &Value, fallback: &str) -> Value {
    match value {
        Value::Text(text) if !is_nobody(text) => Value::Text(text.trim().to_string()),
        Value::Number(number) if !number.is_nan() => Value::Text(value.to_string()),
        _ => Value::Text(fallback.to_string()),
    }
}

/// Title-case each word (`"JOHN SMITH"` -> `"John Smith"`); placeholders
/// become `fallback`.
pub fn normalize_person_name(value: &Value, fallback: &str) -> Value {
    match value {
        Value::Text(text) if !is_nobody(text) => Value::Text(title_case(text)),
        _ => Value::Text(fallback.to_string()),
    }
}

fn title_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            word.chars()
                .enumerate()
                .map(|(idx, ch)| {
                    if idx == 0 {
                        single_char(ch.to_uppercase(), ch)
                    } else {
                        single_char(ch.to_lowercase(), ch)
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Case mappings that expand to several characters (`ß` -> `SS`) are left
/// alone so that title-casing stays idempotent.
fn single_char(mut mapped: impl Iterator<Item = char>, original: char) -> char {
    match (mapped.next(), mapped.next()) {
        (Some(ch), None) => ch,
        _ => original,
    }
}
