//! Rendering helpers for TOML values shown in diagnostics.

use toml::Value;

/// Renders a value for display: strings unquoted, everything else in TOML
/// inline syntax.
#[must_use]
pub fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Whether a value counts as "set to something": non-empty strings,
/// arrays and tables, non-zero numbers, `true` and any datetime.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::String(s) => !s.is_empty(),
        Value::Integer(n) => *n != 0,
        Value::Float(f) => *f != 0.0,
        Value::Boolean(b) => *b,
        Value::Datetime(_) => true,
        Value::Array(items) => !items.is_empty(),
        Value::Table(table) => !table.is_empty(),
    }
}

/// Returns at most the first `max_chars` characters of `text`.
#[must_use]
pub fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
