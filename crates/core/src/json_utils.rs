//! JSON helpers for values that arrive from external stores.

use serde_json::Value;

use crate::Result;

/// Levels of string-wrapping undone by [`decode_json_field`].
const MAX_STRING_DECODE_DEPTH: usize = 3;

/// Unwraps a JSON value that may have been stored as a JSON-encoded string.
///
/// Stores sometimes persist a nested array as text (occasionally twice over).
/// Strings are parsed until a non-string value appears; blank strings become `null`.
/// Non-string values are returned as-is.
pub fn decode_json_field(value: &Value) -> Result<Value> {
    let mut current = value.clone();
    for _ in 0..MAX_STRING_DECODE_DEPTH {
        let Value::String(text) = &current else {
            return Ok(current);
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Value::Null);
        }
        current = serde_json::from_str(trimmed)?;
    }
    Ok(current)
}
