//! Recovery of the corrupted cache string.
//!
//! Grayjay stores the playlist cache as a string that is itself serialized
//! JSON, prefixed with `__CACHE:`. Serializing that record again escapes every
//! inner quote, and the outer layer leaves stray bare quotes behind. The steps
//! below peel those layers off in a fixed order:
//!
//! 1. strip the leading `"__CACHE:` marker
//! 2. strip one trailing `"`
//! 3. delete bare `"` (not preceded by `\`)
//! 4. turn `\"` into `"`
//! 5. delete leftover `\\"`
//!
//! Step 3 must run before step 4, otherwise the quotes step 4 restores would
//! be deleted as residue. Step 5 runs last.

use serde_json::Value;

use crate::domain::errors::json_kind;
use crate::domain::FormatError;

/// Marker at the start of a serialized cache record
pub const CACHE_MARKER: &str = "\"__CACHE:";

const EXCERPT_CHARS: usize = 120;

/// Step 1: strip the `"__CACHE:` marker at position 0
pub fn strip_cache_marker(text: &str) -> &str {
    text.strip_prefix(CACHE_MARKER).unwrap_or(text)
}

/// Step 2: strip a single trailing `"`
pub fn strip_trailing_quote(text: &str) -> &str {
    text.strip_suffix('"').unwrap_or(text)
}

/// Step 3: delete every `"` not immediately preceded by a backslash
pub fn remove_unescaped_quotes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev = None;

    for c in text.chars() {
        if c != '"' || prev == Some('\\') {
            out.push(c);
        }
        prev = Some(c);
    }

    out
}

/// Step 4: replace every `\"` with `"`
pub fn unescape_quotes(text: &str) -> String {
    text.replace("\\\"", "\"")
}

/// Step 5: delete every remaining `\\"`
pub fn remove_double_escapes(text: &str) -> String {
    text.replace("\\\\\"", "")
}

/// Text that already parses as a JSON object or array needs no recovery
fn is_structured(text: &str) -> bool {
    matches!(
        serde_json::from_str::<Value>(text),
        Ok(Value::Object(_)) | Ok(Value::Array(_))
    )
}

/// Run the full recovery chain.
///
/// Input that is already a JSON object or array is returned unchanged, so the
/// chain is idempotent on its own (parseable) output.
pub fn recover(text: &str) -> String {
    if is_structured(text) {
        return text.to_string();
    }

    let text = strip_cache_marker(text);
    let text = strip_trailing_quote(text);
    let text = remove_unescaped_quotes(text);
    let text = unescape_quotes(&text);
    remove_double_escapes(&text)
}

/// Recover `text` and parse the result
pub fn recover_value(text: &str) -> Result<Value, FormatError> {
    let recovered = recover(text);

    serde_json::from_str(&recovered).map_err(|source| FormatError::Unrecoverable {
        source,
        excerpt: recovered.chars().take(EXCERPT_CHARS).collect(),
    })
}

/// Recover `text` and require a JSON object at the top level
pub fn recover_object(text: &str) -> Result<Value, FormatError> {
    let value = recover_value(text)?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(FormatError::NotAnObject {
            found: json_kind(&value),
        })
    }
}
