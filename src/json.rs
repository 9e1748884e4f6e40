//! A deliberately tiny JSON field scanner.
//!
//! The provider APIs are only ever asked for one top-level string field
//! (`tag_name` or `default_branch`), so instead of pulling a full parser
//! into the hot path we scan for `"key":"` and read up to the next quote.
//! This is *not* a JSON parser: it doesn't understand escape sequences or
//! nested structures, and it must not grow into one. If a future field
//! needs either, switch to a real parser instead.

/// Extract a top-level string field by key, or `None` if the key is
/// missing or the value is empty.
pub fn extract_string_field(json: &str, key: &str) -> Option<String> {
    let compact = format!("\"{}\":\"", key);
    let spaced = format!("\"{}\": \"", key);

    let (index, pattern_len) = match json.find(&compact) {
        Some(index) => (index, compact.len()),
        None => (json.find(&spaced)?, spaced.len()),
    };

    let start = index + pattern_len;
    let len = json[start..].find('"')?;

    if len == 0 {
        None
    } else {
        Some(json[start..start + len].to_string())
    }
}
