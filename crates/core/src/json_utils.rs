//! Lenient JSON recovery for model-generated text.
//!
//! Generated replies often wrap JSON in a fenced code block, add prose around
//! it, or get cut off mid-object. [`parse_lenient_json`] is the one place that
//! deals with all of that.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ParseFailure, PayloadError};

/// Structural checks a parsed payload must pass before it is shown to a learner.
pub trait Validate {
    /// Returns a description of the first problem found.
    fn validate(&self) -> Result<(), String>;
}

/// Strip markdown code block wrappers from JSON content.
///
/// Handles `` ```json ... ``` ``, `` ``` ... ``` ``, other language identifiers,
/// and an opening fence whose closing fence was truncated away.
#[must_use]
pub fn strip_markdown_json(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(without_prefix) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let without_suffix = without_prefix.strip_suffix("```").unwrap_or(without_prefix);
    without_suffix.split_once('\n').map_or_else(|| without_suffix.trim(), |(_, rest)| rest.trim())
}

/// Find the first balanced `{...}` or `[...]` span.
///
/// Brackets inside string literals (including escaped quotes) are ignored.
/// Returns `None` when no opening bracket exists or the span never closes.
#[must_use]
pub fn extract_json_span(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let mut depth = 0_usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {},
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    return text.get(start..end);
                }
            },
            _ => {},
        }
    }
    None
}

/// Parse JSON out of free-form model output.
///
/// Order of attempts: strip a code fence, parse the whole remainder, then
/// parse the first balanced object/array span.
///
/// # Errors
/// [`ParseFailure::Empty`] for blank input, [`ParseFailure::NoJson`] when no
/// bracket is present, [`ParseFailure::Unbalanced`] for a truncated span, and
/// [`ParseFailure::Invalid`] when the span is not valid JSON.
pub fn parse_lenient_json(text: &str) -> Result<Value, ParseFailure> {
    let stripped = strip_markdown_json(text);
    if stripped.is_empty() {
        return Err(ParseFailure::Empty);
    }
    if let Ok(value) = serde_json::from_str::<Value>(stripped) {
        return Ok(value);
    }
    if !stripped.contains(['{', '[']) {
        return Err(ParseFailure::NoJson);
    }
    let span = extract_json_span(stripped).ok_or(ParseFailure::Unbalanced)?;
    serde_json::from_str(span).map_err(ParseFailure::Invalid)
}

/// Parse and validate a typed payload from model output.
///
/// # Errors
/// [`PayloadError::Parse`] when no JSON can be recovered and
/// [`PayloadError::Validation`] when the JSON does not have the expected shape.
pub fn parse_payload<T: DeserializeOwned + Validate>(text: &str) -> Result<T, PayloadError> {
    let value = parse_lenient_json(text)?;
    let payload: T =
        serde_json::from_value(value).map_err(|e| PayloadError::Validation(e.to_string()))?;
    payload.validate().map_err(PayloadError::Validation)?;
    Ok(payload)
}

/// Complete `"key": "string value"` pairs.
#[expect(clippy::unwrap_used, reason = "static regex pattern is compile-time validated")]
static STRING_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""(?P<key>[A-Za-z_][A-Za-z0-9_]*)"\s*:\s*"(?P<value>(?:[^"\\]|\\.)*)""#).unwrap()
});

/// Pull a single string field out of text that is too broken to parse.
///
/// Only complete `"field": "value"` pairs are recognised; the value is
/// unescaped as a JSON string.
#[must_use]
pub fn salvage_string_field(text: &str, field: &str) -> Option<String> {
    STRING_FIELD.captures_iter(text).find(|caps| &caps["key"] == field).and_then(|caps| {
        let quoted = format!("\"{}\"", &caps["value"]);
        serde_json::from_str::<String>(&quoted).ok()
    })
}
