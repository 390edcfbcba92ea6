//! JSON extraction from model output
//!
//! Models asked for "JSON only" still wrap answers in markdown fences or a
//! sentence of prose. These helpers recover the object before decoding.

use serde::de::DeserializeOwned;

use crate::error::{AgentError, Result};

/// Pull the JSON object out of free-form model text.
///
/// A fenced block (```` ```json ```` or bare ```` ``` ````) opened before the
/// first `{` wins; otherwise the span from the first `{` to the last `}` is
/// returned, so backticks inside string values are left alone.
pub fn extract_json(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    let first_brace = trimmed.find('{');

    if let Some(open) = trimmed.find("```").filter(|open| first_brace.is_none_or(|b| *open < b)) {
        let after_fence = &trimmed[open + 3..];
        // Skip the info string ("json") up to the end of the fence line.
        let body = match after_fence.find('\n') {
            Some(newline) => &after_fence[newline + 1..],
            None => after_fence.trim_start_matches("json"),
        };
        let body = match body.find("```") {
            Some(close) => &body[..close],
            None => body,
        };
        let body = body.trim();
        if !body.is_empty() {
            return Some(body);
        }
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(trimmed[start..=end].trim())
}

/// Extract and decode a JSON object from model text.
pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T> {
    if let Ok(value) = serde_json::from_str::<T>(text.trim()) {
        return Ok(value);
    }
    let json_str = extract_json(text).unwrap_or_else(|| text.trim());
    serde_json::from_str::<T>(json_str).map_err(|err| {
        tracing::debug!(error = %err, len = json_str.len(), "model output is not valid JSON");
        AgentError::Parse(format!("model output is not valid JSON: {err}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn extract_json_handles_fenced_blocks() {
        let body = "{\"a\":1}";
        let fenced = format!("```json\n{body}\n```\n");
        assert_eq!(extract_json(&fenced), Some(body));
    }

    #[test]
    fn extract_json_handles_bare_fence_with_prose() {
        let text = "Here you go:\n```\n{\"a\":1}\n```\nGood luck!";
        assert_eq!(extract_json(text), Some("{\"a\":1}"));
    }

    #[test]
    fn extract_json_falls_back_to_braces() {
        let s = "prefix {\"a\":{\"b\":2}} suffix";
        assert_eq!(extract_json(s), Some("{\"a\":{\"b\":2}}"));
    }

    #[test]
    fn extract_json_rejects_text_without_object() {
        assert_eq!(extract_json("no json here"), None);
        assert_eq!(extract_json("} backwards {"), None);
    }

    #[test]
    fn parse_json_reports_truncated_body() {
        let err = parse_json::<Value>("{\"sentiment\": \"bull").unwrap_err();
        assert!(matches!(err, AgentError::Parse(_)));
    }

    #[test]
    fn backticks_inside_string_values_are_kept() {
        let text = r#"{"technical_summary": "Pattern: ```ascending triangle``` on 4h", "confidence": 0.5}"#;
        assert_eq!(extract_json(text), Some(text));

        let value: Value = parse_json(text).unwrap();
        assert_eq!(value["technical_summary"], "Pattern: ```ascending triangle``` on 4h");
        assert_eq!(value["confidence"], 0.5);
    }

    #[test]
    fn parse_json_decodes_plain_object() {
        let value: Value = parse_json(" {\"confidence\": 0.5} ").unwrap();
        assert_eq!(value["confidence"], 0.5);
    }
}
