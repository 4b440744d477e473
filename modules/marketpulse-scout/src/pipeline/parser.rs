//! Pulls the JSON report out of the model's free-text answer.
//!
//! The span is greedy: first `{` to last `}`. Prose before and after the
//! payload is fine; a second brace-delimited region after the payload is not,
//! and fails closed instead of guessing which object was meant.

use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Why no payload came out of a response. Logged, never returned to callers
/// of `normalize`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadMiss {
    /// No `{ ... }` span in the text at all.
    NoBraces,
    /// The span was there but is not valid JSON.
    Malformed(String),
}

/// Greedy `{ ... }` slice of `text`, if one exists.
pub fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Parse the embedded report object.
pub fn parse_payload(text: &str) -> Result<Map<String, Value>, PayloadMiss> {
    let span = brace_span(text).ok_or(PayloadMiss::NoBraces)?;
    match serde_json::from_str::<Value>(span) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(PayloadMiss::Malformed(format!(
            "expected an object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(PayloadMiss::Malformed(e.to_string())),
    }
}

/// [`parse_payload`] with the miss logged and folded into `None`.
pub fn extract_payload(text: &str) -> Option<Map<String, Value>> {
    match parse_payload(text) {
        Ok(map) => {
            debug!(keys = map.len(), "Parsed intelligence payload");
            Some(map)
        }
        Err(PayloadMiss::NoBraces) => {
            warn!(text_len = text.len(), "No JSON payload found in model response");
            None
        }
        Err(PayloadMiss::Malformed(reason)) => {
            warn!(text_len = text.len(), %reason, "JSON parse failed");
            None
        }
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_inside_prose_is_found() {
        let text = r#"Here is the result: {"moves":[]} Thanks!"#;
        let map = parse_payload(text).unwrap();
        assert!(map["moves"].is_array());
    }

    #[test]
    fn fenced_payload_is_found() {
        let text = "```json\n{\"insights\": []}\n```";
        assert!(parse_payload(text).is_ok());
    }

    #[test]
    fn nested_braces_inside_payload_are_kept() {
        let text = r#"{"swot":{"Acme":{"strengths":["a"]}}}"#;
        let map = parse_payload(text).unwrap();
        assert_eq!(map["swot"]["Acme"]["strengths"][0], "a");
    }

    #[test]
    fn no_braces_is_a_miss() {
        assert_eq!(parse_payload("nothing here"), Err(PayloadMiss::NoBraces));
        assert_eq!(parse_payload(""), Err(PayloadMiss::NoBraces));
    }

    #[test]
    fn reversed_braces_is_a_miss() {
        assert_eq!(parse_payload("} then {"), Err(PayloadMiss::NoBraces));
    }

    #[test]
    fn trailing_brace_region_fails_closed() {
        let text = r#"{"moves":[]} and also {"other":1}"#;
        assert!(matches!(parse_payload(text), Err(PayloadMiss::Malformed(_))));
    }

    #[test]
    fn extra_trailing_brace_fails_closed() {
        assert!(matches!(
            parse_payload(r#"{"moves":[]}}"#),
            Err(PayloadMiss::Malformed(_))
        ));
    }

    #[test]
    fn extract_payload_folds_misses_into_none() {
        assert!(extract_payload("{not json}").is_none());
        assert!(extract_payload("plain text").is_none());
        assert!(extract_payload("{}").is_some());
    }
}
