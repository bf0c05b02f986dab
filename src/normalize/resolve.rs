//! Raw-text resolution for agent output: ordered field priority, explicit
//! value-to-text conversion, fenced-block extraction, and the parse step.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::AgentOutput;

/// Interior of a triple-backtick block, optionally tagged `json`. Models
/// tend to wrap their JSON answer in one even when told not to.
static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```(?:json)?\s*\n?([\s\S]*?)\n?```").expect("fenced block regex")
});

/// Resolve the raw agent text: `output`, then `text`, then `response`; the
/// first present non-falsy value wins. `None` when nothing usable exists.
pub fn resolve_raw_text(output: &AgentOutput) -> Option<String> {
    [&output.output, &output.text, &output.response]
        .into_iter()
        .flatten()
        .find(|v| !is_falsy(v))
        .map(|v| value_to_text(v))
}

/// Upstream emitters treat null, empty strings, `false` and zero as "no
/// answer here, look at the next field".
fn is_falsy(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// A string payload is taken as-is; anything else is serialized to its
/// textual JSON form before parsing.
pub fn value_to_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// If the text contains a fenced block, only its interior is parsed;
/// otherwise the text is returned untouched.
pub fn extract_fenced(text: &str) -> &str {
    match FENCED_BLOCK.captures(text).and_then(|c| c.get(1)) {
        Some(m) => m.as_str(),
        None => text,
    }
}

/// The explicit parse step. Callers match on the result; the failure arm
/// is the fallback substitution, never a surfaced error.
pub fn parse_payload(text: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(text)
}
