//! Agent-output normalization. Coerces whatever the upstream diagnostic
//! agent produced into one of the fixed response shapes the front end can
//! always render; every failure path resolves to a valid value.
//!
//! The one deliberate rejection is the agent's own `valid: false` signal.
//! Everything structurally unusable (prose, truncated JSON, missing
//! fields, wrong types) silently degrades to the canned fallback.

pub mod fallback;
mod resolve;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::lead::{ContactLead, Lead, StampedLead};

pub use resolve::{extract_fenced, parse_payload, resolve_raw_text, value_to_text};

/// Literal `error` value of the rejection shape; the front end keys its
/// retry branch on it.
pub const ERROR_INVALID_INPUT: &str = "INVALID_INPUT";

/// Literal `action` value of the rejection shape.
pub const ACTION_RETRY: &str = "RETRY";

/// Opaque upstream payload. The real text may sit under any of three keys;
/// see [`resolve_raw_text`] for the priority rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}

impl AgentOutput {
    pub fn from_output(v: impl Into<Value>) -> Self {
        Self {
            output: Some(v.into()),
            ..Self::default()
        }
    }

    pub fn from_text(v: impl Into<Value>) -> Self {
        Self {
            text: Some(v.into()),
            ..Self::default()
        }
    }
}

/// One step of a proposed automation, shown as a timeline entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticStep {
    pub name: String,
    pub tool: String,
}

impl DiagnosticStep {
    pub fn new(name: impl Into<String>, tool: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tool: tool.into(),
        }
    }
}

/// The diagnostic proposal rendered to the end user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticResult {
    pub title: String,
    pub steps: Vec<DiagnosticStep>,
    pub estimated_time: String,
    pub value_proposition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_saving: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub efficiency_gain: Option<String>,
}

/// What the agent is asked to produce. Fields are optional because the
/// usability gate, not deserialization, decides whether the draft is good
/// enough to show.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DraftDiagnostic {
    title: Option<String>,
    steps: Option<Vec<DiagnosticStep>>,
    estimated_time: Option<String>,
    value_proposition: Option<String>,
    time_saving: Option<String>,
    efficiency_gain: Option<String>,
}

/// Exactly one of these shapes per invocation. `success` plus, when false,
/// `error == "INVALID_INPUT"` fully disambiguate the union for consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NormalizedResponse {
    Success(SuccessResponse),
    InvalidInput(InvalidInputResponse),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub lead: StampedLead,
    pub result: DiagnosticResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvalidInputResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
    pub action: String,
    pub lead: ContactLead,
}

impl NormalizedResponse {
    pub fn success(lead: &Lead, result: DiagnosticResult, now: DateTime<Utc>) -> Self {
        Self::Success(SuccessResponse {
            success: true,
            lead: lead.stamped_at(now),
            result,
        })
    }

    pub fn fallback(lead: &Lead, now: DateTime<Utc>) -> Self {
        Self::success(lead, fallback::fallback_result(), now)
    }

    pub fn invalid_input(lead: &Lead, now: DateTime<Utc>) -> Self {
        Self::InvalidInput(InvalidInputResponse {
            success: false,
            error: ERROR_INVALID_INPUT.to_string(),
            message: fallback::INVALID_INPUT_MESSAGE.to_string(),
            action: ACTION_RETRY.to_string(),
            lead: lead.contact_at(now),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// True when the success carries the canned fallback instead of an
    /// agent-authored result.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Success(s) if s.result == fallback::fallback_result())
    }
}

/// Normalize one agent output for one captured lead. Never fails; the
/// timestamp is read from the wall clock.
pub fn normalize(output: &AgentOutput, lead: &Lead) -> NormalizedResponse {
    normalize_at(output, lead, Utc::now())
}

/// Same as [`normalize`] with an injected clock, so tests can pin time.
pub fn normalize_at(output: &AgentOutput, lead: &Lead, now: DateTime<Utc>) -> NormalizedResponse {
    let raw = resolve_raw_text(output).unwrap_or_default();
    let payload = extract_fenced(&raw);

    let parsed = match parse_payload(payload) {
        Ok(v) => v,
        Err(err) => {
            debug!(target: "normalize", %err, "agent payload is not JSON, using fallback");
            return NormalizedResponse::fallback(lead, now);
        }
    };

    // The agent's own verdict on the input wins over any draft content.
    if parsed.get("valid") == Some(&Value::Bool(false)) {
        debug!(target: "normalize", "agent rejected the input as insufficient");
        return NormalizedResponse::invalid_input(lead, now);
    }

    match usable_result(&parsed) {
        Some(result) => NormalizedResponse::success(lead, result, now),
        None => {
            debug!(target: "normalize", "agent draft incomplete, using fallback");
            NormalizedResponse::fallback(lead, now)
        }
    }
}

/// Usability gate: non-empty title, non-empty steps, non-empty value
/// proposition. `estimatedTime` is defaulted; the two optional value lines
/// pass through verbatim.
fn usable_result(parsed: &Value) -> Option<DiagnosticResult> {
    let draft: DraftDiagnostic = serde_json::from_value(parsed.clone()).ok()?;
    let title = draft.title.filter(|t| !t.is_empty())?;
    let steps = draft.steps.filter(|s| !s.is_empty())?;
    let value_proposition = draft.value_proposition.filter(|v| !v.is_empty())?;
    Some(DiagnosticResult {
        title,
        steps,
        estimated_time: draft
            .estimated_time
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| fallback::DEFAULT_ESTIMATED_TIME.to_string()),
        value_proposition,
        time_saving: draft.time_saving,
        efficiency_gain: draft.efficiency_gain,
    })
}
