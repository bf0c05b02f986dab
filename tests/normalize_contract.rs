// tests/normalize_contract.rs
//
// Contract tests for the normalization pipeline, exercised through the
// public library surface.
//
// Covered:
// - explicit `valid: false` rejection (restricted lead echo, fixed message)
// - structural degradation to the canned fallback (prose, truncated JSON,
//   missing/empty steps)
// - field-priority resolution and fenced-block extraction
// - estimate defaulting and verbatim pass-through of the optional lines
// - purity modulo the injected clock

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use lead_diagnostic_service::normalize::fallback;
use lead_diagnostic_service::{normalize_at, AgentOutput, Lead, NormalizedResponse};

fn lead() -> Lead {
    serde_json::from_value(json!({
        "name": "A",
        "email": "a@b.com",
        "phone": "123",
        "problem": "leads are copied by hand",
        "goal": "push them into the CRM",
        "currentSystem": "Sheets"
    }))
    .expect("lead fixture")
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 16, 10, 0, 0).unwrap()
}

#[test]
fn valid_false_yields_invalid_input_with_contact_lead() {
    let contact_only: Lead =
        serde_json::from_value(json!({ "name": "A", "email": "a@b.com", "phone": "123" }))
            .unwrap();
    let output = AgentOutput::from_output(r#"{"valid": false}"#);

    let v = serde_json::to_value(normalize_at(&output, &contact_only, now())).unwrap();
    assert_eq!(
        v,
        json!({
            "success": false,
            "error": "INVALID_INPUT",
            "message": "הפרטים שהוזנו אינם מספיקים ליצירת אפיון מדויק",
            "action": "RETRY",
            "lead": {
                "name": "A",
                "email": "a@b.com",
                "phone": "123",
                "timestamp": "2025-08-16T10:00:00.000Z"
            }
        })
    );
}

#[test]
fn valid_false_wins_over_a_usable_draft() {
    let output = AgentOutput::from_output(
        json!({
            "valid": false,
            "title": "t",
            "steps": [{ "name": "n", "tool": "x" }],
            "valueProposition": "v"
        })
        .to_string(),
    );
    let resp = normalize_at(&output, &lead(), now());
    assert!(!resp.is_success(), "rejection must trump draft content");
}

#[test]
fn plain_prose_falls_back_to_the_canned_result() {
    let output = AgentOutput::from_text("not json at all");
    let resp = normalize_at(&output, &lead(), now());

    let v = serde_json::to_value(&resp).unwrap();
    assert_eq!(v["success"], json!(true));
    assert_eq!(
        v["result"],
        serde_json::to_value(fallback::fallback_result()).unwrap()
    );
    assert_eq!(v["result"]["steps"].as_array().unwrap().len(), 4);
}

#[test]
fn truncated_json_falls_back() {
    let output = AgentOutput::from_output(r#"{"title": "cut off"#);
    assert!(normalize_at(&output, &lead(), now()).is_fallback());
}

#[test]
fn missing_or_empty_steps_fall_back() {
    let no_steps =
        AgentOutput::from_output(json!({ "title": "t", "valueProposition": "v" }).to_string());
    assert!(normalize_at(&no_steps, &lead(), now()).is_fallback());

    let empty_steps = AgentOutput::from_output(
        json!({ "title": "t", "steps": [], "valueProposition": "v" }).to_string(),
    );
    assert!(normalize_at(&empty_steps, &lead(), now()).is_fallback());
}

#[test]
fn estimate_defaults_and_optional_lines_pass_through() {
    let output = AgentOutput::from_output(
        json!({
            "title": "חיבור טפסים ל-CRM",
            "steps": [
                { "name": "מיפוי השדות", "tool": "n8n" },
                { "name": "חיבור ה-CRM", "tool": "Pipedrive" }
            ],
            "valueProposition": "אפס הקלדה ידנית",
            "timeSaving": "שעתיים ביום",
            "efficiencyGain": "פחות טעויות"
        })
        .to_string(),
    );

    let v = serde_json::to_value(normalize_at(&output, &lead(), now())).unwrap();
    assert_eq!(v["result"]["title"], json!("חיבור טפסים ל-CRM"));
    assert_eq!(
        v["result"]["estimatedTime"],
        json!(fallback::DEFAULT_ESTIMATED_TIME)
    );
    assert_eq!(v["result"]["timeSaving"], json!("שעתיים ביום"));
    assert_eq!(v["result"]["efficiencyGain"], json!("פחות טעויות"));
}

#[test]
fn output_field_wins_over_text() {
    let output = AgentOutput {
        output: Some(json!(r#"{"valid": false}"#)),
        text: Some(json!(
            r#"{"title":"t","steps":[{"name":"n","tool":"x"}],"valueProposition":"v"}"#
        )),
        response: None,
    };
    let resp = normalize_at(&output, &lead(), now());
    assert!(!resp.is_success(), "the `output` field must be the one parsed");
}

#[test]
fn fenced_block_inside_prose_is_parsed() {
    let output = AgentOutput::from_text(
        "Sure, here is my verdict:\n```json\n{\"valid\":false}\n```\nLet me know!",
    );
    let resp = normalize_at(&output, &lead(), now());
    assert!(!resp.is_success());
}

#[test]
fn empty_agent_output_falls_back() {
    let resp = normalize_at(&AgentOutput::default(), &lead(), now());
    assert!(resp.is_fallback());
}

#[test]
fn success_lead_carries_all_six_fields_plus_timestamp() {
    let output = AgentOutput::from_text("prose, so the canned result is used");
    let v = serde_json::to_value(normalize_at(&output, &lead(), now())).unwrap();

    let lead_obj = v["lead"].as_object().unwrap();
    for key in ["name", "email", "phone", "problem", "goal", "currentSystem", "timestamp"] {
        assert!(lead_obj.contains_key(key), "missing lead field '{key}'");
    }
    assert_eq!(v["lead"]["timestamp"], json!("2025-08-16T10:00:00.000Z"));
}

#[test]
fn normalization_is_pure_modulo_the_clock() {
    let output = AgentOutput::from_output(
        json!({
            "title": "t",
            "steps": [{ "name": "n", "tool": "x" }],
            "valueProposition": "v"
        })
        .to_string(),
    );
    let a: NormalizedResponse = normalize_at(&output, &lead(), now());
    let b: NormalizedResponse = normalize_at(&output, &lead(), now());
    assert_eq!(a, b);
}
