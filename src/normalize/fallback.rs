//! Canned diagnostic substituted when the agent output cannot be used, and
//! the fixed user-facing strings of the rejection path.

use super::{DiagnosticResult, DiagnosticStep};

/// Estimate shown when the agent returns none of its own.
pub const DEFAULT_ESTIMATED_TIME: &str = "שבוע עד שבועיים";

/// Retry guidance for the explicit `valid: false` rejection.
pub const INVALID_INPUT_MESSAGE: &str = "הפרטים שהוזנו אינם מספיקים ליצירת אפיון מדויק";

/// The generic diagnostic every caller can render: a canned title, four
/// fixed steps and the standard value text.
pub fn fallback_result() -> DiagnosticResult {
    DiagnosticResult {
        title: "פתרון אוטומציה מותאם אישית".to_string(),
        steps: vec![
            DiagnosticStep::new("ניתוח תהליכים עסקיים קיימים", "כלי ניתוח מקצועי"),
            DiagnosticStep::new("תכנון הפתרון האוטומטי", "מערכת תכנון"),
            DiagnosticStep::new("בניה והטמעה של האוטומציה", "פלטפורמת אוטומציה"),
            DiagnosticStep::new("בדיקות ושיפור מתמיד", "מערכת ניטור"),
        ],
        estimated_time: DEFAULT_ESTIMATED_TIME.to_string(),
        value_proposition: "פתרון מותאם במיוחד לצרכים העסקיים שלכם, חוסך זמן ומשפר יעילות"
            .to_string(),
        time_saving: Some("חיסכון של שעות עבודה ידניות בכל שבוע".to_string()),
        efficiency_gain: Some("שיפור משמעותי בזמני תגובה ודיוק".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_has_four_steps_and_is_usable() {
        let r = fallback_result();
        assert_eq!(r.steps.len(), 4);
        assert!(!r.title.is_empty());
        assert!(!r.value_proposition.is_empty());
        assert_eq!(r.estimated_time, DEFAULT_ESTIMATED_TIME);
    }
}
