//! Decoder from the model's reply text into an [`Intent`].
//!
//! This is the only place untyped model output becomes typed data. Replies
//! that carry no JSON object, or one that does not fit a known intent, are
//! turned into a plain answer instead of an error.

use std::sync::OnceLock;

use regex::Regex;
use saver_models::Intent;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Prefix of answers recovered from a malformed JSON reply.
pub const MALFORMED_PREFIX: &str = "🤖";

/// Prefix of answers recovered from a reply with no JSON at all.
pub const PLAIN_PREFIX: &str = "💬";

#[derive(Deserialize)]
struct RawIntent {
    intent: String,
    #[serde(default)]
    data: Value,
}

fn json_object() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"))
}

fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

fn as_answer(data: &Value) -> Option<String> {
    match data.get("answer")? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Maps the model's reply text onto an intent.
pub fn decode_intent(reply: &str) -> Intent {
    let Some(found) = json_object().find(reply) else {
        debug!("Model reply carries no JSON, answering with it directly");
        return Intent::Question {
            answer: format!("{} {}", PLAIN_PREFIX, reply.trim()),
        };
    };

    let malformed = || Intent::Question {
        answer: format!("{} {}", MALFORMED_PREFIX, strip_code_fences(reply)),
    };

    let raw: RawIntent = match serde_json::from_str(found.as_str()) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "Model reply JSON did not parse");
            return malformed();
        }
    };

    let decoded = match raw.intent.trim().to_lowercase().as_str() {
        "reminder" => serde_json::from_value(raw.data).map(Intent::Reminder).ok(),
        "todo" => serde_json::from_value(raw.data).map(Intent::Todo).ok(),
        "weather" => serde_json::from_value(raw.data).map(Intent::Weather).ok(),
        "calendar" => serde_json::from_value(raw.data).map(Intent::Calendar).ok(),
        "question" => as_answer(&raw.data).map(|answer| Intent::Question { answer }),
        "unknown" => Some(Intent::Unknown),
        other => {
            warn!(intent = other, "Model returned an unsupported intent");
            None
        }
    };

    decoded.unwrap_or_else(|| {
        warn!(intent = %raw.intent, "Intent payload has an unexpected shape");
        malformed()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use saver_models::{CalendarAction, Recurrence, TodoAction, WeatherDay};

    #[test]
    fn test_reminder_inside_code_fence() {
        let reply = "Sure!\n```json\n{\"intent\": \"reminder\", \"data\": {\"time\": \"09:00\", \"date\": \"tomorrow\", \"description\": \"doctor\", \"recurrence\": \"daily\"}}\n```";

        let Intent::Reminder(req) = decode_intent(reply) else {
            panic!("expected reminder");
        };
        assert_eq!(req.time, "09:00");
        assert_eq!(req.date, "tomorrow");
        assert_eq!(req.recurrence, Recurrence::Daily);
    }

    #[test]
    fn test_question() {
        let reply = r#"{"intent": "question", "data": {"answer": "۴ 😊"}}"#;
        assert_eq!(
            decode_intent(reply),
            Intent::Question {
                answer: "۴ 😊".to_string()
            }
        );
    }

    #[test]
    fn test_other_intents() {
        let todo = decode_intent(r#"{"intent": "todo", "data": {"action": "remove", "task": 2}}"#);
        assert!(matches!(todo, Intent::Todo(cmd) if cmd.action == TodoAction::Remove));

        let weather = decode_intent(r#"{"intent": "weather", "data": {"location": "Tehran", "date": "week"}}"#);
        assert!(matches!(weather, Intent::Weather(req) if req.date == WeatherDay::Week));

        let calendar = decode_intent(r#"{"intent": "calendar", "data": {"query_type": "day_of_week", "date": "2024-03-15"}}"#);
        assert!(matches!(calendar, Intent::Calendar(req) if req.action == CalendarAction::DayOfWeek));

        assert_eq!(decode_intent(r#"{"intent": "unknown", "data": {}}"#), Intent::Unknown);
    }

    #[test]
    fn test_no_json_becomes_plain_answer() {
        assert_eq!(
            decode_intent("  Hello there  "),
            Intent::Question {
                answer: "💬 Hello there".to_string()
            }
        );
    }

    #[test]
    fn test_broken_json_becomes_answer_without_fences() {
        let reply = "```json\n{\"intent\": \"question\", \"data\": {\"answer\": }\n```";
        let Intent::Question { answer } = decode_intent(reply) else {
            panic!("expected question");
        };
        assert!(answer.starts_with("🤖 {"));
        assert!(!answer.contains("```"));
    }

    #[test]
    fn test_unexpected_shape_falls_back() {
        let missing_time = decode_intent(r#"{"intent": "reminder", "data": {"date": "2024-01-01"}}"#);
        assert!(matches!(missing_time, Intent::Question { ref answer } if answer.starts_with("🤖")));

        let alien = decode_intent(r#"{"intent": "translate", "data": {}}"#);
        assert!(matches!(alien, Intent::Question { .. }));

        let no_answer = decode_intent(r#"{"intent": "question", "data": {}}"#);
        assert!(matches!(no_answer, Intent::Question { ref answer } if answer.starts_with("🤖")));
    }
}
