//! Canonical question normalization
//!
//! Every payload crossing a trust boundary — cloud snapshot, local cache,
//! generator output — goes through `sanitize_questions` before it can touch
//! the authoritative sequence. The function is total: partially-written
//! remote documents, schema drift and hand-edited cache files come out as
//! well-formed records or not at all, never as a panic.

use serde_json::Value;

use crate::models::khmer::NO_SUBJECT_PLACEHOLDER;
use crate::models::question::{Question, QuestionType};

/// Normalize an arbitrary sequence of loosely-typed candidates into
/// canonical records, preserving order and dropping non-object entries.
pub fn sanitize_questions(raw: &[Value]) -> Vec<Question> {
    raw.iter()
        .filter(|entry| entry.is_object())
        .map(sanitize_entry)
        .collect()
}

fn sanitize_entry(raw: &Value) -> Question {
    // Only the literal "short" tag makes a short-answer record; every
    // other value, including absence, is multiple choice.
    let question_type = match raw.get("type").and_then(Value::as_str) {
        Some("short") => QuestionType::ShortAnswer,
        _ => QuestionType::MultipleChoice,
    };

    let mut subject = coerce_string(raw.get("subject"));
    if subject.is_empty() {
        subject = NO_SUBJECT_PLACEHOLDER.to_string();
    }

    // Only a literal `false` deactivates a record.
    let is_active = !matches!(raw.get("isActive"), Some(Value::Bool(false)));

    let mut record = Question {
        subject,
        question: coerce_string(raw.get("question")),
        question_type,
        is_active,
        options: None,
        correct: None,
        answer: None,
    };

    match question_type {
        QuestionType::MultipleChoice => {
            record.options = Some(match raw.get("options") {
                Some(Value::Array(items)) => items.iter().map(|o| coerce_string(Some(o))).collect(),
                _ => vec![String::new(); 4],
            });
            record.correct = Some(coerce_index(raw.get("correct")));
        }
        QuestionType::ShortAnswer => {
            record.answer = Some(coerce_string(raw.get("answer")));
        }
    }

    record
}

/// String coercion: text passes through, scalars render, null/absent and
/// structured values become empty.
fn coerce_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Index coercion: any JSON number is accepted (floats flatten, negatives
/// saturate to 0); everything else defaults to 0.
fn coerce_index(value: Option<&Value>) -> usize {
    value
        .and_then(Value::as_f64)
        .map(|n| n as usize)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_drops_non_object_entries() {
        let raw = vec![
            json!(null),
            json!("text"),
            json!(42),
            json!([1, 2]),
            json!({"subject": "Law", "question": "Q?", "type": "mcq"}),
        ];
        let cleaned = sanitize_questions(&raw);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].subject, "Law");
    }

    #[test]
    fn test_unknown_type_coerces_to_multiple_choice() {
        let raw = vec![json!({"type": "essay"}), json!({}), json!({"type": 7})];
        let cleaned = sanitize_questions(&raw);
        assert!(cleaned
            .iter()
            .all(|q| q.question_type == QuestionType::MultipleChoice));
        // Non-array options become four empty strings.
        assert_eq!(cleaned[0].options, Some(vec![String::new(); 4]));
        assert_eq!(cleaned[0].correct, Some(0));
    }

    #[test]
    fn test_missing_subject_gets_placeholder() {
        let raw = vec![json!({"question": "Q?"}), json!({"subject": ""})];
        let cleaned = sanitize_questions(&raw);
        assert_eq!(cleaned[0].subject, NO_SUBJECT_PLACEHOLDER);
        assert_eq!(cleaned[1].subject, NO_SUBJECT_PLACEHOLDER);
    }

    #[test]
    fn test_is_active_false_only_when_literal_false() {
        let raw = vec![
            json!({"isActive": false}),
            json!({"isActive": 0}),
            json!({"isActive": "false"}),
            json!({}),
        ];
        let cleaned = sanitize_questions(&raw);
        assert!(!cleaned[0].is_active);
        assert!(cleaned[1].is_active);
        assert!(cleaned[2].is_active);
        assert!(cleaned[3].is_active);
    }

    #[test]
    fn test_option_elements_coerced_to_text() {
        let raw = vec![json!({
            "type": "mcq",
            "options": ["a", 2, null, true, {"nested": 1}],
            "correct": 1.0
        })];
        let cleaned = sanitize_questions(&raw);
        assert_eq!(
            cleaned[0].options,
            Some(vec![
                "a".to_string(),
                "2".to_string(),
                String::new(),
                "true".to_string(),
                String::new(),
            ])
        );
        assert_eq!(cleaned[0].correct, Some(1));
    }

    #[test]
    fn test_correct_defaults_to_zero_when_not_numeric() {
        let raw = vec![
            json!({"correct": "2"}),
            json!({"correct": null}),
            json!({"correct": -3}),
        ];
        let cleaned = sanitize_questions(&raw);
        assert_eq!(cleaned[0].correct, Some(0));
        assert_eq!(cleaned[1].correct, Some(0));
        assert_eq!(cleaned[2].correct, Some(0));
    }

    #[test]
    fn test_field_exclusivity_by_type() {
        let raw = vec![
            json!({"type": "mcq", "answer": "stray", "options": ["a", "b"], "correct": 1}),
            json!({"type": "short", "options": ["a"], "correct": 2, "answer": "A"}),
        ];
        let cleaned = sanitize_questions(&raw);
        assert_eq!(cleaned[0].answer, None);
        assert_eq!(cleaned[0].correct, Some(1));
        assert_eq!(cleaned[1].options, None);
        assert_eq!(cleaned[1].correct, None);
        assert_eq!(cleaned[1].answer.as_deref(), Some("A"));
    }

    #[test]
    fn test_never_longer_than_input() {
        let raw = vec![json!(null), json!({}), json!([]), json!({"x": 1})];
        assert!(sanitize_questions(&raw).len() <= raw.len());
        assert!(sanitize_questions(&[]).is_empty());
    }

    #[test]
    fn test_idempotent() {
        let raw = vec![
            json!({"subject": 5, "question": null, "type": "weird", "options": "nope"}),
            json!({"type": "short", "answer": 12, "isActive": false}),
            json!(null),
        ];
        let once = sanitize_questions(&raw);
        let reserialized: Vec<Value> = once
            .iter()
            .map(|q| serde_json::to_value(q).expect("canonical records serialize"))
            .collect();
        let twice = sanitize_questions(&reserialized);
        assert_eq!(once, twice);
    }
}
