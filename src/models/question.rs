use serde::{Deserialize, Serialize};

use crate::models::khmer::NO_SUBJECT_PLACEHOLDER;

/// Question format tag.
///
/// Anything that is not literally `"short"` on the wire is treated as
/// multiple choice; that coercion lives in the sanitizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionType {
    /// Four-option multiple choice (QCM).
    #[serde(rename = "mcq")]
    MultipleChoice,
    /// Free-response short answer.
    #[serde(rename = "short")]
    ShortAnswer,
}

impl QuestionType {
    /// Wire label, as stored in the cloud document and the local cache.
    pub fn label(self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "mcq",
            QuestionType::ShortAnswer => "short",
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Canonical question record.
///
/// `options`/`correct` are present only for multiple choice, `answer` only
/// for short answer. The wire shape (cloud document, local cache) keeps the
/// original field names via serde renames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub subject: String,
    pub question: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(rename = "isActive", default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

fn default_active() -> bool {
    true
}

impl Question {
    /// Create a multiple-choice record.
    pub fn multiple_choice(
        subject: impl Into<String>,
        question: impl Into<String>,
        options: Vec<String>,
        correct: usize,
    ) -> Self {
        Self {
            subject: subject.into(),
            question: question.into(),
            question_type: QuestionType::MultipleChoice,
            is_active: true,
            options: Some(options),
            correct: Some(correct),
            answer: None,
        }
    }

    /// Create a short-answer record.
    pub fn short_answer(
        subject: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            question: question.into(),
            question_type: QuestionType::ShortAnswer,
            is_active: true,
            options: None,
            correct: None,
            answer: Some(answer.into()),
        }
    }

    pub fn is_multiple_choice(&self) -> bool {
        self.question_type == QuestionType::MultipleChoice
    }

    /// Whether the record belongs to the `(subject, type)` group used by
    /// the grouped store operations.
    pub fn in_group(&self, subject: &str, question_type: QuestionType) -> bool {
        self.subject == subject && self.question_type == question_type
    }

    /// Re-establish the canonical-record invariants on an already-typed
    /// record: non-empty subject, and `options`/`correct` vs `answer`
    /// mutually exclusive by `type`.
    ///
    /// This is the typed twin of `sanitize_questions`; the controller runs
    /// every replacement sequence through it so no write path can bypass
    /// the gate.
    pub fn normalized(mut self) -> Self {
        if self.subject.trim().is_empty() {
            self.subject = NO_SUBJECT_PLACEHOLDER.to_string();
        }
        match self.question_type {
            QuestionType::MultipleChoice => {
                if self.options.is_none() {
                    self.options = Some(vec![String::new(); 4]);
                }
                if self.correct.is_none() {
                    self.correct = Some(0);
                }
                self.answer = None;
            }
            QuestionType::ShortAnswer => {
                if self.answer.is_none() {
                    self.answer = Some(String::new());
                }
                self.options = None;
                self.correct = None;
            }
        }
        self
    }
}

/// Learner feedback entry.
///
/// Append-only from the consumer side; the id is assigned by the cloud
/// store and present only on entries read back from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub username: String,
    pub text: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Shape of the shared cloud document.
///
/// `questions` stays untyped here: everything received from the cloud is
/// untrusted until it has passed the sanitizer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizDocument {
    #[serde(default)]
    pub questions: Vec<serde_json::Value>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_enforces_field_exclusivity() {
        let mut q = Question::multiple_choice("Law", "Q?", vec!["a".into(), "b".into()], 1);
        q.answer = Some("stray".into());
        let q = q.normalized();
        assert_eq!(q.answer, None);
        assert_eq!(q.correct, Some(1));

        let mut q = Question::short_answer("Law", "Q?", "A");
        q.options = Some(vec!["x".into()]);
        q.correct = Some(2);
        let q = q.normalized();
        assert_eq!(q.options, None);
        assert_eq!(q.correct, None);
        assert_eq!(q.answer.as_deref(), Some("A"));
    }

    #[test]
    fn test_normalized_defaults_blank_subject() {
        let q = Question::short_answer("   ", "Q?", "A").normalized();
        assert_eq!(q.subject, NO_SUBJECT_PLACEHOLDER);
    }

    #[test]
    fn test_wire_shape_keeps_original_field_names() {
        let q = Question::multiple_choice("Law", "Q?", vec!["a".into(), "b".into()], 0);
        let value = serde_json::to_value(&q).expect("serializable");
        assert_eq!(value["type"], "mcq");
        assert_eq!(value["isActive"], true);
        assert!(value.get("answer").is_none());

        let q = Question::short_answer("Law", "Q?", "A");
        let value = serde_json::to_value(&q).expect("serializable");
        assert_eq!(value["type"], "short");
        assert!(value.get("options").is_none());
        assert!(value.get("correct").is_none());
    }

    #[test]
    fn test_is_active_defaults_true_on_deserialize() {
        let q: Question = serde_json::from_str(r#"{"subject":"s","question":"q","type":"short"}"#)
            .expect("deserializable");
        assert!(q.is_active);
    }
}
