//! Generative question source
//!
//! Talks to an OpenAI-compatible chat-completions endpoint (Gemini by
//! default) and asks for canonical-shaped question records. The contract
//! is best-effort: whatever comes back is pushed through the sanitizer,
//! and any failure — transport, refusal, malformed JSON — yields an empty
//! batch instead of an error.

use anyhow::{Context, Result};
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::question::Question;
use crate::services::sanitizer::sanitize_questions;

const SYSTEM_MESSAGE: &str = "You are a question author for a Khmer state-exam \
preparation platform. Respond with a valid JSON array only, no prose and no \
code fences.";

/// Generative question source over an OpenAI-compatible endpoint.
pub struct QuestionGenerator {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl QuestionGenerator {
    /// Create a new generator from the program configuration.
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.gemini_api_key)
            .with_api_base(&config.gemini_api_base);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.gemini_model.clone(),
        }
    }

    /// Generate up to `count` questions about `subject`.
    ///
    /// Total over failures: an unreachable endpoint or an unusable
    /// response produces an empty vector.
    pub async fn generate(&self, subject: &str, count: usize) -> Vec<Question> {
        match self.request_questions(subject, count).await {
            Ok(records) => {
                debug!("🤖 generator returned {} usable records", records.len());
                records
            }
            Err(e) => {
                warn!("🤖 question generation failed: {e:#}");
                Vec::new()
            }
        }
    }

    async fn request_questions(&self, subject: &str, count: usize) -> Result<Vec<Question>> {
        debug!("🤖 requesting {count} questions about '{subject}' from {}", self.model_name);

        let prompt = format!(
            "Generate {count} professional quiz questions about \"{subject}\" in Khmer. \
             Ensure questions are suitable for government state exam preparation. \
             Output a JSON array of objects with fields: subject, question, \
             type (\"mcq\" or \"short\"), options (array of exactly 4 choices, mcq only), \
             correct (zero-based index of the correct option, mcq only), \
             answer (correct text, short only)."
        );

        let system_message = ChatCompletionRequestSystemMessageArgs::default()
            .content(SYSTEM_MESSAGE)
            .build()?;
        let user_message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![
                ChatCompletionRequestMessage::System(system_message),
                ChatCompletionRequestMessage::User(user_message),
            ])
            .temperature(0.7)
            .max_tokens(4096u32)
            .build()?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .context("chat-completions call failed")?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .context("generator returned no content")?;

        let raw: Vec<serde_json::Value> = serde_json::from_str(strip_code_fences(&content))
            .context("generator response is not a JSON array")?;

        Ok(sanitize_questions(&raw))
    }
}

/// Models wrap JSON in Markdown fences often enough to strip them here.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("[1]"), "[1]");
        assert_eq!(strip_code_fences("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fences("```\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fences("  [1]  "), "[1]");
    }

    #[test]
    fn test_generated_payload_goes_through_sanitizer() {
        let payload = r#"[
            {"subject": "ច្បាប់", "question": "Q?", "type": "mcq",
             "options": ["a", "b", "c", "d"], "correct": 2},
            {"subject": "ច្បាប់", "question": "Q2?", "type": "short", "answer": "A"},
            "garbage entry"
        ]"#;
        let raw: Vec<serde_json::Value> =
            serde_json::from_str(strip_code_fences(payload)).expect("fixture parses");
        let cleaned = sanitize_questions(&raw);
        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned[0].correct, Some(2));
        assert_eq!(cleaned[1].answer.as_deref(), Some("A"));
    }
}
