//! Telegram Bot API client
//!
//! Three send modes reach the distribution channels: a structured quiz
//! poll, a rendered question image with caption, and a formatted text
//! message. Every call reports through `SendOutcome` and never errors past
//! this boundary — a failed send must not take the session down.

use serde_json::{json, Value};
use tracing::debug;

use crate::config::Config;
use crate::models::question::Question;
use crate::utils::text::truncate_chars;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Provider cap on poll question text, in characters.
pub const MAX_POLL_QUESTION_CHARS: usize = 300;
/// Provider cap on each poll option, in characters.
pub const MAX_POLL_OPTION_CHARS: usize = 100;
/// Provider cap on the poll explanation, in characters.
pub const MAX_POLL_EXPLANATION_CHARS: usize = 200;

/// Result of one send attempt.
#[derive(Debug, Clone, Default)]
pub struct SendOutcome {
    pub ok: bool,
    pub error: Option<String>,
}

impl SendOutcome {
    pub fn success() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
        }
    }
}

/// Result of a bot credential check.
#[derive(Debug, Clone, Default)]
pub struct BotIdentity {
    pub ok: bool,
    pub name: Option<String>,
    pub error: Option<String>,
}

/// Telegram Bot API client.
pub struct TelegramClient {
    http: reqwest::Client,
    bot_token: String,
    chat_id: String,
}

impl TelegramClient {
    /// Create a new client from the program configuration.
    pub fn new(config: &Config) -> Self {
        Self::with_credentials(&config.tg_bot_token, &config.tg_chat_id)
    }

    pub fn with_credentials(bot_token: &str, chat_id: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            bot_token: bot_token.to_string(),
            chat_id: chat_id.to_string(),
        }
    }

    /// Check the bot credential against `getMe`.
    pub async fn validate_bot(&self) -> BotIdentity {
        let url = self.method_url("getMe");
        match self.http.get(&url).send().await {
            Ok(response) => match response.json::<Value>().await {
                Ok(body) if body.get("ok").and_then(Value::as_bool) == Some(true) => BotIdentity {
                    ok: true,
                    name: body
                        .pointer("/result/first_name")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    error: None,
                },
                Ok(body) => BotIdentity {
                    ok: false,
                    name: None,
                    error: Some(describe_failure(&body)),
                },
                Err(e) => BotIdentity {
                    ok: false,
                    name: None,
                    error: Some(format!("invalid Telegram response: {e}")),
                },
            },
            Err(e) => BotIdentity {
                ok: false,
                name: None,
                error: Some(format!("network connection failed: {e}")),
            },
        }
    }

    /// Send a multiple-choice record as a quiz poll.
    ///
    /// Question, options and explanation are truncated to the provider
    /// caps before sending.
    pub async fn send_quiz_poll(&self, question: &Question) -> SendOutcome {
        if self.bot_token.is_empty() || self.chat_id.is_empty() {
            return SendOutcome::failure("missing bot configuration");
        }
        if !question.is_multiple_choice() {
            return SendOutcome::failure("not a multiple-choice question");
        }

        let options: Vec<String> = question
            .options
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|o| truncate_chars(o, MAX_POLL_OPTION_CHARS))
            .collect();
        let explanation = truncate_chars(
            &format!("វិញ្ញាសា៖ {} | Web QCM 🇰🇭", question.subject),
            MAX_POLL_EXPLANATION_CHARS,
        );

        let payload = json!({
            "chat_id": self.chat_id.trim(),
            "question": truncate_chars(&question.question, MAX_POLL_QUESTION_CHARS),
            "options": options,
            "is_anonymous": true,
            "type": "quiz",
            "correct_option_id": question.correct.unwrap_or(0),
            "explanation": explanation,
        });

        debug!("📊 sending quiz poll to {}", self.chat_id);
        self.post_for_outcome(self.method_url("sendPoll"), &payload)
            .await
    }

    /// Send a pre-rendered question image with a caption.
    pub async fn send_question_image(&self, image: Vec<u8>, caption: &str) -> SendOutcome {
        if self.bot_token.is_empty() || self.chat_id.is_empty() {
            return SendOutcome::failure("missing bot configuration");
        }

        let form = reqwest::multipart::Form::new()
            .text("chat_id", self.chat_id.trim().to_string())
            .text("caption", caption.to_string())
            .part(
                "photo",
                reqwest::multipart::Part::bytes(image).file_name("question.png"),
            );

        debug!("🖼️ sending question image to {}", self.chat_id);
        match self
            .http
            .post(self.method_url("sendPhoto"))
            .multipart(form)
            .send()
            .await
        {
            Ok(response) => outcome_from_body(response.json::<Value>().await),
            Err(e) => SendOutcome::failure(format!("network connection failed: {e}")),
        }
    }

    /// Send a Markdown-formatted text message.
    pub async fn send_message(&self, text: &str) -> SendOutcome {
        let payload = json!({
            "chat_id": self.chat_id.trim(),
            "text": text,
            "parse_mode": "Markdown",
        });
        self.post_for_outcome(self.method_url("sendMessage"), &payload)
            .await
    }

    /// Send the canned connectivity-check message.
    pub async fn send_test_message(&self) -> SendOutcome {
        let payload = json!({
            "chat_id": self.chat_id.trim(),
            "text": "🔔 នេះជាសារសាកល្បងពីប្រព័ន្ធ Quiz Master! Bot របស់អ្នកបានភ្ជាប់ដោយជោគជ័យ។",
        });
        self.post_for_outcome(self.method_url("sendMessage"), &payload)
            .await
    }

    // ========== helpers ==========

    fn method_url(&self, method: &str) -> String {
        format!("{TELEGRAM_API_BASE}/bot{}/{method}", self.bot_token)
    }

    async fn post_for_outcome(&self, url: String, payload: &Value) -> SendOutcome {
        match self.http.post(&url).json(payload).send().await {
            Ok(response) => outcome_from_body(response.json::<Value>().await),
            Err(e) => SendOutcome::failure(format!("network connection failed: {e}")),
        }
    }
}

fn outcome_from_body(body: std::result::Result<Value, reqwest::Error>) -> SendOutcome {
    match body {
        Ok(body) if body.get("ok").and_then(Value::as_bool) == Some(true) => {
            SendOutcome::success()
        }
        Ok(body) => SendOutcome::failure(describe_failure(&body)),
        Err(e) => SendOutcome::failure(format!("invalid Telegram response: {e}")),
    }
}

fn describe_failure(body: &Value) -> String {
    body.get("description")
        .and_then(Value::as_str)
        .unwrap_or("unknown Telegram error")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_configuration_is_reported_not_sent() {
        let client = TelegramClient::with_credentials("", "");
        let q = Question::multiple_choice("Law", "Q?", vec!["a".into(), "b".into()], 0);
        let outcome = tokio_test::block_on(client.send_quiz_poll(&q));
        assert!(!outcome.ok);
        assert_eq!(outcome.error.as_deref(), Some("missing bot configuration"));
    }

    #[test]
    fn test_poll_rejects_short_answer_records() {
        let client = TelegramClient::with_credentials("token", "@chan");
        let q = Question::short_answer("Law", "Q?", "A");
        let outcome = tokio_test::block_on(client.send_quiz_poll(&q));
        assert!(!outcome.ok);
    }

    #[test]
    fn test_failure_description_extraction() {
        let body = serde_json::json!({"ok": false, "description": "chat not found"});
        assert_eq!(describe_failure(&body), "chat not found");
        assert_eq!(describe_failure(&serde_json::json!({})), "unknown Telegram error");
    }
}
