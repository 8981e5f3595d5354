//! Telegram distribution
//!
//! Sends a single record or a whole `(subject, type)` group to the
//! configured channel. Per-record failures are counted and logged but
//! never abort the batch; the caller reads the tallies from `SendStats`.

use std::time::Duration;

use tracing::{info, warn};

use crate::clients::telegram::{SendOutcome, TelegramClient};
use crate::config::Config;
use crate::models::khmer::{option_prefix, to_khmer_numeral};
use crate::models::question::{Question, QuestionType};

/// How a record goes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelegramSendMode {
    /// Structured quiz poll (multiple choice only; others fall back to text).
    Poll,
    /// Formatted Markdown message.
    Text,
}

/// Batch tallies.
#[derive(Debug, Default, Clone, Copy)]
pub struct SendStats {
    pub sent: usize,
    pub skipped: usize,
}

/// Telegram distribution service.
pub struct DistributionService {
    telegram: TelegramClient,
    send_delay: Duration,
    verbose: bool,
}

impl DistributionService {
    /// Create a new distribution service from the program configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            telegram: TelegramClient::new(config),
            send_delay: Duration::from_millis(config.tg_send_delay_ms),
            verbose: config.verbose_logging,
        }
    }

    /// Send every active record of the `(subject, type)` group, in order.
    pub async fn send_subject(
        &self,
        questions: &[Question],
        subject: &str,
        question_type: QuestionType,
        mode: TelegramSendMode,
        include_answer: bool,
    ) -> SendStats {
        let batch: Vec<&Question> = questions
            .iter()
            .filter(|q| q.in_group(subject, question_type) && q.is_active)
            .collect();

        info!(
            "📨 sending {} records for '{}' ({})",
            batch.len(),
            subject,
            question_type
        );

        let mut stats = SendStats::default();
        for (index, question) in batch.iter().enumerate() {
            if self.verbose {
                info!("[record {}/{}] sending...", index + 1, batch.len());
            }

            let outcome = self.send_one(question, mode, include_answer).await;
            if outcome.ok {
                stats.sent += 1;
            } else {
                warn!(
                    "[record {}/{}] ⚠️ send failed: {}",
                    index + 1,
                    batch.len(),
                    outcome.error.unwrap_or_default()
                );
                stats.skipped += 1;
            }

            if index + 1 < batch.len() {
                tokio::time::sleep(self.send_delay).await;
            }
        }

        log_batch_complete(&stats);
        stats
    }

    /// Send one record in the requested mode.
    pub async fn send_one(
        &self,
        question: &Question,
        mode: TelegramSendMode,
        include_answer: bool,
    ) -> SendOutcome {
        match mode {
            TelegramSendMode::Poll if question.is_multiple_choice() => {
                self.telegram.send_quiz_poll(question).await
            }
            _ => {
                self.telegram
                    .send_message(&format_text_message(question, include_answer))
                    .await
            }
        }
    }

    /// Send a pre-rendered question image (rendering happens elsewhere)
    /// with the generated caption.
    pub async fn send_image(
        &self,
        question: &Question,
        index: usize,
        image: Vec<u8>,
    ) -> SendOutcome {
        self.telegram
            .send_question_image(image, &image_caption(question, index))
            .await
    }
}

/// Markdown body for the plain-text send mode.
///
/// Multiple choice lists the options with their Khmer prefixes, marking
/// the correct one only when the caller asks; short answer always shows
/// its answer text.
pub fn format_text_message(question: &Question, include_answer: bool) -> String {
    let mut text = format!("📌 *សំណួរ៖* {}\n\n", question.question);

    match question.question_type {
        QuestionType::MultipleChoice => {
            if let Some(options) = &question.options {
                for (i, option) in options.iter().enumerate() {
                    let mark = if include_answer && question.correct == Some(i) {
                        " ✅"
                    } else {
                        ""
                    };
                    text.push_str(&format!("{}. {}{}\n", option_prefix(i), option, mark));
                }
            }
        }
        QuestionType::ShortAnswer => {
            text.push_str(&format!(
                "✅ *ចម្លើយ៖* {}\n",
                question.answer.as_deref().unwrap_or_default()
            ));
        }
    }

    text.push_str(&format!(
        "\n📋 វិញ្ញាសា៖ {}\n✨ Web QCM 🇰🇭",
        question.subject
    ));
    text
}

/// Caption for the image send mode, numbered with Khmer numerals.
pub fn image_caption(question: &Question, index: usize) -> String {
    format!(
        "📌 *សំណួរទី {}*\n\n📋 វិញ្ញាសា៖ {}\n✨ ផ្តល់ជូនដោយ Web QCM 🇰🇭",
        to_khmer_numeral(index + 1),
        question.subject
    )
}

// ========== log helpers ==========

fn log_batch_complete(stats: &SendStats) {
    info!(
        "✓ batch complete: sent {}, skipped {}",
        stats.sent, stats.skipped
    );
}
