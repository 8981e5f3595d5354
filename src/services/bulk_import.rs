//! Bulk text import
//!
//! Converts a block of text pasted from word-processed Khmer exam sheets
//! into canonical question records. The grammar is deliberately loose:
//! source documents are copy-pasted from uncontrolled word processors, so
//! anything that does not match a recognized line prefix is skipped instead
//! of failing the whole import.

use regex::Regex;

use crate::models::khmer::{ANSWER_LABEL, CORRECT_ANSWER_MARKER};
use crate::models::question::Question;

/// A finalize gate: a draft with fewer collected options is discarded.
const MIN_OPTIONS: usize = 2;

/// Which grammar to parse the pasted block with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkFormat {
    MultipleChoice,
    ShortAnswer,
}

/// Line-oriented, single-pass parser for pasted exam sheets.
///
/// Recognized prefixes:
/// - `<numeral>. text` starts a question (Khmer or Latin numerals)
/// - `<ក|ខ|គ|ឃ>. text` appends an option (multiple choice)
/// - `ចម្លើយ៖ text` / `ចម្លើយ: text` begins the answer (short answer)
pub struct BulkImporter {
    question_re: Regex,
    option_re: Regex,
    answer_re: Regex,
}

impl BulkImporter {
    pub fn new() -> Self {
        Self {
            question_re: Regex::new(r"^[០-៩0-9]+\.\s*(.*)").expect("hard-coded pattern"),
            option_re: Regex::new(r"^[កខគឃ]\.\s*(.*)").expect("hard-coded pattern"),
            answer_re: Regex::new(&format!(r"^{ANSWER_LABEL}\s*[៖:]\s*(.*)"))
                .expect("hard-coded pattern"),
        }
    }

    /// Parse `text` into canonical records under `subject`.
    pub fn parse(&self, subject: &str, format: BulkFormat, text: &str) -> Vec<Question> {
        match format {
            BulkFormat::MultipleChoice => self.parse_multiple_choice(subject, text),
            BulkFormat::ShortAnswer => self.parse_short_answer(subject, text),
        }
    }

    /// Multiple-choice grammar.
    ///
    /// A draft is finalized when the next question starts or input ends,
    /// and only if it collected at least two options; a draft stalled below
    /// that is dropped.
    fn parse_multiple_choice(&self, subject: &str, text: &str) -> Vec<Question> {
        let mut parsed = Vec::new();
        let mut current: Option<McqDraft> = None;

        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Some(caps) = self.question_re.captures(trimmed) {
                if let Some(draft) = current.take() {
                    draft.finalize_into(subject, &mut parsed);
                }
                current = Some(McqDraft::new(caps[1].trim()));
                continue;
            }

            if let Some(caps) = self.option_re.captures(trimmed) {
                if let Some(draft) = current.as_mut() {
                    let raw = caps[1].to_string();
                    let option = raw.replace(CORRECT_ANSWER_MARKER, "").trim().to_string();
                    draft.options.push(option);
                    if raw.contains(CORRECT_ANSWER_MARKER) {
                        draft.correct = draft.options.len() - 1;
                    }
                }
            }
            // Anything else is noise from the source document.
        }

        if let Some(draft) = current {
            draft.finalize_into(subject, &mut parsed);
        }

        parsed
    }

    /// Free-response grammar, two-mode: scanning for a question vs
    /// collecting answer lines.
    ///
    /// A draft is finalized when the next question starts or input ends,
    /// and only if its answer is non-empty.
    fn parse_short_answer(&self, subject: &str, text: &str) -> Vec<Question> {
        let mut parsed = Vec::new();
        let mut current: Option<ShortDraft> = None;
        let mut collecting_answer = false;

        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Some(caps) = self.question_re.captures(trimmed) {
                if let Some(draft) = current.take() {
                    draft.finalize_into(subject, &mut parsed);
                }
                current = Some(ShortDraft::new(caps[1].trim()));
                collecting_answer = false;
                continue;
            }

            if let Some(draft) = current.as_mut() {
                if let Some(caps) = self.answer_re.captures(trimmed) {
                    draft.answer = caps[1].trim().to_string();
                    collecting_answer = true;
                    continue;
                }
                if collecting_answer {
                    // Multi-line answers keep the raw line, newline-joined.
                    if !draft.answer.is_empty() {
                        draft.answer.push('\n');
                    }
                    draft.answer.push_str(line);
                }
            }
        }

        if let Some(draft) = current {
            draft.finalize_into(subject, &mut parsed);
        }

        parsed
    }
}

impl Default for BulkImporter {
    fn default() -> Self {
        Self::new()
    }
}

/// In-progress multiple-choice question.
struct McqDraft {
    question: String,
    options: Vec<String>,
    correct: usize,
}

impl McqDraft {
    fn new(question: &str) -> Self {
        Self {
            question: question.to_string(),
            options: Vec::new(),
            correct: 0,
        }
    }

    fn finalize_into(self, subject: &str, parsed: &mut Vec<Question>) {
        if self.options.len() >= MIN_OPTIONS {
            parsed.push(Question::multiple_choice(
                subject.trim(),
                self.question,
                self.options,
                self.correct,
            ));
        }
    }
}

/// In-progress short-answer question.
struct ShortDraft {
    question: String,
    answer: String,
}

impl ShortDraft {
    fn new(question: &str) -> Self {
        Self {
            question: question.to_string(),
            answer: String::new(),
        }
    }

    fn finalize_into(self, subject: &str, parsed: &mut Vec<Question>) {
        if !self.answer.is_empty() {
            parsed.push(Question::short_answer(
                subject.trim(),
                self.question,
                self.answer,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::QuestionType;

    fn importer() -> BulkImporter {
        BulkImporter::new()
    }

    #[test]
    fn test_mcq_basic_block() {
        let text = "1. What is 2+2?\n\
                    ក. 3\n\
                    ខ. 4(ចម្លើយត្រឹមត្រូវ)\n\
                    គ. 5\n\
                    2. What is the capital?\n\
                    ក. A\n\
                    ខ. B\n";
        let parsed = importer().parse("Math", BulkFormat::MultipleChoice, text);
        assert_eq!(parsed.len(), 2);

        assert_eq!(parsed[0].question, "What is 2+2?");
        assert_eq!(
            parsed[0].options,
            Some(vec!["3".to_string(), "4".to_string(), "5".to_string()])
        );
        assert_eq!(parsed[0].correct, Some(1));

        assert_eq!(parsed[1].options, Some(vec!["A".to_string(), "B".to_string()]));
        assert_eq!(parsed[1].correct, Some(0));
    }

    #[test]
    fn test_mcq_khmer_numerals_start_questions() {
        let text = "១. សំណួរទីមួយ?\n\
                    ក. ជម្រើស ក\n\
                    ខ. ជម្រើស ខ(ចម្លើយត្រឹមត្រូវ)\n\
                    ២. សំណួរទីពីរ?\n\
                    គ. x\n\
                    ឃ. y\n";
        let parsed = importer().parse("ច្បាប់", BulkFormat::MultipleChoice, text);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].question, "សំណួរទីមួយ?");
        assert_eq!(parsed[0].correct, Some(1));
        assert_eq!(parsed[0].options.as_ref().map(Vec::len), Some(2));
        assert!(parsed.iter().all(|q| q.subject == "ច្បាប់"));
        assert!(parsed
            .iter()
            .all(|q| q.question_type == QuestionType::MultipleChoice));
    }

    #[test]
    fn test_mcq_trailing_question_with_one_option_dropped() {
        let text = "1. Complete question?\n\
                    ក. a\n\
                    ខ. b\n\
                    2. Stalled question?\n\
                    ក. only one\n";
        let parsed = importer().parse("Law", BulkFormat::MultipleChoice, text);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].question, "Complete question?");
    }

    #[test]
    fn test_mcq_ignores_noise_and_orphan_options() {
        let text = "ក. orphan option before any question\n\
                    random header line\n\
                    1. Q?\n\
                    some note in the middle\n\
                    ក. a\n\
                    ខ. b\n";
        let parsed = importer().parse("Law", BulkFormat::MultipleChoice, text);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].options.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_mcq_marker_stripped_and_index_recorded() {
        let text = "1. Q?\n\
                    ក. wrong\n\
                    ខ. wrong too\n\
                    គ. right(ចម្លើយត្រឹមត្រូវ)\n";
        let parsed = importer().parse("Law", BulkFormat::MultipleChoice, text);
        assert_eq!(parsed[0].correct, Some(2));
        assert_eq!(parsed[0].options.as_ref().and_then(|o| o.get(2)).map(String::as_str), Some("right"));
    }

    #[test]
    fn test_short_answer_multi_line() {
        let text = "1. Define X.\n\
                    ចម្លើយ: It is Y.\n\
                    continued line.\n\
                    2. Define Z.\n";
        let parsed = importer().parse("Law", BulkFormat::ShortAnswer, text);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].question, "Define X.");
        assert_eq!(parsed[0].answer.as_deref(), Some("It is Y.\ncontinued line."));
    }

    #[test]
    fn test_short_answer_full_width_colon() {
        let text = "១. តើអ្វីជាច្បាប់?\n\
                    ចម្លើយ៖ បទដ្ឋានសង្គម។\n";
        let parsed = importer().parse("ច្បាប់", BulkFormat::ShortAnswer, text);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].answer.as_deref(), Some("បទដ្ឋានសង្គម។"));
        assert_eq!(parsed[0].question_type, QuestionType::ShortAnswer);
    }

    #[test]
    fn test_short_answer_question_without_answer_dropped() {
        let text = "1. Has an answer.\n\
                    ចម្លើយ: yes\n\
                    2. Never answered.\n\
                    just prose, no answer label\n";
        let parsed = importer().parse("Law", BulkFormat::ShortAnswer, text);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].question, "Has an answer.");
    }

    #[test]
    fn test_short_answer_blank_lines_tolerated() {
        let text = "1. Q?\n\n\nចម្លើយ: first\n\nsecond\n";
        let parsed = importer().parse("Law", BulkFormat::ShortAnswer, text);
        // Blank lines are skipped entirely, even inside an answer.
        assert_eq!(parsed[0].answer.as_deref(), Some("first\nsecond"));
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(importer()
            .parse("Law", BulkFormat::MultipleChoice, "")
            .is_empty());
        assert!(importer().parse("Law", BulkFormat::ShortAnswer, "").is_empty());
    }
}
