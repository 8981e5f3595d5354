pub mod khmer;
pub mod question;

pub use question::{Feedback, Question, QuestionType, QuizDocument};
