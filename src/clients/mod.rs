pub mod cloud;
pub mod generator;
pub mod telegram;

pub use cloud::CloudStore;
pub use generator::QuestionGenerator;
pub use telegram::{BotIdentity, SendOutcome, TelegramClient};
