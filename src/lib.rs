//! # Quiz Master KH
//!
//! Headless core of a Khmer-language exam-prep platform: canonical
//! question records, bulk import of pasted exam sheets, reconciliation of
//! a shared cloud document with a durable local cache, and distribution
//! through the Telegram Bot API.
//!
//! ## Architecture
//!
//! Three layers, dependencies pointing downward only:
//!
//! ### Clients
//! - `clients/` - one struct per external system, no business rules
//! - `CloudStore` - shared JSON document store (questions + feedback)
//! - `TelegramClient` - poll / image / text sends, outcome-based
//! - `QuestionGenerator` - OpenAI-compatible question source
//!
//! ### Services
//! - `services/` - the capabilities of the platform
//! - `sanitize_questions` - the mandatory gate on every trust boundary
//! - `BulkImporter` - pasted exam sheets → canonical records
//! - `QuizStore` - authoritative sequence, cache + cloud reconciliation
//! - `DistributionService` - batch sends with per-record tallies
//!
//! ### Session
//! - `App` - role resolution and the init/run/dispose lifecycle

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

// Re-export the common types
pub use app::App;
pub use clients::{CloudStore, QuestionGenerator, SendOutcome, TelegramClient};
pub use config::Config;
pub use error::{AppError, Result};
pub use models::{Feedback, Question, QuestionType, QuizDocument};
pub use services::{
    sanitize_questions, BulkFormat, BulkImporter, CloudStatus, DistributionService, QuizStore,
    ReorderDirection, SendStats, TelegramSendMode, UserRole,
};
