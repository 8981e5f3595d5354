pub mod bulk_import;
pub mod distribution;
pub mod local_cache;
pub mod quiz_store;
pub mod sanitizer;

pub use bulk_import::{BulkFormat, BulkImporter};
pub use distribution::{DistributionService, SendStats, TelegramSendMode};
pub use local_cache::LocalCache;
pub use quiz_store::{CloudStatus, QuizStore, ReorderDirection, UserRole};
pub use sanitizer::sanitize_questions;
