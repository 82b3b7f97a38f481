//! Append-only record of every exchange.

pub mod chat_log;
pub mod record;

pub use chat_log::ConversationLog;
pub use record::{ConversationRecord, TIMESTAMP_FORMAT};
