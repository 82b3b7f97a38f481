use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Timestamp layout of the log, day first.
pub const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// Column names of the log, in order.
pub const HEADER: [&str; 3] = ["User Input", "Chatbot Response", "Timestamp"];

/// One row of the conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRecord {
    #[serde(rename = "User Input")]
    pub user_input: String,
    #[serde(rename = "Chatbot Response")]
    pub bot_response: String,
    /// Local wall-clock time formatted with [`TIMESTAMP_FORMAT`].
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
}

impl ConversationRecord {
    /// Build a record stamped with the current local time.
    pub fn now<S: Into<String>, T: Into<String>>(user_input: S, bot_response: T) -> Self {
        Self::at(user_input, bot_response, Local::now().naive_local())
    }

    /// Build a record stamped with the given time.
    pub fn at<S: Into<String>, T: Into<String>>(
        user_input: S,
        bot_response: T,
        time: NaiveDateTime,
    ) -> Self {
        ConversationRecord {
            user_input: user_input.into(),
            bot_response: bot_response.into(),
            timestamp: time.format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// Parse the timestamp back, if it is well formed.
    pub fn parsed_timestamp(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.timestamp, TIMESTAMP_FORMAT).ok()
    }
}
