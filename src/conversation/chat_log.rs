//! CSV conversation log.
//!
//! ```csv
//! User Input,Chatbot Response,Timestamp
//! hello,Hey!,07-03-2024 09:05:01
//! ```
//!
//! The header is written once when the file is created. Existing files are
//! never truncated; rows are only appended.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use parking_lot::Mutex;

use crate::conversation::record::{ConversationRecord, HEADER};
use crate::error::{PalaverError, Result};

/// Append-only CSV log of user inputs and replies.
///
/// Appends are serialized through an internal lock so concurrent requests
/// never interleave partial rows.
#[derive(Debug)]
pub struct ConversationLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ConversationLog {
    /// Create a log handle. Nothing touches the disk until the first write.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        ConversationLog {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Location of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file with its header row if it does not exist yet.
    pub fn ensure_initialized(&self) -> Result<()> {
        let _guard = self.lock.lock();
        self.write_header_if_missing()
    }

    /// Append one row.
    pub fn append(&self, record: &ConversationRecord) -> Result<()> {
        let _guard = self.lock.lock();
        self.write_header_if_missing()?;

        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| self.write_error(e))?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        writer.serialize(record).map_err(|e| self.write_error(e))?;
        writer.flush().map_err(|e| self.write_error(e))?;

        Ok(())
    }

    /// Read every row in file order. A missing file is an empty history.
    pub fn read_all(&self) -> Result<Vec<ConversationRecord>> {
        let _guard = self.lock.lock();
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;
        let mut records = Vec::new();
        for row in reader.deserialize() {
            records.push(row?);
        }
        Ok(records)
    }

    fn write_header_if_missing(&self) -> Result<()> {
        let is_empty = match fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };
        if !is_empty {
            return Ok(());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
        }

        let file = File::create(&self.path).map_err(|e| self.write_error(e))?;
        let mut writer = WriterBuilder::new().from_writer(file);
        writer.write_record(HEADER).map_err(|e| self.write_error(e))?;
        writer.flush().map_err(|e| self.write_error(e))?;

        log::debug!("Initialized conversation log at {}", self.path.display());
        Ok(())
    }

    fn write_error<E: std::fmt::Display>(&self, error: E) -> PalaverError {
        PalaverError::log_write(format!("{}: {error}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    #[test]
    fn test_header_written_once() {
        let dir = TempDir::new().unwrap();
        let log = ConversationLog::new(dir.path().join("chat_log.csv"));

        log.ensure_initialized().unwrap();
        log.ensure_initialized().unwrap();

        let content = fs::read_to_string(log.path()).unwrap();
        assert_eq!(content, "User Input,Chatbot Response,Timestamp\n");
    }

    #[test]
    fn test_existing_file_not_truncated() {
        let dir = TempDir::new().unwrap();
        let log = ConversationLog::new(dir.path().join("chat_log.csv"));
        log.append(&ConversationRecord::now("hi", "Hey!")).unwrap();

        let reopened = ConversationLog::new(log.path());
        reopened.ensure_initialized().unwrap();

        assert_eq!(reopened.read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_append_and_read_back() {
        let dir = TempDir::new().unwrap();
        let log = ConversationLog::new(dir.path().join("nested").join("chat_log.csv"));

        let first = ConversationRecord::now("hello, bot", "Hey!");
        let second = ConversationRecord::now("say \"bye\"", "Goodbye!\nSee you");
        log.append(&first).unwrap();
        log.append(&second).unwrap();

        assert_eq!(log.read_all().unwrap(), vec![first, second]);
    }

    #[test]
    fn test_missing_file_is_empty_history() {
        let dir = TempDir::new().unwrap();
        let log = ConversationLog::new(dir.path().join("chat_log.csv"));
        assert!(log.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_unwritable_path() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be opened as the log file.
        let log = ConversationLog::new(dir.path());
        let err = log.append(&ConversationRecord::now("hi", "Hey!")).unwrap_err();
        assert!(matches!(err, PalaverError::LogWrite(_)));
    }

    #[test]
    fn test_concurrent_appends() {
        let dir = TempDir::new().unwrap();
        let log = Arc::new(ConversationLog::new(dir.path().join("chat_log.csv")));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let log = Arc::clone(&log);
                thread::spawn(move || {
                    for i in 0..25 {
                        log.append(&ConversationRecord::now(format!("{t}-{i}"), "ok"))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let records = log.read_all().unwrap();
        assert_eq!(records.len(), 200);
        assert!(records.iter().all(|r| r.bot_response == "ok"));
    }
}
