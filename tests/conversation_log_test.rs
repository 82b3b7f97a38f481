//! Integration tests for the CSV conversation log.

use std::fs;

use palaver::conversation::{ConversationLog, ConversationRecord, TIMESTAMP_FORMAT};
use palaver::error::Result;
use tempfile::TempDir;

#[test]
fn test_initialize_twice_gives_one_header() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let log = ConversationLog::new(dir.path().join("chat_log.csv"));

    log.ensure_initialized()?;
    log.ensure_initialized()?;

    assert!(log.read_all()?.is_empty());
    let content = fs::read_to_string(log.path()).unwrap();
    assert_eq!(content.lines().count(), 1);

    Ok(())
}

#[test]
fn test_appends_read_back_in_order() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let log = ConversationLog::new(dir.path().join("chat_log.csv"));
    log.ensure_initialized()?;

    let records: Vec<_> = (0..20)
        .map(|i| ConversationRecord::now(format!("message {i}"), format!("reply {i}")))
        .collect();
    for record in &records {
        log.append(record)?;
    }

    assert_eq!(log.read_all()?, records);

    Ok(())
}

#[test]
fn test_reads_log_written_by_other_tools() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chat_log.csv");
    fs::write(
        &path,
        "User Input,Chatbot Response,Timestamp\n\
         hello,Hey!,01-02-2024 10:11:12\n\
         \"hi, bot\",\"Hello, human\",01-02-2024 10:11:20\n",
    )
    .unwrap();

    let log = ConversationLog::new(&path);
    log.ensure_initialized()?;
    let history = log.read_all()?;

    assert_eq!(history.len(), 2);
    assert_eq!(history[1].user_input, "hi, bot");
    assert_eq!(history[1].bot_response, "Hello, human");
    assert_eq!(
        history[0].parsed_timestamp().unwrap().format(TIMESTAMP_FORMAT).to_string(),
        "01-02-2024 10:11:12"
    );

    Ok(())
}
