//! Error types for the Palaver library.
//!
//! All fallible operations return [`PalaverError`] through the crate-wide
//! [`Result`] alias. Variants fall into two groups: the dialogue-engine
//! taxonomy (corpus loading, fitting, training, tag lookup, log writes,
//! empty input) and the plumbing errors bubbled up from I/O and codecs.
//!
//! # Examples
//!
//! ```
//! use palaver::error::{PalaverError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(PalaverError::corpus_load("intents.json is missing"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Palaver operations.
#[derive(Error, Debug)]
pub enum PalaverError {
    /// The intent corpus is missing, malformed or violates its invariants.
    /// Fatal at startup.
    #[error("Corpus load error: {0}")]
    CorpusLoad(String),

    /// A feature extractor or classifier was used before it was fitted.
    #[error("Not fitted: {0}")]
    NotFitted(String),

    /// Training failed or did not converge under a strict policy.
    #[error("Training error: {0}")]
    Training(String),

    /// The predicted tag does not exist in the corpus.
    #[error("Unknown tag: {0}")]
    UnknownTag(String),

    /// The conversation log could not be written.
    #[error("Log write error: {0}")]
    LogWrite(String),

    /// The user input was empty.
    #[error("Empty input")]
    EmptyInput,

    /// Analysis-related errors (tokenization, filtering)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV reading/writing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Command-level failure, printed with its context chain
    #[error("{0:#}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with PalaverError.
pub type Result<T> = std::result::Result<T, PalaverError>;

impl PalaverError {
    /// Create a new corpus load error.
    pub fn corpus_load<S: Into<String>>(msg: S) -> Self {
        PalaverError::CorpusLoad(msg.into())
    }

    /// Create a new not-fitted error.
    pub fn not_fitted<S: Into<String>>(msg: S) -> Self {
        PalaverError::NotFitted(msg.into())
    }

    /// Create a new training error.
    pub fn training<S: Into<String>>(msg: S) -> Self {
        PalaverError::Training(msg.into())
    }

    /// Create a new unknown tag error.
    pub fn unknown_tag<S: Into<String>>(tag: S) -> Self {
        PalaverError::UnknownTag(tag.into())
    }

    /// Create a new log write error.
    pub fn log_write<S: Into<String>>(msg: S) -> Self {
        PalaverError::LogWrite(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        PalaverError::Analysis(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        PalaverError::SerializationError(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        PalaverError::InvalidArgument(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        PalaverError::Other(format!("Invalid configuration: {}", msg.into()))
    }
}
