//! # Palaver
//!
//! An intent-matching dialogue engine.
//!
//! A JSON corpus of intents (tag, example patterns, candidate responses) is
//! turned into TF-IDF features and a multinomial logistic regression
//! classifier. Each user utterance is classified to one intent, answered with
//! one of that intent's responses and appended to a CSV conversation log.
//!
//! ## Features
//!
//! - Deterministic training from a fixed seed
//! - Fitted models cached on disk and stamped with a corpus fingerprint
//! - Configurable text analysis pipeline
//! - Thread-safe, append-only conversation log

pub mod analysis;
pub mod cache;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod ml;
pub mod response;

pub mod prelude {
    pub use crate::config::PalaverConfig;
    pub use crate::corpus::{Intent, IntentCorpus};
    pub use crate::engine::{ChatEngine, Exchange};
    pub use crate::error::{PalaverError, Result};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
