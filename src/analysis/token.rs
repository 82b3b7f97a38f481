//! Token types produced by the analysis pipeline.
//!
//! A [`Token`] is one term of an utterance. Filters may rewrite its text or
//! mark it as stopped; analyzers then drop stopped tokens before the terms
//! reach the feature extractor.
//!
//! # Examples
//!
//! ```
//! use palaver::analysis::token::Token;
//!
//! let token = Token::new("hello");
//! assert_eq!(token.text, "hello");
//! assert!(!token.is_stopped());
//! assert!(token.stop().is_stopped());
//! ```

use std::fmt;

/// A single token produced by a tokenizer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// The text content of the token
    pub text: String,

    /// Whether this token has been marked as stopped (removed) by a filter
    pub stopped: bool,
}

impl Token {
    /// Create a new token with the given text.
    pub fn new<S: Into<String>>(text: S) -> Self {
        Token {
            text: text.into(),
            stopped: false,
        }
    }

    /// Mark this token as stopped.
    pub fn stop(mut self) -> Self {
        self.stopped = true;
        self
    }

    /// Check if this token is stopped.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// A token stream represents a sequence of tokens from the analysis pipeline.
pub type TokenStream = Box<dyn Iterator<Item = Token>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_creation() {
        let token = Token::new("hello");
        assert_eq!(token.text, "hello");
        assert!(!token.stopped);
        assert_eq!(format!("{token}"), "hello");
    }

    #[test]
    fn test_stop() {
        let token = Token::new("the").stop();
        assert!(token.is_stopped());
        assert_eq!(token.text, "the");
    }
}
