//! Core analyzer trait definition.
//!
//! An [`Analyzer`] is the complete text processing pipeline used by the
//! feature extractor: the same analyzer must be applied to training patterns
//! and to user utterances, otherwise the fitted vocabulary will not line up.

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
///
/// Requires `Send + Sync` so a fitted vectorizer can be shared by every
/// conversation turn without locking.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;

    /// Analyze the text and keep only the terms of tokens that were not stopped.
    fn terms(&self, text: &str) -> Result<Vec<String>> {
        Ok(self
            .analyze(text)?
            .filter(|token| !token.is_stopped() && !token.text.is_empty())
            .map(|token| token.text)
            .collect())
    }
}
