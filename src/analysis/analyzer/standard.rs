//! Standard analyzer used for intent patterns and utterances.
//!
//! # Pipeline
//!
//! 1. UnicodeWordTokenizer (optionally keeping punctuation), or a
//!    RegexTokenizer when a token pattern is configured
//! 2. LowercaseFilter (unless disabled)
//! 3. StopFilter (only when enabled)
//!
//! # Examples
//!
//! ```
//! use palaver::analysis::analyzer::{Analyzer, StandardAnalyzer};
//!
//! let analyzer = StandardAnalyzer::new();
//! let terms = analyzer.terms("How are YOU?").unwrap();
//! assert_eq!(terms, vec!["how", "are", "you"]);
//! ```

use std::sync::Arc;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::token_filter::stop::StopFilter;
use crate::analysis::tokenizer::Tokenizer;
use crate::analysis::tokenizer::regex::RegexTokenizer;
use crate::analysis::tokenizer::unicode_word::UnicodeWordTokenizer;
use crate::config::AnalysisConfig;
use crate::error::Result;

/// The analyzer built from an [`AnalysisConfig`].
pub struct StandardAnalyzer {
    inner: PipelineAnalyzer,
}

impl StandardAnalyzer {
    /// Create a standard analyzer with default settings.
    pub fn new() -> Self {
        StandardAnalyzer {
            inner: Self::pipeline(Arc::new(UnicodeWordTokenizer::new()), &AnalysisConfig::default()),
        }
    }

    /// Create a standard analyzer from analysis settings.
    ///
    /// Fails if the configured token pattern is not a valid regex.
    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        let tokenizer: Arc<dyn Tokenizer> = match &config.token_pattern {
            Some(pattern) => Arc::new(RegexTokenizer::with_pattern(pattern)?),
            None if config.keep_punctuation => Arc::new(UnicodeWordTokenizer::with_punctuation()),
            None => Arc::new(UnicodeWordTokenizer::new()),
        };

        Ok(StandardAnalyzer {
            inner: Self::pipeline(tokenizer, config),
        })
    }

    fn pipeline(tokenizer: Arc<dyn Tokenizer>, config: &AnalysisConfig) -> PipelineAnalyzer {
        let mut analyzer = PipelineAnalyzer::new(tokenizer).with_name("standard");
        if config.lowercase {
            analyzer = analyzer.add_filter(Arc::new(LowercaseFilter::new()));
        }
        if config.remove_stop_words {
            analyzer = analyzer.add_filter(Arc::new(StopFilter::new()));
        }
        analyzer
    }

    /// Get the inner pipeline analyzer.
    pub fn inner(&self) -> &PipelineAnalyzer {
        &self.inner
    }
}

impl Default for StandardAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for StandardAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "standard"
    }
}

impl std::fmt::Debug for StandardAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StandardAnalyzer")
            .field("inner", &self.inner)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keeps_function_words() {
        let analyzer = StandardAnalyzer::new();
        assert_eq!(
            analyzer.terms("What is the time").unwrap(),
            vec!["what", "is", "the", "time"]
        );
    }

    #[test]
    fn test_configured_pipeline() {
        let config = AnalysisConfig {
            lowercase: true,
            keep_punctuation: true,
            remove_stop_words: true,
            token_pattern: None,
        };
        let analyzer = StandardAnalyzer::from_config(&config).unwrap();
        assert_eq!(
            analyzer.terms("Is it the weather?").unwrap(),
            vec!["weather", "?"]
        );
        assert_eq!(analyzer.inner().filters().len(), 2);
    }

    #[test]
    fn test_case_preserved_when_disabled() {
        let config = AnalysisConfig {
            lowercase: false,
            ..AnalysisConfig::default()
        };
        let analyzer = StandardAnalyzer::from_config(&config).unwrap();
        assert_eq!(analyzer.terms("Hi There").unwrap(), vec!["Hi", "There"]);
    }

    #[test]
    fn test_token_pattern() {
        let config = AnalysisConfig {
            token_pattern: Some(r"(?u)\b\w\w+\b".to_string()),
            ..AnalysisConfig::default()
        };
        let analyzer = StandardAnalyzer::from_config(&config).unwrap();
        // Single-character tokens are dropped by this pattern.
        assert_eq!(
            analyzer.terms("I want a Pizza").unwrap(),
            vec!["want", "pizza"]
        );
    }

    #[test]
    fn test_invalid_token_pattern() {
        let config = AnalysisConfig {
            token_pattern: Some("[".to_string()),
            ..AnalysisConfig::default()
        };
        assert!(StandardAnalyzer::from_config(&config).is_err());
    }
}
