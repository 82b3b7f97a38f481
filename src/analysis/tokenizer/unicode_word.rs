//! Unicode word tokenizer implementation.
//!
//! Splits text on Unicode word boundaries (UAX #29). Whitespace is always
//! discarded; punctuation is discarded by default but can be kept as
//! standalone tokens, which is how word tokenizers in chat pipelines usually
//! behave ("hi!" → `hi`, `!`).
//!
//! # Examples
//!
//! ```
//! use palaver::analysis::tokenizer::Tokenizer;
//! use palaver::analysis::tokenizer::unicode_word::UnicodeWordTokenizer;
//!
//! let tokenizer = UnicodeWordTokenizer::new();
//! let tokens: Vec<_> = tokenizer.tokenize("Hello, world!").unwrap().collect();
//! assert_eq!(tokens.len(), 2);
//! assert_eq!(tokens[0].text, "Hello");
//!
//! let tokenizer = UnicodeWordTokenizer::with_punctuation();
//! let tokens: Vec<_> = tokenizer.tokenize("Hello, world!").unwrap().collect();
//! assert_eq!(tokens.len(), 4);
//! assert_eq!(tokens[3].text, "!");
//! ```

use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// A tokenizer that splits text on Unicode word boundaries.
#[derive(Clone, Debug, Default)]
pub struct UnicodeWordTokenizer {
    keep_punctuation: bool,
}

impl UnicodeWordTokenizer {
    /// Create a tokenizer that keeps word segments only.
    pub fn new() -> Self {
        UnicodeWordTokenizer {
            keep_punctuation: false,
        }
    }

    /// Create a tokenizer that also emits punctuation segments as tokens.
    pub fn with_punctuation() -> Self {
        UnicodeWordTokenizer {
            keep_punctuation: true,
        }
    }

    /// Whether punctuation segments are emitted.
    pub fn keeps_punctuation(&self) -> bool {
        self.keep_punctuation
    }
}

impl Tokenizer for UnicodeWordTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let mut tokens = Vec::new();

        for segment in text.split_word_bounds() {
            if segment.chars().all(char::is_whitespace) {
                continue;
            }

            let is_word = segment.chars().any(|c| c.is_alphanumeric());
            if !is_word && !self.keep_punctuation {
                continue;
            }

            tokens.push(Token::new(segment));
        }

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "unicode_word"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unicode_word_tokenizer() {
        let tokenizer = UnicodeWordTokenizer::new();
        let tokens: Vec<Token> = tokenizer.tokenize("hello, world!").unwrap().collect();

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "hello");
        assert_eq!(tokens[1].text, "world");
    }

    #[test]
    fn test_repeated_words_are_kept() {
        let tokenizer = UnicodeWordTokenizer::new();
        let tokens: Vec<Token> = tokenizer.tokenize("bye bye").unwrap().collect();

        assert_eq!(tokens, vec![Token::new("bye"), Token::new("bye")]);
    }

    #[test]
    fn test_keep_punctuation() {
        let tokenizer = UnicodeWordTokenizer::with_punctuation();
        let tokens: Vec<Token> = tokenizer.tokenize("how are you?").unwrap().collect();

        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["how", "are", "you", "?"]);
    }

    #[test]
    fn test_contractions_stay_whole() {
        let tokenizer = UnicodeWordTokenizer::new();
        let tokens: Vec<Token> = tokenizer.tokenize("what's up").unwrap().collect();

        assert_eq!(tokens[0].text, "what's");
        assert_eq!(tokens[1].text, "up");
    }

    #[test]
    fn test_tokenizer_name() {
        assert_eq!(UnicodeWordTokenizer::new().name(), "unicode_word");
    }
}
