//! Text analysis for intent patterns and user utterances.
//!
//! Analysis turns raw text into the terms the feature extractor counts. It
//! follows the usual tokenizer → filter chain layout:
//!
//! ```text
//! Raw Text → Tokenizer → Filter 1 → ... → Filter N → Terms
//! ```

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

// Re-export commonly used types
pub use analyzer::*;
pub use token::*;
pub use token_filter::*;
pub use tokenizer::*;
