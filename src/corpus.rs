//! The intent corpus: tags, example patterns and candidate responses.
//!
//! The corpus is a JSON array of intents, optionally wrapped in an
//! `{"intents": [...]}` object:
//!
//! ```json
//! [
//!   { "tag": "greeting", "patterns": ["hi", "hello"], "responses": ["Hey!"] },
//!   { "tag": "bye", "patterns": ["bye", "goodbye"], "responses": ["Goodbye!"] }
//! ]
//! ```
//!
//! It is loaded once per process and never mutated afterwards. Every intent
//! must have a non-empty tag, at least one pattern and at least one response,
//! and tags must be unique; anything else is a [`PalaverError::CorpusLoad`].

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PalaverError, Result};

/// A named conversational category with example phrases and candidate replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    /// Unique identifier of the intent.
    pub tag: String,
    /// Example utterances used for training.
    pub patterns: Vec<String>,
    /// Candidate replies.
    pub responses: Vec<String>,
}

impl Intent {
    /// Create an intent from string-like parts.
    pub fn new<T, P, R>(tag: T, patterns: P, responses: R) -> Self
    where
        T: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Intent {
            tag: tag.into(),
            patterns: patterns.into_iter().map(Into::into).collect(),
            responses: responses.into_iter().map(Into::into).collect(),
        }
    }
}

/// One `(pattern, tag)` pair derived from the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingExample<'a> {
    /// Pattern text.
    pub text: &'a str,
    /// Tag of the intent the pattern belongs to.
    pub tag: &'a str,
}

/// A validated, immutable set of intents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentCorpus {
    intents: Vec<Intent>,
    fingerprint: u32,
}

impl IntentCorpus {
    /// Load and validate a corpus from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PalaverError::corpus_load(format!("cannot read {}: {e}", path.display()))
        })?;
        let corpus = Self::from_json_str(&content)?;
        log::info!(
            "Loaded {} intents ({} patterns) from {}",
            corpus.len(),
            corpus.pattern_count(),
            path.display()
        );
        Ok(corpus)
    }

    /// Parse and validate a corpus from JSON text.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let document: serde_json::Value = serde_json::from_str(content)
            .map_err(|e| PalaverError::corpus_load(format!("malformed JSON: {e}")))?;

        let list = match document {
            serde_json::Value::Object(mut object) => object.remove("intents").ok_or_else(|| {
                PalaverError::corpus_load("expected an array of intents or an \"intents\" key")
            })?,
            other => other,
        };

        let intents: Vec<Intent> = serde_json::from_value(list)
            .map_err(|e| PalaverError::corpus_load(format!("invalid intent: {e}")))?;

        Self::from_intents(intents)
    }

    /// Validate an in-memory list of intents.
    pub fn from_intents(intents: Vec<Intent>) -> Result<Self> {
        if intents.is_empty() {
            return Err(PalaverError::corpus_load("corpus contains no intents"));
        }

        let mut seen = HashSet::new();
        for (index, intent) in intents.iter().enumerate() {
            if intent.tag.trim().is_empty() {
                return Err(PalaverError::corpus_load(format!(
                    "intent #{index} has an empty tag"
                )));
            }
            if intent.patterns.is_empty() {
                return Err(PalaverError::corpus_load(format!(
                    "intent '{}' has no patterns",
                    intent.tag
                )));
            }
            if intent.responses.is_empty() {
                return Err(PalaverError::corpus_load(format!(
                    "intent '{}' has no responses",
                    intent.tag
                )));
            }
            if !seen.insert(intent.tag.as_str()) {
                return Err(PalaverError::corpus_load(format!(
                    "duplicate tag '{}'",
                    intent.tag
                )));
            }
        }

        let fingerprint = Self::compute_fingerprint(&intents)?;
        Ok(IntentCorpus {
            intents,
            fingerprint,
        })
    }

    fn compute_fingerprint(intents: &[Intent]) -> Result<u32> {
        let canonical = serde_json::to_vec(intents)?;
        Ok(crc32fast::hash(&canonical))
    }

    /// All intents in corpus order.
    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    /// Number of intents.
    pub fn len(&self) -> usize {
        self.intents.len()
    }

    /// Always false for a validated corpus.
    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    /// Total number of patterns across intents.
    pub fn pattern_count(&self) -> usize {
        self.intents.iter().map(|i| i.patterns.len()).sum()
    }

    /// Tags in corpus order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.intents.iter().map(|i| i.tag.as_str())
    }

    /// Look up an intent by tag. Linear in the number of intents.
    pub fn find(&self, tag: &str) -> Option<&Intent> {
        self.intents.iter().find(|intent| intent.tag == tag)
    }

    /// Flattened `(pattern, tag)` pairs in corpus order.
    pub fn training_examples(&self) -> impl Iterator<Item = TrainingExample<'_>> {
        self.intents.iter().flat_map(|intent| {
            intent.patterns.iter().map(move |pattern| TrainingExample {
                text: pattern.as_str(),
                tag: intent.tag.as_str(),
            })
        })
    }

    /// CRC32 of the canonical JSON form of the intents.
    ///
    /// Formatting changes to the source file do not change the fingerprint;
    /// any edit to a tag, pattern or response does.
    pub fn fingerprint(&self) -> u32 {
        self.fingerprint
    }
}
