//! The inference context built once at startup.
//!
//! A [`ChatEngine`] owns the corpus, a fitted classifier and the conversation
//! log. Nothing in it changes after construction apart from the log file, so
//! one engine can serve many threads through a shared reference.
//!
//! ```no_run
//! use palaver::config::PalaverConfig;
//! use palaver::engine::ChatEngine;
//!
//! let engine = ChatEngine::from_config(&PalaverConfig::default())?;
//! println!("{}", engine.respond("hello")?);
//! # Ok::<(), palaver::error::PalaverError>(())
//! ```

use serde::Serialize;

use crate::cache::ModelCache;
use crate::config::PalaverConfig;
use crate::conversation::{ConversationLog, ConversationRecord};
use crate::corpus::IntentCorpus;
use crate::error::{PalaverError, Result};
use crate::ml::classifier::{IntentClassifier, MLBasedIntentClassifier};
use crate::ml::evaluation::{Evaluation, evaluate};
use crate::response::ResponseSelector;

/// Outcome of one user turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exchange {
    /// Caller supplied identifier, used only for diagnostics.
    pub request_id: u64,
    /// The text as received.
    pub user_input: String,
    /// Tag predicted by the classifier.
    pub tag: String,
    /// Reply returned to the user.
    pub response: String,
    /// True when the tag was unknown and the fallback reply was used.
    pub fallback: bool,
    /// Timestamp written to the log.
    pub timestamp: String,
    /// Whether the log row was written.
    pub logged: bool,
}

/// Immutable dialogue engine.
pub struct ChatEngine {
    corpus: IntentCorpus,
    classifier: Box<dyn IntentClassifier>,
    selector: ResponseSelector,
    log: ConversationLog,
    fallback_response: String,
}

impl std::fmt::Debug for ChatEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatEngine")
            .field("intents", &self.corpus.len())
            .field("classifier", &self.classifier.name())
            .field("log", &self.log.path())
            .field("fallback_response", &self.fallback_response)
            .finish()
    }
}

impl ChatEngine {
    /// Assemble an engine from already built parts.
    pub fn new(
        corpus: IntentCorpus,
        classifier: Box<dyn IntentClassifier>,
        log: ConversationLog,
    ) -> Self {
        ChatEngine {
            corpus,
            classifier,
            selector: ResponseSelector::new(),
            log,
            fallback_response: crate::config::DEFAULT_FALLBACK_RESPONSE.to_string(),
        }
    }

    /// Replace the reply used for unknown tags.
    pub fn with_fallback_response<S: Into<String>>(mut self, response: S) -> Self {
        self.fallback_response = response.into();
        self
    }

    /// Load the corpus, then load the classifier from cache or train it.
    ///
    /// Fails only on startup errors: an unusable corpus or a training
    /// failure under strict convergence.
    pub fn from_config(config: &PalaverConfig) -> Result<Self> {
        config.validate()?;
        let corpus = IntentCorpus::load(&config.paths.corpus)?;
        let classifier = load_or_train(&corpus, config)?;
        Ok(Self::from_parts(corpus, classifier, config))
    }

    /// Build an engine around an in-memory corpus, training without the cache.
    pub fn from_corpus(corpus: IntentCorpus, config: &PalaverConfig) -> Result<Self> {
        config.validate()?;
        let classifier =
            MLBasedIntentClassifier::train(&corpus, &config.analysis, &config.training)?;
        Ok(Self::from_parts(corpus, classifier, config))
    }

    fn from_parts(
        corpus: IntentCorpus,
        classifier: MLBasedIntentClassifier,
        config: &PalaverConfig,
    ) -> Self {
        let log = ConversationLog::new(&config.paths.chat_log);
        if let Err(e) = log.ensure_initialized() {
            log::warn!("{e}");
        }
        Self::new(corpus, Box::new(classifier), log)
            .with_fallback_response(config.fallback_response.clone())
    }

    /// Reply to one utterance.
    ///
    /// Runs feature extraction, classification, response selection and the
    /// log append, in that order. Equivalent to [`ChatEngine::exchange`]
    /// with request id 0, returning only the reply.
    pub fn respond(&self, text: &str) -> Result<String> {
        self.exchange(0, text).map(|exchange| exchange.response)
    }

    /// Reply to one utterance and report what happened.
    ///
    /// Empty or whitespace-only input fails with [`PalaverError::EmptyInput`]
    /// and writes nothing. An unknown tag yields the fallback reply; a failed
    /// log write is reported through `logged` and a warning.
    pub fn exchange(&self, request_id: u64, text: &str) -> Result<Exchange> {
        if text.trim().is_empty() {
            return Err(PalaverError::EmptyInput);
        }

        let tag = self.classifier.predict(text)?;
        log::debug!("[request {request_id}] predicted '{tag}'");

        let (response, fallback) = match self.selector.select(&tag, &self.corpus) {
            Ok(response) => (response.to_string(), false),
            Err(PalaverError::UnknownTag(_)) => {
                log::warn!("[request {request_id}] no intent tagged '{tag}', using fallback reply");
                (self.fallback_response.clone(), true)
            }
            Err(e) => return Err(e),
        };

        let record = ConversationRecord::now(text, response.clone());
        let logged = match self.log.append(&record) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("[request {request_id}] {e}");
                false
            }
        };

        Ok(Exchange {
            request_id,
            user_input: record.user_input,
            tag,
            response,
            fallback,
            timestamp: record.timestamp,
            logged,
        })
    }

    /// Every logged exchange, oldest first.
    pub fn history(&self) -> Result<Vec<ConversationRecord>> {
        self.log.read_all()
    }

    /// Classify every corpus pattern and report the training accuracy.
    pub fn evaluate(&self) -> Result<Evaluation> {
        evaluate(self.classifier.as_ref(), &self.corpus)
    }

    pub fn corpus(&self) -> &IntentCorpus {
        &self.corpus
    }

    pub fn classifier(&self) -> &dyn IntentClassifier {
        self.classifier.as_ref()
    }

    pub fn conversation_log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn fallback_response(&self) -> &str {
        &self.fallback_response
    }
}

/// Load the classifier from the cache, or train it and refresh the cache.
pub fn load_or_train(
    corpus: &IntentCorpus,
    config: &PalaverConfig,
) -> Result<MLBasedIntentClassifier> {
    if config.cache.enabled {
        let cache = ModelCache::from_config(&config.paths, &config.cache);
        if let Some((space, model)) = cache.load(corpus) {
            if space.analysis() != &config.analysis {
                log::warn!("Cached model was built with different analysis settings");
            }
            match MLBasedIntentClassifier::from_parts(space, model) {
                Ok(classifier) => return Ok(classifier),
                Err(e) => log::warn!("Discarding cached model: {e}"),
            }
        }
    }

    train_and_save(corpus, config)
}

/// Train from scratch and, when the cache is enabled, overwrite both artifacts.
///
/// A cache write failure is logged; the freshly trained classifier is still
/// returned.
pub fn train_and_save(
    corpus: &IntentCorpus,
    config: &PalaverConfig,
) -> Result<MLBasedIntentClassifier> {
    let classifier = MLBasedIntentClassifier::train(corpus, &config.analysis, &config.training)?;

    if config.cache.enabled {
        let cache = ModelCache::from_config(&config.paths, &config.cache);
        if let Err(e) = cache.save(corpus, classifier.feature_space()?, classifier.model()) {
            log::warn!("Failed to write model cache: {e}");
        }
    }

    Ok(classifier)
}
