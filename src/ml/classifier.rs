//! Intent classifier trait and the TF-IDF + logistic regression implementation.

use crate::config::{AnalysisConfig, TrainingConfig};
use crate::corpus::IntentCorpus;
use crate::error::{PalaverError, Result};
use crate::ml::logistic::{LogisticRegression, LogisticRegressionModel};
use crate::ml::tfidf::{FittedFeatureSpace, TfIdfVectorizer};

/// Intent classifier trait.
///
/// Implementations map one utterance to exactly one tag.
pub trait IntentClassifier: Send + Sync {
    /// Predict the tag for an utterance.
    fn predict(&self, text: &str) -> Result<String>;

    /// Get the name of this classifier for debugging and logging.
    fn name(&self) -> &str;
}

/// Machine learning-based intent classifier.
#[derive(Debug)]
pub struct MLBasedIntentClassifier {
    /// Fitted TF-IDF vectorizer.
    vectorizer: TfIdfVectorizer,
    /// Fitted logistic regression parameters.
    model: LogisticRegressionModel,
}

impl MLBasedIntentClassifier {
    /// Fit the vectorizer and the classifier on every pattern of the corpus.
    pub fn train(
        corpus: &IntentCorpus,
        analysis: &AnalysisConfig,
        training: &TrainingConfig,
    ) -> Result<Self> {
        let (patterns, tags): (Vec<&str>, Vec<String>) = corpus
            .training_examples()
            .map(|example| (example.text, example.tag.to_string()))
            .unzip();

        let mut vectorizer = TfIdfVectorizer::new(analysis.clone())?;
        let vectors = vectorizer.fit_transform(&patterns)?;
        let model = LogisticRegression::new(training.clone()).fit(&vectors, &tags)?;

        log::info!(
            "Trained intent classifier: {} patterns, {} intents, {} terms, {} iterations",
            patterns.len(),
            model.classes().len(),
            vectorizer.vocabulary_size(),
            model.stats().iterations
        );

        Ok(Self { vectorizer, model })
    }

    /// Assemble a classifier from previously fitted parts.
    pub fn from_parts(space: FittedFeatureSpace, model: LogisticRegressionModel) -> Result<Self> {
        if space.dimension() != model.n_features() {
            return Err(PalaverError::invalid_argument(format!(
                "feature space has {} terms but the model expects {}",
                space.dimension(),
                model.n_features()
            )));
        }

        Ok(Self {
            vectorizer: TfIdfVectorizer::from_fitted(space)?,
            model,
        })
    }

    /// The fitted feature space.
    pub fn feature_space(&self) -> Result<&FittedFeatureSpace> {
        self.vectorizer.fitted()
    }

    /// The fitted vectorizer.
    pub fn vectorizer(&self) -> &TfIdfVectorizer {
        &self.vectorizer
    }

    /// The fitted classifier parameters.
    pub fn model(&self) -> &LogisticRegressionModel {
        &self.model
    }

    /// Predicted tag together with its probability.
    pub fn predict_with_confidence(&self, text: &str) -> Result<(String, f64)> {
        let features = self.vectorizer.transform(text)?;
        let index = self.model.predict_index(&features)?;
        let probabilities = self.model.predict_proba(&features)?;
        Ok((self.model.classes()[index].clone(), probabilities[index]))
    }
}

impl IntentClassifier for MLBasedIntentClassifier {
    fn predict(&self, text: &str) -> Result<String> {
        let features = self.vectorizer.transform(text)?;
        Ok(self.model.predict(&features)?.to_string())
    }

    fn name(&self) -> &str {
        "ml_based"
    }
}
