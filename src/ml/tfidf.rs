//! TF-IDF vectorizer for text feature extraction.
//!
//! The vocabulary is built from the training patterns only. Terms that first
//! appear at inference time have no feature index and contribute nothing to
//! the vector, so an utterance made entirely of unseen words maps to the zero
//! vector.
//!
//! Weights are raw term counts multiplied by the smoothed inverse document
//! frequency `ln((1 + n) / (1 + df)) + 1`, and every vector is L2-normalised.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Analyzer, StandardAnalyzer};
use crate::config::AnalysisConfig;
use crate::error::{PalaverError, Result};
use crate::ml::types::FeatureVector;

/// Vocabulary and weighting statistics frozen at fit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedFeatureSpace {
    /// Term -> feature index.
    vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per feature index.
    idf: Vec<f64>,
    /// Number of documents the space was fitted on.
    n_documents: usize,
    /// Analysis settings the vocabulary was built with.
    analysis: AnalysisConfig,
}

impl FittedFeatureSpace {
    /// Number of features (vocabulary size).
    pub fn dimension(&self) -> usize {
        self.idf.len()
    }

    /// Number of training documents.
    pub fn n_documents(&self) -> usize {
        self.n_documents
    }

    /// Feature index of a term, if it is in the vocabulary.
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// IDF weight of a feature index.
    pub fn idf(&self, index: usize) -> Option<f64> {
        self.idf.get(index).copied()
    }

    /// Analysis settings used at fit time.
    pub fn analysis(&self) -> &AnalysisConfig {
        &self.analysis
    }

    /// Vocabulary terms ordered by feature index.
    pub fn terms(&self) -> Vec<&str> {
        let mut terms = vec![""; self.vocabulary.len()];
        for (term, &idx) in &self.vocabulary {
            terms[idx] = term.as_str();
        }
        terms
    }
}

/// TF-IDF vectorizer for text feature extraction.
pub struct TfIdfVectorizer {
    /// Fitted statistics; `None` until [`fit`](Self::fit) succeeds.
    space: Option<FittedFeatureSpace>,
    /// Analysis settings.
    analysis: AnalysisConfig,
    /// Analyzer for tokenization.
    analyzer: Arc<dyn Analyzer>,
}

impl std::fmt::Debug for TfIdfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfIdfVectorizer")
            .field(
                "vocabulary_size",
                &self.space.as_ref().map(|s| s.dimension()),
            )
            .field("n_documents", &self.space.as_ref().map(|s| s.n_documents))
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}

impl TfIdfVectorizer {
    /// Create an unfitted vectorizer.
    pub fn new(analysis: AnalysisConfig) -> Result<Self> {
        let analyzer = Arc::new(StandardAnalyzer::from_config(&analysis)?);
        Ok(Self {
            space: None,
            analysis,
            analyzer,
        })
    }

    /// Rebuild a fitted vectorizer from a previously fitted space.
    pub fn from_fitted(space: FittedFeatureSpace) -> Result<Self> {
        let analyzer = Arc::new(StandardAnalyzer::from_config(&space.analysis)?);
        Ok(Self {
            analysis: space.analysis.clone(),
            space: Some(space),
            analyzer,
        })
    }

    /// Fit the vectorizer on training documents.
    ///
    /// A vectorizer is fitted once; refitting requires a new instance.
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<&FittedFeatureSpace> {
        if self.space.is_some() {
            return Err(PalaverError::invalid_argument("vectorizer is already fitted"));
        }
        if documents.is_empty() {
            return Err(PalaverError::invalid_argument(
                "cannot fit a vectorizer on zero documents",
            ));
        }

        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut document_frequency: Vec<usize> = Vec::new();

        // Indices follow first occurrence so the space is stable for a given corpus.
        for doc in documents {
            let mut terms = self.analyzer.terms(doc.as_ref())?;
            let mut seen = std::collections::HashSet::new();
            terms.retain(|t| seen.insert(t.clone()));

            for term in terms {
                let idx = match vocabulary.get(&term) {
                    Some(&idx) => idx,
                    None => {
                        let idx = vocabulary.len();
                        vocabulary.insert(term, idx);
                        document_frequency.push(0);
                        idx
                    }
                };
                document_frequency[idx] += 1;
            }
        }

        let n_documents = documents.len();
        let idf = document_frequency
            .iter()
            .map(|&df| ((n_documents as f64 + 1.0) / (df as f64 + 1.0)).ln() + 1.0)
            .collect();

        log::debug!(
            "Fitted TF-IDF space: {} terms from {} documents",
            vocabulary.len(),
            n_documents
        );

        Ok(&*self.space.insert(FittedFeatureSpace {
            vocabulary,
            idf,
            n_documents,
            analysis: self.analysis.clone(),
        }))
    }

    /// Fit on the documents and return their vectors.
    pub fn fit_transform<S: AsRef<str>>(
        &mut self,
        documents: &[S],
    ) -> Result<Vec<FeatureVector>> {
        self.fit(documents)?;
        documents
            .iter()
            .map(|doc| self.transform(doc.as_ref()))
            .collect()
    }

    /// Transform a document into an L2-normalised TF-IDF feature vector.
    pub fn transform(&self, document: &str) -> Result<FeatureVector> {
        let space = self.fitted()?;
        let mut features = vec![0.0; space.dimension()];

        for term in self.analyzer.terms(document)? {
            if let Some(idx) = space.index_of(&term) {
                features[idx] += 1.0;
            }
        }

        for (idx, weight) in features.iter_mut().enumerate() {
            *weight *= space.idf[idx];
        }

        let norm = features.iter().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for weight in &mut features {
                *weight /= norm;
            }
        }

        Ok(features)
    }

    /// The fitted space, or [`PalaverError::NotFitted`].
    pub fn fitted(&self) -> Result<&FittedFeatureSpace> {
        self.space
            .as_ref()
            .ok_or_else(|| PalaverError::not_fitted("TF-IDF vectorizer used before fit"))
    }

    /// Whether [`fit`](Self::fit) has run.
    pub fn is_fitted(&self) -> bool {
        self.space.is_some()
    }

    /// Get the size of the vocabulary (0 before fit).
    pub fn vocabulary_size(&self) -> usize {
        self.space.as_ref().map_or(0, |s| s.dimension())
    }
}
