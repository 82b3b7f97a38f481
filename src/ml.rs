//! Feature extraction and intent classification.
//!
//! - [`tfidf`]: TF-IDF vectorizer fitted on corpus patterns
//! - [`logistic`]: multinomial logistic regression over feature vectors
//! - [`classifier`]: the [`IntentClassifier`](classifier::IntentClassifier)
//!   seam and its TF-IDF + logistic regression implementation
//! - [`evaluation`]: training-set accuracy report

pub mod classifier;
pub mod evaluation;
pub mod logistic;
pub mod tfidf;
pub mod types;

pub use classifier::{IntentClassifier, MLBasedIntentClassifier};
pub use evaluation::{Evaluation, Misclassification, evaluate};
pub use logistic::{LogisticRegression, LogisticRegressionModel};
pub use tfidf::{FittedFeatureSpace, TfIdfVectorizer};
pub use types::{FeatureVector, TrainingStats};
