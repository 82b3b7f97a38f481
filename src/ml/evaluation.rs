//! Training-set evaluation of an intent classifier.
//!
//! Classifies every corpus pattern and compares the prediction against the
//! pattern's own tag. A healthy corpus scores 1.0; anything less points at
//! overlapping or contradictory patterns.

use serde::Serialize;

use crate::corpus::IntentCorpus;
use crate::error::Result;
use crate::ml::classifier::IntentClassifier;

/// A pattern that was not classified as its own intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Misclassification {
    /// The pattern text.
    pub pattern: String,
    /// Tag the pattern belongs to.
    pub expected: String,
    /// Tag the classifier predicted.
    pub predicted: String,
}

/// Result of a training-set evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    /// Number of patterns classified.
    pub total: usize,
    /// Number classified as their own tag.
    pub correct: usize,
    /// Fraction classified correctly.
    pub accuracy: f64,
    /// Patterns classified as some other tag, in corpus order.
    pub misclassified: Vec<Misclassification>,
}

/// Classify every pattern in the corpus and report the training accuracy.
pub fn evaluate(classifier: &dyn IntentClassifier, corpus: &IntentCorpus) -> Result<Evaluation> {
    let mut total = 0;
    let mut misclassified = Vec::new();

    for example in corpus.training_examples() {
        total += 1;
        let predicted = classifier.predict(example.text)?;
        if predicted != example.tag {
            misclassified.push(Misclassification {
                pattern: example.text.to_string(),
                expected: example.tag.to_string(),
                predicted,
            });
        }
    }

    let correct = total - misclassified.len();
    let accuracy = if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    };

    Ok(Evaluation {
        total,
        correct,
        accuracy,
        misclassified,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Intent;

    struct FixedClassifier(&'static str);

    impl IntentClassifier for FixedClassifier {
        fn predict(&self, _text: &str) -> Result<String> {
            Ok(self.0.to_string())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn test_evaluate_counts_misclassifications() {
        let corpus = IntentCorpus::from_intents(vec![
            Intent::new("a", ["one", "two"], ["A"]),
            Intent::new("b", ["three"], ["B"]),
        ])
        .unwrap();

        let evaluation = evaluate(&FixedClassifier("a"), &corpus).unwrap();

        assert_eq!(evaluation.total, 3);
        assert_eq!(evaluation.correct, 2);
        assert!((evaluation.accuracy - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(
            evaluation.misclassified,
            vec![Misclassification {
                pattern: "three".to_string(),
                expected: "b".to_string(),
                predicted: "a".to_string(),
            }]
        );
    }
}
