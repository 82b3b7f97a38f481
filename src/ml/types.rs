//! Common types for intent classification.

use serde::{Deserialize, Serialize};

/// Dense numeric representation of an utterance in the fitted term space.
pub type FeatureVector = Vec<f64>;

/// Training statistics recorded with a fitted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingStats {
    /// Number of training examples used.
    pub training_examples: usize,
    /// Number of gradient descent iterations run.
    pub iterations: usize,
    /// Final value of the regularised training loss.
    pub final_loss: f64,
    /// Largest absolute gradient component at the last iteration.
    pub final_gradient: f64,
    /// Whether the gradient fell below the tolerance within the budget.
    pub converged: bool,
    /// Training time in milliseconds.
    pub training_time_ms: u64,
}

impl Default for TrainingStats {
    fn default() -> Self {
        TrainingStats {
            training_examples: 0,
            iterations: 0,
            final_loss: 0.0,
            final_gradient: 0.0,
            converged: true,
            training_time_ms: 0,
        }
    }
}
