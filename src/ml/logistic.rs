//! Multinomial logistic regression over TF-IDF vectors.
//!
//! Training minimises the mean softmax cross-entropy plus an L2 penalty of
//! `1 / (2 * C * n) * ||W||^2` (intercepts are not penalised) with
//! full-batch gradient descent. The objective is strictly convex in the
//! weights, so the optimum does not depend on the starting point; the seeded
//! initialisation only makes intermediate states reproducible, including the
//! partial model returned when the iteration budget runs out.
//!
//! # Examples
//!
//! ```
//! use palaver::config::TrainingConfig;
//! use palaver::ml::logistic::LogisticRegression;
//!
//! let vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
//! let labels = vec!["greeting".to_string(), "bye".to_string()];
//!
//! let model = LogisticRegression::new(TrainingConfig::default())
//!     .fit(&vectors, &labels)
//!     .unwrap();
//! assert_eq!(model.predict(&[1.0, 0.0]).unwrap(), "greeting");
//! ```

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::TrainingConfig;
use crate::error::{PalaverError, Result};
use crate::ml::types::TrainingStats;

/// Range of the uniform weight initialisation.
const INIT_SCALE: f64 = 0.01;

/// Logistic regression trainer.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    config: TrainingConfig,
}

/// Fitted classifier parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegressionModel {
    /// Class labels in first-seen training order.
    classes: Vec<String>,
    /// One weight vector per class.
    coefficients: Vec<Vec<f64>>,
    /// One intercept per class.
    intercepts: Vec<f64>,
    /// Expected feature vector length.
    n_features: usize,
    /// Diagnostics from training.
    stats: TrainingStats,
}

/// A training example with only its non-zero features.
struct SparseRow {
    entries: Vec<(usize, f64)>,
    class: usize,
}

impl LogisticRegression {
    /// Create a trainer with the given settings.
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    /// Fit a model on feature vectors and their labels.
    pub fn fit(
        &self,
        vectors: &[Vec<f64>],
        labels: &[String],
    ) -> Result<LogisticRegressionModel> {
        self.config.validate()?;

        if vectors.len() != labels.len() {
            return Err(PalaverError::invalid_argument(format!(
                "{} vectors but {} labels",
                vectors.len(),
                labels.len()
            )));
        }
        if vectors.is_empty() {
            return Err(PalaverError::training("no training examples"));
        }

        let n_features = vectors[0].len();
        if let Some(bad) = vectors.iter().position(|v| v.len() != n_features) {
            return Err(PalaverError::invalid_argument(format!(
                "vector {bad} has {} features, expected {n_features}",
                vectors[bad].len()
            )));
        }

        let mut classes: Vec<String> = Vec::new();
        let mut rows = Vec::with_capacity(vectors.len());
        for (vector, label) in vectors.iter().zip(labels) {
            let class = match classes.iter().position(|c| c == label) {
                Some(class) => class,
                None => {
                    classes.push(label.clone());
                    classes.len() - 1
                }
            };
            let entries = vector
                .iter()
                .enumerate()
                .filter(|(_, v)| **v != 0.0)
                .map(|(i, v)| (i, *v))
                .collect();
            rows.push(SparseRow { entries, class });
        }

        if classes.len() == 1 {
            log::debug!("Single-class corpus; every prediction will be '{}'", classes[0]);
            return Ok(LogisticRegressionModel {
                coefficients: vec![vec![0.0; n_features]],
                intercepts: vec![0.0],
                classes,
                n_features,
                stats: TrainingStats {
                    training_examples: rows.len(),
                    ..TrainingStats::default()
                },
            });
        }

        let model = self.optimize(classes, &rows, n_features);

        if !model.stats.converged {
            let message = format!(
                "logistic regression did not converge in {} iterations (max gradient {:.3e}, tolerance {:.1e})",
                model.stats.iterations, model.stats.final_gradient, self.config.tolerance
            );
            if self.config.strict_convergence {
                return Err(PalaverError::training(message));
            }
            log::warn!("{message}; using the partially optimised model");
        }

        Ok(model)
    }

    fn optimize(
        &self,
        classes: Vec<String>,
        rows: &[SparseRow],
        n_features: usize,
    ) -> LogisticRegressionModel {
        let start = Instant::now();
        let n_classes = classes.len();
        let n = rows.len() as f64;
        let lambda = 1.0 / (self.config.c * n);
        let lr = self.config.learning_rate;

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut weights: Vec<Vec<f64>> = (0..n_classes)
            .map(|_| {
                (0..n_features)
                    .map(|_| rng.random_range(-INIT_SCALE..INIT_SCALE))
                    .collect()
            })
            .collect();
        let mut intercepts = vec![0.0; n_classes];

        let mut grad_w = vec![vec![0.0; n_features]; n_classes];
        let mut grad_b = vec![0.0; n_classes];
        let mut probabilities = vec![0.0; n_classes];

        let mut iterations = 0;
        let mut converged = false;
        let mut loss = f64::INFINITY;
        let mut max_gradient = f64::INFINITY;

        while iterations < self.config.max_iter {
            // Penalty gradient first; the data term is accumulated on top.
            for (gw, w) in grad_w.iter_mut().zip(&weights) {
                for (g, wj) in gw.iter_mut().zip(w) {
                    *g = lambda * wj;
                }
            }
            grad_b.iter_mut().for_each(|g| *g = 0.0);

            let mut data_loss = 0.0;
            for row in rows {
                scores_into(&weights, &intercepts, &row.entries, &mut probabilities);
                softmax_in_place(&mut probabilities);
                data_loss -= probabilities[row.class].max(f64::MIN_POSITIVE).ln();

                for (k, p) in probabilities.iter().enumerate() {
                    let residual = (p - if k == row.class { 1.0 } else { 0.0 }) / n;
                    grad_b[k] += residual;
                    for &(j, x) in &row.entries {
                        grad_w[k][j] += residual * x;
                    }
                }
            }

            let penalty: f64 = weights
                .iter()
                .flat_map(|w| w.iter())
                .map(|w| w * w)
                .sum::<f64>()
                * lambda
                / 2.0;
            loss = data_loss / n + penalty;

            max_gradient = grad_w
                .iter()
                .flat_map(|g| g.iter())
                .chain(grad_b.iter())
                .fold(0.0_f64, |acc, g| acc.max(g.abs()));

            if max_gradient < self.config.tolerance {
                converged = true;
                break;
            }

            for (w, gw) in weights.iter_mut().zip(&grad_w) {
                for (wj, g) in w.iter_mut().zip(gw) {
                    *wj -= lr * g;
                }
            }
            for (b, g) in intercepts.iter_mut().zip(&grad_b) {
                *b -= lr * g;
            }

            iterations += 1;
        }

        log::debug!(
            "Logistic regression: {} classes, {} features, {} iterations, loss {:.6}, converged {}",
            n_classes,
            n_features,
            iterations,
            loss,
            converged
        );

        LogisticRegressionModel {
            classes,
            coefficients: weights,
            intercepts,
            n_features,
            stats: TrainingStats {
                training_examples: rows.len(),
                iterations,
                final_loss: loss,
                final_gradient: max_gradient,
                converged,
                training_time_ms: start.elapsed().as_millis() as u64,
            },
        }
    }
}

fn scores_into(
    weights: &[Vec<f64>],
    intercepts: &[f64],
    entries: &[(usize, f64)],
    out: &mut [f64],
) {
    for (k, score) in out.iter_mut().enumerate() {
        *score = intercepts[k]
            + entries
                .iter()
                .map(|&(j, x)| weights[k][j] * x)
                .sum::<f64>();
    }
}

fn softmax_in_place(scores: &mut [f64]) {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut total = 0.0;
    for s in scores.iter_mut() {
        *s = (*s - max).exp();
        total += *s;
    }
    for s in scores.iter_mut() {
        *s /= total;
    }
}

impl LogisticRegressionModel {
    /// Class labels in training order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Expected feature vector length.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Training diagnostics.
    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    /// Per-class linear scores.
    pub fn decision_function(&self, features: &[f64]) -> Result<Vec<f64>> {
        if features.len() != self.n_features {
            return Err(PalaverError::invalid_argument(format!(
                "expected {} features, got {}",
                self.n_features,
                features.len()
            )));
        }

        Ok(self
            .coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(w, b)| b + w.iter().zip(features).map(|(w, x)| w * x).sum::<f64>())
            .collect())
    }

    /// Class probabilities in the order of [`classes`](Self::classes).
    pub fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>> {
        let mut scores = self.decision_function(features)?;
        softmax_in_place(&mut scores);
        Ok(scores)
    }

    /// Index of the most probable class. Ties go to the earlier class.
    pub fn predict_index(&self, features: &[f64]) -> Result<usize> {
        let scores = self.decision_function(features)?;
        let mut best = 0;
        for (k, &score) in scores.iter().enumerate().skip(1) {
            if score > scores[best] {
                best = k;
            }
        }
        Ok(best)
    }

    /// The most probable class label.
    pub fn predict(&self, features: &[f64]) -> Result<&str> {
        let index = self.predict_index(features)?;
        Ok(self.classes[index].as_str())
    }
}
