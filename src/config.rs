//! Configuration for the chat engine.
//!
//! Every section has defaults, so a configuration file only needs the keys it
//! wants to change:
//!
//! ```json
//! {
//!   "paths": { "corpus": "data/intents.json" },
//!   "training": { "max_iter": 2000 }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PalaverError, Result};

/// Reply used when the predicted tag is missing from the corpus.
pub const DEFAULT_FALLBACK_RESPONSE: &str = "Sorry, I didn't understand that.";

/// Seed for classifier weight initialisation.
pub const DEFAULT_SEED: u64 = 0;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PalaverConfig {
    /// File locations.
    pub paths: PathsConfig,
    /// Text analysis settings.
    pub analysis: AnalysisConfig,
    /// Classifier training settings.
    pub training: TrainingConfig,
    /// Model cache settings.
    pub cache: CacheConfig,
    /// Reply returned when the predicted tag cannot be resolved.
    pub fallback_response: String,
}

impl Default for PalaverConfig {
    fn default() -> Self {
        PalaverConfig {
            paths: PathsConfig::default(),
            analysis: AnalysisConfig::default(),
            training: TrainingConfig::default(),
            cache: CacheConfig::default(),
            fallback_response: DEFAULT_FALLBACK_RESPONSE.to_string(),
        }
    }
}

impl PalaverConfig {
    /// Load a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PalaverError::invalid_config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: PalaverConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        self.analysis.validate()?;
        self.training.validate()
    }

    /// Put every file path under `dir`, keeping the file names.
    pub fn with_base_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        let dir = dir.as_ref();
        self.paths = PathsConfig {
            corpus: dir.join(&self.paths.corpus),
            model: dir.join(&self.paths.model),
            vectorizer: dir.join(&self.paths.vectorizer),
            chat_log: dir.join(&self.paths.chat_log),
        };
        self
    }
}

/// File locations used by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Intent corpus (JSON).
    pub corpus: PathBuf,
    /// Cached classifier parameters.
    pub model: PathBuf,
    /// Cached fitted feature space.
    pub vectorizer: PathBuf,
    /// Conversation log (CSV).
    pub chat_log: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            corpus: PathBuf::from("intents.json"),
            model: PathBuf::from("chatbot_model.bin"),
            vectorizer: PathBuf::from("tfidf_vectorizer.bin"),
            chat_log: PathBuf::from("chat_log.csv"),
        }
    }
}

/// Text analysis settings. Stored with the fitted feature space so a cached
/// vectorizer is rebuilt with the analyzer it was trained with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Lowercase every token.
    pub lowercase: bool,
    /// Emit punctuation as standalone terms.
    pub keep_punctuation: bool,
    /// Drop common English stop words.
    pub remove_stop_words: bool,
    /// Extract terms with this regular expression instead of splitting on
    /// Unicode word boundaries. `keep_punctuation` is ignored when set.
    pub token_pattern: Option<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            lowercase: true,
            keep_punctuation: false,
            remove_stop_words: false,
            token_pattern: None,
        }
    }
}

impl AnalysisConfig {
    /// Check that the token pattern compiles.
    pub fn validate(&self) -> Result<()> {
        if let Some(pattern) = &self.token_pattern {
            regex::Regex::new(pattern).map_err(|e| {
                PalaverError::invalid_config(format!("analysis.token_pattern: {e}"))
            })?;
        }
        Ok(())
    }
}

/// Logistic regression training settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Inverse regularisation strength; smaller values regularise more.
    pub c: f64,
    /// Gradient descent step size.
    pub learning_rate: f64,
    /// Iteration budget.
    pub max_iter: usize,
    /// Converged once the largest gradient component falls below this.
    pub tolerance: f64,
    /// Seed for weight initialisation.
    pub seed: u64,
    /// Fail training instead of warning when the budget runs out.
    pub strict_convergence: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            c: 1.0,
            learning_rate: 1.0,
            max_iter: 10_000,
            tolerance: 1e-4,
            seed: DEFAULT_SEED,
            strict_convergence: false,
        }
    }
}

impl TrainingConfig {
    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.c.is_nan() || self.c <= 0.0 || self.c.is_infinite() {
            return Err(PalaverError::invalid_config("training.c must be positive"));
        }
        if self.learning_rate.is_nan()
            || self.learning_rate <= 0.0
            || self.learning_rate.is_infinite()
        {
            return Err(PalaverError::invalid_config(
                "training.learning_rate must be positive",
            ));
        }
        if self.max_iter == 0 {
            return Err(PalaverError::invalid_config(
                "training.max_iter must be at least 1",
            ));
        }
        if self.tolerance.is_nan() || self.tolerance <= 0.0 {
            return Err(PalaverError::invalid_config(
                "training.tolerance must be positive",
            ));
        }
        Ok(())
    }
}

/// Model cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Read and write cache artifacts.
    pub enabled: bool,
    /// Treat artifacts trained on a different corpus as a cache miss.
    pub invalidate_stale: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            enabled: true,
            invalidate_stale: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = PalaverConfig::default();
        assert_eq!(config.paths.corpus, PathBuf::from("intents.json"));
        assert_eq!(config.paths.chat_log, PathBuf::from("chat_log.csv"));
        assert_eq!(config.training.max_iter, 10_000);
        assert_eq!(config.training.seed, 0);
        assert!(config.cache.enabled);
        assert!(!config.cache.invalidate_stale);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("palaver.json");
        std::fs::write(
            &path,
            r#"{ "training": { "max_iter": 50 }, "fallback_response": "Eh?" }"#,
        )
        .unwrap();

        let config = PalaverConfig::from_file(&path).unwrap();
        assert_eq!(config.training.max_iter, 50);
        assert_eq!(config.training.c, 1.0);
        assert_eq!(config.fallback_response, "Eh?");
        assert_eq!(config.paths, PathsConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = PalaverConfig::default();
        config.training.c = 0.0;
        assert!(config.validate().is_err());

        let mut config = PalaverConfig::default();
        config.training.max_iter = 0;
        assert!(config.validate().is_err());

        let mut config = PalaverConfig::default();
        config.analysis.token_pattern = Some("(unclosed".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_with_base_dir() {
        let config = PalaverConfig::default().with_base_dir("/tmp/bot");
        assert_eq!(config.paths.model, PathBuf::from("/tmp/bot/chatbot_model.bin"));
    }
}
