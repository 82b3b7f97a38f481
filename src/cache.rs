//! Persisted snapshot of the fitted feature space and classifier.
//!
//! Two bincode artifacts are written, one per fitted component. Each carries
//! a format version and the fingerprint of the corpus it was trained on.
//!
//! Loading never fails: a missing file, an unreadable file or a payload that
//! does not deserialize is reported as a cache miss so the caller retrains.
//! A fingerprint that does not match the current corpus is logged; whether it
//! also counts as a miss is controlled by `invalidate_stale`.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::{CacheConfig, PathsConfig};
use crate::corpus::IntentCorpus;
use crate::error::{PalaverError, Result};
use crate::ml::logistic::LogisticRegressionModel;
use crate::ml::tfidf::FittedFeatureSpace;

/// Bumped whenever the artifact layout changes.
pub const CACHE_FORMAT_VERSION: u32 = 1;

const VECTORIZER_KIND: &str = "tfidf_vectorizer";
const MODEL_KIND: &str = "logistic_regression";

#[derive(Debug, Serialize, Deserialize)]
struct CacheArtifact<T> {
    kind: String,
    format_version: u32,
    corpus_fingerprint: u32,
    payload: T,
}

/// Reads and writes the two cache artifacts.
#[derive(Debug, Clone)]
pub struct ModelCache {
    vectorizer_path: PathBuf,
    model_path: PathBuf,
    invalidate_stale: bool,
}

impl ModelCache {
    /// Create a cache over the given artifact paths.
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(vectorizer_path: P, model_path: Q) -> Self {
        ModelCache {
            vectorizer_path: vectorizer_path.into(),
            model_path: model_path.into(),
            invalidate_stale: false,
        }
    }

    /// Create a cache from configuration.
    pub fn from_config(paths: &PathsConfig, cache: &CacheConfig) -> Self {
        Self::new(&paths.vectorizer, &paths.model).invalidate_stale(cache.invalidate_stale)
    }

    /// Treat artifacts from a different corpus as a miss.
    pub fn invalidate_stale(mut self, invalidate: bool) -> Self {
        self.invalidate_stale = invalidate;
        self
    }

    /// Path of the feature space artifact.
    pub fn vectorizer_path(&self) -> &Path {
        &self.vectorizer_path
    }

    /// Path of the classifier artifact.
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Load both artifacts, or `None` on any kind of miss.
    pub fn load(
        &self,
        corpus: &IntentCorpus,
    ) -> Option<(FittedFeatureSpace, LogisticRegressionModel)> {
        let corpus_fingerprint = corpus.fingerprint();
        if !self.vectorizer_path.exists() || !self.model_path.exists() {
            log::info!("Model cache miss: artifacts not found");
            return None;
        }

        let space: FittedFeatureSpace =
            self.read_artifact(&self.vectorizer_path, VECTORIZER_KIND, corpus_fingerprint)?;
        let model: LogisticRegressionModel =
            self.read_artifact(&self.model_path, MODEL_KIND, corpus_fingerprint)?;

        if space.dimension() != model.n_features() {
            log::warn!(
                "Model cache miss: feature space has {} terms but the model expects {}",
                space.dimension(),
                model.n_features()
            );
            return None;
        }

        log::info!(
            "Loaded cached model from {} and {}",
            self.vectorizer_path.display(),
            self.model_path.display()
        );
        Some((space, model))
    }

    /// Write both artifacts, stamped with the corpus fingerprint.
    pub fn save(
        &self,
        corpus: &IntentCorpus,
        space: &FittedFeatureSpace,
        model: &LogisticRegressionModel,
    ) -> Result<()> {
        let corpus_fingerprint = corpus.fingerprint();
        Self::write_artifact(&self.vectorizer_path, VECTORIZER_KIND, corpus_fingerprint, space)?;
        Self::write_artifact(&self.model_path, MODEL_KIND, corpus_fingerprint, model)?;
        log::info!(
            "Saved model cache to {} and {}",
            self.vectorizer_path.display(),
            self.model_path.display()
        );
        Ok(())
    }

    /// Delete both artifacts if present.
    pub fn clear(&self) -> Result<()> {
        for path in [&self.vectorizer_path, &self.model_path] {
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }

    fn read_artifact<T: DeserializeOwned>(
        &self,
        path: &Path,
        kind: &str,
        corpus_fingerprint: u32,
    ) -> Option<T> {
        // Decoding from a slice bounds every length prefix by the file size.
        let artifact: CacheArtifact<T> = match fs::read(path)
            .map_err(PalaverError::from)
            .and_then(|bytes| {
                bincode::deserialize(&bytes).map_err(|e| PalaverError::serialization(e.to_string()))
            }) {
            Ok(artifact) => artifact,
            Err(e) => {
                log::warn!("Model cache miss: cannot read {}: {e}", path.display());
                return None;
            }
        };

        if artifact.kind != kind || artifact.format_version != CACHE_FORMAT_VERSION {
            log::warn!(
                "Model cache miss: {} holds a {} v{} artifact, expected {} v{}",
                path.display(),
                artifact.kind,
                artifact.format_version,
                kind,
                CACHE_FORMAT_VERSION
            );
            return None;
        }

        if artifact.corpus_fingerprint != corpus_fingerprint {
            if self.invalidate_stale {
                log::info!(
                    "Model cache miss: {} was trained on a different corpus",
                    path.display()
                );
                return None;
            }
            log::warn!(
                "{} was trained on a different corpus (fingerprint {:08x}, current {:08x}); serving it anyway",
                path.display(),
                artifact.corpus_fingerprint,
                corpus_fingerprint
            );
        }

        Some(artifact.payload)
    }

    fn write_artifact<T: Serialize>(
        path: &Path,
        kind: &str,
        corpus_fingerprint: u32,
        payload: &T,
    ) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let artifact = CacheArtifact {
            kind: kind.to_string(),
            format_version: CACHE_FORMAT_VERSION,
            corpus_fingerprint,
            payload,
        };

        // Write to a sibling file first so a crash never leaves a truncated artifact.
        let tmp_path = tmp_path(path);
        {
            let mut writer = BufWriter::new(File::create(&tmp_path)?);
            bincode::serialize_into(&mut writer, &artifact).map_err(|e| {
                PalaverError::serialization(format!("Failed to serialize {kind}: {e}"))
            })?;
            writer.flush()?;
        }
        fs::rename(&tmp_path, path)?;

        Ok(())
    }
}

/// `model.bin` becomes `model.bin.tmp`, so artifacts sharing a stem never collide.
fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AnalysisConfig, TrainingConfig};
    use crate::corpus::Intent;
    use crate::ml::classifier::{IntentClassifier, MLBasedIntentClassifier};
    use tempfile::TempDir;

    fn trained() -> (IntentCorpus, MLBasedIntentClassifier) {
        let corpus = IntentCorpus::from_intents(vec![
            Intent::new("greeting", ["hi", "hello"], ["Hey!"]),
            Intent::new("bye", ["bye", "goodbye"], ["Goodbye!"]),
        ])
        .unwrap();
        let classifier = MLBasedIntentClassifier::train(
            &corpus,
            &AnalysisConfig::default(),
            &TrainingConfig::default(),
        )
        .unwrap();
        (corpus, classifier)
    }

    fn cache(dir: &TempDir) -> ModelCache {
        ModelCache::new(dir.path().join("vec.bin"), dir.path().join("model.bin"))
    }

    #[test]
    fn test_round_trip_is_transparent() {
        let dir = TempDir::new().unwrap();
        let (corpus, classifier) = trained();
        let cache = cache(&dir);

        cache
            .save(
                &corpus,
                classifier.feature_space().unwrap(),
                classifier.model(),
            )
            .unwrap();
        let (space, model) = cache.load(&corpus).unwrap();

        assert_eq!(&space, classifier.feature_space().unwrap());
        assert_eq!(&model, classifier.model());

        let restored = MLBasedIntentClassifier::from_parts(space, model).unwrap();
        for text in ["hello", "goodbye", "something else entirely"] {
            assert_eq!(
                restored.predict(text).unwrap(),
                classifier.predict(text).unwrap()
            );
        }
    }

    #[test]
    fn test_missing_artifacts_are_a_miss() {
        let dir = TempDir::new().unwrap();
        let (corpus, _) = trained();
        assert!(cache(&dir).load(&corpus).is_none());
    }

    #[test]
    fn test_corrupt_artifact_is_a_miss() {
        let dir = TempDir::new().unwrap();
        let (corpus, classifier) = trained();
        let cache = cache(&dir);
        cache
            .save(
                &corpus,
                classifier.feature_space().unwrap(),
                classifier.model(),
            )
            .unwrap();

        fs::write(cache.model_path(), b"not a model").unwrap();

        assert!(cache.load(&corpus).is_none());
    }

    #[test]
    fn test_oversized_length_prefix_is_a_miss() {
        let dir = TempDir::new().unwrap();
        let (corpus, classifier) = trained();
        let cache = cache(&dir);
        cache
            .save(
                &corpus,
                classifier.feature_space().unwrap(),
                classifier.model(),
            )
            .unwrap();

        // A string length far beyond the file, followed by a few bytes.
        let mut bytes = u64::MAX.to_le_bytes().to_vec();
        bytes.extend_from_slice(b"kind");
        fs::write(cache.vectorizer_path(), &bytes).unwrap();

        assert!(cache.load(&corpus).is_none());
    }

    #[test]
    fn test_truncated_artifact_is_a_miss() {
        let dir = TempDir::new().unwrap();
        let (corpus, classifier) = trained();
        let cache = cache(&dir);
        cache
            .save(
                &corpus,
                classifier.feature_space().unwrap(),
                classifier.model(),
            )
            .unwrap();

        let bytes = fs::read(cache.model_path()).unwrap();
        fs::write(cache.model_path(), &bytes[..bytes.len() / 2]).unwrap();

        assert!(cache.load(&corpus).is_none());
    }

    #[test]
    fn test_artifacts_sharing_a_stem() {
        let dir = TempDir::new().unwrap();
        let (corpus, classifier) = trained();
        let cache = ModelCache::new(dir.path().join("model.vec"), dir.path().join("model.bin"));
        assert_ne!(
            tmp_path(cache.vectorizer_path()),
            tmp_path(cache.model_path())
        );
        assert_eq!(
            tmp_path(cache.model_path()),
            dir.path().join("model.bin.tmp")
        );

        cache
            .save(
                &corpus,
                classifier.feature_space().unwrap(),
                classifier.model(),
            )
            .unwrap();

        let (space, model) = cache.load(&corpus).unwrap();
        assert_eq!(&space, classifier.feature_space().unwrap());
        assert_eq!(&model, classifier.model());
        assert!(!dir.path().join("model.vec.tmp").exists());
        assert!(!dir.path().join("model.bin.tmp").exists());
    }

    #[test]
    fn test_swapped_artifacts_are_a_miss() {
        let dir = TempDir::new().unwrap();
        let (corpus, classifier) = trained();
        let cache = cache(&dir);
        cache
            .save(
                &corpus,
                classifier.feature_space().unwrap(),
                classifier.model(),
            )
            .unwrap();

        let swapped = ModelCache::new(cache.model_path(), cache.vectorizer_path());
        assert!(swapped.load(&corpus).is_none());
    }

    #[test]
    fn test_stale_policy() {
        let dir = TempDir::new().unwrap();
        let (corpus, classifier) = trained();
        let cache = cache(&dir);
        cache
            .save(
                &corpus,
                classifier.feature_space().unwrap(),
                classifier.model(),
            )
            .unwrap();

        let edited = IntentCorpus::from_intents(vec![
            Intent::new("greeting", ["hi", "hello"], ["Hey!"]),
            Intent::new("bye", ["bye", "goodbye", "see ya"], ["Goodbye!"]),
        ])
        .unwrap();
        assert_ne!(edited.fingerprint(), corpus.fingerprint());

        assert!(cache.load(&edited).is_some());
        assert!(cache.clone().invalidate_stale(true).load(&edited).is_none());
        assert!(cache.clone().invalidate_stale(true).load(&corpus).is_some());
    }

    #[test]
    fn test_clear() {
        let dir = TempDir::new().unwrap();
        let (corpus, classifier) = trained();
        let cache = cache(&dir);
        cache
            .save(
                &corpus,
                classifier.feature_space().unwrap(),
                classifier.model(),
            )
            .unwrap();

        cache.clear().unwrap();
        assert!(!cache.model_path().exists());
        assert!(!cache.vectorizer_path().exists());
    }
}
