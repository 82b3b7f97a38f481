//! Picks a reply for a predicted tag.

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::corpus::IntentCorpus;
use crate::error::{PalaverError, Result};

/// Chooses uniformly among the responses of an intent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseSelector;

impl ResponseSelector {
    pub fn new() -> Self {
        ResponseSelector
    }

    /// Pick a response for `tag` using the thread-local generator.
    pub fn select<'a>(&self, tag: &str, corpus: &'a IntentCorpus) -> Result<&'a str> {
        self.select_with(tag, corpus, &mut rand::rng())
    }

    /// Pick a response for `tag` using the given generator.
    ///
    /// Returns [`PalaverError::UnknownTag`] when no intent has this tag.
    pub fn select_with<'a, R: Rng + ?Sized>(
        &self,
        tag: &str,
        corpus: &'a IntentCorpus,
        rng: &mut R,
    ) -> Result<&'a str> {
        let intent = corpus
            .find(tag)
            .ok_or_else(|| PalaverError::unknown_tag(tag))?;

        intent
            .responses
            .choose(rng)
            .map(String::as_str)
            .ok_or_else(|| PalaverError::unknown_tag(format!("{tag} has no responses")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Intent;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn corpus() -> IntentCorpus {
        IntentCorpus::from_intents(vec![
            Intent::new("greeting", ["hi"], ["Hey!", "Hello!", "Howdy!"]),
            Intent::new("bye", ["bye"], ["Goodbye!"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_single_response() {
        let corpus = corpus();
        for _ in 0..10 {
            assert_eq!(
                ResponseSelector::new().select("bye", &corpus).unwrap(),
                "Goodbye!"
            );
        }
    }

    #[test]
    fn test_response_belongs_to_intent() {
        let corpus = corpus();
        let allowed = &corpus.find("greeting").unwrap().responses;
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = HashSet::new();

        for _ in 0..200 {
            let reply = ResponseSelector
                .select_with("greeting", &corpus, &mut rng)
                .unwrap();
            assert!(allowed.iter().any(|r| r == reply));
            seen.insert(reply);
        }

        // 200 uniform draws over three responses cover all of them.
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_seeded_selection_is_reproducible() {
        let corpus = corpus();
        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..20)
                .map(|_| {
                    ResponseSelector
                        .select_with("greeting", &corpus, &mut rng)
                        .unwrap()
                        .to_string()
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(42), draw(42));
    }

    #[test]
    fn test_unknown_tag() {
        let err = ResponseSelector::new()
            .select("weather", &corpus())
            .unwrap_err();
        assert!(matches!(err, PalaverError::UnknownTag(tag) if tag == "weather"));
    }
}
