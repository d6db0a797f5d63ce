use std::iter::FromIterator;
use std::ops::Deref;

use serde_derive::{Deserialize, Serialize};

use crate::features::FeatureTemplates;
use crate::numberer::Numberer;
use crate::system::{ParserState, Transition};

/// Feature number for features that are not in the vocabulary.
pub const UNKNOWN_FEATURE: usize = 0;

/// A set of feature numbers.
///
/// Feature numbers are sorted and unique. Unknown features are not
/// stored.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FeatureVector(Vec<usize>);

impl FromIterator<usize> for FeatureVector {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut features: Vec<_> = iter
            .into_iter()
            .filter(|&feature| feature != UNKNOWN_FEATURE)
            .collect();
        features.sort_unstable();
        features.dedup();
        FeatureVector(features)
    }
}

impl Deref for FeatureVector {
    type Target = [usize];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Extraction of transition features.
///
/// Each feature is a context string from the feature templates,
/// conjoined with a transition. The extractor keeps the vocabulary that
/// maps features to numbers. The vocabulary grows while it is open; once it
/// is closed, unknown features are mapped to `UNKNOWN_FEATURE`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FeatureExtractor<F> {
    templates: F,
    vocab: Numberer<String>,
    closed: bool,
}

impl<F> FeatureExtractor<F>
where
    F: FeatureTemplates,
{
    pub fn new(templates: F) -> Self {
        FeatureExtractor {
            templates,
            vocab: Numberer::new(UNKNOWN_FEATURE + 1),
            closed: false,
        }
    }

    /// Instantiate the context strings of `state`.
    pub fn contexts(&self, state: &ParserState) -> Vec<String> {
        self.templates.contexts(state)
    }

    /// Get the features of `transition` without extending the vocabulary.
    pub fn lookup(&self, contexts: &[String], transition: &Transition) -> FeatureVector {
        contexts
            .iter()
            .map(|context| {
                self.vocab
                    .number(feature_string(context, transition).as_str())
                    .unwrap_or(UNKNOWN_FEATURE)
            })
            .collect()
    }

    /// Get the features of `transition`, adding unknown features to the
    /// vocabulary if it is open.
    pub fn intern(&mut self, contexts: &[String], transition: &Transition) -> FeatureVector {
        if self.closed {
            return self.lookup(contexts, transition);
        }

        let vocab = &mut self.vocab;
        contexts
            .iter()
            .map(|context| vocab.add(feature_string(context, transition)))
            .collect()
    }

    /// Extract the features of `transition` in `state`, adding unknown
    /// features to the vocabulary if it is open.
    pub fn features(&mut self, state: &ParserState, transition: &Transition) -> FeatureVector {
        let contexts = self.contexts(state);
        self.intern(&contexts, transition)
    }

    /// Close the vocabulary.
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The number of feature numbers in use, including `UNKNOWN_FEATURE`.
    pub fn n_features(&self) -> usize {
        self.vocab.len() + self.vocab.start_at()
    }

    /// Get the feature string of a feature number.
    pub fn feature(&self, number: usize) -> Option<&str> {
        self.vocab.value(number).map(String::as_str)
    }
}

fn feature_string(context: &str, transition: &Transition) -> String {
    format!("{}|{}", context, transition)
}
