use std::collections::HashSet;
use std::io::{self, Write};

use serde_derive::{Deserialize, Serialize};

use crate::features::{FeatureExtractor, FeatureTemplates};
use crate::guide::Guide;
use crate::models::Perceptron;
use crate::sentence::Sentence;
use crate::system::{ParserState, Transition, TransitionSystem};

/// Transition classifier: a transition system, the features of its
/// transitions, and perceptron weights.
///
/// The model also records the word forms of its training data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerceptronModel<S, F> {
    system: S,
    extractor: FeatureExtractor<F>,
    perceptron: Perceptron,
    words: HashSet<String>,
}

impl<S, F> PerceptronModel<S, F>
where
    S: TransitionSystem,
    F: FeatureTemplates,
{
    /// Construct an untrained model.
    pub fn new(system: S, templates: F) -> Self {
        PerceptronModel {
            system,
            extractor: FeatureExtractor::new(templates),
            perceptron: Perceptron::new(),
            words: HashSet::new(),
        }
    }

    /// Add the word forms of a sentence to the known words.
    pub fn add_words(&mut self, sentence: &Sentence) {
        for token in 1..sentence.len() {
            if !self.words.contains(sentence[token].form()) {
                self.words.insert(sentence[token].form().to_owned());
            }
        }
    }

    /// Returns `true` if `form` occurred in the training data.
    pub fn is_known_word(&self, form: &str) -> bool {
        self.words.contains(form)
    }

    pub fn system(&self) -> &S {
        &self.system
    }

    pub fn extractor(&self) -> &FeatureExtractor<F> {
        &self.extractor
    }

    pub fn perceptron(&self) -> &Perceptron {
        &self.perceptron
    }

    pub(crate) fn extractor_mut(&mut self) -> &mut FeatureExtractor<F> {
        &mut self.extractor
    }

    pub(crate) fn perceptron_mut(&mut self) -> &mut Perceptron {
        &mut self.perceptron
    }

    /// Find the highest-scoring transition that is possible in `state`.
    ///
    /// Ties are broken in favor of the transition that comes first in the
    /// transition system. Returns `None` if no transition is possible.
    pub fn best_possible(
        &self,
        state: &ParserState,
        contexts: &[String],
        averaged: bool,
    ) -> Option<&Transition> {
        let mut best: Option<(&Transition, f64)> = None;

        for transition in self.system.possible_transitions(state) {
            let features = self.extractor.lookup(contexts, transition);
            let score = self.perceptron.score(&features, averaged);

            match best {
                Some((_, best_score)) if best_score >= score => (),
                _ => best = Some((transition, score)),
            }
        }

        best.map(|(transition, _)| transition)
    }

    /// Compute the averaged weights, so that they are used for parsing.
    ///
    /// Training can continue afterwards, e.g. when the model is evaluated
    /// between epochs.
    pub fn average(&mut self) {
        self.perceptron.finalize();
    }

    /// Finish training: average the weights and close the feature
    /// vocabulary.
    pub fn finalize(&mut self) {
        self.perceptron.finalize();
        self.extractor.close();
    }

    /// Write the weights of all features in the vocabulary.
    pub fn write_weights<W>(&self, write: &mut W) -> io::Result<()>
    where
        W: Write,
    {
        self.perceptron
            .write_weights(self.extractor.n_features(), write)
    }
}

impl<S, F> Guide for PerceptronModel<S, F>
where
    S: TransitionSystem,
    F: FeatureTemplates,
{
    fn best_transition(&self, state: &ParserState) -> Option<Transition> {
        let contexts = self.extractor.contexts(state);
        self.best_possible(state, &contexts, self.perceptron.is_finalized())
            .cloned()
    }
}
