use std::fmt;

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::features::FeatureTemplates;
use crate::models::PerceptronModel;
use crate::parser::ParseError;
use crate::system::TransitionSystem;
use crate::train::TrainingExample;

/// Training statistics of an epoch.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct EpochStats {
    /// The number of training sentences.
    pub sentences: usize,

    /// The number of sentences that were parsed without an update.
    pub correct: usize,
}

impl EpochStats {
    /// Percentage of sentences that were parsed without an update.
    pub fn accuracy(&self) -> f64 {
        if self.sentences == 0 {
            0.0
        } else {
            self.correct as f64 * 100.0 / self.sentences as f64
        }
    }
}

impl fmt::Display for EpochStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}/{} sentences correct ({:.2}%)",
            self.correct,
            self.sentences,
            self.accuracy()
        )
    }
}

/// Perceptron trainer with early updates.
///
/// The gold transition sequence of a sentence is followed as long as the
/// model predicts the gold transitions. At the first wrong prediction, the
/// model is updated and the rest of the sentence is skipped.
pub struct EarlyUpdateTrainer<S, F> {
    model: PerceptronModel<S, F>,
    epoch: usize,
}

impl<S, F> EarlyUpdateTrainer<S, F>
where
    S: TransitionSystem,
    F: FeatureTemplates,
{
    pub fn new(model: PerceptronModel<S, F>) -> Self {
        EarlyUpdateTrainer { model, epoch: 0 }
    }

    pub fn model(&self) -> &PerceptronModel<S, F> {
        &self.model
    }

    /// Average the weights of the model trained so far, e.g. to evaluate
    /// it between epochs.
    pub fn average(&mut self) {
        self.model.average();
    }

    /// Finish training, returning the finalized model.
    pub fn into_model(mut self) -> PerceptronModel<S, F> {
        self.model.finalize();
        self.model
    }

    /// Train on a single example.
    ///
    /// Returns `true` if the gold transitions of the example were
    /// predicted without an update.
    pub fn train_example(&mut self, example: &TrainingExample) -> Result<bool, ParseError> {
        let mut state = self.model.system().initial_state(example.sentence());

        for gold in example.transitions() {
            let contexts = self.model.extractor().contexts(&state);
            let predicted = self
                .model
                .best_possible(&state, &contexts, false)
                .cloned()
                .ok_or_else(|| ParseError::NoPossibleTransition(state.to_string()))?;

            if predicted != *gold {
                debug!("Update in {}: {} instead of {}", state, predicted, gold);

                let gold_features = self.model.extractor_mut().intern(&contexts, gold);
                let predicted_features = self.model.extractor_mut().intern(&contexts, &predicted);
                let perceptron = self.model.perceptron_mut();
                perceptron.update(&gold_features, &predicted_features);
                perceptron.increment_average();

                return Ok(false);
            }

            self.model.perceptron_mut().increment_average();
            self.model.system().apply(gold, &mut state);
        }

        Ok(true)
    }

    /// Train for one epoch.
    ///
    /// If `shuffle` is `true`, the examples are visited in an order that is
    /// drawn from `rng`. The words of the examples are added to the known
    /// words of the model in the first epoch.
    pub fn train_epoch<R>(
        &mut self,
        examples: &[TrainingExample],
        shuffle: bool,
        rng: &mut R,
    ) -> Result<EpochStats, ParseError>
    where
        R: Rng,
    {
        if self.epoch == 0 {
            for example in examples {
                self.model.add_words(example.sentence());
            }
        }

        let mut order: Vec<_> = (0..examples.len()).collect();
        if shuffle {
            order.shuffle(rng);
        }

        let mut stats = EpochStats {
            sentences: examples.len(),
            correct: 0,
        };

        for idx in order {
            if self.train_example(&examples[idx])? {
                stats.correct += 1;
            }
        }

        self.epoch += 1;
        info!("Epoch {}: {}", self.epoch, stats);

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::{EarlyUpdateTrainer, EpochStats};
    use crate::features::DefaultTemplates;
    use crate::models::PerceptronModel;
    use crate::parser::{GreedyParser, Parse};
    use crate::systems::{JointSystem, LabelingSystem};
    use crate::test_helpers::{analysis, john_lives_here, sentence};
    use crate::train::collect_examples;
    use crate::{Alphabet, TagScheme};

    #[test]
    fn epoch_accuracy() {
        let stats = EpochStats {
            sentences: 4,
            correct: 3,
        };
        assert_relative_eq!(stats.accuracy(), 75.0);
        assert_relative_eq!(EpochStats::default().accuracy(), 0.0);
        assert_eq!(stats.to_string(), "3/4 sentences correct (75.00%)");
    }

    #[test]
    fn first_update_stops_sentence() {
        let data = vec![john_lives_here()];
        let alphabet = Alphabet::from_analyses(data.iter().map(|(_, gold)| gold));
        let system = JointSystem::new(&alphabet, TagScheme::Iob, true);
        let (examples, _) = collect_examples(&system, &data);

        let mut trainer = EarlyUpdateTrainer::new(PerceptronModel::new(system, DefaultTemplates));
        assert!(!trainer.train_example(&examples[0]).unwrap());
        assert_eq!(trainer.model().perceptron().steps(), 1);
        assert!(!trainer.model().extractor().is_closed());
    }

    #[test]
    fn learns_john_lives_here() {
        let data = vec![john_lives_here()];
        let alphabet = Alphabet::from_analyses(data.iter().map(|(_, gold)| gold));
        let system = JointSystem::new(&alphabet, TagScheme::Iob, true);
        let (examples, skipped) = collect_examples(&system, &data);
        assert_eq!(skipped.total(), 0);

        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut trainer = EarlyUpdateTrainer::new(PerceptronModel::new(system, DefaultTemplates));
        let mut last = EpochStats::default();
        for _ in 0..50 {
            last = trainer.train_epoch(&examples, true, &mut rng).unwrap();
        }
        assert_relative_eq!(last.accuracy(), 100.0);

        let (sentence, gold) = &data[0];
        {
            let model = trainer.model();
            let parser = GreedyParser::new(model.system(), model);
            assert_eq!(&parser.parse(sentence).unwrap(), gold);
        }

        let model = trainer.into_model();
        assert!(model.extractor().is_closed());
        let parser = GreedyParser::new(model.system(), &model);
        assert_eq!(&parser.parse(sentence).unwrap(), gold);
    }

    #[test]
    fn learns_labels() {
        let data = vec![
            (
                sentence(&[("Mary", "NNP"), ("Smith", "NNP"), ("sings", "VBZ")]),
                analysis(&["B-PER", "I-PER", "O"], &[2, 3, 0]),
            ),
            (
                sentence(&[("Paris", "NNP"), ("sleeps", "VBZ")]),
                analysis(&["B-LOC", "O"], &[2, 0]),
            ),
        ];
        let alphabet = Alphabet::from_analyses(data.iter().map(|(_, gold)| gold));
        let system = LabelingSystem::new(&alphabet, TagScheme::Iob);
        let (examples, _) = collect_examples(&system, &data);

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut trainer = EarlyUpdateTrainer::new(PerceptronModel::new(system, DefaultTemplates));
        for _ in 0..30 {
            trainer.train_epoch(&examples, true, &mut rng).unwrap();
        }

        let model = trainer.into_model();
        assert!(model.is_known_word("Paris"));
        assert!(!model.is_known_word("Berlin"));

        let parser = GreedyParser::new(model.system(), &model);
        for (sentence, gold) in &data {
            let predicted = parser.parse(sentence).unwrap();
            assert_eq!(predicted.labels(), gold.labels());
        }
    }
}
