use crate::eval::percentage;
use crate::sentence::Labels;

/// Accuracy of named entity tags, per token and per sentence.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LabelAccuracy {
    pub tokens: usize,
    pub correct_tokens: usize,
    pub sentences: usize,
    pub correct_sentences: usize,
}

impl LabelAccuracy {
    pub fn add(&mut self, predicted: &Labels, gold: &Labels) {
        let mut all_correct = true;

        for token in 1..gold.len() {
            self.tokens += 1;
            if predicted.get(token) == gold.get(token) {
                self.correct_tokens += 1;
            } else {
                all_correct = false;
            }
        }

        self.sentences += 1;
        if all_correct {
            self.correct_sentences += 1;
        }
    }

    /// Percentage of tokens with the correct tag.
    pub fn token_accuracy(&self) -> f64 {
        percentage(self.correct_tokens, self.tokens)
    }

    /// Percentage of sentences in which all tokens have the correct tag.
    pub fn sentence_accuracy(&self) -> f64 {
        percentage(self.correct_sentences, self.sentences)
    }
}
