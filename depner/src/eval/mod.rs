//! Evaluation of predicted analyses against gold-standard analyses.

use std::fmt;

use crate::analysis::Analysis;
use crate::sentence::Sentence;

mod attachment;
pub use self::attachment::{AttachmentScore, UnitAttachment};

mod conlleval;
pub use self::conlleval::write_conlleval;

mod labels;
pub use self::labels::LabelAccuracy;

mod spans;
pub use self::spans::{to_spans, Span};

/// Part-of-speech tags of punctuation, which is excluded from attachment
/// scores.
pub const PUNCTUATION_TAGS: [&str; 7] = ["''", ",", ".", ":", "``", "-LRB-", "-RRB-"];

/// Returns `true` if `pos` is a punctuation tag.
pub fn is_punct(pos: &str) -> bool {
    PUNCTUATION_TAGS.contains(&pos)
}

/// Percentage with zero for an empty denominator.
pub(crate) fn percentage(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 * 100.0 / denominator as f64
    }
}

/// Accumulated evaluation scores.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Evaluation {
    pub labels: LabelAccuracy,
    pub attachment: AttachmentScore,
    pub unit_attachment: UnitAttachment,
}

impl Evaluation {
    pub fn new() -> Self {
        Evaluation::default()
    }

    /// Add the scores of the analysis of a sentence.
    pub fn add(&mut self, sentence: &Sentence, predicted: &Analysis, gold: &Analysis) {
        self.labels.add(predicted.labels(), gold.labels());
        self.attachment.add(sentence, predicted.tree(), gold.tree());
        self.unit_attachment.add(sentence, predicted, gold);
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "Labels: token accuracy {:.2}%, sentence accuracy {:.2}%",
            self.labels.token_accuracy(),
            self.labels.sentence_accuracy()
        )?;
        writeln!(
            f,
            "Attachment: UAS {:.2}%, LAS {:.2}%",
            self.attachment.uas(),
            self.attachment.las()
        )?;
        write!(f, "Unit attachment: {}", self.unit_attachment)
    }
}

#[cfg(test)]
mod tests {
    use super::{is_punct, Evaluation};
    use crate::test_helpers::{analysis, john_lives_here};

    #[test]
    fn punctuation() {
        assert!(is_punct(","));
        assert!(is_punct("-LRB-"));
        assert!(!is_punct("NN"));
    }

    #[test]
    fn evaluate_sentence() {
        let (sentence, gold) = john_lives_here();
        let predicted = analysis(&["O", "O", "O"], &[2, 0, 1]);

        let mut evaluation = Evaluation::new();
        evaluation.add(&sentence, &predicted, &gold);

        assert_relative_eq!(evaluation.labels.token_accuracy(), 200.0 / 3.0);
        assert_relative_eq!(evaluation.labels.sentence_accuracy(), 0.0);
        assert_relative_eq!(evaluation.attachment.uas(), 200.0 / 3.0);
        assert_eq!(
            evaluation.to_string(),
            "Labels: token accuracy 66.67%, sentence accuracy 0.00%\n\
             Attachment: UAS 66.67%, LAS 66.67%\n\
             Unit attachment: TP: 1, TP+FP: 3, TP+FN: 3, precision 33.33%, recall 33.33%, F1 33.33%"
        );
    }
}
