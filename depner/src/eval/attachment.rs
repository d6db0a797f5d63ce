use std::collections::HashSet;
use std::fmt;

use crate::analysis::Analysis;
use crate::eval::{is_punct, percentage, to_spans, Span};
use crate::sentence::Sentence;
use crate::tree::DependencyTree;

/// Unlabeled and labeled attachment scores.
///
/// Tokens with punctuation tags are not counted.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct AttachmentScore {
    pub tokens: usize,
    pub head_correct: usize,
    pub head_relation_correct: usize,
}

impl AttachmentScore {
    pub fn add(&mut self, sentence: &Sentence, predicted: &DependencyTree, gold: &DependencyTree) {
        for token in 1..sentence.len() {
            if is_punct(sentence[token].pos()) {
                continue;
            }

            self.tokens += 1;

            if predicted.head(token) == gold.head(token) {
                self.head_correct += 1;

                if predicted.relation(token) == gold.relation(token) {
                    self.head_relation_correct += 1;
                }
            }
        }
    }

    /// Unlabeled attachment score (percentage).
    pub fn uas(&self) -> f64 {
        percentage(self.head_correct, self.tokens)
    }

    /// Labeled attachment score (percentage).
    pub fn las(&self) -> f64 {
        percentage(self.head_relation_correct, self.tokens)
    }
}

/// Attachment of spans.
///
/// A head of a predicted span is correct if the gold analysis has the same
/// span with the same head. Unit spans of punctuation are not counted.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct UnitAttachment {
    /// Correct heads.
    pub tp: usize,

    /// Predicted heads.
    pub tp_fp: usize,

    /// Gold heads.
    pub tp_fn: usize,
}

fn is_scored(sentence: &Sentence, span: &Span) -> bool {
    !(span.is_unit() && (span.start() == 0 || is_punct(sentence[span.start()].pos())))
}

impl UnitAttachment {
    pub fn add(&mut self, sentence: &Sentence, predicted: &Analysis, gold: &Analysis) {
        let gold_spans: HashSet<_> = to_spans(gold.labels(), gold.tree())
            .into_iter()
            .filter(|span| is_scored(sentence, span))
            .collect();

        for span in to_spans(predicted.labels(), predicted.tree()) {
            if !is_scored(sentence, &span) {
                continue;
            }

            if let Some(gold_span) = gold_spans.get(&span) {
                self.tp += span.heads().intersection(gold_span.heads()).count();
            }

            self.tp_fp += span.heads().len();
        }

        self.tp_fn += gold_spans.iter().map(|span| span.heads().len()).sum::<usize>();
    }

    pub fn precision(&self) -> f64 {
        percentage(self.tp, self.tp_fp)
    }

    pub fn recall(&self) -> f64 {
        percentage(self.tp, self.tp_fn)
    }

    pub fn f1(&self) -> f64 {
        percentage(2 * self.tp, self.tp_fp + self.tp_fn)
    }
}

impl fmt::Display for UnitAttachment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "TP: {}, TP+FP: {}, TP+FN: {}, precision {:.2}%, recall {:.2}%, F1 {:.2}%",
            self.tp,
            self.tp_fp,
            self.tp_fn,
            self.precision(),
            self.recall(),
            self.f1()
        )
    }
}
