use std::fmt;

use log::warn;

use crate::analysis::Analysis;
use crate::sentence::Sentence;
use crate::system::{OracleError, Transition, TransitionSystem};

/// A sentence with the transition sequence that derives its gold-standard
/// analysis.
#[derive(Clone, Debug)]
pub struct TrainingExample<'a> {
    sentence: &'a Sentence,
    gold: &'a Analysis,
    transitions: Vec<Transition>,
}

impl<'a> TrainingExample<'a> {
    /// Derive the transition sequence of a gold-standard analysis by
    /// following the static oracle.
    ///
    /// Fails if the gold-standard analysis cannot be derived by the
    /// transition system.
    pub fn new<S>(system: &S, sentence: &'a Sentence, gold: &'a Analysis) -> Result<Self, OracleError>
    where
        S: TransitionSystem,
    {
        system.check_gold(gold)?;

        let mut state = system.initial_state(sentence);
        let mut transitions = Vec::new();
        while !system.is_terminal(&state) {
            let transition = match system.oracle(&state, gold) {
                Some(transition) if system.is_possible(&transition, &state) => transition,
                _ => return Err(OracleError::Unreachable(state.to_string())),
            };

            system.apply(&transition, &mut state);
            transitions.push(transition);
        }

        if state.labels() != gold.labels() || !system.can_reach(&state, gold) {
            return Err(OracleError::Unreachable(state.to_string()));
        }

        Ok(TrainingExample {
            sentence,
            gold,
            transitions,
        })
    }

    pub fn sentence(&self) -> &'a Sentence {
        self.sentence
    }

    pub fn gold(&self) -> &'a Analysis {
        self.gold
    }

    /// The transitions from the initial state to the gold analysis.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }
}

/// Counts of sentences that were skipped during training.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SkipStats {
    pub empty: usize,
    pub not_a_tree: usize,
    pub multiple_roots: usize,
    pub non_projective: usize,
    pub unreachable: usize,
}

impl SkipStats {
    pub fn add(&mut self, err: &OracleError) {
        match err {
            OracleError::EmptySentence => self.empty += 1,
            OracleError::NotATree => self.not_a_tree += 1,
            OracleError::MultipleRoots => self.multiple_roots += 1,
            OracleError::NonProjective => self.non_projective += 1,
            OracleError::Unreachable(_) => self.unreachable += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.empty + self.not_a_tree + self.multiple_roots + self.non_projective + self.unreachable
    }
}

impl fmt::Display for SkipStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "skipped {} sentence(s): {} empty, {} not a tree, {} multiple roots, {} non-projective, {} unreachable",
            self.total(),
            self.empty,
            self.not_a_tree,
            self.multiple_roots,
            self.non_projective,
            self.unreachable
        )
    }
}

/// Derive training examples, skipping sentences whose gold-standard
/// analysis cannot be derived.
pub fn collect_examples<'a, S>(
    system: &S,
    data: &'a [(Sentence, Analysis)],
) -> (Vec<TrainingExample<'a>>, SkipStats)
where
    S: TransitionSystem,
{
    let mut examples = Vec::with_capacity(data.len());
    let mut skipped = SkipStats::default();

    for (idx, (sentence, gold)) in data.iter().enumerate() {
        match TrainingExample::new(system, sentence, gold) {
            Ok(example) => examples.push(example),
            Err(err) => {
                warn!("Skipping sentence {}: {}", idx + 1, err);
                skipped.add(&err);
            }
        }
    }

    (examples, skipped)
}
