use std::ops::Deref;

use failure::Fail;
use serde_derive::{Deserialize, Serialize};

use crate::analysis::{Alphabet, Analysis};
use crate::sentence::{Sentence, Tag, TagScheme};
use crate::system::{ParserState, Transition};

/// Reasons why the transition sequence for a gold-standard analysis
/// cannot be derived.
#[derive(Clone, Debug, Eq, Fail, PartialEq)]
pub enum OracleError {
    #[fail(display = "the sentence has no words")]
    EmptySentence,

    #[fail(display = "the dependency structure is not a tree")]
    NotATree,

    #[fail(display = "more than one token is attached to the root")]
    MultipleRoots,

    #[fail(display = "the dependency tree is not projective")]
    NonProjective,

    #[fail(display = "the analysis is not reachable: {}", _0)]
    Unreachable(String),
}

pub trait TransitionSystem {
    /// All transitions of the system, in the order in which they are
    /// enumerated.
    fn transitions(&self) -> &Transitions;

    /// The span encoding that shift transitions have to follow.
    fn tag_scheme(&self) -> TagScheme;

    fn initial_state<'a>(&self, sentence: &'a Sentence) -> ParserState<'a> {
        ParserState::new(sentence)
    }

    fn is_terminal(&self, state: &ParserState) -> bool;

    fn is_possible(&self, transition: &Transition, state: &ParserState) -> bool;

    /// The static oracle: the transition that leads towards the `gold`
    /// analysis. Returns `None` if no transition leads towards it.
    fn oracle(&self, state: &ParserState, gold: &Analysis) -> Option<Transition>;

    /// Returns `true` if the `gold` analysis can still be reached from
    /// `state`.
    fn can_reach(&self, state: &ParserState, gold: &Analysis) -> bool;

    /// Check that the system is able to produce the `gold` analysis.
    fn check_gold(&self, gold: &Analysis) -> Result<(), OracleError>;

    /// Apply a transition.
    ///
    /// Panics when the transition is not possible in `state`.
    fn apply(&self, transition: &Transition, state: &mut ParserState) {
        assert!(
            self.is_possible(transition, state),
            "Transition {} is not possible in state: {}",
            transition,
            state
        );

        transition.apply(state);
    }

    /// The transitions that are possible in `state`.
    fn possible_transitions<'t>(&'t self, state: &ParserState) -> Vec<&'t Transition> {
        self.transitions()
            .iter()
            .filter(|t| self.is_possible(t, state))
            .collect()
    }

    /// Returns `true` if `transition` is possible and the `gold` analysis
    /// can still be reached after applying it.
    fn is_oracle(&self, state: &ParserState, transition: &Transition, gold: &Analysis) -> bool {
        if !self.is_possible(transition, state) {
            return false;
        }

        let mut next = state.clone();
        transition.apply(&mut next);
        self.can_reach(&next, gold)
    }
}

/// Returns `true` if the buffer front can be shifted with `tag`.
pub(crate) fn can_shift(scheme: TagScheme, tag: &Tag, state: &ParserState) -> bool {
    match state.previous_label() {
        Some(previous) => scheme.allows(previous, tag, state.at_last_token()),
        None => false,
    }
}

/// Returns `true` if the tags of `state` agree with the tags of `gold`.
pub(crate) fn labels_agree(state: &ParserState, gold: &Analysis) -> bool {
    (1..state.labels().len()).all(|idx| match state.labels().get(idx) {
        Some(tag) => gold.labels().get(idx) == Some(tag),
        None => true,
    })
}

/// The transitions of a transition system.
///
/// Left arcs come first, then right arcs, then shifts.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Transitions(Vec<Transition>);

impl Transitions {
    /// Arc transitions for each relation of the alphabet, followed by
    /// shift transitions for each tag.
    pub fn with_arcs(alphabet: &Alphabet) -> Self {
        let lefts = alphabet
            .relations()
            .map(|rel| Transition::LeftArc(rel.to_owned()));
        let rights = alphabet
            .relations()
            .map(|rel| Transition::RightArc(rel.to_owned()));
        let shifts = alphabet.tags().cloned().map(Transition::Shift);

        Transitions(lefts.chain(rights).chain(shifts).collect())
    }

    /// Shift transitions for each tag of the alphabet.
    pub fn shifts_only(alphabet: &Alphabet) -> Self {
        Transitions(alphabet.tags().cloned().map(Transition::Shift).collect())
    }
}

impl Deref for Transitions {
    type Target = [Transition];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
