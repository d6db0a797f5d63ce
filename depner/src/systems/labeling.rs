use serde_derive::{Deserialize, Serialize};

use crate::analysis::{Alphabet, Analysis};
use crate::sentence::TagScheme;
use crate::system::{
    can_shift, labels_agree, OracleError, ParserState, Transition, TransitionSystem, Transitions,
};

/// Transition system that only assigns named entity tags.
///
/// Every token is shifted with its tag, no dependency arcs are created.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LabelingSystem {
    scheme: TagScheme,
    transitions: Transitions,
}

impl LabelingSystem {
    pub fn new(alphabet: &Alphabet, scheme: TagScheme) -> Self {
        LabelingSystem {
            scheme,
            transitions: Transitions::shifts_only(alphabet),
        }
    }
}

impl TransitionSystem for LabelingSystem {
    fn transitions(&self) -> &Transitions {
        &self.transitions
    }

    fn tag_scheme(&self) -> TagScheme {
        self.scheme
    }

    fn is_terminal(&self, state: &ParserState) -> bool {
        state.buffer().is_empty()
    }

    fn is_possible(&self, transition: &Transition, state: &ParserState) -> bool {
        match transition {
            Transition::Shift(tag) => can_shift(self.scheme, tag, state),
            _ => false,
        }
    }

    fn oracle(&self, state: &ParserState, gold: &Analysis) -> Option<Transition> {
        state
            .buffer_front(0)
            .and_then(|front| gold.labels().get(front))
            .cloned()
            .map(Transition::Shift)
    }

    fn can_reach(&self, state: &ParserState, gold: &Analysis) -> bool {
        labels_agree(state, gold)
    }

    fn check_gold(&self, _gold: &Analysis) -> Result<(), OracleError> {
        Ok(())
    }
}
