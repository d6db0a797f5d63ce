use crate::analysis::Analysis;
use crate::guide::Guide;
use crate::system::{ParserState, Transition, TransitionSystem};

/// A guide that follows the static oracle of a transition system towards
/// a gold-standard analysis.
pub struct Oracle<'a, S> {
    system: &'a S,
    gold: &'a Analysis,
}

impl<'a, S> Oracle<'a, S>
where
    S: TransitionSystem,
{
    pub fn new(system: &'a S, gold: &'a Analysis) -> Self {
        Oracle { system, gold }
    }
}

impl<'a, S> Guide for Oracle<'a, S>
where
    S: TransitionSystem,
{
    fn best_transition(&self, state: &ParserState) -> Option<Transition> {
        self.system
            .oracle(state, self.gold)
            .filter(|transition| self.system.is_possible(transition, state))
    }
}
