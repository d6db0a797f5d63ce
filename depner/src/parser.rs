use failure::Fail;
use log::trace;

use crate::analysis::Analysis;
use crate::guide::Guide;
use crate::sentence::Sentence;
use crate::system::{ParserState, Transition, TransitionSystem};

#[derive(Clone, Debug, Eq, Fail, PartialEq)]
pub enum ParseError {
    #[fail(display = "no possible transition in state: {}", _0)]
    NoPossibleTransition(String),
}

/// Parsers that produce an analysis of a sentence.
pub trait Parse {
    fn parse(&self, sentence: &Sentence) -> Result<Analysis, ParseError>;
}

/// Greedy parser.
///
/// The parser applies the transition proposed by the guide until the
/// transition system reaches a terminal state.
pub struct GreedyParser<'a, S, G> {
    system: &'a S,
    guide: &'a G,
}

impl<'a, S, G> GreedyParser<'a, S, G>
where
    S: TransitionSystem,
    G: Guide,
{
    pub fn new(system: &'a S, guide: &'a G) -> Self {
        GreedyParser { system, guide }
    }

    /// Parse from `state` until a terminal state is reached.
    pub fn parse_state(&self, state: &mut ParserState) -> Result<(), ParseError> {
        while !self.system.is_terminal(state) {
            let transition = self
                .next_transition(state)
                .ok_or_else(|| ParseError::NoPossibleTransition(state.to_string()))?;
            trace!("{} -> {}", state, transition);
            self.system.apply(&transition, state);
        }

        Ok(())
    }

    fn next_transition(&self, state: &ParserState) -> Option<Transition> {
        self.guide.best_transition(state)
    }
}

impl<'a, S, G> Parse for GreedyParser<'a, S, G>
where
    S: TransitionSystem,
    G: Guide,
{
    fn parse(&self, sentence: &Sentence) -> Result<Analysis, ParseError> {
        let mut state = self.system.initial_state(sentence);
        self.parse_state(&mut state)?;
        Ok(state.into_analysis())
    }
}
