use crate::system::{ParserState, Transition};

/// A guide proposes the next transition for a parser state.
pub trait Guide {
    /// Return the best transition that is possible in `state`, `None` if
    /// no transition is possible.
    fn best_transition(&self, state: &ParserState) -> Option<Transition>;
}
