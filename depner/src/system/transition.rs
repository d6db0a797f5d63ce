use std::fmt;

use serde_derive::{Deserialize, Serialize};

use crate::sentence::Tag;
use crate::system::ParserState;

/// A parser transition.
///
/// The derived ordering puts arc transitions before shifts, which is the
/// order in which ties between equally-scored transitions are broken.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum Transition {
    /// Attach the second token on the stack to the stack top.
    LeftArc(String),

    /// Attach the stack top to the second token on the stack.
    RightArc(String),

    /// Shift the buffer front to the stack, assigning it a tag.
    Shift(Tag),
}

impl Transition {
    /// Apply the transition without checking whether it is possible in
    /// the state of a transition system.
    ///
    /// Returns `false` if the state is left unchanged because the
    /// transition could not be applied at all.
    pub fn apply(&self, state: &mut ParserState) -> bool {
        match self {
            Transition::LeftArc(relation) => state.left_arc(relation),
            Transition::RightArc(relation) => state.right_arc(relation),
            Transition::Shift(tag) => state.shift(tag.clone()),
        }
    }

    pub fn is_shift(&self) -> bool {
        match self {
            Transition::Shift(_) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Transition::LeftArc(relation) => write!(f, "L({})", relation),
            Transition::RightArc(relation) => write!(f, "R({})", relation),
            Transition::Shift(tag) => write!(f, "S({})", tag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Transition;
    use crate::Tag;

    #[test]
    fn display_transitions() {
        assert_eq!(Transition::LeftArc("dep".to_owned()).to_string(), "L(dep)");
        assert_eq!(Transition::RightArc("obj".to_owned()).to_string(), "R(obj)");
        assert_eq!(
            Transition::Shift("B-PER".parse::<Tag>().unwrap()).to_string(),
            "S(B-PER)"
        );
    }

    #[test]
    fn arcs_sort_before_shifts() {
        let mut transitions = vec![
            Transition::Shift(Tag::outside()),
            Transition::RightArc("dep".to_owned()),
            Transition::LeftArc("dep".to_owned()),
        ];
        transitions.sort();

        assert_eq!(
            transitions,
            vec![
                Transition::LeftArc("dep".to_owned()),
                Transition::RightArc("dep".to_owned()),
                Transition::Shift(Tag::outside()),
            ]
        );
    }
}
