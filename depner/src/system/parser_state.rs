use std::collections::VecDeque;
use std::fmt;

use itertools::Itertools;

use crate::analysis::Analysis;
use crate::sentence::{Labels, Sentence, Tag};
use crate::tree::DependencyTree;

/// Position of a token in the parser state.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Position {
    /// The `k`-th token from the top of the stack.
    Stack(usize),

    /// The `k`-th token from the front of the buffer.
    Buffer(usize),
}

/// The state (configuration) of the parser.
///
/// Every token of the sentence is either on the stack, in the buffer, or
/// reduced (attached to its head and removed from the stack).
#[derive(Clone, Debug)]
pub struct ParserState<'a> {
    sentence: &'a Sentence,
    stack: Vec<usize>,
    buffer: VecDeque<usize>,
    tree: DependencyTree,
    labels: Labels,
}

impl<'a> ParserState<'a> {
    /// Construct the initial state for a sentence: the root on the stack
    /// and all words in the buffer.
    pub fn new(sentence: &'a Sentence) -> Self {
        ParserState {
            sentence,
            stack: vec![0],
            buffer: (1..sentence.len()).collect(),
            tree: DependencyTree::new(sentence.len()),
            labels: Labels::unassigned(sentence.len()),
        }
    }

    pub fn sentence(&self) -> &'a Sentence {
        self.sentence
    }

    /// The stack, the top of the stack is the last element.
    pub fn stack(&self) -> &[usize] {
        &self.stack
    }

    pub fn buffer(&self) -> &VecDeque<usize> {
        &self.buffer
    }

    pub fn tree(&self) -> &DependencyTree {
        &self.tree
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// The number of reduced tokens.
    pub fn reduced(&self) -> usize {
        self.sentence.len() - self.stack.len() - self.buffer.len()
    }

    /// The `k`-th token from the top of the stack.
    pub fn stack_top(&self, k: usize) -> Option<usize> {
        self.stack
            .len()
            .checked_sub(k + 1)
            .map(|idx| self.stack[idx])
    }

    /// The `k`-th token from the front of the buffer.
    pub fn buffer_front(&self, k: usize) -> Option<usize> {
        self.buffer.get(k).cloned()
    }

    pub fn token(&self, position: Position) -> Option<usize> {
        match position {
            Position::Stack(k) => self.stack_top(k),
            Position::Buffer(k) => self.buffer_front(k),
        }
    }

    pub fn form(&self, position: Position) -> Option<&'a str> {
        let sentence = self.sentence;
        self.token(position).and_then(|token| sentence.form(token))
    }

    pub fn pos(&self, position: Position) -> Option<&'a str> {
        let sentence = self.sentence;
        self.token(position).and_then(|token| sentence.pos(token))
    }

    pub fn label(&self, position: Position) -> Option<&Tag> {
        self.token(position)
            .and_then(|token| self.labels.get(token))
    }

    /// The tag of the token preceding the front of the buffer.
    ///
    /// This is the tag that the tag of the next shifted token has to
    /// continue.
    pub fn previous_label(&self) -> Option<&Tag> {
        self.buffer_front(0)
            .and_then(|front| self.labels.get(front - 1))
    }

    /// Returns `true` if the front of the buffer is the last token of the
    /// sentence.
    pub fn at_last_token(&self) -> bool {
        self.buffer.len() == 1
    }

    /// Move the front of the buffer to the stack and assign it `tag`.
    ///
    /// Returns `false` without changing the state if the buffer is empty.
    pub fn shift(&mut self, tag: Tag) -> bool {
        match self.buffer.pop_front() {
            Some(token) => {
                self.labels.set(token, tag);
                self.stack.push(token);
                true
            }
            None => false,
        }
    }

    /// Attach the second token on the stack to the stack top and remove it
    /// from the stack.
    ///
    /// The root cannot become a dependent.
    pub fn left_arc(&mut self, relation: &str) -> bool {
        let len = self.stack.len();
        if len < 2 || self.stack[len - 2] == 0 {
            return false;
        }

        let head = self.stack[len - 1];
        let dependent = self.stack.remove(len - 2);
        self.tree.set_head(dependent, head, relation);

        true
    }

    /// Attach the stack top to the second token on the stack and remove it
    /// from the stack.
    pub fn right_arc(&mut self, relation: &str) -> bool {
        if self.stack.len() < 2 {
            return false;
        }

        let len = self.stack.len();
        let head = self.stack[len - 2];
        let dependent = self.stack[len - 1];
        self.tree.set_head(dependent, head, relation);
        self.stack.pop();

        true
    }

    /// The `cnt`-th leftmost dependent of `token` that is left of it.
    pub fn left_child(&self, token: usize, cnt: usize) -> Option<usize> {
        (1..token.min(self.tree.len()))
            .filter(|&dep| self.tree.head(dep) == Some(token))
            .nth(cnt.checked_sub(1)?)
    }

    /// The `cnt`-th rightmost dependent of `token` that is right of it.
    pub fn right_child(&self, token: usize, cnt: usize) -> Option<usize> {
        (token + 1..self.tree.len())
            .rev()
            .filter(|&dep| self.tree.head(dep) == Some(token))
            .nth(cnt.checked_sub(1)?)
    }

    /// The number of dependents left of `token`.
    pub fn left_valency(&self, token: usize) -> usize {
        (1..token.min(self.tree.len()))
            .filter(|&dep| self.tree.head(dep) == Some(token))
            .count()
    }

    /// The number of dependents right of `token`.
    pub fn right_valency(&self, token: usize) -> usize {
        (token + 1..self.tree.len())
            .filter(|&dep| self.tree.head(dep) == Some(token))
            .count()
    }

    /// Returns `true` if `token` has a dependent in `gold` that is not yet
    /// attached to it.
    pub fn has_other_child(&self, token: usize, gold: &DependencyTree) -> bool {
        (1..self.tree.len())
            .any(|dep| gold.head(dep) == Some(token) && self.tree.head(dep) != Some(token))
    }

    /// Consume the state, returning the (partial) analysis.
    pub fn into_analysis(self) -> Analysis {
        Analysis::new(self.labels, self.tree)
    }
}

impl<'a> fmt::Display for ParserState<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let labels = self.labels.iter().map(|tag| match tag {
            Some(tag) => tag.to_string(),
            None => "_".to_owned(),
        });

        write!(
            f,
            "[S] {} [B] {} [NE] {}",
            self.stack.iter().join(","),
            self.buffer.iter().join(","),
            labels.format(",")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{ParserState, Position};
    use crate::test_helpers::john_lives_here;
    use crate::Tag;

    #[test]
    fn initial_state() {
        let (sentence, _) = john_lives_here();
        let state = ParserState::new(&sentence);

        assert_eq!(state.stack(), &[0]);
        assert_eq!(state.buffer().iter().cloned().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(state.reduced(), 0);
        assert_eq!(state.label(Position::Stack(0)), Some(&Tag::outside()));
        assert_eq!(state.form(Position::Buffer(0)), Some("John"));
        assert_eq!(state.pos(Position::Buffer(2)), Some("RB"));
        assert_eq!(state.form(Position::Buffer(3)), None);
        assert_eq!(state.token(Position::Stack(1)), None);
        assert_eq!(state.to_string(), "[S] 0 [B] 1,2,3 [NE] O,_,_,_");
    }

    #[test]
    fn transitions_change_state() {
        let (sentence, _) = john_lives_here();
        let mut state = ParserState::new(&sentence);

        assert!(!state.left_arc("dep"));
        assert!(state.shift("B-PER".parse().unwrap()));
        assert!(state.shift(Tag::outside()));
        assert_eq!(state.previous_label(), Some(&Tag::outside()));
        assert!(state.at_last_token());
        assert!(state.left_arc("nsubj"));
        assert_eq!(state.stack(), &[0, 2]);
        assert_eq!(state.tree().head(1), Some(2));
        assert_eq!(state.tree().relation(1), Some("nsubj"));
        assert_eq!(state.reduced(), 1);

        assert!(state.shift(Tag::outside()));
        assert!(state.right_arc("advmod"));
        assert!(state.right_arc("root"));
        assert_eq!(state.stack(), &[0]);
        assert!(!state.right_arc("root"));
        assert!(!state.shift(Tag::outside()));
        assert_eq!(state.reduced(), 3);
        assert_eq!(state.to_string(), "[S] 0 [B]  [NE] O,B-PER,O,O");

        assert_eq!(state.left_child(2, 1), Some(1));
        assert_eq!(state.left_child(2, 2), None);
        assert_eq!(state.right_child(2, 1), Some(3));
        assert_eq!(state.right_child(0, 1), Some(2));
        assert_eq!(state.left_valency(2), 1);
        assert_eq!(state.right_valency(2), 1);
        assert_eq!(state.left_child(7, 1), None);
    }

    #[test]
    fn other_children() {
        let (sentence, gold) = john_lives_here();
        let mut state = ParserState::new(&sentence);
        assert!(state.has_other_child(2, gold.tree()));
        assert!(!state.has_other_child(1, gold.tree()));

        state.shift("B-PER".parse().unwrap());
        state.shift(Tag::outside());
        state.left_arc("dep");
        state.shift(Tag::outside());
        state.right_arc("dep");
        assert!(!state.has_other_child(2, gold.tree()));
        assert!(state.has_other_child(0, gold.tree()));
    }
}
