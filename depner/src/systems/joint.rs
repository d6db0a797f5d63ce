use serde_derive::{Deserialize, Serialize};

use crate::analysis::{Alphabet, Analysis};
use crate::sentence::TagScheme;
use crate::system::{
    can_shift, labels_agree, OracleError, ParserState, Transition, TransitionSystem, Transitions,
};
use crate::tree::{DependencyTree, DEFAULT_RELATION};

/// Arc-standard system that assigns named entity tags on shift.
///
/// The system has the following transitions:
///
/// * `Shift(tag)`: move the buffer front to the stack and assign `tag`.
/// * `LeftArc(rel)`: attach the second token on the stack to the stack top.
/// * `RightArc(rel)`: attach the stack top to the second token on the
///   stack.
///
/// With `single_root`, the root receives exactly one dependent, attached by
/// the last transition.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct JointSystem {
    scheme: TagScheme,
    single_root: bool,
    transitions: Transitions,
}

impl JointSystem {
    pub fn new(alphabet: &Alphabet, scheme: TagScheme, single_root: bool) -> Self {
        JointSystem {
            scheme,
            single_root,
            transitions: Transitions::with_arcs(alphabet),
        }
    }

    pub fn single_root(&self) -> bool {
        self.single_root
    }
}

fn gold_relation(tree: &DependencyTree, dependent: usize) -> String {
    tree.relation(dependent)
        .unwrap_or(DEFAULT_RELATION)
        .to_owned()
}

impl TransitionSystem for JointSystem {
    fn transitions(&self) -> &Transitions {
        &self.transitions
    }

    fn tag_scheme(&self) -> TagScheme {
        self.scheme
    }

    fn is_terminal(&self, state: &ParserState) -> bool {
        state.buffer().is_empty() && state.stack().len() == 1
    }

    fn is_possible(&self, transition: &Transition, state: &ParserState) -> bool {
        let stack_len = state.stack().len();

        match transition {
            Transition::LeftArc(_) => stack_len > 2,
            Transition::RightArc(_) => {
                stack_len > 2
                    || (stack_len == 2 && (!self.single_root || state.buffer().is_empty()))
            }
            Transition::Shift(tag) => can_shift(self.scheme, tag, state),
        }
    }

    fn oracle(&self, state: &ParserState, gold: &Analysis) -> Option<Transition> {
        let gold_tree = gold.tree();

        if let (Some(w1), Some(w2)) = (state.stack_top(1), state.stack_top(0)) {
            if w1 > 0 && gold_tree.head(w1) == Some(w2) {
                return Some(Transition::LeftArc(gold_relation(gold_tree, w1)));
            }

            if gold_tree.head(w2) == Some(w1) && !state.has_other_child(w2, gold_tree) {
                return Some(Transition::RightArc(gold_relation(gold_tree, w2)));
            }
        }

        state
            .buffer_front(0)
            .and_then(|front| gold.labels().get(front))
            .cloned()
            .map(Transition::Shift)
    }

    fn can_reach(&self, state: &ParserState, gold: &Analysis) -> bool {
        if !labels_agree(state, gold) {
            return false;
        }

        let tree = state.tree();
        let gold_tree = gold.tree();
        let len = tree.len();

        for dep in 1..len {
            if let Some(head) = tree.head(dep) {
                if gold_tree.head(dep) != Some(head)
                    || tree.relation(dep) != Some(gold_relation(gold_tree, dep).as_str())
                {
                    return false;
                }
            }
        }

        let mut in_buffer = vec![false; len];
        for &token in state.buffer() {
            in_buffer[token] = true;
        }

        // dep_in_list[h]: h is the gold head of a token in one of the lists.
        let mut dep_in_list = vec![false; len];

        // Stack from the top down.
        let left: Vec<_> = state.stack().iter().rev().cloned().collect();
        for &token in &left {
            if let Some(head) = gold_tree.head(token) {
                dep_in_list[head] = true;
            }
        }

        // The stack top, followed by the buffer tokens that cannot be
        // completed within the buffer.
        let mut right = vec![left[0]];
        for &token in state.buffer() {
            let head = gold_tree.head(token);
            let attaches_outside = head.map(|head| !in_buffer[head]).unwrap_or(true);
            if attaches_outside || dep_in_list[token] {
                right.push(token);
                if let Some(head) = head {
                    dep_in_list[head] = true;
                }
            }
        }

        // table[i][j]: the head of the combination of left[..=i] and
        // right[..=j], if they can be combined.
        let mut table = vec![vec![None; right.len()]; left.len()];
        table[0][0] = Some(left[0]);
        for i in 0..left.len() {
            for j in 0..right.len() {
                let x = ok_or_continue!(table[i][j]);

                if let Some(&next) = right.get(j + 1) {
                    if gold_tree.head(next) == Some(x) {
                        table[i][j + 1] = Some(x);
                    }
                    if gold_tree.head(x) == Some(next) {
                        table[i][j + 1] = Some(next);
                    }
                }

                if let Some(&next) = left.get(i + 1) {
                    if gold_tree.head(next) == Some(x) {
                        table[i + 1][j] = Some(x);
                    }
                    if gold_tree.head(x) == Some(next) {
                        table[i + 1][j] = Some(next);
                    }
                }
            }
        }

        table[left.len() - 1][right.len() - 1].is_some()
    }

    fn check_gold(&self, gold: &Analysis) -> Result<(), OracleError> {
        let tree = gold.tree();

        if tree.len() < 2 {
            return Err(OracleError::EmptySentence);
        }

        if !tree.is_tree() {
            return Err(OracleError::NotATree);
        }

        if self.single_root && !tree.is_single_root() {
            return Err(OracleError::MultipleRoots);
        }

        if !tree.is_projective() {
            return Err(OracleError::NonProjective);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::JointSystem;
    use crate::system::{OracleError, ParserState, Transition, TransitionSystem};
    use crate::test_helpers::{
        analysis, dummy_sentence, john_lives_here, projective_trees, sentence,
    };
    use crate::{Alphabet, Analysis, DependencyTree, Labels, Tag, TagScheme};

    fn system_for(gold: &Analysis, scheme: TagScheme) -> JointSystem {
        JointSystem::new(&Alphabet::from_analyses(Some(gold)), scheme, true)
    }

    fn all_outside(len: usize) -> Labels {
        Labels::new((0..len).map(|_| Tag::outside()))
    }

    fn replay_oracle<'a>(
        system: &JointSystem,
        state: &mut ParserState<'a>,
        gold: &Analysis,
    ) -> usize {
        let mut steps = 0;
        while !system.is_terminal(state) {
            let transition = system.oracle(state, gold).unwrap();
            system.apply(&transition, state);
            steps += 1;
        }

        steps
    }

    fn check_configuration(state: &ParserState) {
        let len = state.sentence().len();

        let mut seen = HashSet::new();
        for &token in state.stack().iter().chain(state.buffer()) {
            assert!(seen.insert(token), "Duplicate token {} in {}", token, state);
        }

        let reduced: Vec<_> = (0..len)
            .filter(|token| !seen.contains(token))
            .collect();
        assert_eq!(reduced.len(), state.reduced());
        assert!(reduced.iter().all(|&token| state.tree().head(token).is_some()));
        assert!(seen.iter().all(|&token| token < len));
    }

    fn reachable(system: &JointSystem, state: &ParserState, gold: &Analysis) -> bool {
        if system.is_terminal(state) {
            return state.tree() == gold.tree() && state.labels() == gold.labels();
        }

        system.possible_transitions(state).into_iter().any(|t| {
            let mut next = state.clone();
            system.apply(t, &mut next);
            reachable(system, &next, gold)
        })
    }

    fn check_reachability(system: &JointSystem, state: &ParserState, gold: &Analysis) {
        check_configuration(state);

        assert_eq!(
            system.can_reach(state, gold),
            reachable(system, state, gold),
            "Reachability differs in {}",
            state
        );

        for t in system.possible_transitions(state) {
            let mut next = state.clone();
            system.apply(t, &mut next);
            check_reachability(system, &next, gold);
        }
    }

    #[test]
    fn oracle_reproduces_gold() {
        let (sentence, gold) = john_lives_here();
        let system = system_for(&gold, TagScheme::Iob);

        let mut state = system.initial_state(&sentence);
        let steps = replay_oracle(&system, &mut state, &gold);

        assert_eq!(steps, 6);
        assert_eq!(state.into_analysis(), gold);
    }

    #[test]
    fn oracle_reproduces_all_projective_trees() {
        assert_eq!(projective_trees(3).len(), 7);
        assert_eq!(projective_trees(4).len(), 30);

        for len in 1..=5 {
            let sentence = dummy_sentence(len);
            for heads in projective_trees(len) {
                let gold = Analysis::new(
                    all_outside(len),
                    DependencyTree::from_heads(heads.iter().cloned().map(Some)),
                );
                let system = system_for(&gold, TagScheme::Iobes);
                assert!(system.check_gold(&gold).is_ok());

                let mut state = system.initial_state(&sentence);
                let mut steps = 0;
                while !system.is_terminal(&state) {
                    check_configuration(&state);
                    let transition = system.oracle(&state, &gold).unwrap();
                    assert!(system.is_oracle(&state, &transition, &gold));
                    system.apply(&transition, &mut state);
                    steps += 1;
                }
                check_configuration(&state);

                // One shift and one attachment per word.
                assert_eq!(steps, 2 * len);
                assert_eq!(state.into_analysis(), gold);
            }
        }
    }

    #[test]
    fn labeled_oracle() {
        let sentence = sentence(&[
            ("Mary", "NNP"),
            ("Smith", "NNP"),
            ("visited", "VBD"),
            ("New", "NNP"),
            ("York", "NNP"),
        ]);

        let mut gold = analysis(&["B-PER", "E-PER", "O", "B-LOC", "E-LOC"], &[2, 3, 0, 5, 3]);
        let tree = gold.tree_mut();
        tree.set_head(1, 2, "compound");
        tree.set_head(2, 3, "nsubj");
        tree.set_head(3, 0, "root");
        tree.set_head(4, 5, "compound");
        tree.set_head(5, 3, "obj");

        let system = system_for(&gold, TagScheme::Iobes);
        assert_eq!(system.transitions().len(), 4 * 2 + 5);

        let mut state = system.initial_state(&sentence);
        assert_eq!(replay_oracle(&system, &mut state, &gold), 10);
        assert_eq!(state.into_analysis(), gold);
    }

    #[test]
    fn can_reach_agrees_with_search() {
        for len in 1..=4 {
            let sentence = dummy_sentence(len);
            for heads in projective_trees(len) {
                let gold = Analysis::new(
                    all_outside(len),
                    DependencyTree::from_heads(heads.iter().cloned().map(Some)),
                );
                let system = system_for(&gold, TagScheme::Iob);
                check_reachability(&system, &system.initial_state(&sentence), &gold);
            }
        }
    }

    #[test]
    fn wrong_labels_are_unreachable() {
        let (sentence, gold) = john_lives_here();
        let system = system_for(&gold, TagScheme::Iob);

        let state = system.initial_state(&sentence);
        assert!(system.can_reach(&state, &gold));
        assert!(system.is_oracle(&state, &Transition::Shift("B-PER".parse().unwrap()), &gold));
        assert!(!system.is_oracle(&state, &Transition::Shift(Tag::outside()), &gold));
        assert!(!system.is_oracle(&state, &Transition::RightArc("dep".to_owned()), &gold));
    }

    #[test]
    fn arc_legality() {
        let (sentence, gold) = john_lives_here();
        let single = system_for(&gold, TagScheme::Iob);
        let multi = JointSystem::new(&Alphabet::from_analyses(Some(&gold)), TagScheme::Iob, false);
        let left = Transition::LeftArc("dep".to_owned());
        let right = Transition::RightArc("dep".to_owned());

        let mut state = single.initial_state(&sentence);
        assert!(!single.is_possible(&left, &state));
        assert!(!single.is_possible(&right, &state));

        single.apply(&Transition::Shift("B-PER".parse().unwrap()), &mut state);
        assert!(!single.is_possible(&left, &state));
        assert!(!single.is_possible(&right, &state));
        assert!(multi.is_possible(&right, &state));

        single.apply(&Transition::Shift(Tag::outside()), &mut state);
        assert!(single.is_possible(&left, &state));
        assert!(single.is_possible(&right, &state));
    }

    #[test]
    fn shift_legality() {
        let sentence = dummy_sentence(2);
        let gold = analysis(&["B-PER", "E-PER"], &[2, 0]);
        let system = system_for(&gold, TagScheme::Iobes);

        let mut state = system.initial_state(&sentence);
        let possible: Vec<_> = system
            .possible_transitions(&state)
            .into_iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(possible, vec!["S(O)", "S(B-PER)"]);

        system.apply(&Transition::Shift("B-PER".parse().unwrap()), &mut state);
        let possible: Vec<_> = system
            .possible_transitions(&state)
            .into_iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(possible, vec!["S(E-PER)"]);
    }

    #[test]
    #[should_panic]
    fn applying_impossible_transition_panics() {
        let (sentence, gold) = john_lives_here();
        let system = system_for(&gold, TagScheme::Iob);
        let mut state = system.initial_state(&sentence);
        system.apply(&Transition::LeftArc("dep".to_owned()), &mut state);
    }

    #[test]
    fn gold_trees_are_checked() {
        let (_, gold) = john_lives_here();
        let system = system_for(&gold, TagScheme::Iob);

        let non_projective = analysis(&["O", "O", "O"], &[2, 0, 1]);
        assert_eq!(
            system.check_gold(&non_projective),
            Err(OracleError::NonProjective)
        );

        let multi_root = analysis(&["O", "O"], &[0, 0]);
        assert_eq!(
            system.check_gold(&multi_root),
            Err(OracleError::MultipleRoots)
        );

        let cyclic = analysis(&["O", "O"], &[2, 1]);
        assert_eq!(system.check_gold(&cyclic), Err(OracleError::NotATree));

        let empty = analysis(&[], &[]);
        assert_eq!(system.check_gold(&empty), Err(OracleError::EmptySentence));
    }

    #[test]
    fn multiple_roots_without_single_root() {
        let sentence = dummy_sentence(3);
        let gold = analysis(&["O", "O", "O"], &[0, 0, 2]);
        let system = JointSystem::new(&Alphabet::from_analyses(Some(&gold)), TagScheme::Iob, false);
        assert!(system.check_gold(&gold).is_ok());

        let mut state = system.initial_state(&sentence);
        assert_eq!(replay_oracle(&system, &mut state, &gold), 6);
        assert_eq!(state.into_analysis(), gold);
    }
}
