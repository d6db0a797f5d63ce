use serde_derive::{Deserialize, Serialize};

use crate::system::{ParserState, Position};

/// Value of a template that refers to a token that does not exist.
const NONE: &str = "<none>";

/// Instantiation of feature templates.
pub trait FeatureTemplates {
    /// Instantiate the templates in `state`, returning the context strings.
    ///
    /// The context strings do not depend on the transition that is scored.
    fn contexts(&self, state: &ParserState) -> Vec<String>;
}

/// The default set of feature templates.
///
/// Covers the forms and part-of-speech tags of the top of the stack and
/// the front of the buffer, the dependents of the two topmost stack
/// tokens, named entity tags that were assigned, and the orthography of the
/// buffer front.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct DefaultTemplates;

const WINDOW: [(&str, Position); 6] = [
    ("s0", Position::Stack(0)),
    ("s1", Position::Stack(1)),
    ("s2", Position::Stack(2)),
    ("b0", Position::Buffer(0)),
    ("b1", Position::Buffer(1)),
    ("b2", Position::Buffer(2)),
];

impl FeatureTemplates for DefaultTemplates {
    fn contexts(&self, state: &ParserState) -> Vec<String> {
        let mut contexts = vec!["bias".to_owned()];
        let sentence = state.sentence();

        let form = |position| state.form(position).unwrap_or(NONE);
        let pos = |position| state.pos(position).unwrap_or(NONE);
        let token_pos = |token: Option<usize>| {
            token
                .and_then(|token| sentence.pos(token))
                .unwrap_or(NONE)
        };

        for &(name, position) in &WINDOW {
            contexts.push(format!("{}w={}", name, form(position)));
            contexts.push(format!("{}t={}", name, pos(position)));
            contexts.push(format!("{}wt={}/{}", name, form(position), pos(position)));
        }

        let s0 = Position::Stack(0);
        let s1 = Position::Stack(1);
        let b0 = Position::Buffer(0);
        let b1 = Position::Buffer(1);

        for &(name, first, second) in &[("s0s1", s0, s1), ("s0b0", s0, b0), ("b0b1", b0, b1)] {
            contexts.push(format!("{}ww={}/{}", name, form(first), form(second)));
            contexts.push(format!("{}tt={}/{}", name, pos(first), pos(second)));
        }
        contexts.push(format!("s1s0b0ttt={}/{}/{}", pos(s1), pos(s0), pos(b0)));

        for &(name, position) in &[("s0", s0), ("s1", s1)] {
            let token = match state.token(position) {
                Some(token) => token,
                None => {
                    contexts.push(format!("{}deps={}", name, NONE));
                    continue;
                }
            };

            let lc1 = state.left_child(token, 1);
            let rc1 = state.right_child(token, 1);
            let lc2 = state.left_child(token, 2);
            let rc2 = state.right_child(token, 2);
            let lclc = lc1.and_then(|child| state.left_child(child, 1));
            let rcrc = rc1.and_then(|child| state.right_child(child, 1));

            contexts.push(format!("{}lc1t={}", name, token_pos(lc1)));
            contexts.push(format!("{}rc1t={}", name, token_pos(rc1)));
            contexts.push(format!("{}lc2t={}", name, token_pos(lc2)));
            contexts.push(format!("{}rc2t={}", name, token_pos(rc2)));
            contexts.push(format!("{}lclct={}", name, token_pos(lclc)));
            contexts.push(format!("{}rcrct={}", name, token_pos(rcrc)));
            contexts.push(format!(
                "{}val={}/{}",
                name,
                state.left_valency(token),
                state.right_valency(token)
            ));
        }

        let distance = match (state.token(s0), state.token(s1)) {
            (Some(s0), Some(s1)) => distance_bucket(s0 - s1),
            _ => NONE,
        };
        contexts.push(format!("s0s1d={}", distance));
        contexts.push(format!("s0s1dt={}/{}/{}", distance, pos(s0), pos(s1)));

        for &(name, position) in &WINDOW[..3] {
            let label = state.label(position).map(ToString::to_string);
            contexts.push(format!(
                "{}ne={}",
                name,
                label.as_ref().map(String::as_str).unwrap_or(NONE)
            ));
        }

        let previous = state.previous_label().map(ToString::to_string);
        let previous = previous.as_ref().map(String::as_str).unwrap_or(NONE);
        contexts.push(format!("pne={}", previous));
        contexts.push(format!("pneb0w={}/{}", previous, form(b0)));

        if let Some(word) = state.form(b0) {
            contexts.push(format!("b0lw={}", word.to_lowercase()));
            contexts.push(format!("b0shape={}", shape(word)));
            contexts.push(format!("b0pre={}", prefix(word, 3)));
            contexts.push(format!("b0suf={}", suffix(word, 3)));
        }

        contexts
    }
}

fn distance_bucket(distance: usize) -> &'static str {
    match distance {
        0 => "0",
        1 => "1",
        2 => "2",
        3 => "3",
        4 => "4",
        5..=9 => "5-9",
        _ => "10+",
    }
}

/// Summarize the orthography of a word, e.g. `McDonald's` becomes
/// `XxXx'x`.
fn shape(word: &str) -> String {
    let mut shape = String::new();
    let mut last = None;

    for c in word.chars() {
        let class = if c.is_uppercase() {
            'X'
        } else if c.is_lowercase() {
            'x'
        } else if c.is_numeric() {
            'd'
        } else {
            c
        };

        if last != Some(class) {
            shape.push(class);
            last = Some(class);
        }
    }

    shape
}

fn prefix(word: &str, len: usize) -> &str {
    match word.char_indices().nth(len) {
        Some((idx, _)) => &word[..idx],
        None => word,
    }
}

fn suffix(word: &str, len: usize) -> &str {
    let n_chars = word.chars().count();
    if n_chars <= len {
        return word;
    }

    match word.char_indices().nth(n_chars - len) {
        Some((idx, _)) => &word[idx..],
        None => word,
    }
}
