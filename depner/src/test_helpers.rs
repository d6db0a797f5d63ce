use crate::{Analysis, DependencyTree, Labels, Sentence, Tag, Token};

/// Construct a sentence from (form, tag) pairs.
pub fn sentence(tokens: &[(&str, &str)]) -> Sentence {
    Sentence::new(tokens.iter().map(|&(form, pos)| Token::new(form, pos)))
}

/// Construct an analysis from the tags and heads of the words.
pub fn analysis(tags: &[&str], heads: &[usize]) -> Analysis {
    let labels = Labels::new(tags.iter().map(|tag| tag.parse::<Tag>().unwrap()));
    let tree = DependencyTree::from_heads(heads.iter().cloned().map(Some));
    Analysis::new(labels, tree)
}

/// "John lives here" with John tagged as a person.
pub fn john_lives_here() -> (Sentence, Analysis) {
    (
        sentence(&[("John", "NNP"), ("lives", "VBZ"), ("here", "RB")]),
        analysis(&["B-PER", "O", "O"], &[2, 0, 2]),
    )
}

/// A sentence of `len` words, all tagged `X`.
pub fn dummy_sentence(len: usize) -> Sentence {
    Sentence::new((0..len).map(|idx| Token::new(format!("w{}", idx + 1), "X")))
}

/// All projective single-root trees over `len` words, as heads of the
/// words.
pub fn projective_trees(len: usize) -> Vec<Vec<usize>> {
    let mut heads = vec![0; len];
    let mut trees = Vec::new();

    loop {
        let tree = DependencyTree::from_heads(heads.iter().cloned().map(Some));
        if tree.is_tree() && tree.is_single_root() && tree.is_projective() {
            trees.push(heads.clone());
        }

        // Advance to the next head assignment, counting in base len + 1.
        let mut idx = 0;
        loop {
            if idx == len {
                return trees;
            }

            heads[idx] += 1;
            if heads[idx] <= len {
                break;
            }

            heads[idx] = 0;
            idx += 1;
        }
    }
}
