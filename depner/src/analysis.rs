use std::collections::BTreeSet;

use serde_derive::{Deserialize, Serialize};

use crate::sentence::{Labels, Tag};
use crate::tree::{DependencyTree, DEFAULT_RELATION};

/// The analysis of a sentence: named entity tags and a dependency tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Analysis {
    labels: Labels,
    tree: DependencyTree,
}

impl Analysis {
    pub fn new(labels: Labels, tree: DependencyTree) -> Self {
        assert_eq!(
            labels.len(),
            tree.len(),
            "Labels and tree cover a different number of tokens"
        );

        Analysis { labels, tree }
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn tree(&self) -> &DependencyTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DependencyTree {
        &mut self.tree
    }

    pub fn into_parts(self) -> (Labels, DependencyTree) {
        (self.labels, self.tree)
    }
}

/// The tags and dependency relations that a transition system can
/// predict.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Alphabet {
    tags: BTreeSet<Tag>,
    relations: BTreeSet<String>,
}

impl Alphabet {
    /// Collect the alphabet from gold-standard analyses.
    ///
    /// The outside tag is always part of the alphabet. If no arc carries a
    /// relation, the default relation is used.
    pub fn from_analyses<'a, I>(analyses: I) -> Self
    where
        I: IntoIterator<Item = &'a Analysis>,
    {
        let mut tags = BTreeSet::new();
        tags.insert(Tag::outside());
        let mut relations = BTreeSet::new();

        for analysis in analyses {
            for idx in 1..analysis.labels.len() {
                if let Some(tag) = analysis.labels.get(idx) {
                    tags.insert(tag.clone());
                }

                if let Some(relation) = analysis.tree.relation(idx) {
                    relations.insert(relation.to_owned());
                }
            }
        }

        if relations.is_empty() {
            relations.insert(DEFAULT_RELATION.to_owned());
        }

        Alphabet { tags, relations }
    }

    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    pub fn relations(&self) -> impl Iterator<Item = &str> {
        self.relations.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::{Alphabet, Analysis};
    use crate::{DependencyTree, Labels, Tag};

    #[test]
    fn alphabet_from_analyses() {
        let mut tree = DependencyTree::new(3);
        tree.set_head(1, 2, "nsubj");
        tree.set_head(2, 0, "root");
        let labels = Labels::new(vec!["S-PER".parse().unwrap(), Tag::outside()]);
        let analysis = Analysis::new(labels, tree);

        let alphabet = Alphabet::from_analyses(&[analysis]);
        assert_eq!(
            alphabet.tags().map(ToString::to_string).collect::<Vec<_>>(),
            vec!["O", "S-PER"]
        );
        assert_eq!(
            alphabet.relations().collect::<Vec<_>>(),
            vec!["nsubj", "root"]
        );
    }

    #[test]
    fn unlabeled_alphabet_uses_default_relation() {
        let analysis = Analysis::new(Labels::unassigned(2), DependencyTree::new(2));
        let alphabet = Alphabet::from_analyses(&[analysis]);
        assert_eq!(alphabet.tags().collect::<Vec<_>>(), vec![&Tag::outside()]);
        assert_eq!(alphabet.relations().collect::<Vec<_>>(), vec!["dep"]);
    }
}
