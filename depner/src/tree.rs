use std::fmt;

/// The relation that is used for arcs in unlabeled trees.
pub const DEFAULT_RELATION: &str = "dep";

/// A dependency tree.
///
/// The tree stores the head and relation of each token. Index 0 is the
/// artificial root, which never has a head. The tree is not required to
/// be well-formed: heads can be missing and cycles are not rejected.
/// Well-formedness can be checked on demand with `is_tree`,
/// `is_single_root`, and `is_projective`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DependencyTree {
    heads: Vec<Option<usize>>,
    relations: Vec<Option<String>>,
}

impl DependencyTree {
    /// Construct a tree for `len` tokens (including the root) without
    /// any arcs.
    pub fn new(len: usize) -> Self {
        DependencyTree {
            heads: vec![None; len],
            relations: vec![None; len],
        }
    }

    /// Construct a tree from the heads of the words in a sentence.
    ///
    /// Arcs get the default relation.
    pub fn from_heads<I>(heads: I) -> Self
    where
        I: IntoIterator<Item = Option<usize>>,
    {
        let mut tree_heads = vec![None];
        tree_heads.extend(heads);
        let relations = tree_heads
            .iter()
            .map(|head| head.map(|_| DEFAULT_RELATION.to_owned()))
            .collect();

        DependencyTree {
            heads: tree_heads,
            relations,
        }
    }

    /// The number of tokens, including the root.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.heads.len()
    }

    pub fn head(&self, dependent: usize) -> Option<usize> {
        self.heads.get(dependent).cloned().and_then(|head| head)
    }

    pub fn relation(&self, dependent: usize) -> Option<&str> {
        self.relations
            .get(dependent)
            .and_then(|rel| rel.as_ref().map(String::as_str))
    }

    /// Attach `dependent` to `head`, replacing an existing attachment.
    pub fn set_head(&mut self, dependent: usize, head: usize, relation: impl Into<String>) {
        assert_ne!(dependent, 0, "The root cannot be attached");
        self.heads[dependent] = Some(head);
        self.relations[dependent] = Some(relation.into());
    }

    /// Replace the relations of all arcs by the default relation.
    pub fn strip_relations(&mut self) {
        for (head, relation) in self.heads.iter().zip(self.relations.iter_mut()) {
            *relation = head.map(|_| DEFAULT_RELATION.to_owned());
        }
    }

    /// Get the dependents of `head` in sentence order.
    pub fn dependents<'a>(&'a self, head: usize) -> impl Iterator<Item = usize> + 'a {
        self.heads
            .iter()
            .enumerate()
            .filter(move |(_, h)| **h == Some(head))
            .map(|(dependent, _)| dependent)
    }

    /// Returns `true` if this is a tree rooted in token 0.
    ///
    /// Every word must have a head within the sentence and following heads
    /// from any word must end in the root.
    pub fn is_tree(&self) -> bool {
        let len = self.heads.len();

        let heads = match self.heads[1..].iter().cloned().collect::<Option<Vec<_>>>() {
            Some(heads) => heads,
            None => return false,
        };

        if heads.iter().any(|&head| head >= len) {
            return false;
        }

        // visited[k] is the word from which k was first reached.
        let mut visited = vec![None; len];
        for start in 1..len {
            let mut k = start;
            while k != 0 {
                match visited[k] {
                    Some(from) if from == start => return false,
                    Some(_) => break,
                    None => (),
                }

                visited[k] = Some(start);
                k = heads[k - 1];
            }
        }

        true
    }

    /// Returns `true` if exactly one word is attached to the root.
    pub fn is_single_root(&self) -> bool {
        self.dependents(0).count() == 1
    }

    /// Returns `true` if no two arcs cross.
    ///
    /// Arcs are compared pairwise as intervals over the token positions,
    /// the root is the leftmost position. Missing heads are ignored.
    pub fn is_projective(&self) -> bool {
        let arcs: Vec<_> = self
            .heads
            .iter()
            .enumerate()
            .filter_map(|(dependent, head)| {
                head.map(|head| (dependent.min(head), dependent.max(head)))
            })
            .collect();

        for (i, &(start1, end1)) in arcs.iter().enumerate() {
            for &(start2, end2) in &arcs[i + 1..] {
                let crossing = (start1 < start2 && start2 < end1 && end1 < end2)
                    || (start2 < start1 && start1 < end2 && end2 < end1);
                if crossing {
                    return false;
                }
            }
        }

        true
    }
}

/// Well-formedness statistics over a set of trees.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TreeStats {
    pub trees: usize,

    /// Trees with missing heads, heads out of range, or cycles.
    pub illegal: usize,

    /// Legal trees with more than one word attached to the root.
    pub multiple_roots: usize,

    /// Legal trees with crossing arcs.
    pub non_projective: usize,
}

impl TreeStats {
    pub fn add(&mut self, tree: &DependencyTree) {
        self.trees += 1;

        if !tree.is_tree() {
            self.illegal += 1;
            return;
        }

        if !tree.is_single_root() {
            self.multiple_roots += 1;
        }

        if !tree.is_projective() {
            self.non_projective += 1;
        }
    }
}

impl<'a> Extend<&'a DependencyTree> for TreeStats {
    fn extend<I>(&mut self, trees: I)
    where
        I: IntoIterator<Item = &'a DependencyTree>,
    {
        for tree in trees {
            self.add(tree);
        }
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}

impl fmt::Display for TreeStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "#Trees: {}", self.trees)?;
        writeln!(
            f,
            "{} tree(s) are illegal ({:.2}%).",
            self.illegal,
            percentage(self.illegal, self.trees)
        )?;
        writeln!(
            f,
            "{} tree(s) are legal but have multiple roots ({:.2}%).",
            self.multiple_roots,
            percentage(self.multiple_roots, self.trees)
        )?;
        write!(
            f,
            "{} tree(s) are legal but not projective ({:.2}%).",
            self.non_projective,
            percentage(self.non_projective, self.trees)
        )
    }
}
