use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::sentence::{Labels, TagPrefix};
use crate::tree::DependencyTree;

/// A span of tokens with the heads that attach it to the rest of the
/// sentence.
///
/// Tokens outside entities form unit spans without an entity type. Spans
/// are equal when they cover the same tokens and have the same entity type,
/// the heads are not compared.
#[derive(Clone, Debug)]
pub struct Span {
    start: usize,
    end: usize,
    entity: Option<String>,
    heads: BTreeSet<usize>,
}

impl Span {
    /// The first token of the span.
    pub fn start(&self) -> usize {
        self.start
    }

    /// The last token of the span (inclusive).
    pub fn end(&self) -> usize {
        self.end
    }

    /// The entity type, `None` for unit spans outside entities.
    pub fn entity(&self) -> Option<&str> {
        self.entity.as_ref().map(String::as_str)
    }

    /// The heads of the span's tokens that are outside the span.
    pub fn heads(&self) -> &BTreeSet<usize> {
        &self.heads
    }

    pub fn is_unit(&self) -> bool {
        self.start == self.end
    }
}

impl PartialEq for Span {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end && self.entity == other.entity
    }
}

impl Eq for Span {}

impl Hash for Span {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.start.hash(state);
        self.end.hash(state);
        self.entity.hash(state);
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{},{},{}]",
            self.start,
            self.end,
            self.entity().unwrap_or("O")
        )
    }
}

fn entity_span(start: usize, end: usize, entity: String, tree: &DependencyTree) -> Span {
    let heads = (start..=end)
        .filter_map(|token| tree.head(token))
        .filter(|&head| head < start || head > end)
        .collect();

    Span {
        start,
        end,
        entity: Some(entity),
        heads,
    }
}

/// Extract the spans of a labeled sentence.
///
/// Spans are opened by `B` and `S` and continued by `I` and `E` of the same
/// entity type. An `I` or `E` that does not continue a span opens a new
/// span. `E` and `S` close the span they end. Every token tagged `O` (or without tag) forms a unit span.
pub fn to_spans(labels: &Labels, tree: &DependencyTree) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut open: Option<(usize, String)> = None;

    for idx in 1..labels.len() {
        let tag = labels.get(idx);
        let entity = tag.and_then(|tag| tag.entity_type());

        let continues = match (tag.map(|tag| tag.prefix()), &open, entity) {
            (Some(TagPrefix::Inside), Some((_, open_entity)), Some(entity))
            | (Some(TagPrefix::End), Some((_, open_entity)), Some(entity)) => {
                open_entity == entity
            }
            _ => false,
        };

        // E and S end the span at this token.
        let closes = match tag.map(|tag| tag.prefix()) {
            Some(TagPrefix::End) | Some(TagPrefix::Single) => true,
            _ => false,
        };

        if continues {
            if closes {
                if let Some((start, entity)) = open.take() {
                    spans.push(entity_span(start, idx, entity, tree));
                }
            }

            continue;
        }

        if let Some((start, entity)) = open.take() {
            spans.push(entity_span(start, idx - 1, entity, tree));
        }

        match entity {
            Some(entity) if closes => spans.push(entity_span(idx, idx, entity.to_owned(), tree)),
            Some(entity) => open = Some((idx, entity.to_owned())),
            None => spans.push(Span {
                start: idx,
                end: idx,
                entity: None,
                heads: tree.head(idx).into_iter().collect(),
            }),
        }
    }

    if let Some((start, entity)) = open {
        spans.push(entity_span(start, labels.len() - 1, entity, tree));
    }

    spans
}
