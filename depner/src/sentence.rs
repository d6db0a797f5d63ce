use std::fmt;
use std::ops::Index;
use std::slice;
use std::str::FromStr;

use failure::Fail;
use serde_derive::{Deserialize, Serialize};

/// Word form of the artificial root token.
pub const ROOT_WORD: &str = "<root>";

/// Part-of-speech tag of the artificial root token.
pub const ROOT_POS: &str = "<root>";

/// A token: a word form with its part-of-speech tag.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Token {
    form: String,
    pos: String,
}

impl Token {
    pub fn new(form: impl Into<String>, pos: impl Into<String>) -> Self {
        Token {
            form: form.into(),
            pos: pos.into(),
        }
    }

    pub fn form(&self) -> &str {
        &self.form
    }

    pub fn pos(&self) -> &str {
        &self.pos
    }
}

/// A sentence.
///
/// The token at index 0 is the artificial root, the words of the sentence
/// are at indices `1..len()`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Sentence {
    tokens: Vec<Token>,
}

impl Sentence {
    /// Construct a sentence from its words, prepending the root token.
    pub fn new<I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = Token>,
    {
        let mut all = vec![Token::new(ROOT_WORD, ROOT_POS)];
        all.extend(tokens);
        Sentence { tokens: all }
    }

    /// Get the form of the token at `idx`.
    pub fn form(&self, idx: usize) -> Option<&str> {
        self.tokens.get(idx).map(Token::form)
    }

    /// Get the part-of-speech tag of the token at `idx`.
    pub fn pos(&self, idx: usize) -> Option<&str> {
        self.tokens.get(idx).map(Token::pos)
    }

    /// The number of tokens, including the root.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }
}

impl Index<usize> for Sentence {
    type Output = Token;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.tokens[idx]
    }
}

/// Errors that occur while reading named entity tags.
#[derive(Clone, Debug, Eq, Fail, PartialEq)]
pub enum TagError {
    #[fail(display = "unknown tag prefix in: {}", _0)]
    UnknownPrefix(String),

    #[fail(display = "tag without entity type: {}", _0)]
    MissingEntity(String),
}

/// Position of a token within a (possibly unit) span.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum TagPrefix {
    Outside,
    Begin,
    Inside,
    End,
    Single,
}

impl TagPrefix {
    fn as_char(self) -> char {
        match self {
            TagPrefix::Outside => 'O',
            TagPrefix::Begin => 'B',
            TagPrefix::Inside => 'I',
            TagPrefix::End => 'E',
            TagPrefix::Single => 'S',
        }
    }
}

/// A named entity tag such as `O` or `B-PER`.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Tag {
    prefix: TagPrefix,
    entity: Option<String>,
}

impl Tag {
    /// The tag of tokens outside any entity.
    pub fn outside() -> Self {
        Tag {
            prefix: TagPrefix::Outside,
            entity: None,
        }
    }

    /// Construct a tag of an entity.
    ///
    /// Use `Tag::outside` for tokens outside entities.
    pub fn entity(prefix: TagPrefix, entity: impl Into<String>) -> Self {
        assert_ne!(
            prefix,
            TagPrefix::Outside,
            "Entity tags cannot have the outside prefix"
        );

        Tag {
            prefix,
            entity: Some(entity.into()),
        }
    }

    pub fn prefix(&self) -> TagPrefix {
        self.prefix
    }

    /// The entity type, `None` for outside tags.
    pub fn entity_type(&self) -> Option<&str> {
        self.entity.as_ref().map(String::as_str)
    }

    pub fn is_outside(&self) -> bool {
        self.prefix == TagPrefix::Outside
    }

    /// Returns `true` if a span continues after a token with this tag.
    pub fn is_open(&self) -> bool {
        match self.prefix {
            TagPrefix::Begin | TagPrefix::Inside => true,
            _ => false,
        }
    }

    /// Rewrite IOBES prefixes to IOB prefixes (`S` to `B`, `E` to `I`).
    pub fn to_iob(&self) -> Tag {
        let prefix = match self.prefix {
            TagPrefix::Single => TagPrefix::Begin,
            TagPrefix::End => TagPrefix::Inside,
            prefix => prefix,
        };

        Tag {
            prefix,
            entity: self.entity.clone(),
        }
    }

    fn with_prefix(&self, prefix: TagPrefix) -> Tag {
        Tag {
            prefix,
            entity: self.entity.clone(),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.entity {
            Some(ref entity) => write!(f, "{}-{}", self.prefix.as_char(), entity),
            None => write!(f, "{}", self.prefix.as_char()),
        }
    }
}

impl FromStr for Tag {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "O" {
            return Ok(Tag::outside());
        }

        let mut chars = s.chars();
        let prefix = match chars.next() {
            Some('B') => TagPrefix::Begin,
            Some('I') => TagPrefix::Inside,
            Some('E') => TagPrefix::End,
            Some('S') => TagPrefix::Single,
            _ => return Err(TagError::UnknownPrefix(s.to_owned())),
        };

        if chars.next() != Some('-') || chars.as_str().is_empty() {
            return Err(TagError::MissingEntity(s.to_owned()));
        }

        Ok(Tag::entity(prefix, chars.as_str()))
    }
}

/// Span encoding schemes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum TagScheme {
    /// Begin, inside, outside.
    Iob,

    /// Begin, inside, end, single, outside.
    Iobes,
}

impl TagScheme {
    /// Check whether `tag` may follow `previous`.
    ///
    /// `last` indicates that `tag` would be assigned to the last token of
    /// the sentence.
    pub fn allows(self, previous: &Tag, tag: &Tag, last: bool) -> bool {
        let continues = previous.is_open() && previous.entity == tag.entity;

        match self {
            TagScheme::Iob => match tag.prefix {
                TagPrefix::Inside => continues,
                TagPrefix::Outside | TagPrefix::Begin => true,
                TagPrefix::End | TagPrefix::Single => false,
            },
            TagScheme::Iobes => {
                let placed = match tag.prefix {
                    TagPrefix::Inside | TagPrefix::End => continues,
                    TagPrefix::Outside | TagPrefix::Begin | TagPrefix::Single => {
                        !previous.is_open()
                    }
                };

                placed && !(last && tag.is_open())
            }
        }
    }
}

/// Named entity tags of a sentence.
///
/// Index 0 holds the tag of the root, which is always `O`. Tags of tokens
/// that were not labeled yet are `None`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Labels(Vec<Option<Tag>>);

impl Labels {
    /// Construct labels from the tags of the words of a sentence.
    pub fn new<I>(tags: I) -> Self
    where
        I: IntoIterator<Item = Tag>,
    {
        let mut labels = vec![Some(Tag::outside())];
        labels.extend(tags.into_iter().map(Some));
        Labels(labels)
    }

    /// Construct labels for a sentence of `len` tokens (including the
    /// root), where only the root is labeled.
    pub fn unassigned(len: usize) -> Self {
        let mut labels = vec![None; len];
        if let Some(root) = labels.first_mut() {
            *root = Some(Tag::outside());
        }
        Labels(labels)
    }

    pub fn get(&self, idx: usize) -> Option<&Tag> {
        self.0.get(idx).and_then(Option::as_ref)
    }

    pub fn set(&mut self, idx: usize, tag: Tag) {
        self.0[idx] = Some(tag);
    }

    pub fn iter(&self) -> slice::Iter<Option<Tag>> {
        self.0.iter()
    }

    /// The number of tokens, including the root.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Re-encode IOB tags as IOBES tags.
    ///
    /// A `B` that is not followed by `I` becomes `S`, an `I` that is not
    /// followed by `I` becomes `E`. Tags that are already IOBES are kept.
    pub fn encode_iobes(&mut self) {
        for idx in 1..self.0.len() {
            let continued = self
                .get(idx + 1)
                .map(|tag| tag.prefix == TagPrefix::Inside || tag.prefix == TagPrefix::End)
                .unwrap_or(false);
            if continued {
                continue;
            }

            let rewritten = match self.get(idx) {
                Some(tag) if tag.prefix == TagPrefix::Begin => tag.with_prefix(TagPrefix::Single),
                Some(tag) if tag.prefix == TagPrefix::Inside => tag.with_prefix(TagPrefix::End),
                _ => continue,
            };

            self.0[idx] = Some(rewritten);
        }
    }

    /// Rewrite IOBES tags as IOB tags.
    pub fn to_iob(&self) -> Labels {
        Labels(
            self.0
                .iter()
                .map(|tag| tag.as_ref().map(Tag::to_iob))
                .collect(),
        )
    }
}
