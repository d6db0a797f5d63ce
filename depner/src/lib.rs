//! Transition-based joint named entity recognition and dependency parsing.
//!
//! The parser assigns a named entity tag and a syntactic head to every
//! token of a sentence in a single left-to-right pass. Named entity tags
//! are assigned when a token is shifted onto the stack, heads are
//! assigned by arc transitions in the arc-standard style. Transitions are
//! scored by an averaged structured perceptron that is trained with early
//! updates.

#[cfg(test)]
#[macro_use]
extern crate approx;

use failure::Error;

pub type Result<T> = ::std::result::Result<T, Error>;

#[macro_use]
mod macros;

mod analysis;
pub use crate::analysis::{Alphabet, Analysis};

pub mod eval;

pub mod features;

mod guide;
pub use crate::guide::Guide;

pub mod models;

mod numberer;
pub use crate::numberer::Numberer;

pub mod parser;

mod sentence;
pub use crate::sentence::{
    Labels, Sentence, Tag, TagError, TagPrefix, TagScheme, Token, ROOT_POS, ROOT_WORD,
};

pub mod system;

pub mod systems;

pub mod train;

mod tree;
pub use crate::tree::{DependencyTree, TreeStats, DEFAULT_RELATION};

#[cfg(test)]
pub(crate) mod test_helpers;
