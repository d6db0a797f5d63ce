//! Configuration, corpus input/output, and helpers for the `depner`
//! programs.

use failure::Error;

pub type Result<T> = ::std::result::Result<T, Error>;

#[macro_use]
mod util;
pub use crate::util::OrExit;

mod best;
pub use crate::best::BestScore;

mod config;
pub use crate::config::{Config, Model, Parser, TomlRead, Train};

mod corpus;
pub use crate::corpus::{read_corpus, CorpusError, Reader, Writer};

mod evaluate;
pub use crate::evaluate::evaluate;

mod progress;
pub use crate::progress::FileProgress;

mod serialization;
pub use crate::serialization::{CborRead, CborWrite, SerializableTransitionSystem};

mod stats;
pub use crate::stats::ParseStats;
