//! Training of perceptron models.

mod example;
pub use self::example::{collect_examples, SkipStats, TrainingExample};

mod trainer;
pub use self::trainer::{EarlyUpdateTrainer, EpochStats};

pub use crate::system::OracleError;
