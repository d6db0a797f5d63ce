use std::fmt;
use std::time::Duration;

/// Statistics of a parsing run.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ParseStats {
    pub sentences: usize,
    pub words: usize,

    /// Words that did not occur in the training data.
    pub unknown_words: usize,

    /// Time spent parsing.
    pub elapsed: Duration,
}

impl ParseStats {
    pub fn new() -> Self {
        ParseStats::default()
    }

    /// Add a parsed sentence.
    pub fn add(&mut self, words: usize, unknown_words: usize, elapsed: Duration) {
        self.sentences += 1;
        self.words += words;
        self.unknown_words += unknown_words;
        self.elapsed += elapsed;
    }

    /// Percentage of words that did not occur in the training data.
    pub fn oov_rate(&self) -> f64 {
        if self.words == 0 {
            0.0
        } else {
            self.unknown_words as f64 * 100.0 / self.words as f64
        }
    }

    pub fn words_per_second(&self) -> f64 {
        per_second(self.words, self.elapsed)
    }

    pub fn sentences_per_second(&self) -> f64 {
        per_second(self.sentences, self.elapsed)
    }
}

fn per_second(count: usize, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs == 0.0 {
        0.0
    } else {
        count as f64 / secs
    }
}

impl fmt::Display for ParseStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} sentences, {} words, OOV {:.2}%, {:.1} words/s, {:.1} sentences/s",
            self.sentences,
            self.words,
            self.oov_rate(),
            self.words_per_second(),
            self.sentences_per_second()
        )
    }
}
