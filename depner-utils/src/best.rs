/// Tracks the best development score of a training run.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BestScore {
    best: Option<(usize, f64)>,
}

impl BestScore {
    pub fn new() -> Self {
        BestScore::default()
    }

    /// Record the score of an epoch.
    ///
    /// Returns `true` if the score is higher than all earlier scores.
    pub fn improves(&mut self, epoch: usize, score: f64) -> bool {
        match self.best {
            Some((_, best)) if score <= best => false,
            _ => {
                self.best = Some((epoch, score));
                true
            }
        }
    }

    /// The epoch and score of the best model so far.
    pub fn best(&self) -> Option<(usize, f64)> {
        self.best
    }
}
