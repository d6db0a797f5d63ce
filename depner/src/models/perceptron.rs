use std::io::{self, Write};

use serde_derive::{Deserialize, Serialize};

use crate::features::UNKNOWN_FEATURE;

/// Averaged perceptron.
///
/// The weights are indexed by feature number and grow on demand. Averages
/// are computed lazily: for every feature, the weight is only added to the
/// running total when it changes, multiplied by the number of steps since
/// the last change.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Perceptron {
    weights: Vec<f64>,
    totals: Vec<f64>,
    timestamps: Vec<usize>,
    steps: usize,
    averaged: Option<Vec<f64>>,
}

impl Perceptron {
    pub fn new() -> Self {
        Perceptron::default()
    }

    /// Sum the weights of `features`.
    ///
    /// If `averaged` is `true` and the perceptron was finalized, the
    /// averaged weights are used. Otherwise, the current weights are used.
    pub fn score(&self, features: &[usize], averaged: bool) -> f64 {
        let weights = match (averaged, &self.averaged) {
            (true, Some(averaged)) => averaged,
            _ => &self.weights,
        };

        features
            .iter()
            .filter(|&&feature| feature != UNKNOWN_FEATURE)
            .filter_map(|&feature| weights.get(feature))
            .sum()
    }

    /// Reward the features of the gold transition and penalize the
    /// features of the predicted transition.
    pub fn update(&mut self, gold: &[usize], predicted: &[usize]) {
        for &feature in gold {
            self.add(feature, 1.0);
        }

        for &feature in predicted {
            self.add(feature, -1.0);
        }
    }

    /// Finish a step, adding the current weights to the totals.
    pub fn increment_average(&mut self) {
        self.steps += 1;
    }

    /// Compute the averaged weights.
    ///
    /// The perceptron can still be updated afterwards, `finalize` has to be
    /// called again to bring the averages up to date.
    pub fn finalize(&mut self) {
        for feature in 0..self.weights.len() {
            self.catch_up(feature);
        }

        let averaged = if self.steps == 0 {
            self.weights.clone()
        } else {
            let steps = self.steps as f64;
            self.totals.iter().map(|total| total / steps).collect()
        };

        self.averaged = Some(averaged);
    }

    pub fn is_finalized(&self) -> bool {
        self.averaged.is_some()
    }

    /// The number of steps so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// The current weight of a feature.
    pub fn weight(&self, feature: usize) -> f64 {
        self.weights.get(feature).cloned().unwrap_or(0.0)
    }

    /// The averaged weight of a feature, `None` if the perceptron was not
    /// finalized.
    pub fn averaged_weight(&self, feature: usize) -> Option<f64> {
        self.averaged
            .as_ref()
            .map(|averaged| averaged.get(feature).cloned().unwrap_or(0.0))
    }

    /// Write the weights for `n_features` features: a line with the number
    /// of features, followed by one weight per line. Averaged weights are
    /// written if the perceptron was finalized.
    pub fn write_weights<W>(&self, n_features: usize, write: &mut W) -> io::Result<()>
    where
        W: Write,
    {
        let weights = self.averaged.as_ref().unwrap_or(&self.weights);

        writeln!(write, "{}", n_features)?;
        for feature in 0..n_features {
            writeln!(write, "{}", weights.get(feature).cloned().unwrap_or(0.0))?;
        }

        Ok(())
    }

    fn add(&mut self, feature: usize, delta: f64) {
        if feature == UNKNOWN_FEATURE {
            return;
        }

        if feature >= self.weights.len() {
            self.weights.resize(feature + 1, 0.0);
            self.totals.resize(feature + 1, 0.0);
            self.timestamps.resize(feature + 1, 0);
        }

        self.catch_up(feature);
        self.weights[feature] += delta;
    }

    fn catch_up(&mut self, feature: usize) {
        let elapsed = self.steps - self.timestamps[feature];
        self.totals[feature] += elapsed as f64 * self.weights[feature];
        self.timestamps[feature] = self.steps;
    }
}

#[cfg(test)]
mod tests {
    use super::Perceptron;

    #[test]
    fn update_weights() {
        let mut perceptron = Perceptron::new();
        perceptron.update(&[1, 2], &[2, 3]);

        assert_relative_eq!(perceptron.weight(1), 1.0);
        assert_relative_eq!(perceptron.weight(2), 0.0);
        assert_relative_eq!(perceptron.weight(3), -1.0);
        assert_relative_eq!(perceptron.weight(4), 0.0);
        assert_relative_eq!(perceptron.score(&[1, 3], false), 0.0);
        assert_relative_eq!(perceptron.score(&[1, 2, 5], false), 1.0);
    }

    #[test]
    fn unknown_features_are_ignored() {
        let mut perceptron = Perceptron::new();
        perceptron.update(&[0, 1], &[]);
        assert_relative_eq!(perceptron.weight(0), 0.0);
        assert_relative_eq!(perceptron.score(&[0, 1], false), 1.0);
    }

    #[test]
    fn constant_weights_average_to_themselves() {
        let mut perceptron = Perceptron::new();
        perceptron.update(&[1, 1], &[2]);

        for _ in 0..5 {
            perceptron.increment_average();
        }
        perceptron.finalize();

        assert_relative_eq!(perceptron.averaged_weight(1).unwrap(), 2.0);
        assert_relative_eq!(perceptron.averaged_weight(2).unwrap(), -1.0);
        assert_relative_eq!(perceptron.score(&[1, 2], true), 1.0);
    }

    #[test]
    fn lazy_averages_equal_eager_averages() {
        let updates: Vec<(Vec<usize>, Vec<usize>)> = vec![
            (vec![1, 2], vec![3]),
            (vec![], vec![]),
            (vec![3], vec![1]),
            (vec![4], vec![2, 2]),
            (vec![], vec![]),
            (vec![1], vec![4]),
        ];

        let mut perceptron = Perceptron::new();
        let mut weights = vec![0.0; 5];
        let mut totals = vec![0.0; 5];

        for (gold, predicted) in &updates {
            perceptron.update(gold, predicted);
            perceptron.increment_average();

            for &feature in gold {
                weights[feature] += 1.0;
            }
            for &feature in predicted {
                weights[feature] -= 1.0;
            }
            for (total, weight) in totals.iter_mut().zip(&weights) {
                *total += weight;
            }
        }

        perceptron.finalize();
        for feature in 1..5 {
            assert_relative_eq!(
                perceptron.averaged_weight(feature).unwrap(),
                totals[feature] / updates.len() as f64
            );
        }

        // Training can continue after finalization.
        perceptron.update(&[1], &[]);
        perceptron.increment_average();
        perceptron.finalize();
        assert_relative_eq!(
            perceptron.averaged_weight(1).unwrap(),
            (totals[1] + weights[1] + 1.0) / (updates.len() + 1) as f64
        );
    }

    #[test]
    fn scores_use_current_weights_before_finalization() {
        let mut perceptron = Perceptron::new();
        perceptron.update(&[1], &[]);
        assert!(perceptron.averaged_weight(1).is_none());
        assert_relative_eq!(perceptron.score(&[1], true), 1.0);
    }

    #[test]
    fn write_weights() {
        let mut perceptron = Perceptron::new();
        perceptron.update(&[2], &[1]);
        perceptron.increment_average();
        perceptron.finalize();

        let mut output = Vec::new();
        perceptron.write_weights(4, &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "4\n0\n-1\n1\n0\n");
    }
}
