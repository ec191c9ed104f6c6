//! stats.rs
//! Summary statistics over the simulation axis of an evaluated node.

use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Median, Statistics};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub mean: f64,
    pub max: f64,
    pub min: f64,
    /// Population standard deviation.
    pub std: f64,
    pub median: f64,
    /// Biased Fisher-Pearson skewness.
    pub skew: f64,
    /// Biased excess kurtosis (normal distribution = 0).
    pub kurt: f64,
}

impl Stats {
    /// Computes every statistic from `samples`.
    ///
    /// Zero-variance samples have no shape information: `skew` and `kurt`
    /// are reported as 0.0 rather than NaN. An empty slice yields NaN everywhere.
    pub fn from_samples(samples: &[f64]) -> Self {
        let mean = Statistics::mean(samples);
        let (skew, kurt) = shape_moments(samples, mean);
        Self {
            mean,
            max: Statistics::max(samples),
            min: Statistics::min(samples),
            std: Statistics::population_std_dev(samples),
            median: Data::new(samples.to_vec()).median(),
            skew,
            kurt,
        }
    }

    /// Name/value pairs in display order.
    pub fn entries(&self) -> [(&'static str, f64); 7] {
        [
            ("mean", self.mean),
            ("max", self.max),
            ("min", self.min),
            ("std", self.std),
            ("median", self.median),
            ("skew", self.skew),
            ("kurt", self.kurt),
        ]
    }
}

fn shape_moments(samples: &[f64], mean: f64) -> (f64, f64) {
    if samples.is_empty() {
        return (f64::NAN, f64::NAN);
    }
    let n = samples.len() as f64;
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for &x in samples {
        let d = x - mean;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    let (m2, m3, m4) = (m2 / n, m3 / n, m4 / n);
    if m2 == 0.0 {
        return (0.0, 0.0);
    }
    (m3 / m2.powf(1.5), m4 / (m2 * m2) - 3.0)
}
