//! distribution.rs
//! Tabulations of a sample for the charting layer: equal-width bins for
//! histograms and distinct-value counts for pie charts.

use crate::store::GraphType;
use serde::Serialize;
use std::collections::HashMap;

/// What the reporting layer draws for a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Chart {
    Histogram { bins: Vec<Bin> },
    Pie { slices: Vec<(f64, usize)> },
}

impl Chart {
    pub fn new(graph_type: GraphType, samples: &[f64], bins: usize) -> Self {
        match graph_type {
            GraphType::Histogram => Chart::Histogram { bins: histogram(samples, bins) },
            GraphType::Pie => Chart::Pie { slices: value_counts(samples) },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Splits `[min, max]` into `bins` equal-width bins. The last bin is closed on
/// the right. Non-finite values are skipped. A constant sample lands in a single bin.
pub fn histogram(samples: &[f64], bins: usize) -> Vec<Bin> {
    let finite: Vec<f64> = samples.iter().copied().filter(|x| x.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }
    let lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        return vec![Bin { lower: lo, upper: hi, count: finite.len() }];
    }

    let width = (hi - lo) / bins as f64;
    let mut out: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            lower: lo + width * i as f64,
            upper: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();
    for x in finite {
        let idx = (((x - lo) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

/// Distinct values with their number of occurrences, in order of first appearance.
pub fn value_counts(samples: &[f64]) -> Vec<(f64, usize)> {
    let mut counts: Vec<(f64, usize)> = Vec::new();
    let mut slot: HashMap<u64, usize> = HashMap::new();
    for &x in samples {
        let i = *slot.entry(x.to_bits()).or_insert_with(|| {
            counts.push((x, 0));
            counts.len() - 1
        });
        counts[i].1 += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_counts_every_sample() {
        let samples: Vec<f64> = (0..100).map(f64::from).collect();
        let bins = histogram(&samples, 10);
        assert_eq!(bins.len(), 10);
        assert!(bins.iter().all(|b| b.count == 10));
        assert_eq!(bins[9].upper, 99.0);
    }

    #[test]
    fn test_histogram_degenerate_inputs() {
        assert!(histogram(&[], 10).is_empty());
        assert!(histogram(&[1.0], 0).is_empty());
        let single = histogram(&[3.0, 3.0, f64::NAN, f64::INFINITY], 5);
        assert_eq!(single, vec![Bin { lower: 3.0, upper: 3.0, count: 2 }]);
    }

    #[test]
    fn test_value_counts_first_appearance_order() {
        let counts = value_counts(&[1.0, 0.0, 1.0, 1.0, 0.0, 2.0]);
        assert_eq!(counts, vec![(1.0, 3), (0.0, 2), (2.0, 1)]);
    }

    #[test]
    fn test_value_counts_many_distinct_values() {
        let samples: Vec<f64> = (0..50_000).map(|i| f64::from(i % 5_000)).collect();
        let counts = value_counts(&samples);
        assert_eq!(counts.len(), 5_000);
        assert_eq!(counts[0], (0.0, 10));
        assert_eq!(counts[4_999], (4_999.0, 10));
        assert!(counts.iter().all(|(_, c)| *c == 10));
    }

    #[test]
    fn test_chart_follows_graph_type() {
        let samples = [0.0, 1.0, 1.0];
        assert_eq!(Chart::new(GraphType::Pie, &samples, 4), Chart::Pie { slices: vec![(0.0, 1), (1.0, 2)] });
        match Chart::new(GraphType::Histogram, &samples, 4) {
            Chart::Histogram { bins } => assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 3),
            other => panic!("unexpected {:?}", other),
        }
    }
}
