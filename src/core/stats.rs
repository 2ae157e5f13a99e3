//! Summary statistics over a cell's timing samples.

use serde::{Deserialize, Serialize};

/// Count, extremes, median and mean of a non-empty sample set, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub count: usize,
    pub min_ms: f64,
    pub max_ms: f64,
    pub median_ms: f64,
    pub mean_ms: f64,
    /// Population standard deviation.
    pub stddev_ms: f64,
}

impl SummaryStatistics {
    /// Summarize `samples`; `None` when there are none.
    ///
    /// The median of an even-sized set is the average of the two central values.
    /// The mean is clamped to `[min, max]` so rounding in the sum cannot push it
    /// outside the observed range.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        let n = samples.len();
        if n == 0 {
            return None;
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);

        let min_ms = sorted[0];
        let max_ms = sorted[n - 1];
        let median_ms = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };

        let mean = sorted.iter().sum::<f64>() / n as f64;
        let mean_ms = mean.clamp(min_ms, max_ms);
        let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;

        Some(SummaryStatistics {
            count: n,
            min_ms,
            max_ms,
            median_ms,
            mean_ms,
            stddev_ms: variance.sqrt(),
        })
    }
}
