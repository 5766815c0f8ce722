//! Price position indicators.

use crate::guard::{guard_denominator, PRICE_FLOOR};
use crate::simd;

/// Percent distance of the close from a moving average.
pub fn bias(close: &[f64], average: &[Option<f64>]) -> Vec<Option<f64>> {
    close
        .iter()
        .zip(average)
        .map(|(&c, ma)| {
            let ma = (*ma)?;
            Some((c - ma) / guard_denominator(ma, PRICE_FLOOR) * 100.0)
        })
        .collect()
}

/// Where the close sits inside the trailing high-low range, 0 to 1.
#[derive(Debug, Clone)]
pub struct RangeRank {
    period: usize,
}

impl RangeRank {
    /// Create a range rank over `period` bars. Common period is 60.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    pub fn calculate_ohlc(&self, high: &[f64], low: &[f64], close: &[f64]) -> Vec<Option<f64>> {
        let len = high.len().min(low.len()).min(close.len());
        (0..len)
            .map(|i| {
                if i + 1 < self.period {
                    return None;
                }
                let start = i + 1 - self.period;
                let (lowest, _) = simd::minmax_simd(&low[start..=i])?;
                let (_, highest) = simd::minmax_simd(&high[start..=i])?;
                Some((close[i] - lowest) / guard_denominator(highest - lowest, PRICE_FLOOR))
            })
            .collect()
    }

    pub fn period(&self) -> usize {
        self.period
    }
}
