//! Volatility indicators.

use pulse_core::traits::{Indicator, MultiOutputIndicator};
use pulse_core::types::Bar;
use serde::{Deserialize, Serialize};

use crate::guard::{guard_denominator, PRICE_FLOOR};
use crate::moving_average::Sma;
use crate::simd;
use crate::window::{lift, rolling_apply};

/// Rolling sample standard deviation (n - 1 denominator).
#[derive(Debug, Clone)]
pub struct RollingStd {
    period: usize,
}

impl RollingStd {
    /// Create a new standard deviation indicator.
    pub fn new(period: usize) -> Self {
        assert!(period > 1, "Period must be greater than 1");
        Self { period }
    }
}

impl Indicator for RollingStd {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        rolling_apply(&lift(data), self.period, |w| {
            simd::sample_variance_simd(w).sqrt()
        })
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "StdDev"
    }
}

/// Average True Range (ATR).
///
/// Simple rolling mean of the true range. The first bar has no previous
/// close, so its true range is its high-low range.
#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
}

impl Atr {
    /// Create a new ATR indicator.
    ///
    /// Common period is 14.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    /// True range for every bar.
    pub fn true_ranges(bars: &[Bar]) -> Vec<f64> {
        let previous_closes = std::iter::once(None).chain(bars.iter().map(|b| Some(b.close)));
        bars.iter()
            .zip(previous_closes)
            .map(|(bar, prev_close)| bar.true_range(prev_close))
            .collect()
    }

    /// Calculate ATR over a bar sequence.
    pub fn calculate_bars(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        Sma::new(self.period).calculate(&Self::true_ranges(bars))
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

/// Bollinger Bands output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerOutput {
    /// Upper band
    pub upper: f64,
    /// Middle band (SMA)
    pub middle: f64,
    /// Lower band
    pub lower: f64,
    /// Band width relative to the middle band ((upper - lower) / middle)
    pub width: f64,
}

/// Bollinger Bands.
///
/// Consists of a middle band (SMA) with upper and lower bands
/// at a specified number of standard deviations.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl BollingerBands {
    /// Create new Bollinger Bands with default parameters (20, 2.0).
    pub fn new() -> Self {
        Self::with_params(20, 2.0)
    }

    /// Create Bollinger Bands with custom parameters.
    pub fn with_params(period: usize, std_dev_multiplier: f64) -> Self {
        assert!(period > 1, "Period must be greater than 1");
        assert!(
            std_dev_multiplier > 0.0,
            "Std dev multiplier must be positive"
        );
        Self {
            period,
            std_dev_multiplier,
        }
    }
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for BollingerBands {
    type Outputs = BollingerOutput;

    fn calculate(&self, data: &[f64]) -> Vec<Option<BollingerOutput>> {
        let middle = Sma::new(self.period).calculate(data);
        let std_dev = RollingStd::new(self.period).calculate(data);

        middle
            .into_iter()
            .zip(std_dev)
            .map(|(mean, sd)| {
                let (mean, sd) = (mean?, sd?);
                let upper = mean + self.std_dev_multiplier * sd;
                let lower = mean - self.std_dev_multiplier * sd;
                Some(BollingerOutput {
                    upper,
                    middle: mean,
                    lower,
                    width: (upper - lower) / guard_denominator(mean, PRICE_FLOOR),
                })
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "Bollinger Bands"
    }
}
