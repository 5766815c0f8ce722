//! Momentum indicators.

use pulse_core::traits::{Indicator, MultiOutputIndicator};
use serde::{Deserialize, Serialize};

use crate::guard::{guard_denominator, PRICE_FLOOR, RSI_LOSS_FLOOR};
use crate::moving_average::{Ema, Ewm, Sma};
use crate::simd;
use crate::window::deltas;

/// Relative Strength Index (RSI).
///
/// Simple rolling means of gains and losses over `period` day-over-day
/// changes. A zero average loss is floored to [`RSI_LOSS_FLOOR`].
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator.
    ///
    /// Common periods are 14 (default) or 9.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let changes = deltas(data);
        let gains: Vec<Option<f64>> = changes.iter().map(|c| c.map(|v| v.max(0.0))).collect();
        let losses: Vec<Option<f64>> = changes.iter().map(|c| c.map(|v| (-v).max(0.0))).collect();

        let sma = Sma::new(self.period);
        let avg_gains = sma.calculate_sparse(&gains);
        let avg_losses = sma.calculate_sparse(&losses);

        avg_gains
            .into_iter()
            .zip(avg_losses)
            .map(|(gain, loss)| {
                let rs = gain? / guard_denominator(loss?, RSI_LOSS_FLOOR);
                Some(100.0 - 100.0 / (1.0 + rs))
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.period + 1 // Need period+1 data points
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

/// MACD (Moving Average Convergence Divergence) output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdOutput {
    /// MACD line (fast EMA - slow EMA)
    pub macd: f64,
    /// Signal line (EMA of MACD)
    pub signal: f64,
    /// Histogram (MACD - Signal)
    pub histogram: f64,
}

/// MACD indicator.
///
/// Every EMA is seeded with its first input, so values exist from the
/// first bar.
#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Macd {
    /// Create a new MACD with default parameters (12, 26, 9).
    pub fn new() -> Self {
        Self::with_periods(12, 26, 9)
    }

    /// Create a MACD with custom periods.
    pub fn with_periods(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast > 0 && slow > 0 && signal > 0);
        assert!(fast < slow, "Fast period must be less than slow period");
        Self {
            fast_period: fast,
            slow_period: slow,
            signal_period: signal,
        }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for Macd {
    type Outputs = MacdOutput;

    fn calculate(&self, data: &[f64]) -> Vec<Option<MacdOutput>> {
        let fast = Ema::new(self.fast_period).calculate(data);
        let slow = Ema::new(self.slow_period).calculate(data);

        let macd_line: Vec<f64> = fast
            .iter()
            .zip(slow.iter())
            .map(|(f, s)| f.unwrap_or(f64::NAN) - s.unwrap_or(f64::NAN))
            .collect();
        let signal_line = Ema::new(self.signal_period).calculate(&macd_line);

        macd_line
            .into_iter()
            .zip(signal_line)
            .map(|(macd, signal)| {
                let signal = signal?;
                Some(MacdOutput {
                    macd,
                    signal,
                    histogram: macd - signal,
                })
            })
            .collect()
    }

    fn period(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "MACD"
    }
}

/// Stochastic oscillator output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StochasticOutput {
    /// Smoothed %K
    pub k: f64,
    /// %D (the same smoothing applied to %K)
    pub d: f64,
}

/// Stochastic oscillator.
///
/// Raw %K compares the close with the high-low range of the last
/// `period` bars; K and D are adjusted exponential smoothings of raw %K
/// and of K.
#[derive(Debug, Clone)]
pub struct Stochastic {
    period: usize,
    smoothing: Ewm,
}

impl Stochastic {
    /// Create a new stochastic oscillator with default parameters (9, com 2).
    pub fn new() -> Self {
        Self::with_params(9, 2.0)
    }

    /// Create with a custom window and smoothing center of mass.
    pub fn with_params(period: usize, center_of_mass: f64) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self {
            period,
            smoothing: Ewm::from_com(center_of_mass),
        }
    }

    /// Raw %K for every bar; `None` until the window fills.
    pub fn raw_k(&self, high: &[f64], low: &[f64], close: &[f64]) -> Vec<Option<f64>> {
        let len = high.len().min(low.len()).min(close.len());
        (0..len)
            .map(|i| {
                if i + 1 < self.period {
                    return None;
                }
                let start = i + 1 - self.period;
                let (lowest, _) = simd::minmax_simd(&low[start..=i])?;
                let (_, highest) = simd::minmax_simd(&high[start..=i])?;
                let range = guard_denominator(highest - lowest, PRICE_FLOOR);
                Some((close[i] - lowest) / range * 100.0)
            })
            .collect()
    }

    /// Calculate smoothed K and D from OHLC data.
    pub fn calculate_ohlc(
        &self,
        high: &[f64],
        low: &[f64],
        close: &[f64],
    ) -> Vec<Option<StochasticOutput>> {
        let k = self.smoothing.smooth(&self.raw_k(high, low, close));
        let d = self.smoothing.smooth(&k);

        k.into_iter()
            .zip(d)
            .map(|(k, d)| Some(StochasticOutput { k: k?, d: d? }))
            .collect()
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Default for Stochastic {
    fn default() -> Self {
        Self::new()
    }
}

/// Rate of Change: percent change over `period` bars.
#[derive(Debug, Clone)]
pub struct Roc {
    period: usize,
}

impl Roc {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Roc {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        (0..data.len())
            .map(|i| {
                let past = data[i.checked_sub(self.period)?];
                Some((data[i] - past) / guard_denominator(past, PRICE_FLOOR) * 100.0)
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.period + 1
    }

    fn name(&self) -> &str {
        "ROC"
    }
}

/// Momentum proxy reported under the MFI name.
///
/// `50 + 10 * mean(close change over period)`. This is not the volume
/// weighted Money Flow Index; downstream thresholds are tuned to this form.
#[derive(Debug, Clone)]
pub struct MfiProxy {
    period: usize,
}

impl MfiProxy {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for MfiProxy {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        Sma::new(self.period)
            .calculate_sparse(&deltas(data))
            .into_iter()
            .map(|mean| mean.map(|m| 50.0 + 10.0 * m))
            .collect()
    }

    fn period(&self) -> usize {
        self.period + 1
    }

    fn name(&self) -> &str {
        "MFI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rsi_bounds() {
        let rsi = Rsi::new(14);
        let data: Vec<f64> = (0..30)
            .map(|i| 100.0 + (i as f64 * 0.5).sin() * 5.0)
            .collect();

        let result = rsi.calculate(&data);
        assert!(result[13].is_none());
        assert!(result[14].is_some());

        for value in result.iter().flatten() {
            assert!(*value >= 0.0 && *value <= 100.0);
        }
    }

    #[test]
    fn test_rsi_all_gains() {
        let rsi = Rsi::new(5);
        let result = rsi.calculate(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);

        // Loss floored to epsilon: RSI pinned near 100
        assert_relative_eq!(result[5].unwrap(), 100.0, epsilon = 1e-6);
    }

    #[test]
    fn test_rsi_all_losses() {
        let rsi = Rsi::new(5);
        let result = rsi.calculate(&[7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0]);

        assert_relative_eq!(result[5].unwrap(), 0.0);
    }

    #[test]
    fn test_rsi_mixed() {
        let rsi = Rsi::new(2);
        // Changes: +2, -1 -> avg gain 1, avg loss 0.5, rs 2
        let result = rsi.calculate(&[10.0, 12.0, 11.0]);

        assert_relative_eq!(result[2].unwrap(), 100.0 - 100.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_macd_uptrend() {
        let macd = Macd::new();
        let data: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
        let result = macd.calculate(&data);

        assert!(result.iter().all(Option::is_some));
        let last = result.last().unwrap().unwrap();
        assert!(last.macd > 0.0);
        assert_relative_eq!(last.histogram, last.macd - last.signal);
    }

    #[test]
    fn test_macd_flat_is_zero() {
        let macd = Macd::with_periods(5, 10, 3);
        let result = macd.calculate(&[100.0; 30]);

        for output in result.iter().flatten() {
            assert_relative_eq!(output.histogram, 0.0);
        }
    }

    #[test]
    fn test_stochastic_bounds() {
        let stoch = Stochastic::new();
        let high: Vec<f64> = (0..30).map(|i| 105.0 + i as f64).collect();
        let low: Vec<f64> = (0..30).map(|i| 95.0 + i as f64).collect();
        let close: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();

        let result = stoch.calculate_ohlc(&high, &low, &close);
        assert!(result[7].is_none());
        assert!(result[8].is_some());

        for output in result.iter().flatten() {
            assert!(output.k >= 0.0 && output.k <= 100.0);
            assert!(output.d >= 0.0 && output.d <= 100.0);
        }
    }

    #[test]
    fn test_stochastic_at_high() {
        let stoch = Stochastic::with_params(5, 2.0);
        let high = vec![10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 17.0];
        let low = vec![5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0];
        let close = high.clone();

        let raw = stoch.raw_k(&high, &low, &close);
        assert_relative_eq!(raw.last().unwrap().unwrap(), 100.0);

        // Constant raw %K keeps the smoothed lines at the same level
        let result = stoch.calculate_ohlc(&high, &low, &close);
        let last = result.last().unwrap().unwrap();
        assert_relative_eq!(last.k, 100.0, epsilon = 1e-9);
        assert_relative_eq!(last.d, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_stochastic_zero_range_is_guarded() {
        let stoch = Stochastic::with_params(3, 2.0);
        let flat = [50.0; 4];
        let raw = stoch.raw_k(&flat, &flat, &flat);

        assert_relative_eq!(raw[3].unwrap(), 0.0);
    }

    #[test]
    fn test_roc() {
        let roc = Roc::new(2);
        let result = roc.calculate(&[100.0, 105.0, 110.0, 0.0]);

        assert_eq!(result[1], None);
        assert_relative_eq!(result[2].unwrap(), 10.0);
        assert_relative_eq!(result[3].unwrap(), -100.0);
    }

    #[test]
    fn test_mfi_proxy() {
        let mfi = MfiProxy::new(3);
        let result = mfi.calculate(&[10.0, 11.0, 12.0, 13.0, 12.0]);

        assert_eq!(result[2], None);
        assert_relative_eq!(result[3].unwrap(), 60.0);
        // Changes +1, +1, -1 -> mean 1/3
        assert_relative_eq!(result[4].unwrap(), 50.0 + 10.0 / 3.0, epsilon = 1e-12);
    }
}
