//! Moving average indicators.

use pulse_core::traits::Indicator;

use crate::simd;
use crate::window::{lift, rolling_apply};

/// Simple Moving Average (SMA).
///
/// Calculates the arithmetic mean of the last N values.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    /// Rolling mean over a series that may contain undefined values.
    pub fn calculate_sparse(&self, data: &[Option<f64>]) -> Vec<Option<f64>> {
        rolling_apply(data, self.period, simd::mean_simd)
    }
}

impl Indicator for Sma {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let mut result = vec![None; data.len()];
        if data.len() < self.period {
            return result;
        }

        let period_f64 = self.period as f64;

        // Initial sum
        let mut sum: f64 = simd::sum_simd(&data[..self.period]);
        result[self.period - 1] = Some(sum / period_f64);

        // Sliding window
        for i in self.period..data.len() {
            sum = sum - data[i - self.period] + data[i];
            result[i] = Some(sum / period_f64);
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// Exponential Moving Average (EMA).
///
/// Recursive form seeded with the first value, so a value exists from the
/// first input onward: `ema = price * k + prev * (1 - k)`, `k = 2 / (span + 1)`.
#[derive(Debug, Clone)]
pub struct Ema {
    span: usize,
    multiplier: f64,
}

impl Ema {
    /// Create a new EMA with the specified span.
    pub fn new(span: usize) -> Self {
        assert!(span > 0, "Span must be greater than 0");
        let multiplier = 2.0 / (span as f64 + 1.0);
        Self { span, multiplier }
    }

    fn smooth(&self, data: &[f64]) -> Vec<f64> {
        let mut result = Vec::with_capacity(data.len());
        let one_minus_mult = 1.0 - self.multiplier;

        let mut iter = data.iter();
        let Some(&first) = iter.next() else {
            return result;
        };

        let mut ema = first;
        result.push(ema);
        for &price in iter {
            ema = price * self.multiplier + ema * one_minus_mult;
            result.push(ema);
        }

        result
    }
}

impl Indicator for Ema {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        lift(&self.smooth(data))
    }

    fn period(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "EMA"
    }
}

/// Adjusted exponentially weighted mean.
///
/// Each output is the weighted mean of every value seen so far, with
/// weights `(1 - alpha)^age`. Leading undefined values are skipped; an
/// undefined value inside the series ages the weights and repeats the
/// previous output.
#[derive(Debug, Clone)]
pub struct Ewm {
    alpha: f64,
}

impl Ewm {
    /// Smoothing from a center of mass: `alpha = 1 / (1 + com)`.
    pub fn from_com(com: f64) -> Self {
        assert!(com >= 0.0, "Center of mass must be non-negative");
        Self {
            alpha: 1.0 / (1.0 + com),
        }
    }

    /// Smoothing factor in use.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Smooth a series that may contain undefined values.
    pub fn smooth(&self, data: &[Option<f64>]) -> Vec<Option<f64>> {
        let decay = 1.0 - self.alpha;
        let mut numerator = 0.0;
        let mut denominator = 0.0;
        let mut started = false;

        data.iter()
            .map(|value| match value {
                Some(x) => {
                    numerator = x + decay * numerator;
                    denominator = 1.0 + decay * denominator;
                    started = true;
                    Some(numerator / denominator)
                }
                None if started => {
                    numerator *= decay;
                    denominator *= decay;
                    Some(numerator / denominator)
                }
                None => None,
            })
            .collect()
    }
}

impl Indicator for Ewm {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        self.smooth(&lift(data))
    }

    fn period(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "EWM"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sma() {
        let sma = Sma::new(3);
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma.calculate(&data);

        assert_eq!(result.len(), 5);
        assert_eq!(result[1], None);
        assert_relative_eq!(result[2].unwrap(), 2.0); // (1+2+3)/3
        assert_relative_eq!(result[3].unwrap(), 3.0); // (2+3+4)/3
        assert_relative_eq!(result[4].unwrap(), 4.0); // (3+4+5)/3
    }

    #[test]
    fn test_sma_insufficient_data() {
        let sma = Sma::new(5);
        let result = sma.calculate(&[1.0, 2.0, 3.0]);

        assert!(result.iter().all(Option::is_none));
        assert!(sma.validate_data(&[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_sma_sparse() {
        let sma = Sma::new(2);
        let result = sma.calculate_sparse(&[None, Some(2.0), Some(4.0)]);

        assert_eq!(result, vec![None, None, Some(3.0)]);
    }

    #[test]
    fn test_ema_seeded_with_first_value() {
        let ema = Ema::new(3);
        // multiplier = 2/(3+1) = 0.5
        let result = ema.calculate(&[1.0, 2.0, 3.0]);

        assert_relative_eq!(result[0].unwrap(), 1.0);
        assert_relative_eq!(result[1].unwrap(), 1.5);
        assert_relative_eq!(result[2].unwrap(), 2.25);
    }

    #[test]
    fn test_ewm_adjusted_weights() {
        let ewm = Ewm::from_com(2.0);
        assert_relative_eq!(ewm.alpha(), 1.0 / 3.0);

        let result = ewm.smooth(&[None, Some(3.0), Some(6.0)]);
        assert_eq!(result[0], None);
        assert_relative_eq!(result[1].unwrap(), 3.0);
        // (6 + 2/3 * 3) / (1 + 2/3) = 4.8
        assert_relative_eq!(result[2].unwrap(), 4.8, epsilon = 1e-12);
    }

    #[test]
    fn test_ewm_gap_repeats_previous() {
        let ewm = Ewm::from_com(2.0);
        let result = ewm.smooth(&[Some(3.0), Some(6.0), None]);

        assert_relative_eq!(result[2].unwrap(), result[1].unwrap(), epsilon = 1e-12);
    }

    #[test]
    fn test_ewm_constant_input() {
        let ewm = Ewm::from_com(2.0);
        for value in ewm.calculate(&[50.0; 10]) {
            assert_relative_eq!(value.unwrap(), 50.0, epsilon = 1e-12);
        }
    }
}
