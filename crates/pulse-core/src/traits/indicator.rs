//! Indicator trait definitions.

use crate::error::IndicatorError;

/// Trait for technical indicators.
///
/// Output is aligned one-to-one with the input: position `i` holds the
/// value as of input `i`, or `None` while the window is still filling.
pub trait Indicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate indicator values; the result has the same length as `data`.
    fn calculate(&self, data: &[f64]) -> Vec<Option<Self::Output>>;

    /// Get the minimum data points required for the first value.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Validate that there's enough data.
    fn validate_data(&self, data: &[f64]) -> Result<(), IndicatorError> {
        if data.len() < self.period() {
            return Err(IndicatorError::InsufficientData {
                required: self.period(),
                available: data.len(),
            });
        }
        Ok(())
    }
}

/// Multi-output indicator (e.g., Bollinger Bands, MACD).
///
/// Some indicators produce multiple related values.
pub trait MultiOutputIndicator: Send + Sync {
    /// The output type containing multiple values.
    type Outputs;

    /// Calculate indicator values for the given data.
    fn calculate(&self, data: &[f64]) -> Vec<Option<Self::Outputs>>;

    /// Get the minimum data points required for the first value.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestIndicator {
        period: usize,
    }

    impl Indicator for TestIndicator {
        type Output = f64;

        fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
            // Trailing window sum
            (0..data.len())
                .map(|i| {
                    (i + 1 >= self.period).then(|| data[i + 1 - self.period..=i].iter().sum())
                })
                .collect()
        }

        fn period(&self) -> usize {
            self.period
        }

        fn name(&self) -> &str {
            "test"
        }
    }

    #[test]
    fn test_indicator_validation() {
        let indicator = TestIndicator { period: 5 };

        assert!(indicator.validate_data(&[1.0, 2.0, 3.0]).is_err());
        assert!(indicator.validate_data(&[1.0, 2.0, 3.0, 4.0, 5.0]).is_ok());
    }

    #[test]
    fn test_indicator_alignment() {
        let indicator = TestIndicator { period: 3 };
        let result = indicator.calculate(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(result, vec![None, None, Some(6.0), Some(9.0), Some(12.0)]);
    }
}
