//! Volume indicators.

use crate::guard::{guard_denominator, PRICE_FLOOR};

/// On-Balance Volume.
///
/// Cumulative sum of `sign(close change) * volume`, starting at zero.
#[derive(Debug, Clone, Default)]
pub struct Obv;

impl Obv {
    pub fn calculate(&self, close: &[f64], volume: &[f64]) -> Vec<f64> {
        let len = close.len().min(volume.len());
        let mut result = Vec::with_capacity(len);
        let mut total = 0.0;

        for i in 0..len {
            if i > 0 {
                let change = close[i] - close[i - 1];
                if change > 0.0 {
                    total += volume[i];
                } else if change < 0.0 {
                    total -= volume[i];
                }
            }
            result.push(total);
        }

        result
    }
}

/// Today's volume relative to the previous bar's volume average.
///
/// Bars whose previous average is undefined get a neutral ratio of 1.
pub fn volume_ratio(volume: &[f64], volume_average: &[Option<f64>]) -> Vec<f64> {
    volume
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            match i.checked_sub(1).and_then(|prev| volume_average.get(prev).copied().flatten()) {
                Some(avg) => v / guard_denominator(avg, PRICE_FLOOR),
                None => 1.0,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obv() {
        let close = vec![10.0, 11.0, 11.0, 10.5, 12.0];
        let volume = vec![100.0, 200.0, 300.0, 400.0, 500.0];

        let obv = Obv.calculate(&close, &volume);
        assert_eq!(obv, vec![0.0, 200.0, 200.0, -200.0, 300.0]);
    }

    #[test]
    fn test_volume_ratio_uses_previous_average() {
        let volume = vec![100.0, 100.0, 300.0];
        let average = vec![None, Some(100.0), Some(150.0)];

        let ratio = volume_ratio(&volume, &average);
        assert_eq!(ratio, vec![1.0, 1.0, 3.0]);
    }

    #[test]
    fn test_volume_ratio_zero_average_is_guarded() {
        let ratio = volume_ratio(&[0.0, 50.0], &[Some(0.0), Some(0.0)]);
        assert_eq!(ratio, vec![1.0, 50.0]);
    }
}
