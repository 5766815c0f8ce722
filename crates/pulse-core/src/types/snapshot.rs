//! Per-bar indicator snapshots and the augmented series.

use serde::{Deserialize, Serialize};

use super::Bar;
use crate::error::IndicatorError;

/// Indicator values for a single bar.
///
/// A value is `NaN` only when its window never filled across the whole
/// series; comparisons against it are false, so any predicate using it
/// reads as bearish.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub ma5: f64,
    pub ma10: f64,
    pub ma20: f64,
    pub bb_up: f64,
    pub bb_low: f64,
    pub bb_width: f64,
    pub atr: f64,
    /// Smoothed stochastic %K
    pub k: f64,
    /// Smoothed stochastic %D
    pub d: f64,
    pub macd_hist: f64,
    pub rsi: f64,
    pub obv: f64,
    /// Momentum proxy labelled MFI: 50 + 10 x mean close change
    pub mfi: f64,
    pub vma20: f64,
    pub bias5: f64,
    pub bias20: f64,
    pub vol_ratio: f64,
    pub roc: f64,
    pub sr_rank: f64,
}

impl IndicatorSnapshot {
    /// Number of indicator columns.
    pub const COLUMNS: usize = 19;

    /// Snapshot with every column set to `value`.
    pub fn splat(value: f64) -> Self {
        Self {
            ma5: value,
            ma10: value,
            ma20: value,
            bb_up: value,
            bb_low: value,
            bb_width: value,
            atr: value,
            k: value,
            d: value,
            macd_hist: value,
            rsi: value,
            obv: value,
            mfi: value,
            vma20: value,
            bias5: value,
            bias20: value,
            vol_ratio: value,
            roc: value,
            sr_rank: value,
        }
    }

    /// Column names and values, in display order.
    pub fn fields(&self) -> [(&'static str, f64); Self::COLUMNS] {
        [
            ("MA5", self.ma5),
            ("MA10", self.ma10),
            ("MA20", self.ma20),
            ("BB_up", self.bb_up),
            ("BB_low", self.bb_low),
            ("BB_width", self.bb_width),
            ("ATR", self.atr),
            ("K", self.k),
            ("D", self.d),
            ("MACD_hist", self.macd_hist),
            ("RSI", self.rsi),
            ("OBV", self.obv),
            ("MFI", self.mfi),
            ("VMA20", self.vma20),
            ("BIAS5", self.bias5),
            ("BIAS20", self.bias20),
            ("Vol_Ratio", self.vol_ratio),
            ("ROC", self.roc),
            ("SR_Rank", self.sr_rank),
        ]
    }

    /// Names of columns that are still undefined.
    pub fn undefined_fields(&self) -> Vec<&'static str> {
        self.fields()
            .into_iter()
            .filter(|(_, v)| !v.is_finite())
            .map(|(name, _)| name)
            .collect()
    }

    /// Check if every column holds a finite value.
    pub fn is_complete(&self) -> bool {
        self.fields().iter().all(|(_, v)| v.is_finite())
    }
}

/// A bar together with its indicator snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AugmentedBar {
    pub bar: Bar,
    pub indicators: IndicatorSnapshot,
}

/// The augmented series produced by the indicator engine.
///
/// Always holds at least two rows so `current` and `previous` exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorFrame {
    symbol: String,
    rows: Vec<AugmentedBar>,
}

impl IndicatorFrame {
    /// Wrap computed rows.
    pub fn new(symbol: impl Into<String>, rows: Vec<AugmentedBar>) -> Result<Self, IndicatorError> {
        if rows.len() < 2 {
            return Err(IndicatorError::InsufficientData {
                required: 2,
                available: rows.len(),
            });
        }
        Ok(Self {
            symbol: symbol.into(),
            rows,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn rows(&self) -> &[AugmentedBar] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false; a frame holds at least two rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The most recent row.
    pub fn current(&self) -> &AugmentedBar {
        &self.rows[self.rows.len() - 1]
    }

    /// The row before the most recent one.
    pub fn previous(&self) -> &AugmentedBar {
        &self.rows[self.rows.len() - 2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(day: u32, value: f64) -> AugmentedBar {
        let date = NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        AugmentedBar {
            bar: Bar::new(date, 10.0, 11.0, 9.0, 10.0, 100.0),
            indicators: IndicatorSnapshot::splat(value),
        }
    }

    #[test]
    fn test_undefined_fields() {
        let mut snap = IndicatorSnapshot::splat(1.0);
        assert!(snap.is_complete());

        snap.sr_rank = f64::NAN;
        assert!(!snap.is_complete());
        assert_eq!(snap.undefined_fields(), vec!["SR_Rank"]);
    }

    #[test]
    fn test_frame_current_previous() {
        let frame = IndicatorFrame::new("2330", vec![row(1, 1.0), row(2, 2.0), row(3, 3.0)]).unwrap();

        assert_eq!(frame.current().indicators.ma5, 3.0);
        assert_eq!(frame.previous().indicators.ma5, 2.0);
        assert_eq!(frame.len(), 3);
    }

    #[test]
    fn test_frame_needs_two_rows() {
        assert!(IndicatorFrame::new("2330", vec![row(1, 1.0)]).is_err());
    }
}
