//! OHLCV (Open, High, Low, Close, Volume) data types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// One trading day of price and volume data.
/// Uses f64 for fast indicator calculations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Trading date
    pub date: NaiveDate,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Calculate the true range (used for ATR).
    pub fn true_range(&self, prev_close: Option<f64>) -> f64 {
        match prev_close {
            Some(pc) => {
                let hl = self.high - self.low;
                let hc = (self.high - pc).abs();
                let lc = (self.low - pc).abs();
                hl.max(hc).max(lc)
            }
            None => self.high - self.low,
        }
    }
}

/// Immutable daily history for one symbol, strictly ascending by date.
///
/// Gaps between dates (weekends, holidays, suspensions) are tolerated;
/// duplicates and out-of-order dates are rejected at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Create a series, validating date order.
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, DataError> {
        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(DataError::UnorderedBars {
                    previous: pair[0].date,
                    current: pair[1].date,
                });
            }
        }
        Ok(Self {
            symbol: symbol.into(),
            bars,
        })
    }

    /// Symbol identifier.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get all bars as a slice.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Get the last bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Keep only bars dated within `days` calendar days of the last bar.
    pub fn trailing_days(&self, days: u32) -> Self {
        let Some(last) = self.bars.last() else {
            return self.clone();
        };
        let cutoff = last.date - chrono::Duration::days(i64::from(days));
        Self {
            symbol: self.symbol.clone(),
            bars: self.bars.iter().filter(|b| b.date > cutoff).copied().collect(),
        }
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Extract high prices as a vector.
    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    /// Extract low prices as a vector.
    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    /// Extract volumes as a vector.
    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    /// Get an iterator over the bars.
    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }
}
