//! The scoring indicators and their predicates.

use std::fmt;
use std::str::FromStr;

use pulse_core::error::ScoringError;
use pulse_core::types::{AugmentedBar, InstitutionalFlow};
use serde::{Deserialize, Serialize};

use crate::set::IndicatorLabels;
use crate::verdict::Signal;

/// Identifier of a scoring indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorId {
    /// Close above MA20
    Trend,
    /// MA5 > MA10 > MA20
    MaAlignment,
    Ma5Slope,
    Ma20Slope,
    /// Three-way: above BB_up, above MA20, or below MA20
    BandPosition,
    BandWidth,
    KdCross,
    KdRising,
    KStrength,
    MacdHistogram,
    MacdMomentum,
    RsiStrength,
    RsiOverbought,
    ObvTrend,
    MfiStrength,
    VolumeRatio,
    VolumeAboveAverage,
    ShortBias,
    LongBias,
    RocMomentum,
    RangePosition,
    Volatility,
    TrustBuying,
    ForeignBuying,
    InstitutionalConsensus,
}

impl IndicatorId {
    /// Every indicator, in canonical order.
    pub const ALL: [IndicatorId; 25] = [
        Self::Trend,
        Self::MaAlignment,
        Self::Ma5Slope,
        Self::Ma20Slope,
        Self::BandPosition,
        Self::BandWidth,
        Self::KdCross,
        Self::KdRising,
        Self::KStrength,
        Self::MacdHistogram,
        Self::MacdMomentum,
        Self::RsiStrength,
        Self::RsiOverbought,
        Self::ObvTrend,
        Self::MfiStrength,
        Self::VolumeRatio,
        Self::VolumeAboveAverage,
        Self::ShortBias,
        Self::LongBias,
        Self::RocMomentum,
        Self::RangePosition,
        Self::Volatility,
        Self::TrustBuying,
        Self::ForeignBuying,
        Self::InstitutionalConsensus,
    ];

    /// Stable identifier used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trend => "trend",
            Self::MaAlignment => "ma_alignment",
            Self::Ma5Slope => "ma5_slope",
            Self::Ma20Slope => "ma20_slope",
            Self::BandPosition => "band_position",
            Self::BandWidth => "band_width",
            Self::KdCross => "kd_cross",
            Self::KdRising => "kd_rising",
            Self::KStrength => "k_strength",
            Self::MacdHistogram => "macd_histogram",
            Self::MacdMomentum => "macd_momentum",
            Self::RsiStrength => "rsi_strength",
            Self::RsiOverbought => "rsi_overbought",
            Self::ObvTrend => "obv_trend",
            Self::MfiStrength => "mfi_strength",
            Self::VolumeRatio => "volume_ratio",
            Self::VolumeAboveAverage => "volume_above_average",
            Self::ShortBias => "short_bias",
            Self::LongBias => "long_bias",
            Self::RocMomentum => "roc_momentum",
            Self::RangePosition => "range_position",
            Self::Volatility => "volatility",
            Self::TrustBuying => "trust_buying",
            Self::ForeignBuying => "foreign_buying",
            Self::InstitutionalConsensus => "institutional_consensus",
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Trend => "Trend",
            Self::MaAlignment => "MA Alignment",
            Self::Ma5Slope => "MA5 Slope",
            Self::Ma20Slope => "MA20 Slope",
            Self::BandPosition => "Band Position",
            Self::BandWidth => "Band Width",
            Self::KdCross => "KD Cross",
            Self::KdRising => "K Direction",
            Self::KStrength => "K Level",
            Self::MacdHistogram => "MACD Histogram",
            Self::MacdMomentum => "MACD Momentum",
            Self::RsiStrength => "RSI Level",
            Self::RsiOverbought => "RSI Overbought",
            Self::ObvTrend => "OBV Trend",
            Self::MfiStrength => "MFI Level",
            Self::VolumeRatio => "Volume Ratio",
            Self::VolumeAboveAverage => "Volume vs VMA20",
            Self::ShortBias => "BIAS5",
            Self::LongBias => "BIAS20",
            Self::RocMomentum => "ROC",
            Self::RangePosition => "Range Position",
            Self::Volatility => "Volatility",
            Self::TrustBuying => "Trust Buying",
            Self::ForeignBuying => "Foreign Buying",
            Self::InstitutionalConsensus => "Institutional Consensus",
        }
    }

    /// Whether the indicator can produce a neutral outcome.
    pub fn is_three_way(&self) -> bool {
        matches!(self, Self::BandPosition)
    }

    /// Whether the indicator reads institutional flow.
    pub fn uses_flow(&self) -> bool {
        matches!(
            self,
            Self::TrustBuying | Self::ForeignBuying | Self::InstitutionalConsensus
        )
    }

    /// Built-in labels.
    pub fn default_labels(&self) -> IndicatorLabels {
        let (bullish, bearish) = match self {
            Self::Trend => ("Above MA20", "Below MA20"),
            Self::MaAlignment => ("MA5 > MA10 > MA20", "Averages not aligned"),
            Self::Ma5Slope => ("MA5 rising", "MA5 flat or falling"),
            Self::Ma20Slope => ("MA20 rising", "MA20 flat or falling"),
            Self::BandPosition => {
                return IndicatorLabels::three_way(
                    "Breaking above upper band",
                    "Between MA20 and upper band",
                    "Below MA20",
                )
            }
            Self::BandWidth => ("Bands widening", "Bands narrowing"),
            Self::KdCross => ("K above D", "K below D"),
            Self::KdRising => ("K rising", "K falling"),
            Self::KStrength => ("K above 50", "K below 50"),
            Self::MacdHistogram => ("MACD histogram positive", "MACD histogram negative"),
            Self::MacdMomentum => ("MACD histogram rising", "MACD histogram falling"),
            Self::RsiStrength => ("RSI above 50", "RSI below 50"),
            Self::RsiOverbought => ("RSI below 80", "RSI overbought"),
            Self::ObvTrend => ("OBV rising", "OBV flat or falling"),
            Self::MfiStrength => ("MFI above 50", "MFI below 50"),
            Self::VolumeRatio => ("Volume expanding", "Volume contracting"),
            Self::VolumeAboveAverage => ("Volume above VMA20", "Volume below VMA20"),
            Self::ShortBias => ("Close above MA5", "Close below MA5"),
            Self::LongBias => ("Not overextended", "Overextended above MA20"),
            Self::RocMomentum => ("12-day ROC positive", "12-day ROC negative"),
            Self::RangePosition => ("Upper half of 60-day range", "Lower half of 60-day range"),
            Self::Volatility => ("Volatility contained", "Volatility elevated"),
            Self::TrustBuying => ("Investment trusts buying", "No trust buying"),
            Self::ForeignBuying => ("Foreign institutions buying", "No foreign buying"),
            Self::InstitutionalConsensus => ("Institutions net buying", "No institutional consensus"),
        };
        IndicatorLabels::two_way(bullish, bearish)
    }

    /// Evaluate the predicate.
    ///
    /// Comparisons against undefined (`NaN`) values are false and read as
    /// bearish. Flow indicators are bearish when flow is unavailable.
    pub fn evaluate(
        &self,
        current: &AugmentedBar,
        previous: &AugmentedBar,
        flow: Option<&InstitutionalFlow>,
    ) -> Signal {
        let close = current.bar.close;
        let now = &current.indicators;
        let before = &previous.indicators;

        let condition = match self {
            Self::Trend => close > now.ma20,
            Self::MaAlignment => now.ma5 > now.ma10 && now.ma10 > now.ma20,
            Self::Ma5Slope => now.ma5 > before.ma5,
            Self::Ma20Slope => now.ma20 > before.ma20,
            Self::BandPosition => {
                return if close > now.bb_up {
                    Signal::Bullish
                } else if close > now.ma20 {
                    Signal::Neutral
                } else {
                    Signal::Bearish
                };
            }
            Self::BandWidth => now.bb_width > before.bb_width,
            Self::KdCross => now.k > now.d,
            Self::KdRising => now.k > before.k,
            Self::KStrength => now.k > 50.0,
            Self::MacdHistogram => now.macd_hist > 0.0,
            Self::MacdMomentum => now.macd_hist > before.macd_hist,
            Self::RsiStrength => now.rsi > 50.0,
            Self::RsiOverbought => now.rsi < 80.0,
            Self::ObvTrend => now.obv > before.obv,
            Self::MfiStrength => now.mfi > 50.0,
            Self::VolumeRatio => now.vol_ratio > 1.0,
            Self::VolumeAboveAverage => current.bar.volume > now.vma20,
            Self::ShortBias => now.bias5 > 0.0,
            Self::LongBias => now.bias20 < 10.0,
            Self::RocMomentum => now.roc > 0.0,
            Self::RangePosition => now.sr_rank > 0.5,
            Self::Volatility => close > 0.0 && now.atr / close < 0.05,
            Self::TrustBuying => flow.is_some_and(|f| f.trust_buying),
            Self::ForeignBuying => flow.is_some_and(|f| f.foreign_buying),
            Self::InstitutionalConsensus => flow.is_some_and(|f| f.institutional_consensus),
        };

        Signal::from_condition(condition)
    }
}

impl fmt::Display for IndicatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndicatorId {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == key)
            .ok_or_else(|| ScoringError::UnknownIndicator(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pulse_core::types::{Bar, IndicatorSnapshot};

    fn row(close: f64, indicators: IndicatorSnapshot) -> AugmentedBar {
        let date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        AugmentedBar {
            bar: Bar::new(date, close, close, close, close, 1_000.0),
            indicators,
        }
    }

    fn bands(ma20: f64, bb_up: f64) -> IndicatorSnapshot {
        IndicatorSnapshot {
            ma20,
            bb_up,
            ..IndicatorSnapshot::splat(1.0)
        }
    }

    #[test]
    fn test_band_position_is_three_way() {
        let previous = row(100.0, bands(98.0, 102.0));
        let id = IndicatorId::BandPosition;

        assert_eq!(id.evaluate(&row(103.0, bands(98.0, 102.0)), &previous, None), Signal::Bullish);
        assert_eq!(id.evaluate(&row(101.0, bands(98.0, 102.0)), &previous, None), Signal::Neutral);
        assert_eq!(id.evaluate(&row(97.0, bands(98.0, 102.0)), &previous, None), Signal::Bearish);
        assert!(id.is_three_way());
        assert!(id.default_labels().neutral.is_some());
    }

    #[test]
    fn test_only_band_position_is_three_way() {
        let three_way: Vec<_> = IndicatorId::ALL.iter().filter(|id| id.is_three_way()).collect();
        assert_eq!(three_way, vec![&IndicatorId::BandPosition]);
    }

    #[test]
    fn test_undefined_values_are_bearish() {
        let undefined = row(100.0, IndicatorSnapshot::splat(f64::NAN));

        for id in IndicatorId::ALL {
            assert_eq!(
                id.evaluate(&undefined, &undefined, None),
                Signal::Bearish,
                "{} should be bearish on undefined input",
                id
            );
        }
    }

    #[test]
    fn test_flow_indicators() {
        let bar = row(100.0, IndicatorSnapshot::splat(1.0));
        let flow = InstitutionalFlow::new(true, false, true);

        assert_eq!(IndicatorId::TrustBuying.evaluate(&bar, &bar, Some(&flow)), Signal::Bullish);
        assert_eq!(IndicatorId::ForeignBuying.evaluate(&bar, &bar, Some(&flow)), Signal::Bearish);
        assert_eq!(IndicatorId::TrustBuying.evaluate(&bar, &bar, None), Signal::Bearish);
    }

    #[test]
    fn test_slope_uses_previous_row() {
        let previous = row(100.0, IndicatorSnapshot { ma5: 99.0, ..IndicatorSnapshot::splat(1.0) });
        let current = row(100.0, IndicatorSnapshot { ma5: 99.5, ..IndicatorSnapshot::splat(1.0) });

        assert_eq!(IndicatorId::Ma5Slope.evaluate(&current, &previous, None), Signal::Bullish);
        assert_eq!(IndicatorId::Ma5Slope.evaluate(&previous, &current, None), Signal::Bearish);
    }

    #[test]
    fn test_parse_ids() {
        assert_eq!("kd_cross".parse::<IndicatorId>().unwrap(), IndicatorId::KdCross);
        assert_eq!("MA5-Slope".parse::<IndicatorId>().unwrap(), IndicatorId::Ma5Slope);
        assert!("unknown".parse::<IndicatorId>().is_err());

        for id in IndicatorId::ALL {
            assert_eq!(id.as_str().parse::<IndicatorId>().unwrap(), id);
            let json = serde_json::to_value(id).unwrap();
            assert_eq!(json, id.as_str());
        }
    }
}
