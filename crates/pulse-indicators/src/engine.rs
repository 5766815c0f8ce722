//! Per-bar indicator engine.

use pulse_core::error::IndicatorError;
use pulse_core::traits::{Indicator, MultiOutputIndicator};
use pulse_core::types::{AugmentedBar, BarSeries, IndicatorFrame, IndicatorSnapshot};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::momentum::{Macd, MfiProxy, Roc, Rsi, Stochastic};
use crate::moving_average::Sma;
use crate::position::{bias, RangeRank};
use crate::volatility::{Atr, BollingerBands};
use crate::volume::{volume_ratio, Obv};
use crate::window::{backward_fill, forward_fill};

/// Window lengths and constants for the indicator engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorParams {
    /// Short moving average (MA5)
    pub ma_short: usize,
    /// Medium moving average (MA10)
    pub ma_mid: usize,
    /// Long moving average, also the Bollinger window (MA20)
    pub ma_long: usize,
    /// Bollinger band width in standard deviations
    pub band_multiplier: f64,
    pub atr_period: usize,
    pub stochastic_period: usize,
    /// Center of mass for the K and D smoothing
    pub stochastic_com: f64,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub rsi_period: usize,
    pub mfi_period: usize,
    /// Volume average window (VMA20)
    pub volume_period: usize,
    pub roc_period: usize,
    /// Support/resistance rank window
    pub range_period: usize,
    /// Fewest bars the engine accepts
    pub min_history: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            ma_short: 5,
            ma_mid: 10,
            ma_long: 20,
            band_multiplier: 2.0,
            atr_period: 14,
            stochastic_period: 9,
            stochastic_com: 2.0,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            rsi_period: 14,
            mfi_period: 14,
            volume_period: 20,
            roc_period: 12,
            range_period: 60,
            min_history: 20,
        }
    }
}

impl IndicatorParams {
    /// Validate the parameters.
    pub fn validate(&self) -> Result<(), IndicatorError> {
        let windows = [
            ("ma_short", self.ma_short),
            ("ma_mid", self.ma_mid),
            ("atr_period", self.atr_period),
            ("stochastic_period", self.stochastic_period),
            ("macd_fast", self.macd_fast),
            ("macd_signal", self.macd_signal),
            ("rsi_period", self.rsi_period),
            ("mfi_period", self.mfi_period),
            ("volume_period", self.volume_period),
            ("roc_period", self.roc_period),
            ("range_period", self.range_period),
        ];
        if let Some((name, _)) = windows.iter().find(|(_, period)| *period == 0) {
            return Err(IndicatorError::InvalidParameter(format!(
                "{} must be greater than 0",
                name
            )));
        }
        if self.ma_long < 2 {
            return Err(IndicatorError::InvalidParameter(
                "ma_long must be at least 2".into(),
            ));
        }
        if self.macd_fast >= self.macd_slow {
            return Err(IndicatorError::InvalidParameter(
                "macd_fast must be less than macd_slow".into(),
            ));
        }
        if !(self.band_multiplier > 0.0) {
            return Err(IndicatorError::InvalidParameter(
                "band_multiplier must be positive".into(),
            ));
        }
        if !(self.stochastic_com >= 0.0) {
            return Err(IndicatorError::InvalidParameter(
                "stochastic_com must be non-negative".into(),
            ));
        }
        if self.min_history < 2 {
            return Err(IndicatorError::InvalidParameter(
                "min_history must be at least 2".into(),
            ));
        }
        Ok(())
    }

    /// Longest window any column needs before it is defined.
    pub fn longest_window(&self) -> usize {
        [
            self.ma_long,
            self.atr_period,
            self.stochastic_period,
            self.rsi_period + 1,
            self.mfi_period + 1,
            self.volume_period,
            self.roc_period + 1,
            self.range_period,
        ]
        .into_iter()
        .max()
        .unwrap_or(self.ma_long)
    }
}

/// Derives an [`IndicatorSnapshot`] for every bar of a series.
///
/// Every column is causal. Leading undefined values are forward- then
/// backward-filled, so the latest row is fully populated whenever the
/// series is at least [`IndicatorParams::longest_window`] bars long.
#[derive(Debug, Clone, Default)]
pub struct IndicatorEngine {
    params: IndicatorParams,
}

impl IndicatorEngine {
    /// Create an engine with validated parameters.
    pub fn new(params: IndicatorParams) -> Result<Self, IndicatorError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &IndicatorParams {
        &self.params
    }

    /// Compute the augmented series.
    ///
    /// Fails with [`IndicatorError::InsufficientData`] below `min_history`
    /// bars; windows are never shortened to fit.
    pub fn compute(&self, series: &BarSeries) -> Result<IndicatorFrame, IndicatorError> {
        let p = &self.params;
        let available = series.len();
        if available < p.min_history {
            return Err(IndicatorError::InsufficientData {
                required: p.min_history,
                available,
            });
        }

        let close = series.closes();
        let high = series.highs();
        let low = series.lows();
        let volume = series.volumes();

        let ma5 = Sma::new(p.ma_short).calculate(&close);
        let ma10 = Sma::new(p.ma_mid).calculate(&close);
        let ma20 = Sma::new(p.ma_long).calculate(&close);
        let vma20 = Sma::new(p.volume_period).calculate(&volume);

        let bands = BollingerBands::with_params(p.ma_long, p.band_multiplier).calculate(&close);
        let stochastic = Stochastic::with_params(p.stochastic_period, p.stochastic_com)
            .calculate_ohlc(&high, &low, &close);
        let macd = Macd::with_periods(p.macd_fast, p.macd_slow, p.macd_signal).calculate(&close);

        let bias5 = filled(bias(&close, &ma5));
        let bias20 = filled(bias(&close, &ma20));
        let vol_ratio = volume_ratio(&volume, &vma20);

        let bb_up = filled(bands.iter().map(|b| b.map(|b| b.upper)).collect());
        let bb_low = filled(bands.iter().map(|b| b.map(|b| b.lower)).collect());
        let bb_width = filled(bands.iter().map(|b| b.map(|b| b.width)).collect());
        let k = filled(stochastic.iter().map(|s| s.map(|s| s.k)).collect());
        let d = filled(stochastic.iter().map(|s| s.map(|s| s.d)).collect());
        let macd_hist = filled(macd.iter().map(|m| m.map(|m| m.histogram)).collect());

        let atr = filled(Atr::new(p.atr_period).calculate_bars(series.bars()));
        let rsi = filled(Rsi::new(p.rsi_period).calculate(&close));
        let mfi = filled(MfiProxy::new(p.mfi_period).calculate(&close));
        let roc = filled(Roc::new(p.roc_period).calculate(&close));
        let sr_rank = filled(RangeRank::new(p.range_period).calculate_ohlc(&high, &low, &close));
        let obv = Obv.calculate(&close, &volume);

        let ma5 = filled(ma5);
        let ma10 = filled(ma10);
        let ma20 = filled(ma20);
        let vma20 = filled(vma20);

        let rows: Vec<AugmentedBar> = series
            .iter()
            .enumerate()
            .map(|(i, bar)| AugmentedBar {
                bar: *bar,
                indicators: IndicatorSnapshot {
                    ma5: ma5[i],
                    ma10: ma10[i],
                    ma20: ma20[i],
                    bb_up: bb_up[i],
                    bb_low: bb_low[i],
                    bb_width: bb_width[i],
                    atr: atr[i],
                    k: k[i],
                    d: d[i],
                    macd_hist: macd_hist[i],
                    rsi: rsi[i],
                    obv: obv[i],
                    mfi: mfi[i],
                    vma20: vma20[i],
                    bias5: bias5[i],
                    bias20: bias20[i],
                    vol_ratio: vol_ratio[i],
                    roc: roc[i],
                    sr_rank: sr_rank[i],
                },
            })
            .collect();

        let frame = IndicatorFrame::new(series.symbol(), rows)?;

        let undefined = frame.current().indicators.undefined_fields();
        if !undefined.is_empty() {
            warn!(
                symbol = series.symbol(),
                bars = available,
                recommended = p.longest_window(),
                ?undefined,
                "history too short for some indicator windows"
            );
        }
        debug!(symbol = series.symbol(), bars = available, "computed indicator frame");

        Ok(frame)
    }
}

/// Forward-fill, then backward-fill; columns that never filled become `NaN`.
fn filled(mut column: Vec<Option<f64>>) -> Vec<f64> {
    forward_fill(&mut column);
    backward_fill(&mut column);
    column.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect()
}
