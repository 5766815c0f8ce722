//! Technical indicators and the per-bar indicator engine.
//!
//! This crate provides causal, window-aligned implementations of:
//! - Moving averages (SMA, recursive EMA, adjusted EWM)
//! - Momentum indicators (RSI, MACD, Stochastic, ROC, the MFI proxy)
//! - Volatility indicators (ATR, Bollinger Bands, rolling standard deviation)
//! - Volume and position indicators (OBV, volume ratio, bias, range rank)
//!
//! [`IndicatorEngine`] combines them into one [`IndicatorFrame`] per series.
//!
//! [`IndicatorFrame`]: pulse_core::IndicatorFrame

mod engine;
mod guard;
pub mod momentum;
pub mod moving_average;
pub mod position;
pub mod simd;
pub mod volatility;
pub mod volume;
mod window;

pub use engine::{IndicatorEngine, IndicatorParams};
pub use guard::{guard_denominator, PRICE_FLOOR, RSI_LOSS_FLOOR};
pub use momentum::{Macd, MacdOutput, MfiProxy, Roc, Rsi, Stochastic, StochasticOutput};
pub use moving_average::{Ema, Ewm, Sma};
pub use position::{bias, RangeRank};
pub use volatility::{Atr, BollingerBands, BollingerOutput, RollingStd};
pub use volume::{volume_ratio, Obv};
