//! Core data types for the strength engine.

mod flow;
mod ohlcv;
mod snapshot;

pub use flow::{FlowCategory, FlowRecord, InstitutionalFlow};
pub use ohlcv::{Bar, BarSeries};
pub use snapshot::{AugmentedBar, IndicatorFrame, IndicatorSnapshot};
