//! Core traits for the strength engine.

mod data_source;
mod indicator;

pub use data_source::{FlowSource, PriceHistorySource};
pub use indicator::{Indicator, MultiOutputIndicator};
