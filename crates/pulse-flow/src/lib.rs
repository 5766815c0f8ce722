//! Institutional trade-flow aggregation.
//!
//! Turns raw per-day, per-category net buy records into the three
//! [`InstitutionalFlow`] flags used by the scoring engine.

mod aggregator;

pub use aggregator::{ChipFlowAggregator, FlowWindows};
pub use pulse_core::types::{FlowCategory, FlowRecord, InstitutionalFlow};
