//! Analysis pipeline.
//!
//! [`Analyzer`] runs the indicator, flow, scoring and price engines over one
//! symbol's history. [`BatchRunner`] fetches many symbols through the
//! provider traits and analyzes them concurrently.

mod analyzer;
mod batch;
mod report;

pub use analyzer::{AnalysisConfig, Analyzer};
pub use batch::{BatchRunner, SymbolOutcome};
pub use report::AnalysisReport;
