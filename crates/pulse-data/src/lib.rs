//! Data providers backed by CSV files.
//!
//! - [`CsvPriceSource`]: daily OHLCV bars, one file per symbol
//! - [`CsvFlowSource`]: institutional net buy records, one file per symbol

pub mod csv_source;
pub mod flow_source;

pub use csv_source::CsvPriceSource;
pub use flow_source::CsvFlowSource;
