//! CSV price-history source.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use pulse_core::error::DataError;
use pulse_core::traits::PriceHistorySource;
use pulse_core::types::{Bar, BarSeries};
use serde::Deserialize;
use tracing::debug;

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close", alias = "Adj Close")]
    close: f64,
    #[serde(alias = "Volume", default)]
    volume: f64,
}

/// Daily bars read from CSV.
///
/// The path is either one file, served for every symbol, or a directory
/// holding `{symbol}.csv` files.
#[derive(Debug, Clone)]
pub struct CsvPriceSource {
    root: PathBuf,
}

impl CsvPriceSource {
    /// Create a new CSV price source.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let root = path.as_ref().to_path_buf();
        if !root.exists() {
            return Err(DataError::NoDataAvailable);
        }
        Ok(Self { root })
    }

    /// Load every bar for a symbol, oldest first.
    pub fn load_all(&self, symbol: &str) -> Result<BarSeries, DataError> {
        let path = resolve_symbol_file(&self.root, symbol)?;
        let bars = load_bars(&path)?;
        if bars.is_empty() {
            return Err(DataError::NoDataAvailable);
        }

        debug!(symbol, path = %path.display(), bars = bars.len(), "loaded price history");
        BarSeries::new(symbol, bars)
    }
}

#[async_trait]
impl PriceHistorySource for CsvPriceSource {
    async fn daily_bars(&self, symbol: &str, lookback_days: u32) -> Result<BarSeries, DataError> {
        let series = self.load_all(symbol)?;
        if lookback_days == 0 {
            return Ok(series);
        }
        Ok(series.trailing_days(lookback_days))
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// Locate the file for `symbol` under `root`.
pub(crate) fn resolve_symbol_file(root: &Path, symbol: &str) -> Result<PathBuf, DataError> {
    if root.is_file() {
        return Ok(root.to_path_buf());
    }

    [symbol.to_string(), symbol.to_uppercase(), symbol.to_lowercase()]
        .iter()
        .map(|name| root.join(format!("{}.csv", name)))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| DataError::SymbolNotFound(symbol.to_string()))
}

fn load_bars(path: &Path) -> Result<Vec<Bar>, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| DataError::ParseError(e.to_string()))?;

    let mut bars = Vec::new();
    for result in reader.deserialize() {
        let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;
        bars.push(Bar::new(
            parse_date(&record.date)?,
            record.open,
            record.high,
            record.low,
            record.close,
            record.volume,
        ));
    }

    bars.sort_by_key(|b| b.date);
    Ok(bars)
}

/// Parse the date formats providers commonly emit.
pub(crate) fn parse_date(date_str: &str) -> Result<NaiveDate, DataError> {
    let formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];

    for format in formats {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d);
        }
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.date());
        }
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}
