//! CSV institutional trade-flow source.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use csv::ReaderBuilder;
use pulse_core::error::DataError;
use pulse_core::traits::FlowSource;
use pulse_core::types::{FlowCategory, FlowRecord};
use serde::Deserialize;
use tracing::debug;

use crate::csv_source::{parse_date, resolve_symbol_file};

#[derive(Debug, Deserialize)]
struct FlowCsvRecord {
    #[serde(alias = "Date")]
    date: String,
    #[serde(alias = "Category", alias = "name", alias = "investor")]
    category: String,
    #[serde(alias = "net", alias = "net_buy", default)]
    net_buy_amount: Option<f64>,
    #[serde(alias = "Buy", default)]
    buy: Option<f64>,
    #[serde(alias = "Sell", default)]
    sell: Option<f64>,
}

impl FlowCsvRecord {
    fn into_record(self) -> Result<FlowRecord, DataError> {
        let net = match (self.net_buy_amount, self.buy, self.sell) {
            (Some(net), _, _) => net,
            (None, Some(buy), Some(sell)) => buy - sell,
            _ => {
                return Err(DataError::ParseError(format!(
                    "flow row for {} on {} has neither net_buy_amount nor buy/sell",
                    self.category, self.date
                )))
            }
        };
        Ok(FlowRecord::new(
            parse_date(&self.date)?,
            FlowCategory::parse(&self.category),
            net,
        ))
    }
}

/// Institutional flow read from CSV.
///
/// Rows carry `date`, `category` and either `net_buy_amount` or `buy` and
/// `sell` columns.
#[derive(Debug, Clone)]
pub struct CsvFlowSource {
    root: PathBuf,
}

impl CsvFlowSource {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let root = path.as_ref().to_path_buf();
        if !root.exists() {
            return Err(DataError::NoDataAvailable);
        }
        Ok(Self { root })
    }

    /// Load every record for a symbol, oldest first.
    pub fn load_all(&self, symbol: &str) -> Result<Vec<FlowRecord>, DataError> {
        let path = resolve_symbol_file(&self.root, symbol)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let mut records = Vec::new();
        for result in reader.deserialize() {
            let row: FlowCsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;
            records.push(row.into_record()?);
        }
        records.sort_by_key(|r| r.date);

        debug!(symbol, path = %path.display(), records = records.len(), "loaded flow records");
        Ok(records)
    }
}

#[async_trait]
impl FlowSource for CsvFlowSource {
    async fn flow_records(
        &self,
        symbol: &str,
        lookback_days: u32,
    ) -> Result<Vec<FlowRecord>, DataError> {
        let records = self.load_all(symbol)?;
        let Some(latest) = records.last().map(|r| r.date) else {
            return Ok(records);
        };
        if lookback_days == 0 {
            return Ok(records);
        }

        let cutoff = latest - chrono::Duration::days(i64::from(lookback_days));
        Ok(records.into_iter().filter(|r| r.date > cutoff).collect())
    }

    fn name(&self) -> &str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;

    #[tokio::test]
    async fn test_net_and_buy_sell_columns() {
        let dir = tempfile::tempdir().unwrap();
        let csv = "date,category,buy,sell,net_buy_amount\n\
            2024-03-01,Investment_Trust,500,200,\n\
            2024-03-01,Foreign_Investor,,,-750\n";
        fs::write(dir.path().join("2330.csv"), csv).unwrap();

        let source = CsvFlowSource::new(dir.path()).unwrap();
        let records = source.flow_records("2330", 45).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].category, FlowCategory::InvestmentTrust);
        assert_eq!(records[0].net_buy_amount, 300.0);
        assert_eq!(records[1].category, FlowCategory::ForeignInstitutional);
        assert_eq!(records[1].net_buy_amount, -750.0);
    }

    #[tokio::test]
    async fn test_lookback_window() {
        let dir = tempfile::tempdir().unwrap();
        let csv = "date,category,net_buy_amount\n\
            2024-01-01,dealer,10\n\
            2024-03-01,dealer,20\n\
            2024-03-05,dealer,30\n";
        fs::write(dir.path().join("2317.csv"), csv).unwrap();

        let source = CsvFlowSource::new(dir.path()).unwrap();
        let records = source.flow_records("2317", 10).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[tokio::test]
    async fn test_row_without_amount_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("X.csv"), "date,category,buy\n2024-01-01,dealer,10\n").unwrap();

        let source = CsvFlowSource::new(dir.path()).unwrap();
        let err = source.flow_records("X", 0).await.unwrap_err();
        assert!(matches!(err, DataError::ParseError(_)));
    }

    #[tokio::test]
    async fn test_missing_symbol() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvFlowSource::new(dir.path()).unwrap();

        assert!(matches!(
            source.flow_records("2330", 45).await,
            Err(DataError::SymbolNotFound(_))
        ));
    }
}
