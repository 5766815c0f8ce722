//! External data provider traits.
//!
//! The engine never fetches anything itself; callers materialize the
//! history through these providers first and pass it in.

use async_trait::async_trait;

use crate::error::DataError;
use crate::types::{BarSeries, FlowRecord};

/// Trait for daily price-history providers.
#[async_trait]
pub trait PriceHistorySource: Send + Sync {
    /// Fetch daily bars.
    ///
    /// # Arguments
    /// * `symbol` - The symbol to fetch
    /// * `lookback_days` - Calendar days of history ending at the latest bar
    ///
    /// # Returns
    /// A series ordered from oldest to newest
    async fn daily_bars(&self, symbol: &str, lookback_days: u32) -> Result<BarSeries, DataError>;

    /// Get the data source name.
    fn name(&self) -> &str;
}

/// Trait for institutional trade-flow providers.
#[async_trait]
pub trait FlowSource: Send + Sync {
    /// Fetch per-category net buy records.
    async fn flow_records(
        &self,
        symbol: &str,
        lookback_days: u32,
    ) -> Result<Vec<FlowRecord>, DataError>;

    /// Get the source name.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Bar, FlowCategory};
    use chrono::NaiveDate;

    struct StaticSource;

    #[async_trait]
    impl PriceHistorySource for StaticSource {
        async fn daily_bars(&self, symbol: &str, _lookback_days: u32) -> Result<BarSeries, DataError> {
            let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
            BarSeries::new(symbol, vec![Bar::new(date, 1.0, 1.0, 1.0, 1.0, 1.0)])
        }

        fn name(&self) -> &str {
            "static"
        }
    }

    #[async_trait]
    impl FlowSource for StaticSource {
        async fn flow_records(
            &self,
            _symbol: &str,
            _lookback_days: u32,
        ) -> Result<Vec<FlowRecord>, DataError> {
            let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
            Ok(vec![FlowRecord::new(date, FlowCategory::Dealer, 5.0)])
        }

        fn name(&self) -> &str {
            "static"
        }
    }

    #[tokio::test]
    async fn test_providers_as_trait_objects() {
        let prices: Box<dyn PriceHistorySource> = Box::new(StaticSource);
        let flows: Box<dyn FlowSource> = Box::new(StaticSource);

        let series = prices.daily_bars("2330", 30).await.unwrap();
        assert_eq!(series.symbol(), "2330");
        assert_eq!(flows.flow_records("2330", 30).await.unwrap().len(), 1);
    }
}
