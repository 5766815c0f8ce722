use std::collections::BTreeMap;

use chrono::NaiveDate;
use pulse_core::error::DataError;
use pulse_core::types::{FlowCategory, FlowRecord, InstitutionalFlow};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Trailing window lengths, in trading dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowWindows {
    /// Dates summed for investment-trust buying
    pub trust_days: usize,
    /// Dates summed for foreign-institutional buying
    pub foreign_days: usize,
    /// Dates summed across every category
    pub consensus_days: usize,
}

impl Default for FlowWindows {
    fn default() -> Self {
        Self {
            trust_days: 3,
            foreign_days: 5,
            consensus_days: 3,
        }
    }
}

type DailyFlow = BTreeMap<NaiveDate, BTreeMap<FlowCategory, f64>>;

/// Derives institutional buying flags from trade-flow records.
#[derive(Debug, Clone, Default)]
pub struct ChipFlowAggregator {
    windows: FlowWindows,
}

impl ChipFlowAggregator {
    pub fn new(windows: FlowWindows) -> Self {
        Self { windows }
    }

    pub fn windows(&self) -> &FlowWindows {
        &self.windows
    }

    /// Aggregate records into flags.
    ///
    /// Returns `None` when there are no records at all. A category with no
    /// records yields a `false` flag.
    pub fn aggregate(&self, records: &[FlowRecord]) -> Option<InstitutionalFlow> {
        if records.is_empty() {
            debug!("no institutional flow records");
            return None;
        }

        let mut daily = DailyFlow::new();
        for record in records {
            *daily
                .entry(record.date)
                .or_default()
                .entry(record.category.clone())
                .or_insert(0.0) += record.net_buy_amount;
        }

        let trust = category_sum(&daily, &FlowCategory::InvestmentTrust, self.windows.trust_days);
        let foreign = category_sum(
            &daily,
            &FlowCategory::ForeignInstitutional,
            self.windows.foreign_days,
        );
        let total = total_sum(&daily, self.windows.consensus_days);

        debug!(trust, foreign, total, dates = daily.len(), "aggregated institutional flow");

        Some(InstitutionalFlow::new(trust > 0.0, foreign > 0.0, total > 0.0))
    }

    /// Aggregate the outcome of a provider fetch.
    ///
    /// A failed fetch is logged and treated as unavailable flow.
    pub fn from_fetch(
        &self,
        symbol: &str,
        fetched: Result<Vec<FlowRecord>, DataError>,
    ) -> Option<InstitutionalFlow> {
        match fetched {
            Ok(records) => self.aggregate(&records),
            Err(e) => {
                warn!(symbol, error = %e, "institutional flow unavailable");
                None
            }
        }
    }
}

/// Sum of one category over the latest `days` dates on which it traded.
fn category_sum(daily: &DailyFlow, category: &FlowCategory, days: usize) -> f64 {
    daily
        .values()
        .rev()
        .filter_map(|categories| categories.get(category))
        .take(days)
        .sum()
}

/// Sum of every category over the latest `days` dates.
fn total_sum(daily: &DailyFlow, days: usize) -> f64 {
    daily
        .values()
        .rev()
        .take(days)
        .map(|categories| categories.values().sum::<f64>())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn record(day: u32, category: FlowCategory, amount: f64) -> FlowRecord {
        FlowRecord::new(date(day), category, amount)
    }

    #[test]
    fn test_empty_records_are_unavailable() {
        let aggregator = ChipFlowAggregator::default();
        assert_eq!(aggregator.aggregate(&[]), None);
    }

    #[test]
    fn test_trust_uses_latest_three_dates() {
        let aggregator = ChipFlowAggregator::default();
        let records = vec![
            record(1, FlowCategory::InvestmentTrust, 1_000_000.0),
            record(4, FlowCategory::InvestmentTrust, -10.0),
            record(5, FlowCategory::InvestmentTrust, -10.0),
            record(6, FlowCategory::InvestmentTrust, 5.0),
        ];

        let flow = aggregator.aggregate(&records).unwrap();
        assert!(!flow.trust_buying);
    }

    #[test]
    fn test_foreign_uses_five_dates() {
        let aggregator = ChipFlowAggregator::default();
        let records = vec![
            record(1, FlowCategory::ForeignInstitutional, 100.0),
            record(2, FlowCategory::ForeignInstitutional, -20.0),
            record(3, FlowCategory::ForeignInstitutional, -20.0),
            record(4, FlowCategory::ForeignInstitutional, -20.0),
            record(5, FlowCategory::ForeignInstitutional, -20.0),
        ];

        let flow = aggregator.aggregate(&records).unwrap();
        assert!(flow.foreign_buying);

        let shorter = ChipFlowAggregator::new(FlowWindows {
            foreign_days: 4,
            ..FlowWindows::default()
        });
        assert!(!shorter.aggregate(&records).unwrap().foreign_buying);
    }

    #[test]
    fn test_same_day_records_are_summed() {
        let aggregator = ChipFlowAggregator::default();
        let records = vec![
            record(1, FlowCategory::InvestmentTrust, 50.0),
            record(1, FlowCategory::InvestmentTrust, -80.0),
        ];

        let flow = aggregator.aggregate(&records).unwrap();
        assert!(!flow.trust_buying);
    }

    #[test]
    fn test_consensus_spans_all_categories() {
        let aggregator = ChipFlowAggregator::default();
        let records = vec![
            record(1, FlowCategory::ForeignInstitutional, -500.0),
            record(2, FlowCategory::Dealer, 300.0),
            record(3, FlowCategory::ForeignInstitutional, -100.0),
            record(4, FlowCategory::Other("hedge".into()), 200.0),
        ];

        let flow = aggregator.aggregate(&records).unwrap();
        // Dates 2..=4: 300 - 100 + 200
        assert!(flow.institutional_consensus);
        assert!(!flow.foreign_buying);
        assert!(!flow.trust_buying);
    }

    #[test]
    fn test_fetch_error_is_unavailable() {
        let aggregator = ChipFlowAggregator::default();
        let flow = aggregator.from_fetch("2330", Err(DataError::NoDataAvailable));

        assert_eq!(flow, None);
    }

    #[test]
    fn test_fetch_success() {
        let aggregator = ChipFlowAggregator::default();
        let records = vec![
            record(1, FlowCategory::InvestmentTrust, 10.0),
            record(1, FlowCategory::ForeignInstitutional, 10.0),
        ];

        let flow = aggregator.from_fetch("2330", Ok(records)).unwrap();
        assert_eq!(flow, InstitutionalFlow::new(true, true, true));
    }
}
