//! Single-symbol analysis.

use pulse_core::error::PulseResult;
use pulse_core::types::{BarSeries, FlowRecord, InstitutionalFlow};
use pulse_flow::{ChipFlowAggregator, FlowWindows};
use pulse_indicators::{IndicatorEngine, IndicatorParams};
use pulse_pricing::{PriceRuleEngine, PricingParams};
use pulse_scoring::{IndicatorSet, PresetRegistry, ScoringEngine};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::report::AnalysisReport;

/// Analysis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub indicators: IndicatorParams,
    pub indicator_set: IndicatorSet,
    pub pricing: PricingParams,
    pub flow_windows: FlowWindows,
    /// Calendar days of price history to request
    pub price_lookback_days: u32,
    /// Calendar days of flow records to request
    pub flow_lookback_days: u32,
    /// Fetch institutional flow at all
    pub flow_enabled: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            indicators: IndicatorParams::default(),
            indicator_set: PresetRegistry::full(),
            pricing: PricingParams::default(),
            flow_windows: FlowWindows::default(),
            price_lookback_days: 180,
            flow_lookback_days: 45,
            flow_enabled: true,
        }
    }
}

/// Runs every engine over one symbol.
///
/// Holds no state between calls.
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalysisConfig,
    indicators: IndicatorEngine,
    flow: ChipFlowAggregator,
    scoring: ScoringEngine,
    pricing: PriceRuleEngine,
}

impl Analyzer {
    /// Create an analyzer, validating every engine's parameters.
    pub fn new(config: AnalysisConfig) -> PulseResult<Self> {
        Ok(Self {
            indicators: IndicatorEngine::new(config.indicators.clone())?,
            flow: ChipFlowAggregator::new(config.flow_windows),
            scoring: ScoringEngine::new(config.indicator_set.clone()),
            pricing: PriceRuleEngine::new(config.pricing.clone())?,
            config,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn flow_aggregator(&self) -> &ChipFlowAggregator {
        &self.flow
    }

    /// Analyze a series with already-aggregated flow.
    pub fn analyze(
        &self,
        series: &BarSeries,
        flow: Option<InstitutionalFlow>,
    ) -> PulseResult<AnalysisReport> {
        let frame = self.indicators.compute(series)?;
        let current = frame.current();

        if flow.is_none() {
            warn!(symbol = series.symbol(), "scoring without institutional flow");
        }

        let score = self.scoring.score(current, frame.previous(), flow.as_ref());
        let prices = self.pricing.compute(current)?;

        info!(
            symbol = series.symbol(),
            date = %current.bar.date,
            score = score.score,
            rating = %score.rating,
            entry = %prices.entry,
            "analysis complete"
        );

        Ok(AnalysisReport {
            symbol: series.symbol().to_string(),
            as_of: current.bar.date,
            bars: series.len(),
            latest: *current,
            flow,
            score,
            prices,
        })
    }

    /// Analyze a series with raw flow records.
    pub fn analyze_with_records(
        &self,
        series: &BarSeries,
        records: &[FlowRecord],
    ) -> PulseResult<AnalysisReport> {
        self.analyze(series, self.flow.aggregate(records))
    }
}
