//! Concurrent multi-symbol analysis.

use std::sync::Arc;

use pulse_core::error::{PulseError, PulseResult};
use pulse_core::traits::{FlowSource, PriceHistorySource};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::analyzer::Analyzer;
use crate::report::AnalysisReport;

/// Result for one requested symbol.
#[derive(Debug)]
pub struct SymbolOutcome {
    pub symbol: String,
    pub result: PulseResult<AnalysisReport>,
}

/// Fetches and analyzes many symbols.
///
/// Each symbol is fetched through the providers and computed on the
/// blocking pool. A failing symbol never aborts the batch.
pub struct BatchRunner {
    analyzer: Arc<Analyzer>,
    prices: Arc<dyn PriceHistorySource>,
    flow: Option<Arc<dyn FlowSource>>,
    permits: Arc<Semaphore>,
}

impl BatchRunner {
    /// Default number of symbols in flight.
    pub const DEFAULT_CONCURRENCY: usize = 8;

    pub fn new(analyzer: Analyzer, prices: Arc<dyn PriceHistorySource>) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            prices,
            flow: None,
            permits: Arc::new(Semaphore::new(Self::DEFAULT_CONCURRENCY)),
        }
    }

    /// Attach an institutional flow provider.
    pub fn with_flow(mut self, flow: Arc<dyn FlowSource>) -> Self {
        self.flow = Some(flow);
        self
    }

    /// Limit how many symbols are processed at once.
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.permits = Arc::new(Semaphore::new(limit.max(1)));
        self
    }

    /// Analyze every symbol; outcomes keep the input order.
    pub async fn run(&self, symbols: &[String]) -> Vec<SymbolOutcome> {
        info!(
            symbols = symbols.len(),
            prices = self.prices.name(),
            flow = self.flow.as_ref().map(|f| f.name()).unwrap_or("none"),
            "starting batch"
        );

        let mut tasks = JoinSet::new();
        for (index, symbol) in symbols.iter().enumerate() {
            let symbol = symbol.clone();
            let analyzer = Arc::clone(&self.analyzer);
            let prices = Arc::clone(&self.prices);
            let flow = self.flow.clone();
            let permits = Arc::clone(&self.permits);

            tasks.spawn(async move {
                let _permit = permits.acquire_owned().await;
                let result = analyze_symbol(analyzer, prices, flow, &symbol).await;
                (index, SymbolOutcome { symbol, result })
            });
        }

        let mut outcomes: Vec<Option<SymbolOutcome>> = symbols.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => {
                    if let Err(e) = &outcome.result {
                        warn!(symbol = %outcome.symbol, error = %e, "symbol failed");
                    }
                    outcomes[index] = Some(outcome);
                }
                Err(e) => warn!(error = %e, "analysis task aborted"),
            }
        }

        let outcomes: Vec<SymbolOutcome> = outcomes
            .into_iter()
            .zip(symbols)
            .map(|(outcome, symbol)| {
                outcome.unwrap_or_else(|| SymbolOutcome {
                    symbol: symbol.clone(),
                    result: Err(PulseError::Internal("analysis task aborted".into())),
                })
            })
            .collect();

        let succeeded = outcomes.iter().filter(|o| o.result.is_ok()).count();
        info!(succeeded, failed = outcomes.len() - succeeded, "batch complete");
        outcomes
    }
}

async fn analyze_symbol(
    analyzer: Arc<Analyzer>,
    prices: Arc<dyn PriceHistorySource>,
    flow_source: Option<Arc<dyn FlowSource>>,
    symbol: &str,
) -> PulseResult<AnalysisReport> {
    let config = analyzer.config();
    let series = prices.daily_bars(symbol, config.price_lookback_days).await?;

    let flow = match flow_source.filter(|_| config.flow_enabled) {
        Some(source) => {
            let fetched = source.flow_records(symbol, config.flow_lookback_days).await;
            analyzer.flow_aggregator().from_fetch(symbol, fetched)
        }
        None => None,
    };
    debug!(symbol, bars = series.len(), flow = flow.is_some(), "fetched inputs");

    tokio::task::spawn_blocking(move || analyzer.analyze(&series, flow))
        .await
        .map_err(|e| PulseError::Internal(format!("analysis task failed: {}", e)))?
}
