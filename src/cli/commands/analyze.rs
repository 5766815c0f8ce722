//! Analyze command.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use pulse_analysis::{AnalysisConfig, Analyzer, BatchRunner, SymbolOutcome};
use pulse_config::AppConfig;
use pulse_data::{CsvFlowSource, CsvPriceSource};
use pulse_scoring::PresetRegistry;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::cli::{AnalyzeArgs, OutputFormat};

pub async fn run(args: AnalyzeArgs, config: &AppConfig) -> Result<()> {
    let analysis_config = build_config(&args, config)?;
    let flow_enabled = analysis_config.flow_enabled;

    info!(
        symbols = args.symbols.len(),
        indicator_set = %analysis_config.indicator_set.name(),
        "Starting analysis"
    );

    let analyzer = Analyzer::new(analysis_config).context("Invalid analysis configuration")?;

    let prices_path = args.data.clone().unwrap_or_else(|| config.data.prices.clone());
    let prices = CsvPriceSource::new(&prices_path)
        .with_context(|| format!("Failed to open price data at {}", prices_path.display()))?;

    let mut runner = BatchRunner::new(analyzer, Arc::new(prices)).with_concurrency(args.concurrency);

    if flow_enabled {
        if let Some(flow_path) = args.flow.clone().or_else(|| config.data.flow.clone()) {
            match CsvFlowSource::new(&flow_path) {
                Ok(source) => runner = runner.with_flow(Arc::new(source)),
                // Flow is optional; score without it
                Err(e) => warn!(path = %flow_path.display(), error = %e, "Flow data unavailable"),
            }
        }
    }

    let outcomes = runner.run(&args.symbols).await;
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();

    match args.output {
        OutputFormat::Text => print_text(&outcomes),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&to_json(&outcomes))?),
    }

    if let Some(path) = &args.save {
        let rendered = serde_json::to_string_pretty(&to_json(&outcomes))?;
        std::fs::write(path, rendered)
            .with_context(|| format!("Failed to write results to {}", path.display()))?;
        println!("Results saved to: {:?}", path);
    }

    if failed == outcomes.len() {
        bail!("All {} symbols failed", failed);
    }
    if failed > 0 {
        warn!(failed, total = outcomes.len(), "Some symbols failed");
    }

    Ok(())
}

fn build_config(args: &AnalyzeArgs, config: &AppConfig) -> Result<AnalysisConfig> {
    let mut scoring = config.scoring.clone();
    if let Some(preset) = &args.preset {
        scoring.preset = preset.clone();
        scoring.custom = None;
    }
    if !args.indicators.is_empty() {
        scoring.custom = Some(args.indicators.clone());
    }
    let indicator_set = scoring.indicator_set(&PresetRegistry::new())?;

    Ok(AnalysisConfig {
        indicators: config.indicators.clone(),
        indicator_set,
        pricing: config.pricing.clone(),
        flow_windows: config.flow.windows,
        price_lookback_days: args.lookback.unwrap_or(config.data.lookback_days),
        flow_lookback_days: config.flow.lookback_days,
        flow_enabled: config.flow.enabled && !args.no_flow,
    })
}

fn print_text(outcomes: &[SymbolOutcome]) {
    for outcome in outcomes {
        match &outcome.result {
            Ok(report) => println!("{}", report.summary()),
            Err(e) => {
                println!("{}: analysis failed: {}", outcome.symbol, e);
                println!();
            }
        }
    }
}

fn to_json(outcomes: &[SymbolOutcome]) -> Value {
    Value::Array(
        outcomes
            .iter()
            .map(|outcome| match &outcome.result {
                Ok(report) => json!({ "symbol": outcome.symbol, "report": report }),
                Err(e) => json!({ "symbol": outcome.symbol, "error": e.to_string() }),
            })
            .collect(),
    )
}
