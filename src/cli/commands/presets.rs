//! List indicator-set presets command.

use anyhow::Result;
use pulse_scoring::{IndicatorId, PresetRegistry};

pub async fn run() -> Result<()> {
    let registry = PresetRegistry::new();

    println!("Indicator Presets");
    println!("═════════════════");
    println!();

    for preset in registry.list() {
        println!("  {} (v{}, {} indicators)", preset.name, preset.version, preset.indicators.len());
        println!("    {}", preset.description);
        println!();
    }

    println!("Indicators");
    println!("──────────");
    for id in IndicatorId::ALL {
        println!("  {:<22} {}", id.as_str(), id.name());
    }

    println!();
    println!("Usage: pulse analyze -S 2330 --preset <name>");
    println!("       pulse analyze -S 2330 --indicators trend,rsi_strength,macd_histogram");

    Ok(())
}
