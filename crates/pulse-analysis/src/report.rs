//! Analysis report generation.

use chrono::NaiveDate;
use pulse_core::types::{AugmentedBar, InstitutionalFlow};
use pulse_pricing::{EntryBranch, StrategyPrices};
use pulse_scoring::{ScoreResult, Signal};
use serde::{Deserialize, Serialize};

/// Complete analysis of one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub symbol: String,
    /// Date of the latest bar
    pub as_of: NaiveDate,
    /// Bars of history used
    pub bars: usize,
    /// Latest bar with its indicators
    pub latest: AugmentedBar,
    /// `None` when flow was unavailable
    pub flow: Option<InstitutionalFlow>,
    pub score: ScoreResult,
    pub prices: StrategyPrices,
}

impl AnalysisReport {
    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();
        let bar = &self.latest.bar;
        let ind = &self.latest.indicators;

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str(&format!(
            "  {:<10} {}   close {:.2}\n",
            self.symbol, self.as_of, bar.close
        ));
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str("STRENGTH\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!(
            "  Score:               {} / 100 ({})\n",
            self.score.score, self.score.rating
        ));
        s.push_str(&format!("  Comment:             {}\n", self.score.comment));
        s.push_str(&format!(
            "  Indicator Set:       {} ({} indicators)\n",
            self.score.indicator_set,
            self.score.verdicts.len()
        ));
        s.push('\n');

        s.push_str("STRATEGY PRICES\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        let branch = match self.prices.branch {
            EntryBranch::BandMidpoint => "band midpoint",
            EntryBranch::Pullback => "pullback",
        };
        s.push_str(&format!(
            "  Entry:               {} ({})\n",
            self.prices.entry, branch
        ));
        s.push_str(&format!("  Stop Loss:           {}\n", self.prices.stop_loss));
        s.push_str(&format!("  Take Profit:         {}\n", self.prices.take_profit));
        s.push('\n');

        s.push_str("KEY LEVELS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  MA20:                {:.2}\n", ind.ma20));
        s.push_str(&format!(
            "  Bollinger:           {:.2} / {:.2}\n",
            ind.bb_low, ind.bb_up
        ));
        s.push_str(&format!("  ATR:                 {:.2}\n", ind.atr));
        s.push_str(&format!("  RSI:                 {:.1}\n", ind.rsi));
        s.push_str(&format!("  K / D:               {:.1} / {:.1}\n", ind.k, ind.d));
        s.push('\n');

        s.push_str("INSTITUTIONAL FLOW\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        match &self.flow {
            Some(flow) => {
                s.push_str(&format!("  Trust Buying:        {}\n", yes_no(flow.trust_buying)));
                s.push_str(&format!("  Foreign Buying:      {}\n", yes_no(flow.foreign_buying)));
                s.push_str(&format!(
                    "  Consensus:           {}\n",
                    yes_no(flow.institutional_consensus)
                ));
            }
            None => s.push_str("  Unavailable\n"),
        }
        s.push('\n');

        s.push_str("VERDICTS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        for verdict in &self.score.verdicts {
            let marker = match verdict.verdict.signal() {
                Signal::Bullish => "+",
                Signal::Neutral => "~",
                Signal::Bearish => "-",
            };
            s.push_str(&format!(
                "  {} {:<24} {}\n",
                marker,
                verdict.name,
                verdict.verdict.label()
            ));
        }
        s.push('\n');

        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
