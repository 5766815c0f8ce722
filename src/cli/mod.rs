//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pulse")]
#[command(author, version, about = "Daily technical-strength scores and strategy prices")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "PULSE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (defaults to the configured level)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score symbols and compute strategy prices
    Analyze(AnalyzeArgs),
    /// List indicator-set presets
    Presets,
    /// Validate configuration
    ValidateConfig,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(clap::Args)]
pub struct AnalyzeArgs {
    /// Symbols to analyze (comma-separated)
    #[arg(short = 'S', long, value_delimiter = ',', required = true)]
    pub symbols: Vec<String>,

    /// Price data: a CSV file or a directory of {symbol}.csv files
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Institutional flow directory of {symbol}.csv files
    #[arg(long)]
    pub flow: Option<PathBuf>,

    /// Skip institutional flow
    #[arg(long)]
    pub no_flow: bool,

    /// Indicator-set preset (full, standard, compact)
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Custom indicator ids (comma-separated); overrides the preset
    #[arg(long, value_delimiter = ',')]
    pub indicators: Vec<String>,

    /// Calendar days of price history
    #[arg(long)]
    pub lookback: Option<u32>,

    /// Symbols processed concurrently
    #[arg(long, default_value = "8")]
    pub concurrency: usize,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Save JSON results to file
    #[arg(long)]
    pub save: Option<PathBuf>,
}
