//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_output_adapter::JsonOutputAdapter;
use crate::domain::config_validation::{data_dir, date_range, feature_set, validate_config};
use crate::domain::error::StockcastError;
use crate::domain::features::{build_features, overlay, FeatureSet, OverlayPoint, PredictionRequest};
use crate::domain::indicator::IndicatorType;
use crate::domain::price_bar::{is_strictly_increasing, PriceBar};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::feature_sink::FeatureSink;

#[derive(Parser, Debug)]
#[command(name = "stockcast", about = "Technical indicator features for price prediction")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build feature records for a symbol and write the prediction request
    Features {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write a chart overlay for a single indicator
    Overlay {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: String,
        /// Indicator, e.g. "SMA(20)" or "MACD(12,26,9)"
        #[arg(short, long)]
        indicator: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Features {
            config,
            symbol,
            output,
        } => run_features(&config, &symbol, output.as_deref()),
        Command::Overlay {
            config,
            symbol,
            indicator,
            output,
        } => run_overlay(&config, &symbol, &indicator, output.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { config } => run_list_symbols(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, StockcastError> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

/// Everything the pipelines need from the config file.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub data_dir: PathBuf,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub feature_set: FeatureSet,
    pub pretty: bool,
}

pub fn build_settings(config: &dyn ConfigPort) -> Result<RunSettings, StockcastError> {
    validate_config(config)?;
    let (start_date, end_date) = date_range(config)?;
    Ok(RunSettings {
        data_dir: data_dir(config)?,
        start_date,
        end_date,
        feature_set: feature_set(config)?,
        pretty: config.get_bool("output", "pretty", false),
    })
}

fn load_bars(
    data_port: &dyn DataPort,
    symbol: &str,
    settings: &RunSettings,
) -> Result<Vec<PriceBar>, StockcastError> {
    let bars = data_port.fetch_bars(symbol, settings.start_date, settings.end_date)?;
    if !is_strictly_increasing(&bars) {
        return Err(StockcastError::Data {
            reason: format!("bars for {} are not in strictly increasing date order", symbol),
        });
    }
    info!(symbol, bars = bars.len(), "loaded price bars");
    Ok(bars)
}

/// Loads bars for `symbol` and assembles the prediction request.
pub fn build_request(
    data_port: &dyn DataPort,
    symbol: &str,
    settings: &RunSettings,
) -> Result<PredictionRequest, StockcastError> {
    let bars = load_bars(data_port, symbol, settings)?;

    let features = build_features(&bars, &settings.feature_set);
    if features.is_empty() {
        warn!(
            symbol,
            bars = bars.len(),
            warmup = settings.feature_set.warmup_offset(),
            "not enough history for the configured indicators, no feature records"
        );
    } else {
        info!(
            symbol,
            records = features.len(),
            dropped = bars.len() - features.len(),
            "feature records ready"
        );
    }

    Ok(PredictionRequest {
        symbol: symbol.to_string(),
        features,
    })
}

/// Loads bars for `symbol` and computes one overlay point per bar.
pub fn build_overlay(
    data_port: &dyn DataPort,
    symbol: &str,
    indicator: &IndicatorType,
    settings: &RunSettings,
) -> Result<Vec<OverlayPoint>, StockcastError> {
    indicator.validate()?;
    let bars = load_bars(data_port, symbol, settings)?;
    let points = overlay(&bars, indicator);
    let defined = points.iter().filter(|p| p.value.is_some()).count();
    info!(symbol, indicator = %indicator, points = points.len(), defined, "overlay ready");
    Ok(points)
}

pub fn run_features_pipeline(
    data_port: &dyn DataPort,
    sink: &dyn FeatureSink,
    symbol: &str,
    settings: &RunSettings,
    output_path: Option<&Path>,
) -> Result<(), StockcastError> {
    let request = build_request(data_port, symbol, settings)?;
    sink.write_request(&request, output_path)?;
    if let Some(path) = output_path {
        info!(path = %path.display(), "prediction request written");
    }
    Ok(())
}

fn run_features(
    config_path: &Path,
    symbol: &str,
    output_path: Option<&Path>,
) -> Result<(), StockcastError> {
    let config = load_config(config_path)?;
    let settings = build_settings(&config)?;
    info!(indicators = %describe(&settings.feature_set), "configured feature set");

    let data_port = CsvAdapter::new(settings.data_dir.clone());
    let sink = JsonOutputAdapter::new(settings.pretty);
    run_features_pipeline(&data_port, &sink, symbol, &settings, output_path)
}

fn run_overlay(
    config_path: &Path,
    symbol: &str,
    indicator: &str,
    output_path: Option<&Path>,
) -> Result<(), StockcastError> {
    let config = load_config(config_path)?;
    let settings = build_settings(&config)?;
    let indicator: IndicatorType = indicator.parse()?;

    let data_port = CsvAdapter::new(settings.data_dir.clone());
    let points = build_overlay(&data_port, symbol, &indicator, &settings)?;
    JsonOutputAdapter::new(settings.pretty).write_overlay(&points, output_path)
}

fn run_validate(config_path: &Path) -> Result<(), StockcastError> {
    let config = load_config(config_path)?;
    let settings = build_settings(&config)?;

    eprintln!("Data directory: {}", settings.data_dir.display());
    eprintln!(
        "Date range:     {} .. {}",
        settings
            .start_date
            .map_or_else(|| "open".to_string(), |d| d.to_string()),
        settings
            .end_date
            .map_or_else(|| "open".to_string(), |d| d.to_string())
    );
    eprintln!("\nIndicators:");
    for indicator in settings.feature_set.indicators() {
        eprintln!("  {:<18} warm-up {} bars", indicator.to_string(), indicator.warmup());
    }
    eprintln!(
        "\nFirst feature record at bar index {}",
        settings.feature_set.warmup_offset()
    );
    eprintln!("Config validated successfully");
    Ok(())
}

fn run_list_symbols(config_path: &Path) -> Result<(), StockcastError> {
    let config = load_config(config_path)?;
    let adapter = CsvAdapter::new(data_dir(&config)?);

    let symbols = adapter.list_symbols()?;
    if symbols.is_empty() {
        eprintln!("No symbols found");
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    Ok(())
}

fn describe(set: &FeatureSet) -> String {
    set.indicators()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
