//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

use crate::adapters::csv_adapter::{write_equity_csv, write_trades_csv, CsvAdapter, CsvSignalAdapter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::prompt_confirm_adapter::PromptConfirmAdapter;
use crate::adapters::regression_signal_adapter::RegressionSignalAdapter;
use crate::adapters::text_report_adapter::{format_metrics, TextReportAdapter};
use crate::domain::backtest::{self as backtest_engine, BacktestConfig, BacktestResult, SignalOverride};
use crate::domain::config_validation::{
    parse_date, parse_volatility, validate_backtest_config, validate_backtest_settings,
    validate_signal_config,
};
use crate::domain::error::BacktestError;
use crate::domain::series::{align_trailing, Day};
use crate::domain::signal::Signal;
use crate::ports::config_port::ConfigPort;
use crate::ports::confirm_port::{confirm_signal, ConfirmPort};
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;
use crate::ports::signal_port::SignalPort;

#[derive(Parser, Debug)]
#[command(name = "sigtrader", about = "Single-instrument signal backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Replace the most recent day's signal (buy, sell or hold)
        #[arg(long, conflicts_with = "confirm")]
        last_signal: Option<Signal>,
        /// Ask on stdin before acting on the most recent day's signal
        #[arg(long)]
        confirm: bool,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the data range for a symbol
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// List symbols with price files in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print the signal series the configured producer emits
    Signals {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
}

/// Where the most recent day's signal may be replaced from.
pub enum OverrideSource<'a> {
    None,
    Fixed(Signal),
    Confirm(&'a dyn ConfirmPort),
}

/// Output locations for one backtest run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTargets {
    pub report: PathBuf,
    pub equity_csv: Option<PathBuf>,
    pub trades_csv: Option<PathBuf>,
}

pub fn run(cli: Cli) -> ExitCode {
    let outcome = match cli.command {
        Command::Backtest {
            config,
            symbol,
            output,
            last_signal,
            confirm,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config, symbol.as_deref())
            } else {
                run_backtest(&config, symbol.as_deref(), output.as_ref(), last_signal, confirm)
            }
        }
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
        Command::ListSymbols { config } => run_list_symbols(&config),
        Command::Signals { config, symbol } => run_signals(&config, symbol.as_deref()),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::from(&e)
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, BacktestError> {
    info!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

/// Load and validate; a `--symbol` override lifts the need for a configured one.
pub fn load_validated_config(
    path: &Path,
    symbol_override: Option<&str>,
) -> Result<FileConfigAdapter, BacktestError> {
    let adapter = load_config(path)?;
    match symbol_override {
        Some(_) => validate_backtest_settings(&adapter)?,
        None => validate_backtest_config(&adapter)?,
    }
    validate_signal_config(&adapter)?;
    Ok(adapter)
}

pub fn resolve_symbol(symbol_override: Option<&str>, config: &dyn ConfigPort) -> Option<String> {
    symbol_override
        .map(str::to_string)
        .or_else(|| config.get_string("backtest", "symbol"))
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
}

pub fn build_backtest_config(
    adapter: &dyn ConfigPort,
    symbol_override: Option<&str>,
) -> Result<BacktestConfig, BacktestError> {
    let symbol =
        resolve_symbol(symbol_override, adapter).ok_or_else(|| BacktestError::ConfigMissing {
            section: "backtest".into(),
            key: "symbol".into(),
        })?;

    Ok(BacktestConfig {
        symbol,
        initial_capital: adapter.get_double("backtest", "initial_capital", 100_000.0),
        start_date: parse_date(
            adapter.get_string("backtest", "start_date").as_deref(),
            "start_date",
        )?,
        end_date: parse_date(adapter.get_string("backtest", "end_date").as_deref(), "end_date")?,
        volatility: parse_volatility(adapter)?,
    })
}

pub fn build_data_port(adapter: &dyn ConfigPort) -> CsvAdapter {
    CsvAdapter::new(PathBuf::from(adapter.get_string_or("data", "directory", "data")))
}

pub fn build_signal_port(adapter: &dyn ConfigPort) -> Result<Box<dyn SignalPort>, BacktestError> {
    let source = adapter.get_string_or("signals", "source", "regression").to_lowercase();
    match source.as_str() {
        "regression" => Ok(Box::new(RegressionSignalAdapter::from_config(adapter))),
        "csv" => {
            let path = adapter.get_string_or("signals", "path", "");
            if path.is_empty() {
                return Err(BacktestError::ConfigMissing {
                    section: "signals".into(),
                    key: "path".into(),
                });
            }
            Ok(Box::new(CsvSignalAdapter::new(PathBuf::from(path))))
        }
        other => Err(BacktestError::ConfigInvalid {
            section: "signals".into(),
            key: "source".into(),
            reason: format!("unknown source '{other}'"),
        }),
    }
}

pub fn build_report_targets(adapter: &dyn ConfigPort, output: Option<&PathBuf>) -> ReportTargets {
    let optional = |key: &str| {
        Some(adapter.get_string_or("report", key, ""))
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
    };
    ReportTargets {
        report: output
            .cloned()
            .unwrap_or_else(|| PathBuf::from(adapter.get_string_or("report", "output", "report.txt"))),
        equity_csv: optional("equity_csv"),
        trades_csv: optional("trades_csv"),
    }
}

/// Fetch prices and signals and zip them into the simulator's input.
pub fn prepare_days(
    data_port: &dyn DataPort,
    signal_port: &dyn SignalPort,
    config: &BacktestConfig,
) -> Result<Vec<Day>, BacktestError> {
    let prices = data_port.fetch_prices(&config.symbol, config.start_date, config.end_date)?;
    if prices.is_empty() {
        return Err(BacktestError::NoData {
            symbol: config.symbol.clone(),
        });
    }
    info!(symbol = %config.symbol, days = prices.len(), "loaded prices");

    let signals = signal_port.signals(&prices)?;
    if signals.len() < prices.len() {
        warn!(
            dropped = prices.len() - signals.len(),
            "leading days without a signal are excluded from the simulation"
        );
    }

    Ok(align_trailing(&prices, &signals)?)
}

/// Decide the most recent day's override, asking the confirmer if one is set.
pub fn resolve_override(
    days: &[Day],
    source: &OverrideSource<'_>,
) -> Result<Option<SignalOverride>, BacktestError> {
    let Some(last) = days.last() else {
        return Ok(None);
    };
    let signal = match source {
        OverrideSource::None => return Ok(None),
        OverrideSource::Fixed(signal) => *signal,
        OverrideSource::Confirm(port) => confirm_signal(*port, last.date, last.close, last.signal)?,
    };
    if signal == last.signal {
        info!(date = %last.date, %signal, "most recent signal kept");
    } else {
        info!(date = %last.date, from = %last.signal, to = %signal, "most recent signal replaced");
    }
    Ok(Some(SignalOverride::last(days.len(), signal)?))
}

/// Everything after config loading: data, signals, simulation, metrics, reports.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    signal_port: &dyn SignalPort,
    config: &BacktestConfig,
    override_source: &OverrideSource<'_>,
    targets: &ReportTargets,
) -> Result<BacktestResult, BacktestError> {
    let days = prepare_days(data_port, signal_port, config)?;
    let signal_override = resolve_override(&days, override_source)?;

    info!(
        symbol = %config.symbol,
        days = days.len(),
        initial_capital = config.initial_capital,
        "running backtest"
    );
    let result = backtest_engine::run_backtest(days, config, signal_override)?;

    let report = targets.report.display().to_string();
    TextReportAdapter.write(&result, &report)?;
    info!("Report written to: {report}");

    if let Some(path) = &targets.equity_csv {
        write_equity_csv(path, &result.simulation.snapshots)?;
        info!("Equity curve written to: {}", path.display());
    }
    if let Some(path) = &targets.trades_csv {
        write_trades_csv(path, &result.simulation.trades)?;
        info!("Trades written to: {}", path.display());
    }

    Ok(result)
}

fn run_backtest(
    config_path: &Path,
    symbol_override: Option<&str>,
    output: Option<&PathBuf>,
    last_signal: Option<Signal>,
    confirm: bool,
) -> Result<(), BacktestError> {
    let adapter = load_validated_config(config_path, symbol_override)?;
    let bt_config = build_backtest_config(&adapter, symbol_override)?;
    let data_port = build_data_port(&adapter);
    let signal_port = build_signal_port(&adapter)?;
    let targets = build_report_targets(&adapter, output);

    let prompt;
    let override_source = match (last_signal, confirm) {
        (Some(signal), _) => OverrideSource::Fixed(signal),
        (None, true) => {
            prompt = PromptConfirmAdapter::new(io::stdin().lock(), io::stderr());
            OverrideSource::Confirm(&prompt)
        }
        (None, false) => OverrideSource::None,
    };

    let result = run_backtest_pipeline(
        &data_port,
        signal_port.as_ref(),
        &bt_config,
        &override_source,
        &targets,
    )?;

    println!("\n=== {} ===", result.symbol);
    print!("{}", format_metrics(&result.metrics));
    println!("Trades: {}", result.simulation.trades.len());
    Ok(())
}

pub fn run_dry_run(config_path: &Path, symbol_override: Option<&str>) -> Result<(), BacktestError> {
    let adapter = load_validated_config(config_path, symbol_override)?;
    let bt_config = build_backtest_config(&adapter, symbol_override)?;
    let targets = build_report_targets(&adapter, None);
    info!("Config validated successfully");

    let range = |d: Option<chrono::NaiveDate>| d.map(|d| d.to_string()).unwrap_or_else(|| "-".into());
    println!("symbol:          {}", bt_config.symbol);
    println!("initial_capital: {}", bt_config.initial_capital);
    println!("period:          {} to {}", range(bt_config.start_date), range(bt_config.end_date));
    println!("data directory:  {}", adapter.get_string_or("data", "directory", "data"));
    println!("signals:         {}", adapter.get_string_or("signals", "source", "regression"));
    println!("volatility:      {}", bt_config.volatility);
    println!("report:          {}", targets.report.display());

    info!("Dry run complete: configuration is valid");
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), BacktestError> {
    let adapter = load_validated_config(config_path, None)?;
    build_backtest_config(&adapter, None)?;
    build_signal_port(&adapter)?;
    println!("Configuration is valid.");
    Ok(())
}

fn run_info(config_path: &Path, symbol_override: Option<&str>) -> Result<(), BacktestError> {
    let adapter = load_config(config_path)?;
    let symbol =
        resolve_symbol(symbol_override, &adapter).ok_or_else(|| BacktestError::ConfigMissing {
            section: "backtest".into(),
            key: "symbol".into(),
        })?;
    let data_port = build_data_port(&adapter);

    match data_port.get_data_range(&symbol)? {
        Some((first, last, count)) => println!("{symbol}: {count} days, {first} to {last}"),
        None => warn!("{symbol}: no data found"),
    }
    Ok(())
}

fn run_list_symbols(config_path: &Path) -> Result<(), BacktestError> {
    let adapter = load_config(config_path)?;
    let symbols = build_data_port(&adapter).list_symbols()?;
    if symbols.is_empty() {
        warn!("No symbols found");
    }
    for symbol in &symbols {
        println!("{symbol}");
    }
    info!("{} symbols found", symbols.len());
    Ok(())
}

fn run_signals(config_path: &Path, symbol_override: Option<&str>) -> Result<(), BacktestError> {
    let adapter = load_validated_config(config_path, symbol_override)?;
    let bt_config = build_backtest_config(&adapter, symbol_override)?;
    let data_port = build_data_port(&adapter);
    let signal_port = build_signal_port(&adapter)?;

    for day in prepare_days(&data_port, signal_port.as_ref(), &bt_config)? {
        println!("{},{:.2},{}", day.date, day.close, day.signal.value());
    }
    Ok(())
}
