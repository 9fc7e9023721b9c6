//! Configuration validation.
//!
//! Validates all config fields before a backtest runs.

use crate::domain::error::BacktestError;
use crate::domain::metrics::VolatilityConvention;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    validate_symbol(config)?;
    validate_backtest_settings(config)
}

/// Everything in `[backtest]` and `[metrics]` except the symbol, for callers
/// that take the symbol from elsewhere.
pub fn validate_backtest_settings(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    validate_initial_capital(config)?;
    validate_dates(config)?;
    validate_volatility(config)?;
    Ok(())
}

pub fn validate_signal_config(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    let source = config
        .get_string("signals", "source")
        .unwrap_or_else(|| "regression".to_string());
    match source.trim().to_lowercase().as_str() {
        "regression" => validate_train_fraction(config),
        "csv" => match config.get_string("signals", "path") {
            Some(p) if !p.trim().is_empty() => Ok(()),
            _ => Err(BacktestError::ConfigMissing {
                section: "signals".to_string(),
                key: "path".to_string(),
            }),
        },
        _ => Err(BacktestError::ConfigInvalid {
            section: "signals".to_string(),
            key: "source".to_string(),
            reason: "source must be regression or csv".to_string(),
        }),
    }
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    let value = config.get_double("backtest", "initial_capital", 100_000.0);
    if !(value.is_finite() && value > 0.0) {
        return Err(BacktestError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "initial_capital".to_string(),
            reason: "initial_capital must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_symbol(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    match config.get_string("backtest", "symbol") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(BacktestError::ConfigMissing {
            section: "backtest".to_string(),
            key: "symbol".to_string(),
        }),
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    let start = parse_date(config.get_string("backtest", "start_date").as_deref(), "start_date")?;
    let end = parse_date(config.get_string("backtest", "end_date").as_deref(), "end_date")?;

    if let (Some(start), Some(end)) = (start, end) {
        if start >= end {
            return Err(BacktestError::ConfigInvalid {
                section: "backtest".to_string(),
                key: "start_date".to_string(),
                reason: "start_date must be before end_date".to_string(),
            });
        }
    }
    Ok(())
}

/// Optional date key: absent or blank is `None`, anything else must parse.
pub fn parse_date(value: Option<&str>, field: &str) -> Result<Option<NaiveDate>, BacktestError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(Some)
            .map_err(|_| BacktestError::ConfigInvalid {
                section: "backtest".to_string(),
                key: field.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", field),
            }),
    }
}

fn validate_volatility(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    parse_volatility(config).map(|_| ())
}

pub fn parse_volatility(config: &dyn ConfigPort) -> Result<VolatilityConvention, BacktestError> {
    match config.get_string("metrics", "volatility") {
        None => Ok(VolatilityConvention::default()),
        Some(s) => s.parse().map_err(|reason| BacktestError::ConfigInvalid {
            section: "metrics".to_string(),
            key: "volatility".to_string(),
            reason,
        }),
    }
}

fn validate_train_fraction(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    let value = config.get_double("signals", "train_fraction", 0.8);
    if !(value > 0.0 && value < 1.0) {
        return Err(BacktestError::ConfigInvalid {
            section: "signals".to_string(),
            key: "train_fraction".to_string(),
            reason: "train_fraction must be between 0 and 1".to_string(),
        });
    }
    Ok(())
}
