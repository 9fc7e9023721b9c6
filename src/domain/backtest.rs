//! Backtest composition: simulate, optionally override one day, compute metrics.

use chrono::NaiveDate;
use tracing::info;

use super::error::{BacktestError, InvalidInput};
use super::metrics::{MetricsRecord, VolatilityConvention};
use super::series::Day;
use super::signal::Signal;
use super::simulator::{simulate, Simulation};

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub symbol: String,
    pub initial_capital: f64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub volatility: VolatilityConvention,
}

/// Replace the signal of the day at `index` before the final pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalOverride {
    pub index: usize,
    pub signal: Signal,
}

impl SignalOverride {
    /// Override the most recent day of a `len`-day series.
    pub fn last(len: usize, signal: Signal) -> Result<Self, InvalidInput> {
        match len.checked_sub(1) {
            Some(index) => Ok(SignalOverride { index, signal }),
            None => Err(InvalidInput::OverrideOutOfRange { index: 0, len }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub symbol: String,
    pub days: Vec<Day>,
    pub simulation: Simulation,
    pub metrics: MetricsRecord,
}

pub fn run_backtest(
    days: Vec<Day>,
    config: &BacktestConfig,
    signal_override: Option<SignalOverride>,
) -> Result<BacktestResult, BacktestError> {
    let mut simulation = simulate(config.initial_capital, &days)?;

    let days = match signal_override {
        Some(o) => {
            info!(
                date = %days.get(o.index).map(|d| d.date.to_string()).unwrap_or_default(),
                signal = %o.signal,
                "re-running from carried state with overridden signal"
            );
            simulation = simulation.with_signal_override(&days, o.index, o.signal)?;
            let mut days = days;
            days[o.index].signal = o.signal;
            days
        }
        None => days,
    };

    let metrics =
        MetricsRecord::compute_with(&simulation.snapshots, config.initial_capital, config.volatility)?;

    Ok(BacktestResult {
        symbol: config.symbol.clone(),
        days,
        simulation,
        metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn sample_config() -> BacktestConfig {
        BacktestConfig {
            symbol: "TSLA".into(),
            initial_capital: 100_000.0,
            start_date: None,
            end_date: None,
            volatility: VolatilityConvention::Sample,
        }
    }

    fn scenario() -> Vec<Day> {
        vec![
            Day::new(d(1), 100.0, Signal::Buy),
            Day::new(d(2), 110.0, Signal::Hold),
            Day::new(d(3), 110.0, Signal::Sell),
        ]
    }

    #[test]
    fn run_backtest_produces_metrics() {
        let result = run_backtest(scenario(), &sample_config(), None).unwrap();
        assert_eq!(result.symbol, "TSLA");
        assert_eq!(result.simulation.trades.len(), 2);
        assert!((result.metrics.total_return - 0.10).abs() < 1e-12);
        assert_eq!(result.metrics.max_drawdown, 0.0);
    }

    #[test]
    fn run_backtest_empty_series_is_insufficient() {
        let err = run_backtest(vec![], &sample_config(), None).unwrap_err();
        assert!(matches!(err, BacktestError::InsufficientData { .. }));
    }

    #[test]
    fn override_last_day_declined_sell() {
        let o = SignalOverride::last(3, Signal::Hold).unwrap();
        let result = run_backtest(scenario(), &sample_config(), Some(o)).unwrap();
        assert_eq!(result.simulation.trades.len(), 1);
        assert_eq!(result.days[2].signal, Signal::Hold);
        assert_eq!(result.simulation.final_state().shares, 1000);
        assert!((result.metrics.final_value - 110_000.0).abs() < 1e-9);
    }

    #[test]
    fn override_last_of_empty_series_is_invalid() {
        assert_eq!(
            SignalOverride::last(0, Signal::Buy).unwrap_err(),
            InvalidInput::OverrideOutOfRange { index: 0, len: 0 }
        );
    }

    #[test]
    fn invalid_capital_rejected() {
        let config = BacktestConfig {
            initial_capital: -1.0,
            ..sample_config()
        };
        let err = run_backtest(scenario(), &config, None).unwrap_err();
        assert!(matches!(
            err,
            BacktestError::InvalidInput(InvalidInput::NonPositiveCapital { .. })
        ));
    }
}
