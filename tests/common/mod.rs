#![allow(dead_code)]

use chrono::NaiveDate;
use sigtrader::domain::backtest::BacktestConfig;
use sigtrader::domain::error::BacktestError;
use sigtrader::domain::metrics::VolatilityConvention;
pub use sigtrader::domain::price::PricePoint;
pub use sigtrader::domain::series::Day;
pub use sigtrader::domain::signal::{Signal, SignalRecord};
use sigtrader::ports::data_port::DataPort;
use sigtrader::ports::signal_port::SignalPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_prices(mut self, symbol: &str, prices: Vec<PricePoint>) -> Self {
        self.data.insert(symbol.to_string(), prices);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<PricePoint>, BacktestError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(BacktestError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|prices| {
                prices
                    .iter()
                    .filter(|p| start_date.is_none_or(|s| p.date >= s))
                    .filter(|p| end_date.is_none_or(|e| p.date <= e))
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, BacktestError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, BacktestError> {
        Ok(self.data.get(symbol).and_then(|prices| {
            let first = prices.first()?;
            let last = prices.last()?;
            Some((first.date, last.date, prices.len()))
        }))
    }
}

/// Emits a fixed signal list for whichever dates it is given, in order,
/// after skipping `skip` leading dates.
pub struct MockSignalPort {
    pub signals: Vec<Signal>,
    pub skip: usize,
}

impl MockSignalPort {
    pub fn new(signals: Vec<Signal>) -> Self {
        Self { signals, skip: 0 }
    }

    pub fn skipping(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }
}

impl SignalPort for MockSignalPort {
    fn signals(&self, prices: &[PricePoint]) -> Result<Vec<SignalRecord>, BacktestError> {
        Ok(prices
            .iter()
            .skip(self.skip)
            .zip(&self.signals)
            .map(|(p, s)| SignalRecord::new(p.date, *s))
            .collect())
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Consecutive calendar days starting 2024-01-01.
pub fn nth_day(i: usize) -> NaiveDate {
    date("2024-01-01") + chrono::Duration::days(i as i64)
}

pub fn make_prices(closes: &[f64]) -> Vec<PricePoint> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| PricePoint::new(nth_day(i), c))
        .collect()
}

pub fn make_days(rows: &[(f64, Signal)]) -> Vec<Day> {
    rows.iter()
        .enumerate()
        .map(|(i, &(close, signal))| Day::new(nth_day(i), close, signal))
        .collect()
}

pub fn make_config(symbol: &str, initial_capital: f64) -> BacktestConfig {
    BacktestConfig {
        symbol: symbol.to_string(),
        initial_capital,
        start_date: None,
        end_date: None,
        volatility: VolatilityConvention::Sample,
    }
}
