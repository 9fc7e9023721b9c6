//! CSV file adapters: price history in, signals in, equity curve and trades out.

use crate::domain::error::BacktestError;
use crate::domain::portfolio::PortfolioSnapshot;
use crate::domain::price::PricePoint;
use crate::domain::signal::SignalRecord;
use crate::domain::trade::Trade;
use crate::ports::data_port::DataPort;
use crate::ports::signal_port::SignalPort;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn data_error(reason: impl Into<String>) -> BacktestError {
    BacktestError::Data {
        reason: reason.into(),
    }
}

fn read_file(path: &Path) -> Result<String, io::Error> {
    fs::read_to_string(path)
}

/// Index of the first header matching `name`, ignoring case and padding.
fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, BacktestError> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| data_error(format!("missing {} column", name)))
}

fn parse_date(value: &str) -> Result<NaiveDate, BacktestError> {
    let value = value.trim();
    // timestamps such as "2024-01-02 00:00:00" keep only the date part
    let date_part = value.split([' ', 'T']).next().unwrap_or(value);
    NaiveDate::parse_from_str(date_part, DATE_FORMAT)
        .map_err(|e| data_error(format!("invalid date '{}': {}", value, e)))
}

fn is_missing(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "" | "nan" | "null" | "na"
    )
}

/// Daily price files named `<SYMBOL>.csv` under one directory.
///
/// Files need a header row with `date` and `close` columns; other columns are
/// ignored. Rows with a missing close are dropped.
pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

impl DataPort for CsvAdapter {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<PricePoint>, BacktestError> {
        let path = self.csv_path(symbol);
        let content = read_file(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => BacktestError::NoData {
                symbol: symbol.to_string(),
            },
            _ => data_error(format!("failed to read {}: {}", path.display(), e)),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| data_error(format!("CSV header error: {}", e)))?
            .clone();
        let date_col = column_index(&headers, "date")?;
        let close_col = column_index(&headers, "close")?;

        let mut prices = Vec::new();
        let mut dropped = 0usize;

        for result in rdr.records() {
            let record = result.map_err(|e| data_error(format!("CSV parse error: {}", e)))?;

            let date_str = record
                .get(date_col)
                .ok_or_else(|| data_error("missing date column"))?;
            let date = parse_date(date_str)?;

            if start_date.is_some_and(|s| date < s) || end_date.is_some_and(|e| date > e) {
                continue;
            }

            let close_str = record.get(close_col).unwrap_or("");
            if is_missing(close_str) {
                dropped += 1;
                continue;
            }
            let close: f64 = close_str
                .trim()
                .parse()
                .map_err(|e| data_error(format!("invalid close value on {}: {}", date, e)))?;

            prices.push(PricePoint::new(date, close));
        }

        if dropped > 0 {
            warn!(symbol, dropped, "dropped rows with missing close");
        }

        prices.sort_by_key(|p| p.date);
        Ok(prices)
    }

    fn list_symbols(&self) -> Result<Vec<String>, BacktestError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| {
            data_error(format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ))
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| data_error(format!("directory entry error: {}", e)))?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")) {
                if let Some(stem) = path.file_stem() {
                    symbols.push(stem.to_string_lossy().into_owned());
                }
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, BacktestError> {
        let prices = match self.fetch_prices(symbol, None, None) {
            Ok(p) => p,
            Err(BacktestError::NoData { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        Ok(match (prices.first(), prices.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, prices.len())),
            _ => None,
        })
    }
}

/// Precomputed signals from a CSV file with `date` and `signal` columns.
///
/// Only rows whose dates appear in the price series are returned.
pub struct CsvSignalAdapter {
    path: PathBuf,
}

impl CsvSignalAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn read_all(&self) -> Result<Vec<SignalRecord>, BacktestError> {
        let content = read_file(&self.path)
            .map_err(|e| data_error(format!("failed to read {}: {}", self.path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| data_error(format!("CSV header error: {}", e)))?
            .clone();
        let date_col = column_index(&headers, "date")?;
        let signal_col = column_index(&headers, "signal")?;

        let mut records = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| data_error(format!("CSV parse error: {}", e)))?;
            let date = parse_date(record.get(date_col).unwrap_or(""))?;
            let raw = record.get(signal_col).unwrap_or("").trim();
            let value: i64 = raw
                .parse()
                .map_err(|e| data_error(format!("invalid signal '{}' on {}: {}", raw, date, e)))?;
            records.push(SignalRecord { date, value });
        }

        records.sort_by_key(|r| r.date);
        Ok(records)
    }
}

impl SignalPort for CsvSignalAdapter {
    fn signals(&self, prices: &[PricePoint]) -> Result<Vec<SignalRecord>, BacktestError> {
        let dates: HashSet<NaiveDate> = prices.iter().map(|p| p.date).collect();
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|r| dates.contains(&r.date))
            .collect())
    }
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), BacktestError> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| data_error(format!("failed to create {}: {}", path.display(), e)))?;
    for row in rows {
        wtr.serialize(row)
            .map_err(|e| data_error(format!("CSV write error: {}", e)))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Equity curve export: one row per snapshot.
pub fn write_equity_csv(path: &Path, snapshots: &[PortfolioSnapshot]) -> Result<(), BacktestError> {
    write_rows(path, snapshots)
}

/// Trade log export: one row per executed trade.
pub fn write_trades_csv(path: &Path, trades: &[Trade]) -> Result<(), BacktestError> {
    write_rows(path, trades)
}
