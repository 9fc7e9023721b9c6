//! Aligned (date, price, signal) series consumed by the simulator.

use chrono::NaiveDate;

use super::error::InvalidInput;
use super::price::{validate_prices, PricePoint};
use super::signal::{Signal, SignalRecord};

/// One trading day of simulator input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Day {
    pub date: NaiveDate,
    pub close: f64,
    pub signal: Signal,
}

impl Day {
    pub fn new(date: NaiveDate, close: f64, signal: Signal) -> Self {
        Day {
            date,
            close,
            signal,
        }
    }
}

/// Zip a price series with its signal series.
///
/// Both series must have the same length and the same date at every index.
/// Nothing is returned unless every row is valid.
pub fn align(prices: &[PricePoint], signals: &[SignalRecord]) -> Result<Vec<Day>, InvalidInput> {
    if prices.len() != signals.len() {
        return Err(InvalidInput::LengthMismatch {
            prices: prices.len(),
            signals: signals.len(),
        });
    }
    validate_prices(prices)?;

    prices
        .iter()
        .zip(signals)
        .enumerate()
        .map(|(index, (price, record))| {
            if price.date != record.date {
                return Err(InvalidInput::DateMismatch {
                    index,
                    price_date: price.date,
                    signal_date: record.date,
                });
            }
            Ok(Day::new(price.date, price.close, record.signal()?))
        })
        .collect()
}

/// Zip prices with a signal series that may omit a leading run of days.
///
/// Producers can drop days at the start (no prior close to learn from). The
/// signals are matched against the last `signals.len()` prices, so a missing
/// day anywhere else still fails in [`align`] with a date mismatch.
pub fn align_trailing(
    prices: &[PricePoint],
    signals: &[SignalRecord],
) -> Result<Vec<Day>, InvalidInput> {
    let skip = prices.len().saturating_sub(signals.len());
    align(&prices[skip..], signals)
}

/// Copy of `days` with the signal at `index` replaced.
pub fn with_signal_at(days: &[Day], index: usize, signal: Signal) -> Result<Vec<Day>, InvalidInput> {
    if index >= days.len() {
        return Err(InvalidInput::OverrideOutOfRange {
            index,
            len: days.len(),
        });
    }
    let mut out = days.to_vec();
    out[index].signal = signal;
    Ok(out)
}
