//! Executed trades and the trade journal.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => f.write_str("BUY"),
            Side::Sell => f.write_str("SELL"),
        }
    }
}

/// A BUY or SELL that actually executed, with the state right after it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Trade {
    pub date: NaiveDate,
    pub side: Side,
    pub price: f64,
    pub quantity: u64,
    pub cash_after: f64,
    pub shares_after: u64,
}

impl Trade {
    /// One human-readable journal line.
    pub fn journal_line(&self) -> String {
        match self.side {
            Side::Buy => format!(
                "{}: BUY {} shares @ ${:.2}. Remaining Cash: ${:.2}",
                self.date, self.quantity, self.price, self.cash_after
            ),
            Side::Sell => format!(
                "{}: SELL ALL {} shares @ ${:.2}. Total Cash: ${:.2}",
                self.date, self.quantity, self.price, self.cash_after
            ),
        }
    }
}
