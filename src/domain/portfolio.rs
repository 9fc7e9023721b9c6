//! Portfolio state and daily valuation snapshots.

use chrono::NaiveDate;
use serde::Serialize;

/// Cash and share count carried from one day to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortfolioState {
    pub cash: f64,
    pub shares: u64,
}

impl PortfolioState {
    /// Opening state: all cash, no shares.
    pub fn new(initial_capital: f64) -> Self {
        PortfolioState {
            cash: initial_capital,
            shares: 0,
        }
    }

    pub fn holdings_value(&self, price: f64) -> f64 {
        self.shares as f64 * price
    }

    pub fn total_value(&self, price: f64) -> f64 {
        self.cash + self.holdings_value(price)
    }

    pub fn is_flat(&self) -> bool {
        self.shares == 0
    }

    /// Value the state at a day's closing price.
    pub fn snapshot(&self, date: NaiveDate, price: f64) -> PortfolioSnapshot {
        PortfolioSnapshot {
            date,
            price,
            cash: self.cash,
            shares: self.shares,
            holdings_value: self.holdings_value(price),
            total_value: self.total_value(price),
        }
    }
}

/// End-of-day valuation. The sequence of `total_value` is the equity curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PortfolioSnapshot {
    pub date: NaiveDate,
    pub price: f64,
    pub cash: f64,
    pub shares: u64,
    pub holdings_value: f64,
    pub total_value: f64,
}

/// Extract the equity curve from a snapshot sequence.
pub fn equity_curve(snapshots: &[PortfolioSnapshot]) -> Vec<f64> {
    snapshots.iter().map(|s| s.total_value).collect()
}
