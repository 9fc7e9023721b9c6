//! Price data access port trait.

use crate::domain::error::BacktestError;
use crate::domain::price::PricePoint;
use chrono::NaiveDate;

pub trait DataPort {
    /// Closing prices for `symbol` in ascending date order, optionally
    /// restricted to `[start_date, end_date]`.
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<PricePoint>, BacktestError>;

    fn list_symbols(&self) -> Result<Vec<String>, BacktestError>;

    /// First date, last date and row count, or `None` when there is no data.
    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, BacktestError>;
}
