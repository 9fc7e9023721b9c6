//! Signal producer port trait.

use crate::domain::error::BacktestError;
use crate::domain::price::PricePoint;
use crate::domain::signal::SignalRecord;

/// Produces one raw signal per emitted date, in ascending date order.
///
/// A producer may emit fewer dates than it was given (for example when the
/// first day has no history to learn from) but never dates outside `prices`.
pub trait SignalPort {
    fn signals(&self, prices: &[PricePoint]) -> Result<Vec<SignalRecord>, BacktestError>;
}
