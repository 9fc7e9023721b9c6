//! Confirmation of the most recent day's suggested signal.

use crate::domain::error::BacktestError;
use crate::domain::signal::Signal;
use chrono::NaiveDate;

pub trait ConfirmPort {
    /// Ask whether to act on `suggested` at `price` on `date`.
    fn confirm(&self, date: NaiveDate, price: f64, suggested: Signal) -> Result<bool, BacktestError>;
}

/// Resolve the signal to trade on: HOLD is never asked about; BUY and SELL
/// survive only if the confirmer accepts them.
pub fn confirm_signal(
    port: &dyn ConfirmPort,
    date: NaiveDate,
    price: f64,
    suggested: Signal,
) -> Result<Signal, BacktestError> {
    if !suggested.is_actionable() {
        return Ok(Signal::Hold);
    }
    let accepted = port.confirm(date, price, suggested)?;
    Ok(suggested.confirmed(accepted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Fixed {
        answer: bool,
        asked: Cell<usize>,
    }

    impl ConfirmPort for Fixed {
        fn confirm(&self, _: NaiveDate, _: f64, _: Signal) -> Result<bool, BacktestError> {
            self.asked.set(self.asked.get() + 1);
            Ok(self.answer)
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    #[test]
    fn accepted_buy_kept() {
        let port = Fixed { answer: true, asked: Cell::new(0) };
        assert_eq!(confirm_signal(&port, date(), 10.0, Signal::Buy).unwrap(), Signal::Buy);
        assert_eq!(port.asked.get(), 1);
    }

    #[test]
    fn declined_sell_becomes_hold() {
        let port = Fixed { answer: false, asked: Cell::new(0) };
        assert_eq!(confirm_signal(&port, date(), 10.0, Signal::Sell).unwrap(), Signal::Hold);
    }

    #[test]
    fn hold_never_asks() {
        let port = Fixed { answer: true, asked: Cell::new(0) };
        assert_eq!(confirm_signal(&port, date(), 10.0, Signal::Hold).unwrap(), Signal::Hold);
        assert_eq!(port.asked.get(), 0);
    }
}
