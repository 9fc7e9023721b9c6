//! Day-by-day trade simulation.
//!
//! The portfolio state is an explicit value threaded through [`step`]. Each day
//! uses only its own price and signal plus the state carried from the day
//! before, so a run can be resumed from the state at any index.
//!
//! Sizing is all-in / all-out:
//! - BUY spends cash on the largest whole number of shares it affords
//! - SELL liquidates every share held
//! - HOLD, a BUY without enough cash for one share, or a SELL while flat leave
//!   the state untouched and record no trade

use tracing::debug;

use super::error::InvalidInput;
use super::portfolio::{PortfolioSnapshot, PortfolioState};
use super::price::{check_ascending, check_price};
use super::series::{with_signal_at, Day};
use super::signal::Signal;
use super::trade::{Side, Trade};

/// Result of applying one day to a carried state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub state: PortfolioState,
    pub trade: Option<Trade>,
    pub snapshot: PortfolioSnapshot,
}

/// Apply one day's signal at that day's price.
pub fn step(state: PortfolioState, day: &Day) -> Step {
    let price = day.close;
    let mut next = state;
    let mut trade = None;

    match day.signal {
        Signal::Buy if state.cash > 0.0 => {
            let mut quantity = (state.cash / price).floor() as u64;
            // floor of a rounded quotient can overshoot by one share
            if quantity > 0 && quantity as f64 * price > state.cash {
                quantity -= 1;
            }
            if quantity > 0 {
                next.cash = state.cash - quantity as f64 * price;
                next.shares = state.shares + quantity;
                trade = Some(Trade {
                    date: day.date,
                    side: Side::Buy,
                    price,
                    quantity,
                    cash_after: next.cash,
                    shares_after: next.shares,
                });
            }
        }
        Signal::Sell if !state.is_flat() => {
            next.cash = state.cash + state.shares as f64 * price;
            next.shares = 0;
            trade = Some(Trade {
                date: day.date,
                side: Side::Sell,
                price,
                quantity: state.shares,
                cash_after: next.cash,
                shares_after: 0,
            });
        }
        _ => {}
    }

    if let Some(t) = &trade {
        debug!(target: "journal", "{}", t.journal_line());
    }

    Step {
        state: next,
        trade,
        snapshot: next.snapshot(day.date, price),
    }
}

/// Completed run: one snapshot and one post-step state per day, plus the
/// trades that executed, all in date order.
#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    pub initial_capital: f64,
    pub snapshots: Vec<PortfolioSnapshot>,
    pub trades: Vec<Trade>,
    pub states: Vec<PortfolioState>,
}

impl Simulation {
    /// State after the last simulated day (the opening state for an empty run).
    pub fn final_state(&self) -> PortfolioState {
        self.states
            .last()
            .copied()
            .unwrap_or_else(|| PortfolioState::new(self.initial_capital))
    }

    /// State carried into day `index`, or `None` past the end of the run.
    pub fn state_before(&self, index: usize) -> Option<PortfolioState> {
        match index {
            0 => Some(PortfolioState::new(self.initial_capital)),
            i => self.states.get(i - 1).copied(),
        }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Re-run from day `index` with its signal replaced.
    ///
    /// `days` must be the series this simulation was produced from. The
    /// prefix `[0, index)` is reused as-is; the step function continues from
    /// the state carried into `index`. `self` is left untouched.
    pub fn with_signal_override(
        &self,
        days: &[Day],
        index: usize,
        signal: Signal,
    ) -> Result<Simulation, InvalidInput> {
        if days.len() != self.len() {
            return Err(InvalidInput::RunMismatch {
                days: days.len(),
                snapshots: self.len(),
            });
        }
        let replaced = with_signal_at(days, index, signal)?;
        let carried = self
            .state_before(index)
            .ok_or(InvalidInput::OverrideOutOfRange {
                index,
                len: self.len(),
            })?;
        let tail = resume(carried, &replaced[index..])?;

        let cutoff = days[index].date;
        let mut trades: Vec<Trade> = self
            .trades
            .iter()
            .take_while(|t| t.date < cutoff)
            .copied()
            .collect();
        trades.extend(tail.trades);

        let mut snapshots = self.snapshots[..index].to_vec();
        snapshots.extend(tail.snapshots);
        let mut states = self.states[..index].to_vec();
        states.extend(tail.states);

        Ok(Simulation {
            initial_capital: self.initial_capital,
            snapshots,
            trades,
            states,
        })
    }
}

/// Validate inputs, then walk every day from the opening state.
pub fn simulate(initial_capital: f64, days: &[Day]) -> Result<Simulation, InvalidInput> {
    if !(initial_capital.is_finite() && initial_capital > 0.0) {
        return Err(InvalidInput::NonPositiveCapital {
            capital: initial_capital,
        });
    }
    let mut run = resume(PortfolioState::new(initial_capital), days)?;
    run.initial_capital = initial_capital;
    Ok(run)
}

/// Walk `days` starting from an arbitrary carried state.
///
/// The returned simulation's `initial_capital` is the carried state's cash
/// value; callers splicing it into a longer run keep their own.
pub fn resume(state: PortfolioState, days: &[Day]) -> Result<Simulation, InvalidInput> {
    if !(state.cash.is_finite() && state.cash >= 0.0) {
        return Err(InvalidInput::InvalidState { cash: state.cash });
    }
    check_ascending(days.iter().map(|d| d.date))?;
    for day in days {
        check_price(day.date, day.close)?;
    }

    let mut snapshots = Vec::with_capacity(days.len());
    let mut states = Vec::with_capacity(days.len());
    let mut trades = Vec::new();

    let mut current = state;
    for day in days {
        let out = step(current, day);
        current = out.state;
        snapshots.push(out.snapshot);
        states.push(out.state);
        trades.extend(out.trade);
    }

    Ok(Simulation {
        initial_capital: state.cash,
        snapshots,
        trades,
        states,
    })
}
