//! Directional trading signals.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

use super::error::InvalidInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    /// Decode the integer encoding used by signal producers: +1, -1, 0.
    pub fn from_value(value: i64) -> Option<Signal> {
        match value {
            1 => Some(Signal::Buy),
            -1 => Some(Signal::Sell),
            0 => Some(Signal::Hold),
            _ => None,
        }
    }

    pub fn value(self) -> i64 {
        match self {
            Signal::Buy => 1,
            Signal::Sell => -1,
            Signal::Hold => 0,
        }
    }

    /// Apply a confirmer's answer to a suggested signal.
    ///
    /// BUY and SELL survive only when accepted; a declined suggestion becomes
    /// HOLD. HOLD is returned unchanged whatever the answer.
    pub fn confirmed(self, accepted: bool) -> Signal {
        match self {
            Signal::Hold => Signal::Hold,
            s if accepted => s,
            _ => Signal::Hold,
        }
    }

    /// Whether this signal needs a confirmer's answer at all.
    pub fn is_actionable(self) -> bool {
        self != Signal::Hold
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Hold => "HOLD",
        };
        f.write_str(s)
    }
}

impl FromStr for Signal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" | "1" | "+1" => Ok(Signal::Buy),
            "sell" | "-1" => Ok(Signal::Sell),
            "hold" | "0" => Ok(Signal::Hold),
            other => Err(format!("unknown signal '{other}' (expected buy, sell or hold)")),
        }
    }
}

/// Raw, unvalidated signal as emitted by a producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalRecord {
    pub date: NaiveDate,
    pub value: i64,
}

impl SignalRecord {
    pub fn new(date: NaiveDate, signal: Signal) -> Self {
        SignalRecord {
            date,
            value: signal.value(),
        }
    }

    pub fn signal(&self) -> Result<Signal, InvalidInput> {
        Signal::from_value(self.value).ok_or(InvalidInput::InvalidSignal {
            date: self.date,
            value: self.value,
        })
    }
}
