//! Performance metrics computed from a finished equity curve.
//!
//! All ratios are exact fractions (0.10 is ten percent); formatting is left to
//! the report adapters. Annualization assumes 252 trading days and a zero
//! risk-free rate.

use std::fmt;
use std::str::FromStr;

use super::error::{BacktestError, InvalidInput};
use super::portfolio::{equity_curve, PortfolioSnapshot};

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Denominator used for the standard deviation of daily returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VolatilityConvention {
    /// n - 1 (Bessel's correction).
    #[default]
    Sample,
    /// n.
    Population,
}

impl fmt::Display for VolatilityConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolatilityConvention::Sample => f.write_str("sample"),
            VolatilityConvention::Population => f.write_str("population"),
        }
    }
}

impl FromStr for VolatilityConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sample" => Ok(VolatilityConvention::Sample),
            "population" => Ok(VolatilityConvention::Population),
            other => Err(format!(
                "unknown volatility convention '{other}' (expected sample or population)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricsRecord {
    pub initial_capital: f64,
    pub final_value: f64,
    pub total_return: f64,
    pub max_drawdown: f64,
    pub annualized_return: f64,
    pub annualized_volatility: f64,
    /// `None` when volatility is zero and the ratio is undefined.
    pub sharpe_ratio: Option<f64>,
    pub trading_days: usize,
    pub volatility_convention: VolatilityConvention,
}

impl MetricsRecord {
    /// Compute with the default (sample) volatility convention.
    pub fn compute(
        snapshots: &[PortfolioSnapshot],
        initial_capital: f64,
    ) -> Result<Self, BacktestError> {
        Self::compute_with(snapshots, initial_capital, VolatilityConvention::default())
    }

    pub fn compute_with(
        snapshots: &[PortfolioSnapshot],
        initial_capital: f64,
        convention: VolatilityConvention,
    ) -> Result<Self, BacktestError> {
        if snapshots.is_empty() {
            return Err(BacktestError::InsufficientData {
                what: "snapshots",
                have: 0,
                need: 1,
            });
        }
        if !(initial_capital.is_finite() && initial_capital > 0.0) {
            return Err(InvalidInput::NonPositiveCapital {
                capital: initial_capital,
            }
            .into());
        }
        // returns and drawdown divide by earlier values
        if let Some(bad) = snapshots
            .iter()
            .find(|s| !(s.total_value.is_finite() && s.total_value > 0.0))
        {
            return Err(InvalidInput::NonPositiveValue {
                date: bad.date,
                value: bad.total_value,
            }
            .into());
        }

        let values = equity_curve(snapshots);
        let final_value = values[values.len() - 1];
        let total_return = final_value / initial_capital - 1.0;
        let max_drawdown = max_drawdown(&values);

        let returns = daily_returns(&values);
        let (annualized_return, annualized_volatility) = if returns.is_empty() {
            (0.0, 0.0)
        } else {
            (
                mean(&returns) * TRADING_DAYS_PER_YEAR,
                std_dev(&returns, convention) * TRADING_DAYS_PER_YEAR.sqrt(),
            )
        };

        let sharpe_ratio = if annualized_volatility != 0.0 {
            Some(annualized_return / annualized_volatility)
        } else {
            None
        };

        Ok(MetricsRecord {
            initial_capital,
            final_value,
            total_return,
            max_drawdown,
            annualized_return,
            annualized_volatility,
            sharpe_ratio,
            trading_days: snapshots.len(),
            volatility_convention: convention,
        })
    }
}

/// Most negative relative decline from the running peak; 0 for a curve that
/// never dips below its peak.
pub fn max_drawdown(values: &[f64]) -> f64 {
    let Some(&first) = values.first() else {
        return 0.0;
    };

    let mut peak = first;
    let mut max_dd = 0.0_f64;
    for &value in values {
        if value > peak {
            peak = value;
        }
        let dd = (value - peak) / peak;
        if dd < max_dd {
            max_dd = dd;
        }
    }
    max_dd
}

/// V_i / V_{i-1} - 1 for i = 1..n.
pub fn daily_returns(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Standard deviation; 0 when the convention leaves no degrees of freedom.
fn std_dev(values: &[f64], convention: VolatilityConvention) -> f64 {
    let n = values.len();
    let denominator = match convention {
        VolatilityConvention::Sample => n.saturating_sub(1),
        VolatilityConvention::Population => n,
    };
    if denominator == 0 {
        return 0.0;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (sum_sq / denominator as f64).sqrt()
}
