//! Previous-close linear regression signal model.
//!
//! Fits close[t] = intercept + slope * close[t-1] by ordinary least squares on
//! a chronological training prefix, predicts every day, and signals BUY when
//! the prediction is above the close, SELL when below, HOLD when equal.
//! The first day has no previous close and produces no signal.

use super::error::BacktestError;
use super::price::PricePoint;
use super::signal::{Signal, SignalRecord};

pub const MIN_TRAINING_ROWS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearModel {
    pub intercept: f64,
    pub slope: f64,
}

impl LinearModel {
    /// Ordinary least squares over (x, y) pairs.
    pub fn fit(xs: &[f64], ys: &[f64]) -> Result<Self, BacktestError> {
        let n = xs.len().min(ys.len());
        if n < MIN_TRAINING_ROWS {
            return Err(BacktestError::InsufficientData {
                what: "training rows",
                have: n,
                need: MIN_TRAINING_ROWS,
            });
        }
        let (xs, ys) = (&xs[..n], &ys[..n]);
        let mean_x = xs.iter().sum::<f64>() / n as f64;
        let mean_y = ys.iter().sum::<f64>() / n as f64;

        let sxx: f64 = xs.iter().map(|x| (x - mean_x).powi(2)).sum();
        let sxy: f64 = xs
            .iter()
            .zip(ys)
            .map(|(x, y)| (x - mean_x) * (y - mean_y))
            .sum();

        if sxx == 0.0 {
            return Err(BacktestError::Data {
                reason: "previous close is constant over the training window".into(),
            });
        }

        let slope = sxy / sxx;
        Ok(LinearModel {
            intercept: mean_y - slope * mean_x,
            slope,
        })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionParams {
    /// Leading fraction of rows used for fitting, 0 < f < 1.
    pub train_fraction: f64,
    /// Force HOLD on the final day.
    pub skip_last_day: bool,
}

impl Default for RegressionParams {
    fn default() -> Self {
        RegressionParams {
            train_fraction: 0.8,
            skip_last_day: false,
        }
    }
}

/// Number of training rows for `rows` samples; the test share is rounded up
/// so at least one row is held out whenever there are two or more.
pub fn training_rows(rows: usize, train_fraction: f64) -> usize {
    let test = ((1.0 - train_fraction) * rows as f64).ceil() as usize;
    rows.saturating_sub(test)
}

/// Signals for every day after the first, in price order.
pub fn generate_signals(
    prices: &[PricePoint],
    params: &RegressionParams,
) -> Result<Vec<SignalRecord>, BacktestError> {
    let xs: Vec<f64> = prices.iter().map(|p| p.close).collect();
    let rows: Vec<(&PricePoint, f64)> = prices
        .iter()
        .skip(1)
        .zip(xs.iter().copied())
        .collect();

    let train = training_rows(rows.len(), params.train_fraction);
    let train_x: Vec<f64> = rows[..train].iter().map(|(_, prev)| *prev).collect();
    let train_y: Vec<f64> = rows[..train].iter().map(|(p, _)| p.close).collect();
    let model = LinearModel::fit(&train_x, &train_y)?;

    let last = rows.len().saturating_sub(1);
    Ok(rows
        .iter()
        .enumerate()
        .map(|(i, (point, prev))| {
            let predicted = model.predict(*prev);
            let signal = if params.skip_last_day && i == last {
                Signal::Hold
            } else if predicted > point.close {
                Signal::Buy
            } else if predicted < point.close {
                Signal::Sell
            } else {
                Signal::Hold
            };
            SignalRecord::new(point.date, signal)
        })
        .collect())
}
