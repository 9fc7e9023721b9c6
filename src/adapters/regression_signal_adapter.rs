//! Signal producer backed by the previous-close regression model.

use crate::domain::error::BacktestError;
use crate::domain::price::PricePoint;
use crate::domain::regression::{generate_signals, RegressionParams};
use crate::domain::signal::SignalRecord;
use crate::ports::config_port::ConfigPort;
use crate::ports::signal_port::SignalPort;
use tracing::info;

pub struct RegressionSignalAdapter {
    params: RegressionParams,
}

impl RegressionSignalAdapter {
    pub fn new(params: RegressionParams) -> Self {
        Self { params }
    }

    pub fn from_config(config: &dyn ConfigPort) -> Self {
        let defaults = RegressionParams::default();
        Self::new(RegressionParams {
            train_fraction: config.get_double("signals", "train_fraction", defaults.train_fraction),
            skip_last_day: config.get_bool("signals", "skip_last_day", defaults.skip_last_day),
        })
    }

    pub fn params(&self) -> &RegressionParams {
        &self.params
    }
}

impl SignalPort for RegressionSignalAdapter {
    fn signals(&self, prices: &[PricePoint]) -> Result<Vec<SignalRecord>, BacktestError> {
        let signals = generate_signals(prices, &self.params)?;
        info!(
            days = signals.len(),
            train_fraction = self.params.train_fraction,
            "generated regression signals"
        );
        Ok(signals)
    }
}
