//! Core domain types and logic.

pub mod price;
pub mod signal;
pub mod series;
pub mod portfolio;
pub mod trade;
pub mod simulator;
pub mod metrics;
pub mod regression;
pub mod backtest;
pub mod config_validation;
pub mod error;
