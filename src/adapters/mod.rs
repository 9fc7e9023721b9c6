//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod file_config_adapter;
pub mod regression_signal_adapter;
pub mod text_report_adapter;
pub mod prompt_confirm_adapter;
