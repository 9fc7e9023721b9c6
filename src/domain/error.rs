//! Domain error types.

use chrono::NaiveDate;

/// A violated input invariant, reported with the date or index that broke it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidInput {
    #[error("initial capital must be positive and finite, got {capital}")]
    NonPositiveCapital { capital: f64 },

    #[error("price on {date} must be positive and finite, got {price}")]
    NonPositivePrice { date: NaiveDate, price: f64 },

    #[error("dates must be strictly ascending: {date} follows {previous}")]
    DatesNotAscending { previous: NaiveDate, date: NaiveDate },

    #[error("signal on {date} must be one of -1, 0, 1, got {value}")]
    InvalidSignal { date: NaiveDate, value: i64 },

    #[error("price series has {prices} entries but signal series has {signals}")]
    LengthMismatch { prices: usize, signals: usize },

    #[error("row {index}: price dated {price_date} but signal dated {signal_date}")]
    DateMismatch {
        index: usize,
        price_date: NaiveDate,
        signal_date: NaiveDate,
    },

    #[error("override index {index} out of range for {len} days")]
    OverrideOutOfRange { index: usize, len: usize },

    #[error("series has {days} days but the run being resumed has {snapshots} snapshots")]
    RunMismatch { days: usize, snapshots: usize },

    #[error("portfolio value on {date} must be positive and finite, got {value}")]
    NonPositiveValue { date: NaiveDate, value: f64 },

    #[error("carried state is invalid: cash {cash}")]
    InvalidState { cash: f64 },
}

/// Top-level error type for sigtrader.
#[derive(Debug, thiserror::Error)]
pub enum BacktestError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("insufficient data: have {have} {what}, need at least {need}")]
    InsufficientData {
        what: &'static str,
        have: usize,
        need: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BacktestError {
    /// Process exit status for this error category.
    pub fn exit_status(&self) -> u8 {
        match self {
            BacktestError::Io(_) => 1,
            BacktestError::ConfigParse { .. }
            | BacktestError::ConfigMissing { .. }
            | BacktestError::ConfigInvalid { .. } => 2,
            BacktestError::Data { .. } => 3,
            BacktestError::InvalidInput(_) => 4,
            BacktestError::NoData { .. } | BacktestError::InsufficientData { .. } => 5,
        }
    }
}

impl From<&BacktestError> for std::process::ExitCode {
    fn from(err: &BacktestError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
