//! Domain error types.

/// Failure raised at an indicator's entry point when its parameters cannot
/// be applied to the input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IndicatorError {
    #[error("invalid window for {indicator}: {window} (input has {len} values)")]
    InvalidWindow {
        indicator: &'static str,
        window: usize,
        len: usize,
    },

    #[error("invalid band multiplier: {multiplier}")]
    InvalidMultiplier { multiplier: f64 },
}

/// Top-level error type for stockcast.
#[derive(Debug, thiserror::Error)]
pub enum StockcastError {
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

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error(transparent)]
    Indicator(#[from] IndicatorError),

    #[error("cannot parse indicator '{input}': {reason}")]
    IndicatorParse { input: String, reason: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&StockcastError> for std::process::ExitCode {
    fn from(err: &StockcastError) -> Self {
        let code: u8 = match err {
            StockcastError::Io(_) | StockcastError::Json(_) => 1,
            StockcastError::ConfigParse { .. }
            | StockcastError::ConfigMissing { .. }
            | StockcastError::ConfigInvalid { .. } => 2,
            StockcastError::Data { .. } => 3,
            StockcastError::Indicator(_) | StockcastError::IndicatorParse { .. } => 4,
            StockcastError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
