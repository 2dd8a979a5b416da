//! Domain error types.

/// Top-level error type for scalplab.
#[derive(Debug, thiserror::Error)]
pub enum ScalplabError {
    #[error("data error: {reason}")]
    Data { reason: String },

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

    #[error("unknown strategy: {name}")]
    UnknownStrategy { name: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("insufficient data for {symbol}: have {bars} bars, need {minimum}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&ScalplabError> for std::process::ExitCode {
    fn from(err: &ScalplabError) -> Self {
        let code: u8 = match err {
            ScalplabError::Io(_) | ScalplabError::Report { .. } => 1,
            ScalplabError::ConfigParse { .. }
            | ScalplabError::ConfigMissing { .. }
            | ScalplabError::ConfigInvalid { .. } => 2,
            ScalplabError::UnknownStrategy { .. } => 3,
            ScalplabError::Data { .. }
            | ScalplabError::NoData { .. }
            | ScalplabError::InsufficientData { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
