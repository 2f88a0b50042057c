//! Domain error types.

/// Top-level error type for pricedash.
///
/// The dashboard collapses every variant into one generic message on the
/// page; the variants exist for logs and CLI exit codes.
#[derive(Debug, thiserror::Error)]
pub enum DashError {
    #[error("market data request for {symbol} failed: {reason}")]
    Fetch { symbol: String, reason: String },

    #[error("malformed market data for {symbol}: {reason}")]
    MalformedData { symbol: String, reason: String },

    #[error("no price data returned for {symbol}")]
    NoData { symbol: String },

    #[error("company {name} is not in the price table")]
    UnknownCompany { name: String },

    #[error("duplicate company {name} in price table")]
    DuplicateCompany { name: String },

    #[error("unknown period code {code}")]
    InvalidPeriod { code: String },

    #[error("invalid price range: min {min} exceeds max {max}")]
    InvalidPriceRange { min: f64, max: f64 },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&DashError> for std::process::ExitCode {
    fn from(err: &DashError) -> Self {
        let code: u8 = match err {
            DashError::Io(_) => 1,
            DashError::ConfigParse { .. } | DashError::ConfigInvalid { .. } => 2,
            DashError::Fetch { .. }
            | DashError::MalformedData { .. }
            | DashError::NoData { .. } => 3,
            DashError::UnknownCompany { .. }
            | DashError::DuplicateCompany { .. }
            | DashError::InvalidPeriod { .. }
            | DashError::InvalidPriceRange { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
