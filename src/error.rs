#[derive(Debug, thiserror::Error)]
pub enum FxError {
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Rate provider error: {0}")]
    RateProvider(String),

    #[error("Notifier error: {0}")]
    Notifier(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<duckdb::Error> for FxError {
    fn from(err: duckdb::Error) -> Self {
        FxError::StoreUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FxError>;
