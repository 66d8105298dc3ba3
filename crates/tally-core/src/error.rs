//! Error types for Tally

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    #[error("Invalid transaction date: {0}")]
    InvalidTransactionDate(String),

    #[error("Invalid limit: {0} (must be greater than zero)")]
    InvalidLimit(f64),

    #[error("External service unavailable: {0}")]
    ExternalServiceUnavailable(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
