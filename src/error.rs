//! Error types for the advisor

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdvisorError>;

/// Top-level error type
#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("LLM provider error: {0}")]
    LlmProvider(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No data available: {0}")]
    NoData(String),
}
