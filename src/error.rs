//! Error types for the journal pipeline
//!
//! [`JournalError`] covers failures that abort the run (configuration,
//! exchange access, empty datasets). Per-trade-group failures are a separate
//! type ([`crate::journal::GroupError`]) and never abort the run.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, JournalError>;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Auth error: {0}")]
    Auth(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Exchange error: retCode {code}, retMsg '{msg}'")]
    Exchange { code: i64, msg: String },

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Report error: {0}")]
    Report(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl From<config::ConfigError> for JournalError {
    fn from(e: config::ConfigError) -> Self {
        JournalError::Config(e.to_string())
    }
}
