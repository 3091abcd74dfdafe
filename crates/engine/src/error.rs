//! The module contains the errors the engine can throw.
//!
//! Every variant renders as a single human-readable message, which is what
//! callers surface to the user. None of them is fatal: the triggering action
//! can always be retried.
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid payer: {0}")]
    InvalidPayer(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Nothing to settle for {0}")]
    EmptyDraft(String),
    #[error("Receipt analysis failed: {0}")]
    Extraction(String),
    #[error("Local cache error: {0}")]
    Cache(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidPayer(a), Self::InvalidPayer(b)) => a == b,
            (Self::InvalidDate(a), Self::InvalidDate(b)) => a == b,
            (Self::EmptyDraft(a), Self::EmptyDraft(b)) => a == b,
            (Self::Extraction(a), Self::Extraction(b)) => a == b,
            (Self::Cache(a), Self::Cache(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(value: std::io::Error) -> Self {
        Self::Cache(value.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(value: serde_json::Error) -> Self {
        Self::Cache(value.to_string())
    }
}
