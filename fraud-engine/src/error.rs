//! Error types for the fraud engine

use thiserror::Error;

/// Fraud engine error
///
/// Scoring itself never fails. These errors come from the boundary where a
/// customer history is decoded and checked, or where configuration is applied.
#[derive(Debug, Error)]
pub enum Error {
    /// History document could not be decoded
    #[error("Invalid customer history: {0}")]
    InvalidHistory(String),

    /// A single order or issue record is malformed
    #[error("Invalid record {id}: {reason}")]
    InvalidRecord {
        /// Identifier of the offending record
        id: String,
        /// What is wrong with it
        reason: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::Io(err.into())
        } else {
            Error::InvalidHistory(err.to_string())
        }
    }
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
