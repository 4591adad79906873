//! Error types for occurrence-engine operations.
//!
//! Expansion, filtering and sorting are infallible. Errors only arise at the
//! ingestion boundary, where a catalog is parsed and its definitions checked.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid definition '{id}': {reason}")]
    InvalidDefinition { id: String, reason: String },

    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("Unknown {kind} '{value}' (expected one of: {expected})")]
    UnknownOption {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Catalog parse error: {0}")]
    Catalog(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
