//! Error types for audit runs

use netaudit_rules::RulesError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AuditError>;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Invalid network log: {0}")]
    Log(#[from] LogError),

    #[error("Malformed event #{index}: {reason}")]
    MalformedEvent { index: usize, reason: String },

    #[error("Cannot resolve {name}: not in log constants and not configured")]
    UnknownEventKind { name: &'static str },

    #[error(transparent)]
    Rules(#[from] RulesError),

    #[error("Failed to write results to {path}: {source}")]
    ResultsWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Structural problems with the log document itself
#[derive(Debug, Error)]
pub enum LogError {
    #[error("Could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Root value is not an object")]
    NotAnObject,

    #[error("Missing \"constants\" object")]
    MissingConstants,

    #[error("\"constants\" object is empty")]
    EmptyConstants,

    #[error("Missing \"events\" array")]
    MissingEvents,

    #[error("\"events\" array is empty")]
    EmptyEvents,
}
