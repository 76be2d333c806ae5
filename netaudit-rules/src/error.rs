//! Error types for allowlist configuration and classification

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RulesError>;

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("Configuration validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Profile not found: {profile}")]
    ProfileNotFound { profile: String },

    #[error("Group not found: {group}")]
    GroupNotFound { group: String },

    #[error("Invalid pattern {pattern}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Malformed URL {url}: {source}")]
    MalformedUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to load config from {path}: {source}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Cycle detected in group references: {path}")]
    CycleDetected { path: String },

    #[error("Unknown group reference: {group}")]
    UnknownGroup { group: String },

    #[error("Empty {kind} entry in group {group}")]
    EmptyEntry { kind: &'static str, group: String },

    #[error("Invalid regular expression: {pattern}")]
    InvalidPattern { pattern: String },
}
