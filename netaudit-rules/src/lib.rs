//! Allowlist rules and request classification for network audits

pub mod config;
pub mod error;
pub mod filter;

// Re-export commonly used types
pub use config::{Config, ConfigLoader, ConfigValidator};
pub use error::{Result, RulesError, ValidationError};
pub use filter::{AllowReason, Classification, RequestClassifier, RuleSet};
