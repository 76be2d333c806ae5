//! Allowlist configuration
//!
//! - Config: groups of allow rules, the profiles selecting them, and audit settings
//! - ConfigLoader: builtin < user < explicit layering
//! - ConfigValidator: reference, cycle and regex checks

pub mod builtin;
pub mod loader;
pub mod schema;
pub mod validator;

pub use builtin::DEFAULT_PRIVATE_PATTERNS;
pub use loader::ConfigLoader;
pub use schema::{AuditSettings, CommonConfig, Config, PrivateAddressConfig, Profile, RuleGroup, RulesConfig};
pub use validator::ConfigValidator;
