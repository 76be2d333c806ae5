//! Request classification logic

pub mod classifier;
pub mod matcher;
pub mod ruleset;

pub use classifier::{AllowReason, Classification, RequestClassifier};
pub use matcher::{PatternSet, UrlMatcher};
pub use ruleset::{RuleSet, RuleSetBuilder};
