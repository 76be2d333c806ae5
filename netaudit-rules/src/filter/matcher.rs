//! URL and host matching logic

use crate::error::{Result, RulesError};
use regex::Regex;

/// Wrap a pattern so it only matches the entire input
pub fn anchored(pattern: &str) -> String {
    format!("^(?:{})$", pattern)
}

/// A list of regular expressions, each required to match the whole input
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    sources: Vec<String>,
    compiled: Vec<Regex>,
}

impl PatternSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile and add a pattern
    pub fn add(&mut self, pattern: &str) -> Result<()> {
        let compiled = Regex::new(&anchored(pattern)).map_err(|source| RulesError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        self.sources.push(pattern.to_string());
        self.compiled.push(compiled);
        Ok(())
    }

    /// Returns the first pattern that fully matches `text`
    pub fn full_match(&self, text: &str) -> Option<&str> {
        self.compiled
            .iter()
            .zip(&self.sources)
            .find(|(re, _)| re.is_match(text))
            .map(|(_, src)| src.as_str())
    }

    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }
}

/// Matcher for allowed URLs: schemes, literal prefixes and full-match patterns
#[derive(Debug, Clone, Default)]
pub struct UrlMatcher {
    schemes: Vec<String>,
    prefixes: Vec<String>,
    patterns: PatternSet,
}

impl UrlMatcher {
    /// Create a new empty matcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an allowed scheme. Duplicates are ignored.
    pub fn add_scheme(&mut self, scheme: &str) {
        if !self.schemes.iter().any(|s| s == scheme) {
            self.schemes.push(scheme.to_string());
        }
    }

    /// Add a literal prefix of the serialized URL. Duplicates are ignored.
    pub fn add_prefix(&mut self, prefix: &str) {
        if !self.prefixes.iter().any(|p| p == prefix) {
            self.prefixes.push(prefix.to_string());
        }
    }

    /// Add a regular expression that must match the whole serialized URL
    pub fn add_pattern(&mut self, pattern: &str) -> Result<()> {
        self.patterns.add(pattern)
    }

    pub fn matches_scheme(&self, scheme: &str) -> bool {
        self.schemes.iter().any(|s| s == scheme)
    }

    /// Byte-wise prefix test, not URL-aware
    pub fn matching_prefix(&self, spec: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .find(|p| spec.starts_with(p.as_str()))
            .map(String::as_str)
    }

    pub fn matching_pattern(&self, spec: &str) -> Option<&str> {
        self.patterns.full_match(spec)
    }

    /// Check if matcher has any rules
    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty() && self.prefixes.is_empty() && self.patterns.is_empty()
    }

    pub fn schemes(&self) -> &[String] {
        &self.schemes
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}
