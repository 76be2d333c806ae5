//! Compiled rule sets

use super::matcher::{PatternSet, UrlMatcher};
use crate::config::builtin::DEFAULT_PRIVATE_PATTERNS;
use crate::config::schema::{Config, RuleGroup};
use crate::error::{Result, RulesError};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Immutable set of classification rules.
///
/// Built once per audit configuration and shared read-only by every
/// classification.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub(crate) allow: UrlMatcher,
    pub(crate) private: PatternSet,
    pub(crate) synthetic_hosts: bool,
}

impl RuleSet {
    /// Start building a rule set by hand
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::new()
    }

    /// Create a rule set from a named profile
    pub fn from_profile(profile_name: &str, config: &Config) -> Result<Self> {
        let profile = config
            .rules
            .profiles
            .get(profile_name)
            .ok_or_else(|| RulesError::ProfileNotFound {
                profile: profile_name.to_string(),
            })?;

        let mut builder = RuleSetBuilder::new()
            .synthetic_hosts(config.audit.synthetic_hosts)
            .private_patterns(&config.private.patterns)?;
        let mut processed = HashSet::new();

        for group_name in &profile.groups {
            Self::expand_group(group_name, &config.rules.groups, &mut builder, &mut processed)?;
        }

        let rules = builder.build();
        tracing::debug!(
            profile = profile_name,
            schemes = rules.allow.schemes().len(),
            prefixes = rules.allow.prefixes().len(),
            patterns = rules.allow.pattern_count(),
            "Compiled rule set"
        );
        Ok(rules)
    }

    /// Recursively expand a group and add its rules to the builder
    fn expand_group(
        group_name: &str,
        groups: &IndexMap<String, RuleGroup>,
        builder: &mut RuleSetBuilder,
        processed: &mut HashSet<String>,
    ) -> Result<()> {
        // Each group once; also stops reference cycles
        if !processed.insert(group_name.to_string()) {
            return Ok(());
        }

        let group = groups.get(group_name).ok_or_else(|| RulesError::GroupNotFound {
            group: group_name.to_string(),
        })?;

        for scheme in &group.schemes {
            builder.allow.add_scheme(scheme);
        }
        for prefix in &group.prefixes {
            builder.allow.add_prefix(prefix);
        }
        for pattern in &group.patterns {
            builder.allow.add_pattern(pattern)?;
        }

        for child_name in &group.groups {
            Self::expand_group(child_name, groups, builder, processed)?;
        }

        Ok(())
    }

    pub fn allow(&self) -> &UrlMatcher {
        &self.allow
    }

    pub fn private_pattern_count(&self) -> usize {
        self.private.len()
    }

    pub fn synthetic_hosts_enabled(&self) -> bool {
        self.synthetic_hosts
    }
}

/// Builder for [`RuleSet`]
#[derive(Debug)]
pub struct RuleSetBuilder {
    allow: UrlMatcher,
    private: Option<PatternSet>,
    synthetic_hosts: bool,
}

impl RuleSetBuilder {
    fn new() -> Self {
        Self {
            allow: UrlMatcher::new(),
            private: None,
            synthetic_hosts: true,
        }
    }

    pub fn scheme(mut self, scheme: &str) -> Self {
        self.allow.add_scheme(scheme);
        self
    }

    pub fn prefix(mut self, prefix: &str) -> Self {
        self.allow.add_prefix(prefix);
        self
    }

    pub fn pattern(mut self, pattern: &str) -> Result<Self> {
        self.allow.add_pattern(pattern)?;
        Ok(self)
    }

    /// Replace the private-address patterns. An empty list keeps the defaults.
    pub fn private_patterns<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self> {
        if patterns.is_empty() {
            return Ok(self);
        }
        let mut set = PatternSet::new();
        for pattern in patterns {
            set.add(pattern.as_ref())?;
        }
        self.private = Some(set);
        Ok(self)
    }

    pub fn synthetic_hosts(mut self, enabled: bool) -> Self {
        self.synthetic_hosts = enabled;
        self
    }

    pub fn build(self) -> RuleSet {
        let private = self.private.unwrap_or_else(default_private_patterns);
        RuleSet {
            allow: self.allow,
            private,
            synthetic_hosts: self.synthetic_hosts,
        }
    }
}

fn default_private_patterns() -> PatternSet {
    let mut set = PatternSet::new();
    for pattern in DEFAULT_PRIVATE_PATTERNS {
        set.add(pattern).expect("Failed to compile builtin private pattern");
    }
    set
}
