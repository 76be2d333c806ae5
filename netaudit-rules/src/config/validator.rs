//! Configuration validation including cycle detection

use super::schema::{Config, RuleGroup};
use crate::error::{Result, ValidationError};
use crate::filter::matcher::anchored;
use indexmap::IndexMap;
use regex::Regex;
use std::collections::HashSet;

pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate an entire configuration
    pub fn validate(config: &Config) -> Result<()> {
        Self::check_cycles(&config.rules.groups)?;
        Self::validate_references(config)?;
        Self::validate_entries(&config.rules.groups)?;
        Self::validate_patterns(config)?;
        Ok(())
    }

    /// Check for cycles in group references using DFS
    fn check_cycles(groups: &IndexMap<String, RuleGroup>) -> Result<()> {
        for group_name in groups.keys() {
            let mut visited = HashSet::new();
            let mut path = Vec::new();
            Self::dfs_cycle_check(group_name, groups, &mut visited, &mut path)?;
        }
        Ok(())
    }

    fn dfs_cycle_check(
        group_name: &str,
        groups: &IndexMap<String, RuleGroup>,
        visited: &mut HashSet<String>,
        path: &mut Vec<String>,
    ) -> Result<()> {
        if path.iter().any(|p| p == group_name) {
            path.push(group_name.to_string());
            return Err(ValidationError::CycleDetected {
                path: path.join(" -> "),
            }
            .into());
        }

        if visited.contains(group_name) {
            return Ok(());
        }

        visited.insert(group_name.to_string());
        path.push(group_name.to_string());

        if let Some(group) = groups.get(group_name) {
            for child in &group.groups {
                Self::dfs_cycle_check(child, groups, visited, path)?;
            }
        }

        path.pop();
        Ok(())
    }

    /// Validate that all group references exist
    fn validate_references(config: &Config) -> Result<()> {
        let groups = &config.rules.groups;

        for (group_name, group) in groups {
            for ref_name in &group.groups {
                if !groups.contains_key(ref_name) {
                    return Err(ValidationError::UnknownGroup {
                        group: format!("{} -> {}", group_name, ref_name),
                    }
                    .into());
                }
            }
        }

        for (profile_name, profile) in &config.rules.profiles {
            for ref_name in &profile.groups {
                if !groups.contains_key(ref_name) {
                    return Err(ValidationError::UnknownGroup {
                        group: format!("profile {} -> {}", profile_name, ref_name),
                    }
                    .into());
                }
            }
        }

        Ok(())
    }

    /// Empty schemes or prefixes would allow everything
    fn validate_entries(groups: &IndexMap<String, RuleGroup>) -> Result<()> {
        for (group_name, group) in groups {
            if group.schemes.iter().any(|s| s.trim().is_empty()) {
                return Err(ValidationError::EmptyEntry {
                    kind: "scheme",
                    group: group_name.clone(),
                }
                .into());
            }
            if group.prefixes.iter().any(|p| p.is_empty()) {
                return Err(ValidationError::EmptyEntry {
                    kind: "prefix",
                    group: group_name.clone(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Every regular expression must compile
    fn validate_patterns(config: &Config) -> Result<()> {
        let group_patterns = config
            .rules
            .groups
            .iter()
            .flat_map(|(name, group)| group.patterns.iter().map(move |p| (format!("group {}", name), p)));
        let private_patterns = config
            .private
            .patterns
            .iter()
            .map(|p| ("private addresses".to_string(), p));

        for (owner, pattern) in group_patterns.chain(private_patterns) {
            if Regex::new(&anchored(pattern)).is_err() {
                return Err(ValidationError::InvalidPattern {
                    pattern: format!("{} in {}", pattern, owner),
                }
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::Profile;
    use crate::error::RulesError;

    fn group(groups: &[&str]) -> RuleGroup {
        RuleGroup {
            groups: groups.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_cycle() {
        let mut config = Config::default();
        config.rules.groups.insert("a".to_string(), group(&["b"]));
        config.rules.groups.insert("b".to_string(), group(&[]));

        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_detect_cycle() {
        let mut config = Config::default();
        config.rules.groups.insert("a".to_string(), group(&["b"]));
        config.rules.groups.insert("b".to_string(), group(&["a"]));

        let err = ConfigValidator::check_cycles(&config.rules.groups).unwrap_err();
        match err {
            RulesError::Validation(ValidationError::CycleDetected { path }) => {
                assert_eq!(path, "a -> b -> a");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_group_in_profile() {
        let mut config = Config::default();
        config.rules.groups.insert("a".to_string(), group(&[]));
        config.rules.profiles.insert(
            "p".to_string(),
            Profile {
                description: String::new(),
                groups: vec!["a".to_string(), "missing".to_string()],
            },
        );

        assert!(matches!(
            ConfigValidator::validate(&config),
            Err(RulesError::Validation(ValidationError::UnknownGroup { .. }))
        ));
    }

    #[test]
    fn test_empty_prefix_rejected() {
        let mut config = Config::default();
        config.rules.groups.insert(
            "a".to_string(),
            RuleGroup {
                prefixes: vec![String::new()],
                ..Default::default()
            },
        );

        assert!(matches!(
            ConfigValidator::validate(&config),
            Err(RulesError::Validation(ValidationError::EmptyEntry { kind: "prefix", .. }))
        ));
    }

    #[test]
    fn test_bad_regex_rejected() {
        let mut config = Config::default();
        config.private.patterns.push("(10\\.".to_string());

        assert!(matches!(
            ConfigValidator::validate(&config),
            Err(RulesError::Validation(ValidationError::InvalidPattern { .. }))
        ));
    }
}
