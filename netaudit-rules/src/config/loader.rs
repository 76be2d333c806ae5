//! Configuration file loading and merging

use super::builtin;
use super::schema::Config;
use crate::error::{Result, RulesError};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Find user config by checking environment and standard locations
    pub fn find_user_config() -> Option<PathBuf> {
        // 1. $NETAUDIT_CONFIG
        if let Ok(path) = env::var("NETAUDIT_CONFIG") {
            let p = PathBuf::from(path);
            if p.exists() {
                return Some(p);
            }
        }

        // 2. $XDG_CONFIG_HOME/netaudit/config.toml
        if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
            let p = PathBuf::from(xdg).join("netaudit/config.toml");
            if p.exists() {
                return Some(p);
            }
        }

        // 3. ~/.config/netaudit/config.toml
        if let Ok(home) = env::var("HOME") {
            let p = PathBuf::from(home).join(".config/netaudit/config.toml");
            if p.exists() {
                return Some(p);
            }
        }

        None
    }

    /// Load config from a file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| RulesError::ConfigLoad {
            path: path.to_path_buf(),
            source,
        })?;

        Self::load_from_str(&contents)
    }

    /// Parse config from TOML text
    pub fn load_from_str(contents: &str) -> Result<Config> {
        let config: Config = toml::from_str(contents)?;
        Ok(config)
    }

    /// Built-in configuration embedded in the binary
    pub fn load_builtin() -> Config {
        builtin::get_builtin().clone()
    }

    /// Merge an override config on top of a base config.
    /// Groups and profiles are extended by name; audit and common settings
    /// are replaced; private patterns are replaced only when non-empty.
    pub fn merge_configs(mut base: Config, override_cfg: Config) -> Config {
        for (name, group) in override_cfg.rules.groups {
            base.rules.groups.insert(name, group);
        }

        for (name, profile) in override_cfg.rules.profiles {
            base.rules.profiles.insert(name, profile);
        }

        if !override_cfg.private.patterns.is_empty() {
            base.private = override_cfg.private;
        }

        base.audit = override_cfg.audit;
        base.common = override_cfg.common;

        base
    }

    /// Load with full config priority order
    /// Priority: built-in < user < explicit
    pub fn load_with_priority(explicit_config: Option<&Path>) -> Result<Config> {
        let mut merged = Self::load_builtin();

        if let Some(user_path) = Self::find_user_config() {
            tracing::debug!("Loading user config from {:?}", user_path);
            merged = Self::merge_configs(merged, Self::load_from_file(&user_path)?);
        }

        if let Some(explicit_path) = explicit_config {
            tracing::debug!("Loading explicit config from {:?}", explicit_path);
            merged = Self::merge_configs(merged, Self::load_from_file(explicit_path)?);
        }

        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.common.config_version, "1.0");
        assert_eq!(config.audit.profile, "default");
        assert!(config.audit.synthetic_hosts);
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
[common]
config_version = "1.0"

[audit]
profile = "strict"
url_request_source = 1

[rules.groups.cdn]
description = "CDN"
prefixes = ["https://cdn.example.com/"]

[rules.profiles.strict]
groups = ["cdn"]
"#;

        let config = ConfigLoader::load_from_str(toml_str).unwrap();
        assert_eq!(config.audit.profile, "strict");
        assert_eq!(config.audit.url_request_source, Some(1));
        assert_eq!(config.rules.groups["cdn"].prefixes, vec!["https://cdn.example.com/"]);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = ConfigLoader::load_from_str("[audit]\nprofiel = \"x\"\n");
        assert!(matches!(result, Err(RulesError::ConfigParse(_))));
    }

    #[test]
    fn test_merge_extends_groups_and_overrides_settings() {
        let base = ConfigLoader::load_builtin();
        let user = ConfigLoader::load_from_str(
            r#"
[audit]
profile = "mine"
synthetic_hosts = false

[rules.groups.internal_schemes]
schemes = ["chrome"]

[rules.groups.extra]
prefixes = ["https://extra.example/"]

[rules.profiles.mine]
groups = ["extra"]
"#,
        )
        .unwrap();

        let merged = ConfigLoader::merge_configs(base, user);
        assert_eq!(merged.audit.profile, "mine");
        assert!(!merged.audit.synthetic_hosts);
        assert_eq!(merged.rules.groups["internal_schemes"].schemes, vec!["chrome"]);
        assert!(merged.rules.groups.contains_key("extra"));
        assert!(merged.rules.groups.contains_key("browser_services"));
        assert!(merged.rules.profiles.contains_key("default"));
        assert!(merged.private.patterns.is_empty());
    }

    #[test]
    fn test_merge_replaces_private_patterns_when_given() {
        let base = ConfigLoader::load_builtin();
        let user = ConfigLoader::load_from_str("[private]\npatterns = [\"10\\\\..*\"]\n").unwrap();

        let merged = ConfigLoader::merge_configs(base, user);
        assert_eq!(merged.private.patterns, vec![r"10\..*"]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[audit]\nprofile = \"internal\"").unwrap();

        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert_eq!(config.audit.profile, "internal");
    }

    #[test]
    fn test_load_missing_file() {
        let result = ConfigLoader::load_from_file("/nonexistent/netaudit.toml");
        assert!(matches!(result, Err(RulesError::ConfigLoad { .. })));
    }

    #[test]
    fn test_explicit_config_overrides_builtin() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[rules.profiles.default]\ngroups = [\"internal_schemes\"]").unwrap();

        let config = ConfigLoader::load_with_priority(Some(file.path())).unwrap();
        assert_eq!(config.rules.profiles["default"].groups, vec!["internal_schemes"]);
        assert!(config.rules.groups.contains_key("browser_services"));
    }
}
