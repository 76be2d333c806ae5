//! Configuration schema types

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Complete audit configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub audit: AuditSettings,
    #[serde(default)]
    pub private: PrivateAddressConfig,
    #[serde(default)]
    pub rules: RulesConfig,
}

/// Common settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CommonConfig {
    #[serde(default = "default_config_version")]
    pub config_version: String,
}

fn default_config_version() -> String {
    "1.0".to_string()
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            config_version: default_config_version(),
        }
    }
}

/// Settings that drive a single audit run
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuditSettings {
    /// Profile used when none is given on the command line
    #[serde(default = "default_profile")]
    pub profile: String,
    /// Treat bare lowercase hostnames (e.g. "abcdef") as allowed
    #[serde(default = "default_true")]
    pub synthetic_hosts: bool,
    /// Override for the URL_REQUEST source type id
    #[serde(default)]
    pub url_request_source: Option<u32>,
    /// Override for the URL_REQUEST_FAKE_RESPONSE_HEADERS_CREATED event type id
    #[serde(default)]
    pub fake_response_headers_event: Option<u32>,
}

fn default_profile() -> String {
    "default".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            synthetic_hosts: true,
            url_request_source: None,
            fake_response_headers_event: None,
        }
    }
}

/// Host patterns that identify private-network addresses.
///
/// Each entry is a regular expression matched against the whole host.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PrivateAddressConfig {
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Named allowlist groups and the profiles that combine them
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RulesConfig {
    #[serde(default)]
    pub groups: IndexMap<String, RuleGroup>,
    #[serde(default)]
    pub profiles: IndexMap<String, Profile>,
}

/// A named group of allow rules
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RuleGroup {
    #[serde(default)]
    pub description: String,
    /// URL schemes allowed outright (exact match)
    #[serde(default)]
    pub schemes: Vec<String>,
    /// Literal prefixes of the serialized URL
    #[serde(default)]
    pub prefixes: Vec<String>,
    /// Regular expressions that must match the whole serialized URL
    #[serde(default)]
    pub patterns: Vec<String>,
    /// References to other groups (for composition)
    #[serde(default)]
    pub groups: Vec<String>,
}

/// A profile selects the groups applied to an audit
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub groups: Vec<String>,
}
