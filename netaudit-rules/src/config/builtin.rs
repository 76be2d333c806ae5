//! Built-in allowlist embedded in the binary
//!
//! The builtin configuration is the lowest-priority layer. It is parsed on
//! first access and cached in a LazyLock.

use super::schema::Config;
use std::sync::LazyLock;

/// Private-address patterns used when the configuration supplies none.
///
/// Mirrors isPrivateIP() from NPM's "ip" module. IPv4 forms accept an
/// IPv4-mapped IPv6 prefix.
pub const DEFAULT_PRIVATE_PATTERNS: &[&str] = &[
    r"(::f{4}:)?10\.([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})",
    r"(::f{4}:)?192\.168\.([0-9]{1,3})\.([0-9]{1,3})",
    r"(::f{4}:)?172\.(1[6-9]|2\d|30|31)\.([0-9]{1,3})\.([0-9]{1,3})",
    r"(::f{4}:)?127\.([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})",
    r"(::f{4}:)?169\.254\.([0-9]{1,3})\.([0-9]{1,3})",
    r"f[cd][0-9a-f]{2}:.*",
    r"fe80:.*",
    r"::1",
    r"::",
];

static BUILTIN_CONFIG: LazyLock<Config> = LazyLock::new(load_builtin_config);

/// Get the builtin configuration
pub fn get_builtin() -> &'static Config {
    &BUILTIN_CONFIG
}

fn load_builtin_config() -> Config {
    const BUILTIN_TOML: &str = include_str!("../builtin-allowlist.toml");
    toml::from_str(BUILTIN_TOML).expect("Failed to parse builtin allowlist")
}
