//! Request classification against a rule set

use super::ruleset::RuleSet;
use crate::error::{Result, RulesError};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use url::{Host, Url};

/// Bare lowercase hostnames. Chromium looks up random non-resolvable hosts of
/// this shape on startup.
static SYNTHETIC_HOST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-z]+$").expect("synthetic host regex"));

/// Which rule let a request through
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowReason {
    SyntheticHost,
    Scheme(String),
    Prefix(String),
    Pattern(String),
}

impl fmt::Display for AllowReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllowReason::SyntheticHost => write!(f, "synthetic host"),
            AllowReason::Scheme(s) => write!(f, "scheme {}", s),
            AllowReason::Prefix(p) => write!(f, "prefix {}", p),
            AllowReason::Pattern(p) => write!(f, "pattern {}", p),
        }
    }
}

/// Outcome of classifying one request URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Expected traffic
    Allowed(AllowReason),
    /// Private-network access: reported but tolerated
    PrivateWarning,
    /// Matches no rule
    Failure,
}

impl Classification {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Classification::Allowed(_))
    }
}

/// Classifies request URLs as allowed, private-network, or failure
#[derive(Debug, Clone)]
pub struct RequestClassifier {
    rules: RuleSet,
}

impl RequestClassifier {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Parse and classify a URL string
    pub fn classify_str(&self, url: &str) -> Result<Classification> {
        let parsed = Url::parse(url).map_err(|source| RulesError::MalformedUrl {
            url: url.to_string(),
            source,
        })?;
        Ok(self.classify(&parsed))
    }

    /// Classify a parsed URL.
    ///
    /// Allow rules are checked before the private-address fallback, so a
    /// private URL that is explicitly listed is allowed rather than warned.
    pub fn classify(&self, url: &Url) -> Classification {
        let host = host_text(url);

        if self.rules.synthetic_hosts && SYNTHETIC_HOST.is_match(&host) {
            return Classification::Allowed(AllowReason::SyntheticHost);
        }

        let allow = &self.rules.allow;

        if allow.matches_scheme(url.scheme()) {
            return Classification::Allowed(AllowReason::Scheme(url.scheme().to_string()));
        }

        let spec = url.as_str();

        if let Some(prefix) = allow.matching_prefix(spec) {
            return Classification::Allowed(AllowReason::Prefix(prefix.to_string()));
        }

        if let Some(pattern) = allow.matching_pattern(spec) {
            return Classification::Allowed(AllowReason::Pattern(pattern.to_string()));
        }

        if self.rules.private.full_match(&host).is_some() {
            return Classification::PrivateWarning;
        }

        Classification::Failure
    }
}

/// Host as text for host rules. IPv6 addresses are rendered without
/// brackets; URLs without a host yield an empty string.
pub fn host_text(url: &Url) -> String {
    match url.host() {
        Some(Host::Domain(domain)) => domain.to_string(),
        Some(Host::Ipv4(addr)) => addr.to_string(),
        Some(Host::Ipv6(addr)) => addr.to_string(),
        None => String::new(),
    }
}
