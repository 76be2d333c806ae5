//! End-to-end audit of a NetLog file

use crate::audit::{AuditVerdict, Auditor};
use crate::error::Result;
use crate::netlog::{EventKinds, NetLogDocument};
use crate::results::{default_results_path, write_results};
use netaudit_rules::config::AuditSettings;
use netaudit_rules::RequestClassifier;
use std::path::{Path, PathBuf};

/// Where to write the results document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsTarget {
    /// Next to the log file
    Beside,
    At(PathBuf),
    Skip,
}

/// Outcome of auditing one log file
#[derive(Debug, Clone)]
pub struct AuditRun {
    pub verdict: AuditVerdict,
    pub results_path: Option<PathBuf>,
}

/// Load, check and audit a log, then write the results document.
///
/// Results are written whether or not the audit passed.
pub fn audit_log(
    log_path: &Path,
    classifier: &RequestClassifier,
    settings: &AuditSettings,
    target: &ResultsTarget,
) -> Result<AuditRun> {
    let document = NetLogDocument::load(log_path)?;
    let kinds = EventKinds::resolve(&document, settings)?;
    tracing::debug!(
        url_request_source = kinds.url_request_source,
        fake_response_headers = ?kinds.fake_response_headers,
        "Resolved event kinds"
    );

    let events = document.events()?;
    let verdict = Auditor::new(classifier, kinds).audit(&events)?;

    let results_path = match target {
        ResultsTarget::Beside => Some(default_results_path(log_path)),
        ResultsTarget::At(path) => Some(path.clone()),
        ResultsTarget::Skip => None,
    };
    if let Some(path) = &results_path {
        write_results(&document, &verdict.retained, path)?;
    }

    Ok(AuditRun {
        verdict,
        results_path,
    })
}
