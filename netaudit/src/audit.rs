//! Audit of a sequence of log events
//!
//! Each event is mapped to an [`Outcome`] without side effects, then the
//! outcomes are folded, in input order, into an [`AuditVerdict`].

use crate::error::{AuditError, Result};
use crate::netlog::{EventKinds, EventRole, LogEvent};
use netaudit_rules::{AllowReason, Classification, RequestClassifier};
use url::Url;

/// Result of inspecting one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Discarded,
    Diagnostic { index: usize },
    Classified {
        index: usize,
        /// `source.id` of the event, when the log carries one
        source_id: Option<u64>,
        url: String,
        classification: Classification,
    },
}

/// Aggregate result of an audit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditVerdict {
    /// True iff no request was classified as a failure
    pub passed: bool,
    /// Private-network URLs, in event order
    pub warnings: Vec<String>,
    /// URLs matching no rule, in event order
    pub failures: Vec<String>,
    pub events_seen: usize,
    pub requests_classified: usize,
    pub allowed: usize,
    /// Indices of the events worth keeping in the results document:
    /// diagnostic events and every classified request except those allowed
    /// by a synthetic host or an internal scheme
    pub retained: Vec<usize>,
}

impl AuditVerdict {
    fn new(events_seen: usize) -> Self {
        Self {
            passed: true,
            events_seen,
            ..Default::default()
        }
    }

    fn record(mut self, outcome: Outcome) -> Self {
        match outcome {
            Outcome::Discarded => {}
            Outcome::Diagnostic { index } => self.retained.push(index),
            Outcome::Classified {
                index,
                source_id,
                url,
                classification,
            } => {
                self.requests_classified += 1;
                match classification {
                    Classification::Allowed(reason) => {
                        tracing::debug!("Allowed by {}: {}", reason, url);
                        if !matches!(reason, AllowReason::SyntheticHost | AllowReason::Scheme(_)) {
                            self.retained.push(index);
                        }
                        self.allowed += 1;
                    }
                    Classification::PrivateWarning => {
                        tracing::warn!(source_id = ?source_id, "NETWORK AUDIT WARNING: {}", url);
                        self.retained.push(index);
                        self.warnings.push(url);
                    }
                    Classification::Failure => {
                        tracing::error!(source_id = ?source_id, "NETWORK AUDIT FAIL: {}", url);
                        self.retained.push(index);
                        self.failures.push(url);
                        self.passed = false;
                    }
                }
            }
        }
        self
    }
}

/// Runs the request classifier over log events
#[derive(Debug, Clone)]
pub struct Auditor<'a> {
    classifier: &'a RequestClassifier,
    kinds: EventKinds,
}

impl<'a> Auditor<'a> {
    pub fn new(classifier: &'a RequestClassifier, kinds: EventKinds) -> Self {
        Self { classifier, kinds }
    }

    /// Inspect a single event. An unparsable request URL is an error.
    pub fn inspect(&self, index: usize, event: &LogEvent) -> Result<Outcome> {
        let role = event
            .role(&self.kinds)
            .map_err(|reason| AuditError::MalformedEvent { index, reason })?;

        match role {
            EventRole::Discard => Ok(Outcome::Discarded),
            EventRole::Diagnostic => Ok(Outcome::Diagnostic { index }),
            EventRole::Request(raw) => {
                let url = Url::parse(raw).map_err(|e| AuditError::MalformedEvent {
                    index,
                    reason: format!("invalid URL {:?}: {}", raw, e),
                })?;
                let classification = self.classifier.classify(&url);
                Ok(Outcome::Classified {
                    index,
                    source_id: event.source.id,
                    url: url.into(),
                    classification,
                })
            }
        }
    }

    /// Audit every event. Stops at the first malformed event; classification
    /// failures are collected rather than raised.
    pub fn audit(&self, events: &[LogEvent]) -> Result<AuditVerdict> {
        let outcomes = events
            .iter()
            .enumerate()
            .map(|(index, event)| self.inspect(index, event))
            .collect::<Result<Vec<_>>>()?;

        Ok(outcomes
            .into_iter()
            .fold(AuditVerdict::new(events.len()), AuditVerdict::record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netaudit_rules::RuleSet;
    use serde_json::json;

    const KINDS: EventKinds = EventKinds {
        url_request_source: 1,
        fake_response_headers: Some(9),
    };

    fn classifier() -> RequestClassifier {
        let rules = RuleSet::builder()
            .scheme("chrome")
            .prefix("https://allowed.example.com/")
            .build();
        RequestClassifier::new(rules)
    }

    fn request(url: &str) -> LogEvent {
        serde_json::from_value(json!({ "type": 2, "source": { "type": 1 }, "params": { "url": url } })).unwrap()
    }

    fn other_source(url: &str) -> LogEvent {
        serde_json::from_value(json!({ "type": 2, "source": { "type": 3 }, "params": { "url": url } })).unwrap()
    }

    fn fake_headers(url: &str) -> LogEvent {
        serde_json::from_value(json!({ "type": 9, "source": { "type": 1 }, "params": { "url": url } })).unwrap()
    }

    #[test]
    fn test_no_classifiable_events_passes() {
        let classifier = classifier();
        let auditor = Auditor::new(&classifier, KINDS);
        let events = vec![other_source("https://example.com/"), fake_headers("https://example.com/")];

        let verdict = auditor.audit(&events).unwrap();
        assert!(verdict.passed);
        assert!(verdict.warnings.is_empty());
        assert!(verdict.failures.is_empty());
        assert_eq!(verdict.requests_classified, 0);
        assert_eq!(verdict.retained, vec![1]);
    }

    #[test]
    fn test_empty_event_list_passes() {
        let classifier = classifier();
        let verdict = Auditor::new(&classifier, KINDS).audit(&[]).unwrap();
        assert!(verdict.passed);
        assert_eq!(verdict.events_seen, 0);
    }

    #[test]
    fn test_order_preserved() {
        let classifier = classifier();
        let auditor = Auditor::new(&classifier, KINDS);
        let events = vec![
            request("https://a.example.org/"),
            request("https://allowed.example.com/b"),
            request("http://192.168.0.3/c"),
            request("https://d.example.org/"),
            request("http://10.1.1.1/e"),
        ];

        let verdict = auditor.audit(&events).unwrap();
        assert!(!verdict.passed);
        assert_eq!(verdict.failures, vec!["https://a.example.org/", "https://d.example.org/"]);
        assert_eq!(verdict.warnings, vec!["http://192.168.0.3/c", "http://10.1.1.1/e"]);
        assert_eq!(verdict.allowed, 1);
        assert_eq!(verdict.requests_classified, 5);
        assert_eq!(verdict.retained, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_warnings_alone_pass() {
        let classifier = classifier();
        let auditor = Auditor::new(&classifier, KINDS);
        let verdict = auditor.audit(&[request("https://10.0.0.5/")]).unwrap();

        assert!(verdict.passed);
        assert_eq!(verdict.warnings, vec!["https://10.0.0.5/"]);
    }

    #[test]
    fn test_fake_headers_event_never_fails() {
        let classifier = classifier();
        let auditor = Auditor::new(&classifier, KINDS);
        let verdict = auditor.audit(&[fake_headers("https://example.com/")]).unwrap();

        assert!(verdict.passed);
        assert!(verdict.failures.is_empty());
    }

    #[test]
    fn test_malformed_url_aborts() {
        let classifier = classifier();
        let auditor = Auditor::new(&classifier, KINDS);
        let events = vec![request("https://example.com/"), request("http://[::1")];

        match auditor.audit(&events) {
            Err(AuditError::MalformedEvent { index, .. }) => assert_eq!(index, 1),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_url_on_other_source_is_ignored() {
        let classifier = classifier();
        let auditor = Auditor::new(&classifier, KINDS);
        let verdict = auditor.audit(&[other_source("http://[::1")]).unwrap();
        assert!(verdict.passed);
    }

    #[test]
    fn test_inspect_reports_serialized_url() {
        let classifier = classifier();
        let auditor = Auditor::new(&classifier, KINDS);

        assert_eq!(
            auditor.inspect(4, &request("chrome://newtab")).unwrap(),
            Outcome::Classified {
                index: 4,
                source_id: None,
                url: "chrome://newtab".to_string(),
                classification: Classification::Allowed(AllowReason::SyntheticHost),
            }
        );
        assert_eq!(
            auditor.inspect(0, &request("HTTPS://Example.COM")).unwrap(),
            Outcome::Classified {
                index: 0,
                source_id: None,
                url: "https://example.com/".to_string(),
                classification: Classification::Failure,
            }
        );
    }

    #[test]
    fn test_inspect_carries_source_id() {
        let classifier = classifier();
        let auditor = Auditor::new(&classifier, KINDS);
        let event: LogEvent = serde_json::from_value(json!({
            "type": 2,
            "source": { "type": 1, "id": 42 },
            "params": { "url": "https://example.com/" }
        }))
        .unwrap();

        match auditor.inspect(0, &event).unwrap() {
            Outcome::Classified { source_id, .. } => assert_eq!(source_id, Some(42)),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_internal_allows_are_not_retained() {
        let classifier = classifier();
        let auditor = Auditor::new(&classifier, KINDS);
        let events = vec![
            request("chrome://new-tab-page/"),
            request("https://abcdef/"),
            request("https://allowed.example.com/x"),
            request("https://example.com/"),
            fake_headers("https://example.com/"),
        ];

        let verdict = auditor.audit(&events).unwrap();
        assert_eq!(verdict.allowed, 3);
        assert_eq!(verdict.retained, vec![2, 3, 4]);
    }
}
