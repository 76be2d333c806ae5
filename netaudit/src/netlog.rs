//! NetLog documents and the events inside them
//!
//! A NetLog is a JSON object with a `constants` object (symbolic name tables)
//! and an `events` array. Only the parts the audit needs are modelled; every
//! other field, including other top-level keys such as `polledData`, is
//! carried through untouched.

use crate::error::{AuditError, LogError, Result};
use netaudit_rules::config::AuditSettings;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Name of the URL request source type in `constants.logSourceType`
pub const URL_REQUEST_SOURCE: &str = "URL_REQUEST";

/// Name of the fake-response-headers event in `constants.logEventTypes`
pub const FAKE_RESPONSE_HEADERS_EVENT: &str = "URL_REQUEST_FAKE_RESPONSE_HEADERS_CREATED";

/// A decoded and structurally checked NetLog document
#[derive(Debug, Clone)]
pub struct NetLogDocument {
    constants: Map<String, Value>,
    events: Vec<Value>,
    /// Every other top-level key
    rest: Map<String, Value>,
}

impl NetLogDocument {
    /// Load and check a document from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let value: Value = serde_json::from_reader(reader).map_err(LogError::Parse)?;
        Self::from_value(value)
    }

    /// Check the top-level shape: a non-empty `constants` object and a
    /// non-empty `events` array.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut root) = value else {
            return Err(LogError::NotAnObject.into());
        };

        let constants = match root.remove("constants") {
            Some(Value::Object(constants)) if constants.is_empty() => {
                return Err(LogError::EmptyConstants.into())
            }
            Some(Value::Object(constants)) => constants,
            _ => return Err(LogError::MissingConstants.into()),
        };

        let events = match root.remove("events") {
            Some(Value::Array(events)) if events.is_empty() => {
                return Err(LogError::EmptyEvents.into())
            }
            Some(Value::Array(events)) => events,
            _ => return Err(LogError::MissingEvents.into()),
        };

        Ok(Self {
            constants,
            events,
            rest: root,
        })
    }

    pub fn constants(&self) -> &Map<String, Value> {
        &self.constants
    }

    pub fn raw_events(&self) -> &[Value] {
        &self.events
    }

    /// Decode every event, in order
    pub fn events(&self) -> Result<Vec<LogEvent>> {
        self.events
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                LogEvent::deserialize(raw).map_err(|e| AuditError::MalformedEvent {
                    index,
                    reason: e.to_string(),
                })
            })
            .collect()
    }

    /// Copy of the whole document with `events` reduced to those at `indices`
    pub fn with_events(&self, indices: &[usize]) -> Value {
        let events = indices
            .iter()
            .filter_map(|&i| self.events.get(i).cloned())
            .collect();

        let mut root = self.rest.clone();
        root.insert("constants".to_string(), Value::Object(self.constants.clone()));
        root.insert("events".to_string(), Value::Array(events));
        Value::Object(root)
    }

    /// Look up a symbolic id in one of the constants tables
    pub fn constant(&self, table: &str, name: &str) -> Option<u32> {
        self.constants
            .get(table)?
            .get(name)?
            .as_u64()
            .and_then(|id| u32::try_from(id).ok())
    }
}

/// One event from the log
#[derive(Debug, Clone, Deserialize)]
pub struct LogEvent {
    #[serde(rename = "type")]
    pub event_type: u32,
    pub source: EventSource,
    /// Only inspected for URL request events
    #[serde(default)]
    pub params: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventSource {
    #[serde(rename = "type")]
    pub source_type: u32,
    #[serde(default)]
    pub id: Option<u64>,
}

/// What the audit does with an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventRole<'a> {
    /// Not a URL request, or no URL: dropped before classification
    Discard,
    /// Fake response headers: kept for context, never classified
    Diagnostic,
    /// URL request carrying this URL
    Request(&'a str),
}

impl LogEvent {
    /// Decide whether this event takes part in the audit.
    ///
    /// On a URL request event, `params` that is not an object or a
    /// `params.url` that is not a string is an error. Other sources are
    /// discarded without looking at `params`.
    pub fn role(&self, kinds: &EventKinds) -> std::result::Result<EventRole<'_>, String> {
        if kinds.fake_response_headers == Some(self.event_type) {
            return Ok(EventRole::Diagnostic);
        }

        if self.source.source_type != kinds.url_request_source {
            return Ok(EventRole::Discard);
        }

        let params = match &self.params {
            None | Some(Value::Null) => return Ok(EventRole::Discard),
            Some(Value::Object(params)) => params,
            Some(other) => return Err(format!("params is not an object: {}", other)),
        };

        let Some(url) = params.get("url") else {
            return Ok(EventRole::Discard);
        };

        url.as_str()
            .map(EventRole::Request)
            .ok_or_else(|| format!("params.url is not a string: {}", url))
    }
}

/// Integer ids the event filter depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventKinds {
    pub url_request_source: u32,
    pub fake_response_headers: Option<u32>,
}

impl EventKinds {
    /// Resolve ids from configured overrides, falling back to the log's constants
    pub fn resolve(document: &NetLogDocument, settings: &AuditSettings) -> Result<Self> {
        let url_request_source = settings
            .url_request_source
            .or_else(|| document.constant("logSourceType", URL_REQUEST_SOURCE))
            .ok_or(AuditError::UnknownEventKind {
                name: URL_REQUEST_SOURCE,
            })?;

        let fake_response_headers = settings
            .fake_response_headers_event
            .or_else(|| document.constant("logEventTypes", FAKE_RESPONSE_HEADERS_EVENT));

        if fake_response_headers.is_none() {
            tracing::debug!("{} not in log constants; no diagnostic events", FAKE_RESPONSE_HEADERS_EVENT);
        }

        Ok(Self {
            url_request_source,
            fake_response_headers,
        })
    }
}
