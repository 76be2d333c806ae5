//! Network audit of captured NetLog files

pub mod audit;
pub mod error;
pub mod netlog;
pub mod results;
pub mod runner;

// Re-export commonly used types
pub use audit::{AuditVerdict, Auditor, Outcome};
pub use error::{AuditError, LogError, Result};
pub use netlog::{EventKinds, LogEvent, NetLogDocument};
pub use runner::{audit_log, AuditRun, ResultsTarget};
