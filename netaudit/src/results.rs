//! Audit results written to disk for offline inspection

use crate::error::{AuditError, Result};
use crate::netlog::NetLogDocument;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const LOG_SUFFIX: &str = "-network_log";
const RESULTS_SUFFIX: &str = "-network_audit_results.json";

/// Where results go by default: next to the log, with the log's
/// "-network_log" suffix replaced.
///
/// `out/SimpleTest-network_log.json` becomes
/// `out/SimpleTest-network_audit_results.json`.
pub fn default_results_path(log_path: &Path) -> PathBuf {
    let stem = log_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base = stem.strip_suffix(LOG_SUFFIX).unwrap_or(&stem);

    log_path.with_file_name(format!("{}{}", base, RESULTS_SUFFIX))
}

/// Write the whole document, with `events` reduced to the retained ones, as
/// compact JSON
pub fn write_results(document: &NetLogDocument, retained: &[usize], path: &Path) -> Result<()> {
    let results = document.with_events(retained);

    let write_err = |source: std::io::Error| AuditError::ResultsWrite {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &results)?;
    writer.flush().map_err(write_err)?;

    tracing::info!("Network audit results stored in {}", path.display());
    Ok(())
}
