//! Result export to a timestamped JSON file
//!
//! ```text
//! .swaggerdrill/results/
//! └── api-test-results-2026-10-18T09-30-00.000Z.json
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::record::TestResult;

/// Response headers masked in exports.
const SENSITIVE_HEADERS: &[&str] = &[
    "authorization",
    "x-api-key",
    "x-auth-token",
    "cookie",
    "set-cookie",
    "proxy-authorization",
];

/// Mask value for redacted headers.
const MASK: &str = "***";

/// Write `results` as a pretty JSON array into `dir`.
///
/// Returns the path of the written file.
///
/// # Errors
///
/// Returns error if the directory cannot be created or the file cannot be written.
pub fn export_results(
    results: &[TestResult],
    dir: &Path,
    mask_headers: bool,
) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)
        .map_err(|e| ExportError::Io(format!("create {}: {e}", dir.display())))?;

    let path = dir.join(export_filename(Utc::now()));
    let json = if mask_headers {
        let masked: Vec<TestResult> = results.iter().map(mask_result).collect();
        serde_json::to_string_pretty(&masked)
    } else {
        serde_json::to_string_pretty(results)
    }
    .map_err(|e| ExportError::Serialize(e.to_string()))?;

    std::fs::write(&path, json)
        .map_err(|e| ExportError::Io(format!("write {}: {e}", path.display())))?;

    Ok(path)
}

/// `api-test-results-2026-10-18T09-30-00.000Z.json` (colons are not portable in filenames)
#[must_use]
pub fn export_filename(at: DateTime<Utc>) -> String {
    format!(
        "api-test-results-{}.json",
        at.format("%Y-%m-%dT%H-%M-%S%.3fZ")
    )
}

/// Returns true if the header name matches a known sensitive header (case-insensitive).
fn is_sensitive_header(name: &str) -> bool {
    SENSITIVE_HEADERS
        .iter()
        .any(|&h| name.eq_ignore_ascii_case(h))
}

fn mask_result(result: &TestResult) -> TestResult {
    let mut masked = result.clone();
    if let Some(headers) = masked.headers.as_object_mut() {
        for (key, value) in headers.iter_mut() {
            if is_sensitive_header(key) {
                *value = serde_json::Value::String(MASK.to_string());
            }
        }
    }
    masked
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
}
