//! Local result files, `.swaggerdrill/results/` by default
//!
//! Written only when asked for (`--save` / `--save-dir` / `results_dir`).
//! Each run produces the exported records plus a summary beside them:
//!
//! ```text
//! .swaggerdrill/results/
//! ├── api-test-results-2026-10-18T09-30-00.000Z.json
//! └── api-test-results-2026-10-18T09-30-00.000Z.summary.json
//! ```

use std::path::{Path, PathBuf};

use swaggerdrill_core::{Config, ExportError, RunSummary, TestResult, export_results};

pub const DEFAULT_RESULTS_DIR: &str = ".swaggerdrill/results";

/// `--save-dir` wins over `results_dir` from config, then the default.
pub fn results_dir(flag: Option<&str>, config: &Config) -> PathBuf {
    flag.map(PathBuf::from)
        .or_else(|| config.results_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_RESULTS_DIR))
}

/// Whether this run should write result files at all.
pub fn should_save(save: bool, save_dir: Option<&str>, config: &Config) -> bool {
    save || save_dir.is_some() || config.results_dir.is_some()
}

/// Export results (sensitive headers masked) and their summary.
///
/// Returns the path of the results file.
pub fn save_run(
    results: &[TestResult],
    summary: &RunSummary,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    let path = export_results(results, dir, true)?;
    let summary_json =
        serde_json::to_string_pretty(summary).map_err(|e| ExportError::Serialize(e.to_string()))?;
    std::fs::write(summary_path(&path), summary_json)
        .map_err(|e| ExportError::Io(format!("write summary: {e}")))?;
    Ok(path)
}

/// `x.json` → `x.summary.json`
fn summary_path(results_path: &Path) -> PathBuf {
    results_path.with_extension("summary.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_precedence() {
        let mut config = Config::default();
        assert_eq!(results_dir(None, &config), PathBuf::from(DEFAULT_RESULTS_DIR));

        config.results_dir = Some(PathBuf::from("out"));
        assert_eq!(results_dir(None, &config), PathBuf::from("out"));
        assert_eq!(results_dir(Some("cli"), &config), PathBuf::from("cli"));
    }

    #[test]
    fn save_only_when_requested() {
        let mut config = Config::default();
        assert!(!should_save(false, None, &config));
        assert!(should_save(true, None, &config));
        assert!(should_save(false, Some("x"), &config));
        config.results_dir = Some(PathBuf::from("out"));
        assert!(should_save(false, None, &config));
    }

    #[test]
    fn summary_sits_beside_results() {
        assert_eq!(
            summary_path(Path::new("d/api-test-results-2026-10-18T09-30-00.000Z.json")),
            PathBuf::from("d/api-test-results-2026-10-18T09-30-00.000Z.summary.json")
        );
    }

    #[test]
    fn save_run_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let summary = RunSummary::from_results(&[]);

        let path = save_run(&[], &summary, dir.path()).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
        let written: RunSummary =
            serde_json::from_str(&std::fs::read_to_string(summary_path(&path)).unwrap()).unwrap();
        assert_eq!(written, summary);
    }
}
