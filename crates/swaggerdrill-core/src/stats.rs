//! Run summary: success rates by method, path and spec
//!
//! A result counts as successful when its status is 2xx. Transport failures
//! (status 0) count as failed. Groupings keep first-seen order so the summary
//! reads in the same order as the run.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::record::TestResult;

/// Per-method counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MethodStat {
    pub method: String,
    pub count: u64,
    pub successful: u64,
}

/// Per-path success rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PathStat {
    pub path: String,
    pub count: u64,
    /// Percentage of 2xx responses (0–100)
    pub success_rate: f64,
}

/// Results grouped by the spec they were produced from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpecStat {
    pub spec_title: String,
    pub spec_version: String,
    pub count: u64,
    pub successful: u64,
}

/// Coarse rating of a success rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SuccessBand {
    /// ≥ 80%
    Good,
    /// ≥ 50%
    Fair,
    Poor,
}

impl SuccessBand {
    #[must_use]
    pub fn from_rate(rate: f64) -> Self {
        if rate >= 80.0 {
            Self::Good
        } else if rate >= 50.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

impl std::fmt::Display for SuccessBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Good => write!(f, "good"),
            Self::Fair => write!(f, "fair"),
            Self::Poor => write!(f, "poor"),
        }
    }
}

/// Aggregate view over one run (or over fetched history).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RunSummary {
    pub total: u64,
    pub successful: u64,
    pub failed: u64,
    /// Results with status 0
    pub transport_failures: u64,
    /// Percentage of 2xx responses (0–100)
    pub success_rate: f64,
    pub band: SuccessBand,
    /// Status code → count
    pub status_distribution: BTreeMap<u16, u64>,
    pub by_method: Vec<MethodStat>,
    pub by_path: Vec<PathStat>,
    pub by_spec: Vec<SpecStat>,
}

impl RunSummary {
    #[must_use]
    pub fn from_results(results: &[TestResult]) -> Self {
        let total = results.len() as u64;
        let successful = results.iter().filter(|r| r.is_success()).count() as u64;
        let transport_failures = results.iter().filter(|r| r.is_transport_failure()).count() as u64;
        let success_rate = percent(successful, total);

        let mut status_distribution: BTreeMap<u16, u64> = BTreeMap::new();
        let mut by_method: Vec<MethodStat> = Vec::new();
        let mut paths: Vec<(String, u64, u64)> = Vec::new();
        let mut by_spec: Vec<SpecStat> = Vec::new();

        for r in results {
            let ok = u64::from(r.is_success());
            *status_distribution.entry(r.status).or_default() += 1;

            let method = r.endpoint.method.to_uppercase();
            match by_method.iter_mut().find(|m| m.method == method) {
                Some(m) => {
                    m.count += 1;
                    m.successful += ok;
                }
                None => by_method.push(MethodStat {
                    method,
                    count: 1,
                    successful: ok,
                }),
            }

            match paths.iter_mut().find(|(p, ..)| *p == r.endpoint.path) {
                Some((_, count, succ)) => {
                    *count += 1;
                    *succ += ok;
                }
                None => paths.push((r.endpoint.path.clone(), 1, ok)),
            }

            match by_spec
                .iter_mut()
                .find(|s| s.spec_title == r.spec_title && s.spec_version == r.spec_version)
            {
                Some(s) => {
                    s.count += 1;
                    s.successful += ok;
                }
                None => by_spec.push(SpecStat {
                    spec_title: r.spec_title.clone(),
                    spec_version: r.spec_version.clone(),
                    count: 1,
                    successful: ok,
                }),
            }
        }

        let by_path = paths
            .into_iter()
            .map(|(path, count, succ)| PathStat {
                path,
                count,
                success_rate: percent(succ, count),
            })
            .collect();

        Self {
            total,
            successful,
            failed: total - successful,
            transport_failures,
            success_rate,
            band: SuccessBand::from_rate(success_rate),
            status_distribution,
            by_method,
            by_path,
            by_spec,
        }
    }

    /// Every result was 2xx (vacuously true for an empty run).
    #[must_use]
    pub fn all_successful(&self) -> bool {
        self.failed == 0
    }
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// `"50"`, `"100"`, `"66.7"`
#[must_use]
pub fn format_pct(pct: f64) -> String {
    if pct == 0.0 || pct == 100.0 {
        format!("{pct:.0}")
    } else {
        format!("{pct:.1}")
    }
}

/// Format status distribution as a compact string: "0x1, 200x5, 404x2"
#[must_use]
pub fn format_distribution(dist: &BTreeMap<u16, u64>) -> String {
    dist.iter()
        .map(|(code, count)| format!("{code}x{count}"))
        .collect::<Vec<_>>()
        .join(", ")
}
