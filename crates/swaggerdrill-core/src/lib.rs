//! swaggerdrill-core: endpoint model and spec normalization
//!
//! This crate turns Swagger 2.0 / OpenAPI 3.x documents into a flat, ordered
//! list of endpoints and defines the result records produced when those
//! endpoints are exercised, along with run summaries and result export.

pub mod config;
pub mod export;
pub mod listing;
pub mod record;
pub mod spec;
pub mod stats;

pub use config::{Config, ConfigError};
pub use export::{ExportError, export_results};
pub use listing::EndpointListing;
pub use record::{Endpoint, TestResult};
pub use spec::{Dialect, NormalizeError, normalize, rebase};
pub use stats::RunSummary;
