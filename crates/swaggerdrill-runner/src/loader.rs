//! Spec document loading: local file or http(s) URL, JSON or YAML

use std::path::{Path, PathBuf};

use serde_json::Value;
use swaggerdrill_core::{Endpoint, NormalizeError, normalize, rebase};

/// Where a spec document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecSource {
    File(PathBuf),
    Url(String),
}

impl SpecSource {
    /// `http://` and `https://` locations are fetched, everything else is a path.
    #[must_use]
    pub fn parse(location: &str) -> Self {
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(location.to_string())
        } else {
            Self::File(PathBuf::from(location))
        }
    }
}

impl std::fmt::Display for SpecSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Read and parse a spec document.
///
/// # Errors
///
/// Returns error if the document cannot be read, fetched or parsed.
pub async fn load_spec(source: &SpecSource, client: &reqwest::Client) -> Result<Value, LoadError> {
    match source {
        SpecSource::File(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| LoadError::Io(format!("{}: {e}", path.display())))?;
            parse_spec(path, &content)
        }
        SpecSource::Url(url) => {
            tracing::info!(%url, "fetching spec");
            let resp = client
                .get(url)
                .send()
                .await
                .map_err(|e| LoadError::Fetch(format!("{url}: {e}")))?;
            let status = resp.status();
            if !status.is_success() {
                return Err(LoadError::Fetch(format!("Failed to fetch {url}: {status}")));
            }
            let content = resp
                .text()
                .await
                .map_err(|e| LoadError::Fetch(format!("{url}: {e}")))?;
            let name = url.split(['?', '#']).next().unwrap_or(url);
            parse_spec(Path::new(name), &content)
        }
    }
}

/// Load, normalize and (optionally) rebase onto `base_url`.
///
/// # Errors
///
/// Returns error if loading fails or the document is not Swagger 2 / OpenAPI 3.
pub async fn load_endpoints(
    source: &SpecSource,
    base_url: Option<&str>,
    client: &reqwest::Client,
) -> Result<Vec<Endpoint>, LoadError> {
    let spec = load_spec(source, client).await?;
    let mut endpoints = normalize(&spec)?;
    if let Some(base) = base_url {
        rebase(&mut endpoints, base);
    }
    tracing::debug!(count = endpoints.len(), %source, "normalized endpoints");
    Ok(endpoints)
}

/// JSON or YAML by extension, sniffed from content otherwise.
fn parse_spec(path: &Path, content: &str) -> Result<Value, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let as_json = |c: &str| {
        serde_json::from_str(c).map_err(|e| LoadError::Parse(format!("Invalid JSON: {e}")))
    };
    let as_yaml =
        |c: &str| serde_yml::from_str(c).map_err(|e| LoadError::Parse(format!("Invalid YAML: {e}")));

    match ext.as_str() {
        "yaml" | "yml" => as_yaml(content),
        "json" => as_json(content),
        _ if content.trim_start().starts_with('{') => as_json(content),
        _ => as_yaml(content),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Fetch error: {0}")]
    Fetch(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_detection() {
        assert_eq!(
            SpecSource::parse("https://petstore.swagger.io/v2/swagger.json"),
            SpecSource::Url("https://petstore.swagger.io/v2/swagger.json".into())
        );
        assert_eq!(
            SpecSource::parse("HTTP://localhost/spec"),
            SpecSource::Url("HTTP://localhost/spec".into())
        );
        assert_eq!(
            SpecSource::parse("./api/openapi.yaml"),
            SpecSource::File(PathBuf::from("./api/openapi.yaml"))
        );
    }

    #[test]
    fn parse_json_by_extension() {
        let v = parse_spec(Path::new("spec.json"), r#"{"openapi": "3.0.0"}"#).unwrap();
        assert_eq!(v["openapi"], "3.0.0");
    }

    #[test]
    fn parse_yaml_by_extension() {
        let yaml = "swagger: '2.0'\ninfo:\n  title: T\n  version: '1'\n";
        let v = parse_spec(Path::new("spec.yml"), yaml).unwrap();
        assert_eq!(v["swagger"], "2.0");
        assert_eq!(v["info"]["title"], "T");
    }

    #[test]
    fn sniff_without_extension() {
        let v = parse_spec(Path::new("v2/swagger"), r#"{"swagger": "2.0"}"#).unwrap();
        assert_eq!(v["swagger"], "2.0");
        let v = parse_spec(Path::new("spec.txt"), "openapi: '3.1.0'\n").unwrap();
        assert_eq!(v["openapi"], "3.1.0");
    }

    #[test]
    fn unquoted_yaml_version_still_normalizes() {
        let yaml = "swagger: 2.0\nhost: x.test\npaths:\n  /a:\n    get: {}\n";
        let v = parse_spec(Path::new("spec.yaml"), yaml).unwrap();
        assert!(v["swagger"].is_number());
        let endpoints = normalize(&v).unwrap();
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].path, "https://x.test/a");
    }

    #[test]
    fn invalid_documents() {
        let err = parse_spec(Path::new("spec.json"), "{ nope").unwrap_err();
        assert!(err.to_string().contains("Invalid JSON"));
        let err = parse_spec(Path::new("spec.yaml"), ":\n  :\n    - [invalid").unwrap_err();
        assert!(err.to_string().contains("Invalid YAML"));
    }

    #[tokio::test]
    async fn load_file_and_normalize() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("petstore.yaml");
        std::fs::write(
            &path,
            "openapi: 3.0.0\n\
             info: {title: Pets, version: '2'}\n\
             servers: [{url: /api}]\n\
             paths:\n  /pets:\n    get: {summary: List}\n",
        )
        .unwrap();

        let client = reqwest::Client::new();
        let endpoints = load_endpoints(
            &SpecSource::File(path),
            Some("http://localhost:8080/"),
            &client,
        )
        .await
        .unwrap();
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].path, "http://localhost:8080/api/pets");
        assert_eq!(endpoints[0].spec_title, "Pets");
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let client = reqwest::Client::new();
        let err = load_spec(&SpecSource::File("/nonexistent/spec.json".into()), &client)
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }

    #[tokio::test]
    async fn unsupported_document_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spec.json");
        std::fs::write(&path, r#"{"info": {"title": "x"}}"#).unwrap();
        let err = load_endpoints(&SpecSource::File(path), None, &reqwest::Client::new())
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Normalize(NormalizeError::UnsupportedVersion)));
    }
}
