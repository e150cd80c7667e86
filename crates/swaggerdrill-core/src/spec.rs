//! Spec normalization: Swagger 2.0 / OpenAPI 3.x → flat endpoint list
//!
//! Pure functions over an already-decoded document. Paths and methods are
//! visited in declaration order (`serde_json` is built with `preserve_order`).

use serde_json::{Map, Value};

use crate::record::Endpoint;

/// Methods that become endpoints. Any other path-item key is ignored.
pub const METHODS: [&str; 7] = ["get", "post", "put", "delete", "patch", "options", "head"];

const UNKNOWN_TITLE: &str = "Unknown API";
const UNKNOWN_VERSION: &str = "Unknown Version";

/// Spec dialect, detected from the top-level version marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Swagger2,
    OpenApi3,
}

impl Dialect {
    /// `swagger: "2.x"` wins over `openapi: "3.x"` when both are present.
    ///
    /// Numeric markers count too: unquoted `swagger: 2.0` in YAML decodes as a number.
    pub fn detect(spec: &Value) -> Result<Self, NormalizeError> {
        let marker = |key: &str, prefix: char| match spec.get(key) {
            Some(Value::String(v)) => v.starts_with(prefix),
            Some(Value::Number(n)) => n.to_string().starts_with(prefix),
            _ => false,
        };
        if marker("swagger", '2') {
            Ok(Self::Swagger2)
        } else if marker("openapi", '3') {
            Ok(Self::OpenApi3)
        } else {
            Err(NormalizeError::UnsupportedVersion)
        }
    }
}

/// Normalize a spec document into endpoints.
///
/// # Errors
///
/// Returns [`NormalizeError::UnsupportedVersion`] when the document carries
/// neither a `swagger: 2.x` nor an `openapi: 3.x` marker.
pub fn normalize(spec: &Value) -> Result<Vec<Endpoint>, NormalizeError> {
    let dialect = Dialect::detect(spec)?;
    let base_url = base_url(spec, dialect);
    // Used only when no server URL could be derived.
    let fallback_prefix = match dialect {
        Dialect::Swagger2 => str_field(spec, "basePath")
            .unwrap_or("")
            .trim_end_matches('/')
            .to_string(),
        Dialect::OpenApi3 => String::new(),
    };
    let prefix = if base_url.is_empty() {
        fallback_prefix
    } else {
        base_url
    };

    let info = spec.get("info");
    let spec_title = info
        .and_then(|i| str_field(i, "title"))
        .unwrap_or(UNKNOWN_TITLE)
        .to_string();
    let spec_version = info
        .and_then(|i| str_field(i, "version"))
        .unwrap_or(UNKNOWN_VERSION)
        .to_string();

    let mut endpoints = Vec::new();
    let Some(paths) = spec.get("paths").and_then(Value::as_object) else {
        return Ok(endpoints);
    };

    for (raw_path, path_item) in paths {
        let Some(path_item) = path_item.as_object() else {
            tracing::debug!(path = %raw_path, "skipping non-object path item");
            continue;
        };
        let path_params = array_field(path_item, "parameters");

        for (key, operation) in path_item {
            let method = key.to_ascii_lowercase();
            if !METHODS.contains(&method.as_str()) {
                continue;
            }
            let Some(operation) = operation.as_object() else {
                tracing::debug!(path = %raw_path, %method, "skipping non-object operation");
                continue;
            };

            let mut parameters = path_params.clone();
            parameters.extend(array_field(operation, "parameters"));

            let request_body_schema = if method == "get" || method == "head" {
                None
            } else {
                match dialect {
                    Dialect::Swagger2 => body_parameter_schema(&parameters),
                    Dialect::OpenApi3 => request_body_content_schema(operation),
                }
            };

            endpoints.push(Endpoint {
                path: format!("{prefix}{raw_path}"),
                operation_id: non_empty(operation, "operationId")
                    .map_or_else(|| synthesize_operation_id(&method, raw_path), String::from),
                summary: non_empty(operation, "summary")
                    .map_or_else(|| format!("{} {raw_path}", method.to_uppercase()), String::from),
                description: non_empty(operation, "description")
                    .unwrap_or_default()
                    .to_string(),
                parameters,
                request_body_schema,
                responses: operation
                    .get("responses")
                    .cloned()
                    .unwrap_or_else(|| Value::Object(Map::new())),
                spec_title: spec_title.clone(),
                spec_version: spec_version.clone(),
                tags: operation
                    .get("tags")
                    .and_then(Value::as_array)
                    .map(|tags| {
                        tags.iter()
                            .filter_map(|t| t.as_str().map(String::from))
                            .collect()
                    })
                    .unwrap_or_default(),
                deprecated: operation
                    .get("deprecated")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
                method,
            });
        }
    }

    Ok(endpoints)
}

/// Derive the server base URL, trailing slashes stripped. Empty when the
/// document declares no usable server.
#[must_use]
pub fn base_url(spec: &Value, dialect: Dialect) -> String {
    let url = match dialect {
        Dialect::OpenApi3 => spec
            .get("servers")
            .and_then(Value::as_array)
            .and_then(|servers| servers.first())
            .and_then(|server| str_field(server, "url"))
            .unwrap_or("")
            .to_string(),
        Dialect::Swagger2 => match str_field(spec, "host") {
            Some(host) if !host.is_empty() => {
                let scheme = spec
                    .get("schemes")
                    .and_then(Value::as_array)
                    .and_then(|s| s.first())
                    .and_then(Value::as_str)
                    .unwrap_or("https");
                let base_path = str_field(spec, "basePath").unwrap_or("");
                format!("{scheme}://{host}{base_path}")
            }
            _ => String::new(),
        },
    };
    url.trim_end_matches('/').to_string()
}

/// Prefix `base` to every endpoint whose path is not already absolute.
pub fn rebase(endpoints: &mut [Endpoint], base: &str) {
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        return;
    }
    for endpoint in endpoints.iter_mut().filter(|e| !is_absolute(&e.path)) {
        let sep = if endpoint.path.starts_with('/') { "" } else { "/" };
        endpoint.path = format!("{base}{sep}{}", endpoint.path);
    }
}

/// `scheme://...`
#[must_use]
pub fn is_absolute(path: &str) -> bool {
    path.split_once("://").is_some_and(|(scheme, _)| {
        !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// `("post", "/pets/{petId}")` → `"postpetspetId"`
#[must_use]
pub fn synthesize_operation_id(method: &str, raw_path: &str) -> String {
    let stripped: String = raw_path
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    format!("{method}{stripped}")
}

/// Swagger 2.0: the first `in: body` parameter that carries a schema.
fn body_parameter_schema(parameters: &[Value]) -> Option<Value> {
    parameters
        .iter()
        .find(|p| p.get("in").and_then(Value::as_str) == Some("body") && p.get("schema").is_some())
        .and_then(|p| p.get("schema").cloned())
}

/// OpenAPI 3.x: `application/json` content if declared, else the first content type.
fn request_body_content_schema(operation: &Map<String, Value>) -> Option<Value> {
    let content = operation
        .get("requestBody")
        .and_then(|rb| rb.get("content"))
        .and_then(Value::as_object)?;
    let media = match content.get("application/json") {
        Some(json) => json,
        None => content.values().next()?,
    };
    media.get("schema").cloned()
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

fn non_empty<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn array_field(obj: &Map<String, Value>, key: &str) -> Vec<Value> {
    obj.get(key)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("Unsupported OpenAPI specification version (expected swagger 2.x or openapi 3.x)")]
    UnsupportedVersion,
}
