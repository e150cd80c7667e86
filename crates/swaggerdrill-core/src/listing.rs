//! Endpoint listing and header pre-flight checks
//!
//! Describes what a run *would* call without sending any requests.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::record::Endpoint;
use crate::spec::METHODS;

/// One listed endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListedEndpoint {
    /// Upper-cased HTTP method
    pub method: String,
    pub path: String,
    pub summary: String,
    pub operation_id: String,
    /// Parameter names in declaration order (duplicates kept)
    pub parameters: Vec<String>,
    pub has_body: bool,
    pub deprecated: bool,
}

/// Every endpoint of a parsed spec plus per-method totals.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EndpointListing {
    pub spec_title: String,
    pub spec_version: String,
    pub endpoints: Vec<ListedEndpoint>,
    /// (METHOD, count) in canonical method order, zero counts omitted
    pub method_counts: Vec<(String, u64)>,
}

impl EndpointListing {
    #[must_use]
    pub fn new(endpoints: &[Endpoint]) -> Self {
        let listed = endpoints
            .iter()
            .map(|e| ListedEndpoint {
                method: e.method.to_uppercase(),
                path: e.path.clone(),
                summary: e.summary.clone(),
                operation_id: e.operation_id.clone(),
                parameters: e
                    .parameters
                    .iter()
                    .filter_map(|p| p.get("name").and_then(|n| n.as_str()))
                    .map(String::from)
                    .collect(),
                has_body: e.request_body_schema.is_some(),
                deprecated: e.deprecated,
            })
            .collect();

        let method_counts = METHODS
            .iter()
            .map(|m| {
                let count = endpoints.iter().filter(|e| e.method == *m).count() as u64;
                (m.to_uppercase(), count)
            })
            .filter(|(_, count)| *count > 0)
            .collect();

        let (spec_title, spec_version) = endpoints
            .first()
            .map(|e| (e.spec_title.clone(), e.spec_version.clone()))
            .unwrap_or_default();

        Self {
            spec_title,
            spec_version,
            endpoints: listed,
            method_counts,
        }
    }

    /// `"3 endpoints (2 GET, 1 POST)"`
    #[must_use]
    pub fn totals_line(&self) -> String {
        let counts: Vec<String> = self
            .method_counts
            .iter()
            .map(|(method, count)| format!("{count} {method}"))
            .collect();
        if counts.is_empty() {
            format!("{} endpoints", self.endpoints.len())
        } else {
            format!("{} endpoints ({})", self.endpoints.len(), counts.join(", "))
        }
    }

    /// Format as human-readable terminal output.
    #[must_use]
    pub fn to_terminal(&self) -> String {
        let mut lines = Vec::new();

        if !self.spec_title.is_empty() {
            lines.push(format!("{} ({})", self.spec_title, self.spec_version));
        }
        lines.push(self.totals_line());
        lines.push(String::new());

        for ep in &self.endpoints {
            let marker = if ep.deprecated { " [deprecated]" } else { "" };
            lines.push(format!("{:<7} {}{marker}", ep.method, ep.path));
            lines.push(format!("        {}", ep.summary));
            if !ep.parameters.is_empty() {
                lines.push(format!("        params: {}", ep.parameters.join(", ")));
            }
            if ep.has_body {
                lines.push("        body: schema".to_string());
            }
        }

        lines.join("\n")
    }
}

// ── Header validation ──

/// Patterns that suggest a placeholder value rather than a real credential.
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-token",
    "your_token",
    "YOUR_TOKEN",
    "your-api-key",
    "YOUR_API_KEY",
    "CHANGEME",
    "changeme",
    "placeholder",
    "replace-me",
    "REPLACE_ME",
];

/// Warn about header values that look like unfilled placeholders.
///
/// Returns one message per suspicious header, sorted by header name.
#[must_use]
pub fn header_warnings(headers: &HashMap<String, String>) -> Vec<String> {
    let mut names: Vec<&String> = headers.keys().collect();
    names.sort();

    let mut warnings = Vec::new();
    for key in names {
        let value = &headers[key];
        if value.contains('<') && value.contains('>') {
            warnings.push(format!("{key}: contains '<...>' placeholder"));
            continue;
        }
        if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| value.contains(**p)) {
            warnings.push(format!("{key}: contains '{pattern}', may be a placeholder"));
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::fixtures::endpoint;

    fn sample() -> Vec<Endpoint> {
        let mut get = endpoint("get", "https://api.test/pets/{petId}");
        get.summary = "Find pet by ID".into();
        get.parameters = vec![
            serde_json::json!({"name": "petId", "in": "path"}),
            serde_json::json!({"name": "petId", "in": "path"}),
        ];
        let mut post = endpoint("post", "https://api.test/pets");
        post.request_body_schema = Some(serde_json::json!({"type": "object"}));
        let mut delete = endpoint("delete", "https://api.test/pets/{petId}");
        delete.deprecated = true;
        vec![get, post, delete, endpoint("get", "https://api.test/health")]
    }

    #[test]
    fn totals_in_canonical_method_order() {
        let listing = EndpointListing::new(&sample());
        assert_eq!(listing.totals_line(), "4 endpoints (2 GET, 1 POST, 1 DELETE)");
    }

    #[test]
    fn empty_listing() {
        let listing = EndpointListing::new(&[]);
        assert_eq!(listing.totals_line(), "0 endpoints");
        assert!(listing.spec_title.is_empty());
    }

    #[test]
    fn terminal_rendering() {
        let listing = EndpointListing::new(&sample());
        insta::assert_snapshot!(listing.to_terminal(), @r"
        Petstore (1.0.0)
        4 endpoints (2 GET, 1 POST, 1 DELETE)

        GET     https://api.test/pets/{petId}
                Find pet by ID
                params: petId, petId
        POST    https://api.test/pets
                POST https://api.test/pets
                body: schema
        DELETE  https://api.test/pets/{petId} [deprecated]
                DELETE https://api.test/pets/{petId}
        GET     https://api.test/health
                GET https://api.test/health
        ");
    }

    #[test]
    fn placeholder_headers_flagged() {
        let headers = HashMap::from([
            ("Authorization".to_string(), "Bearer your-token-here".to_string()),
            ("X-Key".to_string(), "<key>".to_string()),
            ("X-Trace".to_string(), "abc123".to_string()),
        ]);
        let warnings = header_warnings(&headers);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].starts_with("Authorization"));
        assert!(warnings[1].contains("<...>"));
    }
}
