//! Endpoint descriptors and test result records
//!
//! Both types serialize with camelCase keys so that stored records round-trip
//! through the persistence backend unchanged.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One (path, method) pair extracted from a spec document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Absolute URL, or spec-relative path when no server could be resolved
    pub path: String,
    /// Lower-cased HTTP method
    pub method: String,
    pub operation_id: String,
    pub summary: String,
    #[serde(default)]
    pub description: String,
    /// Path-level parameters followed by operation-level parameters
    #[serde(default)]
    pub parameters: Vec<serde_json::Value>,
    /// Raw schema of the request body, `null` for GET/HEAD
    #[serde(default)]
    pub request_body_schema: Option<serde_json::Value>,
    /// Status code → response object, as declared
    #[serde(default)]
    pub responses: serde_json::Value,
    #[serde(default)]
    pub spec_title: String,
    #[serde(default)]
    pub spec_version: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub deprecated: bool,
}

impl Endpoint {
    /// `"GET https://api.test/pets"`
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.method.to_uppercase(), self.path)
    }
}

/// Outcome of executing one endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub endpoint: Endpoint,
    /// HTTP status, `0` when no response was received
    pub status: u16,
    pub status_text: String,
    /// Response headers (lower-cased names)
    #[serde(default)]
    pub headers: serde_json::Value,
    /// Parsed JSON body, raw text body, or `{"error": ...}` on transport failure
    #[serde(default)]
    pub data: serde_json::Value,
    /// Payload actually sent
    #[serde(default)]
    pub request_body: Option<serde_json::Value>,
    /// ISO-8601 completion instant
    pub timestamp: String,
    /// Milliseconds elapsed
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub spec_title: String,
    #[serde(default)]
    pub spec_version: String,

    // -- assigned by the persistence backend --
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl TestResult {
    /// Transport-level failure marker.
    pub const FAILED_STATUS: u16 = 0;

    /// 2xx response.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// No response was received.
    #[must_use]
    pub fn is_transport_failure(&self) -> bool {
        self.status == Self::FAILED_STATUS
    }
}

/// Generate JSON Schema for the result record.
#[must_use]
pub fn generate_schema() -> String {
    let schema = schemars::schema_for!(TestResult);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_serializes_camel_case() {
        let ep = fixtures::endpoint("get", "https://api.test/pets");
        let json = serde_json::to_value(&ep).unwrap();
        assert_eq!(json["operationId"], "getOp");
        assert_eq!(json["specTitle"], "Petstore");
        assert!(json["requestBodySchema"].is_null());
        assert!(json.get("operation_id").is_none());
    }

    #[test]
    fn result_omits_backend_fields_when_absent() {
        let r = fixtures::result("get", "https://api.test/pets", 200);
        let json = serde_json::to_value(&r).unwrap();
        assert!(json.get("_id").is_none());
        assert!(json.get("createdAt").is_none());
        assert_eq!(json["statusText"], "");
        assert!(json["requestBody"].is_null());
    }

    #[test]
    fn deserialize_stored_record() {
        let json = r#"{
            "_id": "66f1",
            "endpoint": {
                "path": "https://petstore.swagger.io/v2/pet/{petId}",
                "method": "get",
                "operationId": "getPetById",
                "summary": "Find pet by ID"
            },
            "status": 404,
            "statusText": "Not Found",
            "headers": {},
            "data": {"message": "Pet not found"},
            "requestBody": null,
            "timestamp": "2026-10-18T09:00:00.000Z",
            "duration": 153,
            "specTitle": "Swagger Petstore",
            "specVersion": "1.0.7",
            "createdAt": "2026-10-18T09:00:01.000Z"
        }"#;
        let r: TestResult = serde_json::from_str(json).unwrap();
        assert_eq!(r.id.as_deref(), Some("66f1"));
        assert_eq!(r.endpoint.operation_id, "getPetById");
        assert!(r.endpoint.parameters.is_empty());
        assert!(!r.is_success());
        assert!(!r.is_transport_failure());
    }

    #[test]
    fn success_and_failure_classification() {
        assert!(fixtures::result("get", "/a", 204).is_success());
        assert!(!fixtures::result("get", "/a", 301).is_success());
        assert!(fixtures::result("get", "/a", 0).is_transport_failure());
    }

    #[test]
    fn label_uppercases_method() {
        let ep = fixtures::endpoint("delete", "https://api.test/pets/1");
        assert_eq!(ep.label(), "DELETE https://api.test/pets/1");
    }

    #[test]
    fn schema_generation_produces_valid_json() {
        let schema = generate_schema();
        let parsed: serde_json::Value = serde_json::from_str(&schema).unwrap();
        assert_eq!(
            parsed.get("title").and_then(|v| v.as_str()),
            Some("TestResult")
        );
    }
}
