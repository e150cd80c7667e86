//! Sequential endpoint execution
//!
//! One request per endpoint, strictly in order. Per-endpoint failures become
//! data (`status = 0` records) and persistence failures are logged; `run`
//! itself cannot fail.

pub mod params;
pub mod store;
pub mod transport;

use std::collections::HashMap;
use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde_json::{Value, json};
use swaggerdrill_core::{Config, Endpoint, TestResult};

use crate::synth;
use store::{HttpResultStore, ResultSink};
use transport::{HttpMethod, HttpRequest, ReqwestTransport, Transport, TransportError};

/// Status text recorded when no response was received.
pub const REQUEST_FAILED: &str = "Request Failed";

/// Fallback for endpoints that carry no spec title/version.
const UNKNOWN: &str = "Unknown";

pub struct TestRunner<T, S> {
    transport: T,
    sink: S,
    seed: Option<u64>,
}

impl TestRunner<ReqwestTransport, Option<HttpResultStore>> {
    /// Real HTTP transport; persistence enabled when `store_url` is set.
    ///
    /// # Errors
    ///
    /// Returns error if an HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, RunnerError> {
        let transport = ReqwestTransport::new(config.request_timeout())
            .map_err(|e| RunnerError::Http(e.to_string()))?;
        let sink = config
            .store_url
            .as_deref()
            .map(|url| HttpResultStore::new(url, config.persist_timeout()))
            .transpose()
            .map_err(|e| RunnerError::Http(e.to_string()))?;
        Ok(Self::new(transport, sink))
    }
}

impl<T, S> TestRunner<T, S> {
    #[must_use]
    pub fn new(transport: T, sink: S) -> Self {
        Self {
            transport,
            sink,
            seed: None,
        }
    }

    /// Replace the persistence sink.
    #[must_use]
    pub fn with_sink<S2>(self, sink: S2) -> TestRunner<T, S2> {
        TestRunner {
            transport: self.transport,
            sink,
            seed: self.seed,
        }
    }

    /// Fixed RNG seed for reproducible payloads.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl<T: Transport, S: ResultSink> TestRunner<T, S> {
    /// Execute every endpoint once, in order.
    ///
    /// Returns one record per endpoint with a supported method.
    pub async fn run(
        &self,
        endpoints: &[Endpoint],
        headers: &HashMap<String, String>,
    ) -> Vec<TestResult> {
        let mut rng = self
            .seed
            .map_or_else(SmallRng::from_entropy, SmallRng::seed_from_u64);
        let mut headers: Vec<(String, String)> = headers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        headers.sort();

        let mut results = Vec::with_capacity(endpoints.len());
        for endpoint in endpoints {
            let Some(method) = HttpMethod::parse(&endpoint.method) else {
                tracing::warn!(method = %endpoint.method, path = %endpoint.path, "unsupported method, skipping");
                continue;
            };

            let result = self.execute_one(endpoint, method, &headers, &mut rng).await;

            if let Err(e) = self.sink.save(&result).await {
                tracing::warn!(endpoint = %endpoint.label(), error = %e, "could not save test result");
            }
            results.push(result);
        }
        results
    }

    async fn execute_one(
        &self,
        endpoint: &Endpoint,
        method: HttpMethod,
        headers: &[(String, String)],
        rng: &mut SmallRng,
    ) -> TestResult {
        let request_body = method
            .sends_body()
            .then(|| synth::synthesize(endpoint.request_body_schema.as_ref(), rng));

        let started = Instant::now();
        let outcome = match resolve_url(&endpoint.path) {
            Ok(url) => {
                tracing::info!(%method, %url, "testing");
                self.transport
                    .send(HttpRequest {
                        method,
                        url,
                        headers: headers.to_vec(),
                        body: request_body.clone(),
                    })
                    .await
            }
            Err(e) => Err(e),
        };
        let duration = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let (status, status_text, response_headers, data) = match outcome {
            Ok(resp) => {
                let data = resp.data();
                (resp.status, resp.status_text, Value::Object(resp.headers), data)
            }
            Err(e) => {
                tracing::warn!(endpoint = %endpoint.label(), error = %e, "request failed");
                (
                    TestResult::FAILED_STATUS,
                    REQUEST_FAILED.to_string(),
                    json!({}),
                    json!({ "error": e.to_string() }),
                )
            }
        };

        TestResult {
            endpoint: endpoint.clone(),
            status,
            status_text,
            headers: response_headers,
            data,
            request_body,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            duration,
            spec_title: or_unknown(&endpoint.spec_title),
            spec_version: or_unknown(&endpoint.spec_version),
            id: None,
            created_at: None,
            updated_at: None,
        }
    }
}

fn or_unknown(value: &str) -> String {
    if value.is_empty() {
        UNKNOWN.to_string()
    } else {
        value.to_string()
    }
}

/// Substitute placeholders, then reduce to `origin + pathname`.
/// Query strings and fragments in the endpoint path are dropped.
fn resolve_url(path: &str) -> Result<String, TransportError> {
    let substituted = params::substitute(path);
    let url = reqwest::Url::parse(&substituted)
        .map_err(|e| TransportError::InvalidUrl(format!("{path}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(TransportError::InvalidUrl(format!(
            "{path}: unsupported scheme '{}'",
            url.scheme()
        )));
    }
    Ok(format!("{}{}", url.origin().ascii_serialization(), url.path()))
}

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("HTTP client error: {0}")]
    Http(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use store::StoreError;
    use transport::HttpResponse;

    /// Answers from a fixed table keyed by URL; unknown URLs fail like a refused connection.
    #[derive(Default)]
    struct StubTransport {
        routes: Vec<(String, u16, &'static str)>,
        sent: RefCell<Vec<HttpRequest>>,
    }

    impl StubTransport {
        fn route(mut self, url: &str, status: u16, body: &'static str) -> Self {
            self.routes.push((url.to_string(), status, body));
            self
        }
    }

    impl Transport for StubTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            let found = self
                .routes
                .iter()
                .find(|(url, ..)| *url == request.url)
                .map(|(_, status, body)| (*status, *body));
            self.sent.borrow_mut().push(request);
            let (status, body) =
                found.ok_or_else(|| TransportError::Request("connection refused".into()))?;
            let mut headers = serde_json::Map::new();
            headers.insert("content-type".into(), json!("application/json"));
            Ok(HttpResponse {
                status,
                status_text: "Stub".into(),
                headers,
                body: body.to_string(),
            })
        }
    }

    #[derive(Default)]
    struct RecordingSink(RefCell<Vec<TestResult>>);

    impl ResultSink for RecordingSink {
        async fn save(&self, result: &TestResult) -> Result<(), StoreError> {
            self.0.borrow_mut().push(result.clone());
            Ok(())
        }
    }

    struct BrokenSink;

    impl ResultSink for BrokenSink {
        async fn save(&self, _result: &TestResult) -> Result<(), StoreError> {
            Err(StoreError::Request("connection refused".into()))
        }
    }

    fn endpoint(method: &str, path: &str) -> Endpoint {
        Endpoint {
            path: path.to_string(),
            method: method.to_string(),
            operation_id: format!("{method}Op"),
            summary: format!("{} {path}", method.to_uppercase()),
            description: String::new(),
            parameters: Vec::new(),
            request_body_schema: None,
            responses: json!({}),
            spec_title: "Petstore".into(),
            spec_version: "1.0.0".into(),
            tags: Vec::new(),
            deprecated: false,
        }
    }

    fn runner(transport: StubTransport) -> TestRunner<StubTransport, Option<RecordingSink>> {
        TestRunner::new(transport, None).with_seed(42)
    }

    #[test]
    fn resolve_url_substitutes_and_strips_query() {
        assert_eq!(
            resolve_url("https://api.test/pets/{petId}?x=1#frag").unwrap(),
            "https://api.test/pets/456"
        );
        assert_eq!(
            resolve_url("http://localhost:8080/user/{username}").unwrap(),
            "http://localhost:8080/user/testuser"
        );
        assert_eq!(resolve_url("https://api.test").unwrap(), "https://api.test/");
    }

    #[test]
    fn resolve_url_rejects_relative_and_odd_schemes() {
        assert!(matches!(resolve_url("/pets"), Err(TransportError::InvalidUrl(_))));
        assert!(matches!(
            resolve_url("ftp://files.test/pets"),
            Err(TransportError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn records_in_order_with_bodies_only_for_writes() {
        let stub = StubTransport::default()
            .route("https://api.test/pets/456", 200, r#"{"id": 456}"#)
            .route("https://api.test/pets", 201, "created")
            .route("https://api.test/pets/1", 204, "");
        let mut post = endpoint("post", "https://api.test/pets");
        post.request_body_schema = Some(json!({
            "type": "object",
            "properties": {"name": {"type": "string", "example": "Rex"}}
        }));
        let endpoints = vec![
            endpoint("get", "https://api.test/pets/{petId}"),
            post,
            endpoint("delete", "https://api.test/pets/{id}"),
        ];

        let runner = runner(stub);
        let results = runner.run(&endpoints, &HashMap::new()).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].status, 200);
        assert_eq!(results[0].data, json!({"id": 456}));
        assert_eq!(results[0].request_body, None);
        assert_eq!(results[1].status, 201);
        assert_eq!(results[1].data, json!("created"));
        assert_eq!(results[1].request_body, Some(json!({"name": "Rex"})));
        assert_eq!(results[2].status, 204);
        assert_eq!(results[2].request_body, None);
        assert_eq!(results[0].headers["content-type"], "application/json");
        assert_eq!(results[0].spec_title, "Petstore");

        let sent = runner.transport.sent.borrow();
        assert_eq!(sent[1].method, HttpMethod::Post);
        assert_eq!(sent[1].body, Some(json!({"name": "Rex"})));
        assert!(sent[0].body.is_none());
    }

    #[tokio::test]
    async fn write_without_schema_sends_empty_object() {
        let stub = StubTransport::default().route("https://api.test/ping", 200, "{}");
        let results = runner(stub)
            .run(&[endpoint("put", "https://api.test/ping")], &HashMap::new())
            .await;
        assert_eq!(results[0].request_body, Some(json!({})));
    }

    #[tokio::test]
    async fn transport_failure_becomes_status_zero() {
        let endpoints = vec![
            endpoint("get", "https://down.test/pets"),
            endpoint("get", "not a url"),
        ];
        let results = runner(StubTransport::default())
            .run(&endpoints, &HashMap::new())
            .await;

        assert_eq!(results.len(), 2);
        for r in &results {
            assert_eq!(r.status, 0);
            assert_eq!(r.status_text, REQUEST_FAILED);
            assert_eq!(r.headers, json!({}));
            assert!(r.data["error"].is_string());
        }
        assert_eq!(results[0].data["error"], "connection refused");
        assert!(results[1].data["error"].as_str().unwrap().contains("Invalid URL"));
    }

    #[tokio::test]
    async fn unsupported_method_is_skipped() {
        let stub = StubTransport::default().route("https://api.test/a", 200, "{}");
        let endpoints = vec![
            endpoint("trace", "https://api.test/a"),
            endpoint("get", "https://api.test/a"),
        ];
        let runner = runner(stub);
        let results = runner.run(&endpoints, &HashMap::new()).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].endpoint.method, "get");
        assert_eq!(runner.transport.sent.borrow().len(), 1);
    }

    #[tokio::test]
    async fn headers_forwarded_verbatim() {
        let stub = StubTransport::default().route("https://api.test/me", 200, "{}");
        let headers = HashMap::from([
            ("Authorization".to_string(), "Bearer t0k".to_string()),
            ("X-Trace".to_string(), "abc".to_string()),
        ]);
        let runner = runner(stub);
        runner
            .run(&[endpoint("get", "https://api.test/me")], &headers)
            .await;
        let sent = runner.transport.sent.borrow();
        assert_eq!(
            sent[0].headers,
            vec![
                ("Authorization".to_string(), "Bearer t0k".to_string()),
                ("X-Trace".to_string(), "abc".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn every_record_reaches_the_sink() {
        let stub = StubTransport::default().route("https://api.test/a", 500, "{}");
        let runner = TestRunner::new(stub, RecordingSink::default());
        let endpoints = vec![
            endpoint("get", "https://api.test/a"),
            endpoint("get", "https://down.test/b"),
        ];
        let results = runner.run(&endpoints, &HashMap::new()).await;
        assert_eq!(*runner.sink().0.borrow(), results);
    }

    #[tokio::test]
    async fn broken_sink_does_not_change_results() {
        let endpoints = vec![endpoint("get", "https://api.test/a")];
        let stub = || StubTransport::default().route("https://api.test/a", 200, r#"{"ok": true}"#);

        let with_store = TestRunner::new(stub(), RecordingSink::default())
            .run(&endpoints, &HashMap::new())
            .await;
        let offline = TestRunner::new(stub(), BrokenSink)
            .run(&endpoints, &HashMap::new())
            .await;

        assert_eq!(with_store.len(), offline.len());
        assert_eq!(with_store[0].status, offline[0].status);
        assert_eq!(with_store[0].data, offline[0].data);
    }

    #[tokio::test]
    async fn missing_spec_info_is_unknown() {
        let stub = StubTransport::default().route("https://api.test/a", 200, "{}");
        let mut ep = endpoint("get", "https://api.test/a");
        ep.spec_title.clear();
        ep.spec_version.clear();
        let results = runner(stub).run(&[ep], &HashMap::new()).await;
        assert_eq!(results[0].spec_title, "Unknown");
        assert_eq!(results[0].spec_version, "Unknown");
        assert!(results[0].timestamp.ends_with('Z'));
    }

    #[tokio::test]
    async fn empty_endpoint_list() {
        let results = runner(StubTransport::default())
            .run(&[], &HashMap::new())
            .await;
        assert!(results.is_empty());
    }
}
