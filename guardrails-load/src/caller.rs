use crate::config::{Credential, RunConfig};
use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client, Method,
};
use std::time::Duration;
use tokio::time::Instant;

/// Result of one request. Failures are already logged by the time this is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallOutcome {
    pub success: bool,
    pub latency: Duration,
}

impl CallOutcome {
    pub fn success(latency: Duration) -> Self {
        Self {
            success: true,
            latency,
        }
    }

    pub fn failure(latency: Duration) -> Self {
        Self {
            success: false,
            latency,
        }
    }
}

/// A worker's private HTTP session against the target service.
pub struct EndpointCaller {
    client: Client,
    credential: Credential,
}

impl EndpointCaller {
    pub fn new(config: &RunConfig) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()?;

        Ok(Self {
            client,
            credential: config.credential.clone(),
        })
    }

    /// Issues exactly one request. Transport errors, timeouts and 4xx/5xx statuses all come
    /// back as a failed outcome; nothing is retried.
    pub async fn call(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> CallOutcome {
        let start = Instant::now();

        let mut req_builder = self
            .client
            .request(method.clone(), url)
            .basic_auth(self.credential.user(), Some(self.credential.token()));
        if let Some(body) = body {
            req_builder = req_builder.json(body);
        }

        let res = match req_builder.send().await {
            Ok(res) => match res.error_for_status() {
                Ok(res) => res.bytes().await.map(|_| ()),
                Err(err) => Err(err),
            },
            Err(err) => Err(err),
        };
        let elapsed = start.elapsed();

        match res {
            Ok(()) => CallOutcome::success(elapsed),
            Err(err) => {
                tracing::warn!("{method} {url} failed: {err}");
                CallOutcome::failure(elapsed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_base_url;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(base: &str) -> RunConfig {
        RunConfig::builder()
            .base_url(parse_base_url(base).unwrap())
            .credential(Credential::new("user", "token"))
            .request_timeout(Duration::from_millis(300))
            .build()
    }

    #[tokio::test]
    async fn success_status_is_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/alerts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"alerts": []})))
            .expect(1)
            .mount(&server)
            .await;

        let caller = EndpointCaller::new(&config_for(&server.uri())).unwrap();
        let outcome = caller
            .call(Method::GET, &format!("{}/alerts", server.uri()), None)
            .await;
        assert!(outcome.success);
    }

    #[tokio::test]
    async fn error_status_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let caller = EndpointCaller::new(&config_for(&server.uri())).unwrap();
        let outcome = caller
            .call(Method::POST, &format!("{}/pause", server.uri()), None)
            .await;
        assert!(!outcome.success);

        let client_error = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&client_error)
            .await;
        let outcome = caller
            .call(Method::GET, &format!("{}/queue", client_error.uri()), None)
            .await;
        assert!(!outcome.success);
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let caller = EndpointCaller::new(&config_for(&server.uri())).unwrap();
        let outcome = caller
            .call(Method::GET, &format!("{}/runtime", server.uri()), None)
            .await;
        assert!(!outcome.success);
        assert!(outcome.latency < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn unreachable_host_is_failure() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let base = format!("http://{addr}");
        let caller = EndpointCaller::new(&config_for(&base)).unwrap();
        let outcome = caller
            .call(Method::GET, &format!("{base}/queue"), None)
            .await;
        assert!(!outcome.success);
    }

    #[tokio::test]
    async fn requests_carry_auth_content_type_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/automation/rollout/pause"))
            // base64("user:token")
            .and(header("authorization", "Basic dXNlcjp0b2tlbg=="))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"reason": "perf-abc123"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/monitoring/runtime"))
            .and(header("authorization", "Basic dXNlcjp0b2tlbg=="))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let caller = EndpointCaller::new(&config_for(&server.uri())).unwrap();
        let body = json!({"reason": "perf-abc123"});
        let paused = caller
            .call(
                Method::POST,
                &format!("{}/automation/rollout/pause", server.uri()),
                Some(&body),
            )
            .await;
        let runtime = caller
            .call(
                Method::GET,
                &format!("{}/monitoring/runtime", server.uri()),
                None,
            )
            .await;
        assert!(paused.success);
        assert!(runtime.success);
    }
}
