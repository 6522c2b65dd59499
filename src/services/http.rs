//! HTTP client for a remote waitlist registration service.

use std::time::Duration;

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use tracing::{debug, instrument, warn};

use super::waitlist::{SubmissionResult, WaitlistError, WaitlistService};
use crate::config::WaitlistConfig;
use crate::lead::LeadRecord;

const SERVICE_NAME: &str = "http";
const REGISTER_PATH: &str = "/api/v1/waitlist";
const USER_AGENT: &str = concat!("mira/", env!("CARGO_PKG_VERSION"));

/// Longest slice of an unparseable body kept in an error message
const MAX_ERROR_BODY: usize = 200;

/// Registers leads by POSTing them to `{endpoint}/api/v1/waitlist`
pub struct HttpWaitlistClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    connect_retries: usize,
    base_delay: Duration,
}

impl HttpWaitlistClient {
    /// Create a client for the given base URL
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, WaitlistError> {
        url::Url::parse(endpoint)
            .map_err(|e| WaitlistError::Config(format!("invalid endpoint '{endpoint}': {e}")))?;

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| WaitlistError::Config(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: None,
            connect_retries: 2,
            base_delay: Duration::from_millis(250),
        })
    }

    /// Build from the `[waitlist]` config section
    pub fn from_config(config: &WaitlistConfig) -> Result<Self, WaitlistError> {
        let client = Self::new(&config.endpoint, Duration::from_secs(config.timeout_secs))?
            .with_connect_retries(config.connect_retries);
        Ok(match config.api_key.as_deref() {
            Some(key) if !key.is_empty() => client.with_api_key(key),
            _ => client,
        })
    }

    /// Send the key as a bearer token
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Retries allowed when the connection cannot be established
    pub fn with_connect_retries(mut self, retries: usize) -> Self {
        self.connect_retries = retries;
        self
    }

    pub fn register_url(&self) -> String {
        format!("{}{}", self.endpoint, REGISTER_PATH)
    }

    fn retry_strategy(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.base_delay)
            .with_max_delay(Duration::from_secs(2))
            .with_max_times(self.connect_retries)
    }
}

/// Only connection failures are retried: the request never reached the server
/// so resending cannot create a second registration.
fn should_retry(err: &reqwest::Error) -> bool {
    err.is_connect()
}

#[async_trait]
impl WaitlistService for HttpWaitlistClient {
    fn name(&self) -> &str {
        SERVICE_NAME
    }

    #[instrument(skip(self, record), fields(url = %self.register_url()))]
    async fn register(&self, record: &LeadRecord) -> Result<SubmissionResult, WaitlistError> {
        let url = self.register_url();

        let send = || async {
            let mut request = self.client.post(&url).json(record);
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }
            request.send().await
        };

        let response = send
            .retry(self.retry_strategy())
            .when(should_retry)
            .notify(|err, dur| {
                warn!("Retrying waitlist registration after {:?}: {}", dur, err);
            })
            .await
            .map_err(|e| WaitlistError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| WaitlistError::Network(e.to_string()))?;
        debug!(status = status.as_u16(), "waitlist service responded");

        // Structured failures (400/409) carry a SubmissionResult body too
        match serde_json::from_str::<SubmissionResult>(&body) {
            Ok(result) => Ok(result),
            Err(e) if status.is_success() => Err(WaitlistError::InvalidResponse(e.to_string())),
            Err(_) => Err(WaitlistError::Http {
                status: status.as_u16(),
                message: body.chars().take(MAX_ERROR_BODY).collect(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::Router;

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn record() -> LeadRecord {
        LeadRecord {
            first_name: "Jo".to_string(),
            last_name: "Doe".to_string(),
            email: "jo@x.com".to_string(),
            website: "x.com".to_string(),
            instagram: String::new(),
        }
    }

    #[test]
    fn test_register_url_strips_trailing_slash() {
        let client =
            HttpWaitlistClient::new("http://localhost:7010/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.register_url(), "http://localhost:7010/api/v1/waitlist");
    }

    #[test]
    fn test_invalid_endpoint_is_config_error() {
        let err = HttpWaitlistClient::new("not a url", Duration::from_secs(1))
            .err()
            .unwrap();
        assert!(matches!(err, WaitlistError::Config(_)));
    }

    #[test]
    fn test_from_config_ignores_empty_api_key() {
        let config = WaitlistConfig {
            api_key: Some(String::new()),
            ..WaitlistConfig::default()
        };
        let client = HttpWaitlistClient::from_config(&config).unwrap();
        assert!(client.api_key.is_none());
        assert_eq!(client.connect_retries, config.connect_retries);
    }

    #[tokio::test]
    async fn test_structured_failure_body_is_ok() {
        let router = Router::new().route(
            REGISTER_PATH,
            post(|| async {
                (
                    StatusCode::CONFLICT,
                    r#"{"success":false,"message":"taken","error":"Email already exists"}"#,
                )
            }),
        );
        let base = spawn(router).await;
        let client = HttpWaitlistClient::new(&base, Duration::from_secs(5)).unwrap();

        let result = client.register(&record()).await.unwrap();
        assert!(result.is_duplicate_email());
    }

    #[tokio::test]
    async fn test_unstructured_error_is_http_error() {
        let router = Router::new().route(
            REGISTER_PATH,
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let base = spawn(router).await;
        let client = HttpWaitlistClient::new(&base, Duration::from_secs(5)).unwrap();

        match client.register(&record()).await {
            Err(WaitlistError::Http { status, message }) => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream down");
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_garbage_success_body_is_invalid_response() {
        let router = Router::new().route(REGISTER_PATH, post(|| async { "ok" }));
        let base = spawn(router).await;
        let client = HttpWaitlistClient::new(&base, Duration::from_secs(5)).unwrap();

        let err = client.register(&record()).await.unwrap_err();
        assert!(matches!(err, WaitlistError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_bearer_token_is_sent() {
        use axum::http::HeaderMap;

        let router = Router::new().route(
            REGISTER_PATH,
            post(|headers: HeaderMap| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                format!(r#"{{"success":true,"message":"{auth}"}}"#)
            }),
        );
        let base = spawn(router).await;
        let client = HttpWaitlistClient::new(&base, Duration::from_secs(5))
            .unwrap()
            .with_api_key("s3cret");

        let result = client.register(&record()).await.unwrap();
        assert_eq!(result.message, "Bearer s3cret");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_error() {
        // Reserve a port then free it so nothing is listening there
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpWaitlistClient::new(&format!("http://{addr}"), Duration::from_secs(2))
            .unwrap()
            .with_connect_retries(1);

        let err = client.register(&record()).await.unwrap_err();
        assert!(matches!(err, WaitlistError::Network(_)));
    }
}
