//! HTTP client for the cluster status endpoint.

use crate::{
    ClientConfig, ClusterUrl, CollectorError, CollectorResult,
    core::infrastructure::status_fetcher::StatusFetcher,
};
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::{
    Client,
    header::{ACCEPT, HeaderMap, HeaderValue},
};
use std::sync::Arc;
use tracing::debug;

/// Fetches the status document of one cluster over HTTP.
///
/// Every request carries `Accept: application/json` and is bounded by the
/// configured timeout. When a rate limit is configured, requests wait for
/// capacity before they are sent.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: Client,
    status_url: ClusterUrl,
    rate_limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl ApiClient {
    /// Creates a client for the cluster at `base_url`.
    ///
    /// # Errors
    /// * `CollectorError::Validation` if the status path or the rate limit is invalid
    /// * `CollectorError::Fetch` if the HTTP client cannot be built
    pub fn new(base_url: &ClusterUrl, config: &ClientConfig) -> CollectorResult<Self> {
        let status_url = base_url.with_path(&config.status_path)?;

        let rate_limiter = match config.rate_limit {
            Some(rl) => {
                let (rate, burst) = rl.validated()?;
                let quota = Quota::per_second(rate).allow_burst(burst);
                Some(Arc::new(DefaultDirectRateLimiter::direct(quota)))
            }
            None => None,
        };

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http_client = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|e| CollectorError::Fetch(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            status_url,
            rate_limiter,
        })
    }

    /// The full URL that is polled.
    pub fn status_url(&self) -> &ClusterUrl {
        &self.status_url
    }

    async fn get_status(&self) -> CollectorResult<Vec<u8>> {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        debug!(url = %self.status_url, "requesting cluster status");

        let response = self
            .http_client
            .get(self.status_url.as_str())
            .send()
            .await
            .map_err(describe_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            return Err(CollectorError::Fetch(format!(
                "API error ({}): {}",
                status, error_text
            )));
        }

        let body = response.bytes().await.map_err(describe_transport_error)?;
        debug!(url = %self.status_url, bytes = body.len(), "received cluster status");
        Ok(body.to_vec())
    }
}

#[async_trait]
impl StatusFetcher for ApiClient {
    async fn fetch_status(&self) -> CollectorResult<Vec<u8>> {
        self.get_status().await
    }

    fn target(&self) -> String {
        self.status_url.to_string()
    }
}

fn describe_transport_error(err: reqwest::Error) -> CollectorError {
    if err.is_timeout() {
        CollectorError::Fetch(format!("Request timed out: {}", err))
    } else if err.is_connect() {
        CollectorError::Fetch(format!("Connection failed: {}", err))
    } else {
        CollectorError::Fetch(format!("HTTP request failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RateLimitConfig;
    use std::time::Duration;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path},
    };

    fn create_test_client(server_url: &str, config: ClientConfig) -> ApiClient {
        let base = ClusterUrl::parse(server_url).unwrap();
        ApiClient::new(&base, &config).unwrap()
    }

    #[tokio::test]
    async fn test_get_success() {
        let mock_server = MockServer::start().await;
        let client = create_test_client(&mock_server.uri(), ClientConfig::default());

        Mock::given(method("GET"))
            .and(path("/pools/default"))
            .and(header("accept", "application/json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"maxBucketCount": 10})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let body = client.fetch_status().await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["maxBucketCount"], 10);
    }

    #[tokio::test]
    async fn test_custom_status_path() {
        let mock_server = MockServer::start().await;
        let config = ClientConfig {
            status_path: "/pools/nodes".to_string(),
            ..Default::default()
        };
        let client = create_test_client(&mock_server.uri(), config);

        Mock::given(method("GET"))
            .and(path("/pools/nodes"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&mock_server)
            .await;

        assert_eq!(client.fetch_status().await.unwrap(), b"{}".to_vec());
        assert!(client.target().ends_with("/pools/nodes"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_fetch_error() {
        let mock_server = MockServer::start().await;
        let client = create_test_client(&mock_server.uri(), ClientConfig::default());

        Mock::given(method("GET"))
            .and(path("/pools/default"))
            .respond_with(ResponseTemplate::new(503).set_body_string("warming up"))
            .mount(&mock_server)
            .await;

        let result = client.fetch_status().await;
        match result {
            Err(CollectorError::Fetch(message)) => {
                assert!(message.contains("503"));
                assert!(message.contains("warming up"));
            }
            other => panic!("Expected fetch error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout_is_fetch_error() {
        let mock_server = MockServer::start().await;
        let config = ClientConfig {
            timeout: Duration::from_millis(100),
            ..Default::default()
        };
        let client = create_test_client(&mock_server.uri(), config);

        Mock::given(method("GET"))
            .and(path("/pools/default"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("{}")
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let result = client.fetch_status().await;
        assert!(matches!(result, Err(CollectorError::Fetch(m)) if m.contains("timed out")));
    }

    #[tokio::test]
    async fn test_connection_refused_is_fetch_error() {
        // Bind and drop a server so the port is known to be closed.
        let uri = {
            let mock_server = MockServer::start().await;
            mock_server.uri()
        };
        let client = create_test_client(&uri, ClientConfig::default());

        let result = client.fetch_status().await;
        assert!(matches!(result, Err(CollectorError::Fetch(_))));
    }

    #[test]
    fn test_invalid_rate_limit_is_rejected() {
        let base = ClusterUrl::parse("http://localhost:8091").unwrap();
        let config = ClientConfig {
            rate_limit: Some(RateLimitConfig {
                requests_per_second: 0,
                burst_size: 1,
            }),
            ..Default::default()
        };
        assert!(matches!(
            ApiClient::new(&base, &config),
            Err(CollectorError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_rate_limiting_delays_requests() {
        use std::time::Instant;

        let mock_server = MockServer::start().await;
        let config = ClientConfig {
            rate_limit: Some(RateLimitConfig {
                requests_per_second: 2,
                burst_size: 2,
            }),
            ..Default::default()
        };
        let client = create_test_client(&mock_server.uri(), config);

        Mock::given(method("GET"))
            .and(path("/pools/default"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(4)
            .mount(&mock_server)
            .await;

        // The first two requests fit in the burst.
        let start = Instant::now();
        let (res1, res2) = tokio::join!(client.fetch_status(), client.fetch_status());
        res1.unwrap();
        res2.unwrap();
        assert!(start.elapsed() < Duration::from_millis(500));

        // The next two have to wait for the 2/sec quota to refill.
        let start = Instant::now();
        let (res3, res4) = tokio::join!(client.fetch_status(), client.fetch_status());
        res3.unwrap();
        res4.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(900));
    }
}
