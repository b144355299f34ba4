//! HTTP transport
//!
//! Thin request/response wrapper over `reqwest`. Bodies are JSON, any
//! non-2xx status becomes [`ClientError::Transport`] and connection failures
//! become [`ClientError::Network`]. There is no retry at this layer.

use reqwest::{Client, Method, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::file::Payload;

/// Decoded body together with the status it arrived with
#[derive(Debug, Clone)]
pub struct TransportResponse<T> {
    pub status: u16,
    pub body: T,
}

/// JSON-over-HTTP transport bound to one gateway
///
/// Stateless apart from the connection pool, so one instance can be shared
/// by any number of concurrent uploads.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// Base URL of the gateway, without trailing slash
    base_url: String,
    /// HTTP client instance
    client: Client,
    /// Deadline for each gateway call
    request_timeout: Option<Duration>,
    /// Deadline for a whole payload upload
    transfer_timeout: Option<Duration>,
}

impl HttpTransport {
    /// Create a transport whose gateway calls each time out after `timeout`
    ///
    /// `timeout` also bounds connection setup everywhere. Payload uploads get
    /// no overall deadline until [`HttpTransport::with_transfer_timeout`] sets
    /// one.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().connect_timeout(timeout).build()?;
        Ok(Self {
            request_timeout: Some(timeout),
            ..Self::with_client(base_url, client)
        })
    }

    /// Create a transport around a preconfigured reqwest client
    ///
    /// The client's own timeouts apply unchanged.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            request_timeout: None,
            transfer_timeout: None,
        }
    }

    /// Bound each payload upload by `timeout` instead of the gateway deadline
    pub fn with_transfer_timeout(mut self, timeout: Duration) -> Self {
        self.transfer_timeout = Some(timeout);
        self
    }

    /// Get the base URL of the gateway
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send a request to `path` under the gateway and decode the JSON reply
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `path` - Path relative to the gateway base URL
    /// * `body` - Optional JSON body
    pub async fn send<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<TransportResponse<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(%method, %url, "Sending gateway request");

        let mut request = self.client.request(method, &url);
        if let Some(timeout) = self.request_timeout {
            request = request.timeout(timeout);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;

        self.handle_response(response).await
    }

    /// POST a JSON body and decode the JSON reply
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(Method::POST, path, Some(body)).await?;
        Ok(response.body)
    }

    /// PUT raw bytes to an absolute URL
    ///
    /// Used for presigned storage URLs, which live outside the gateway.
    /// Content-Length is always sent because presigned PUTs reject chunked
    /// uploads.
    pub async fn put_payload(&self, url: &str, payload: Payload, content_type: &str) -> Result<()> {
        let (body, len) = payload.into_body().await?;
        debug!(len, content_type, "Uploading payload");

        let mut request = self
            .client
            .put(url)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::CONTENT_LENGTH, len);
        if let Some(timeout) = self.transfer_timeout {
            request = request.timeout(timeout);
        }
        let response = request.body(body).send().await?;

        self.handle_empty_response(response).await
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Check the status code and deserialize the JSON body
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<TransportResponse<T>> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::transport(status.as_u16(), error_text));
        }

        let body = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(format!("Failed to parse JSON response: {}", e)))?;

        Ok(TransportResponse {
            status: status.as_u16(),
            body,
        })
    }

    /// Check the status code of a response whose body is not needed
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::transport(status.as_u16(), error_text));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use wiremock::matchers::{body_json, header as header_eq, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_transport_trims_trailing_slash() {
        let transport = HttpTransport::with_client("http://localhost:8080/", Client::new());
        assert_eq!(transport.base_url(), "http://localhost:8080");
        assert_eq!(transport.url("/poll"), "http://localhost:8080/poll");
        assert_eq!(transport.url("poll"), "http://localhost:8080/poll");
    }

    #[tokio::test]
    async fn test_send_returns_body_and_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/poll"))
            .and(body_json(json!({"jobId": "job-1"})))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(server.uri(), Duration::from_secs(5)).unwrap();
        let response: TransportResponse<Value> = transport
            .send(Method::POST, "/poll", Some(&json!({"jobId": "job-1"})))
            .await
            .unwrap();

        assert_eq!(response.status, 202);
        assert_eq!(response.body, json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_non_success_status_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/get-upload-url"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(server.uri(), Duration::from_secs(5)).unwrap();
        let err = transport
            .post::<_, Value>("/get-upload-url", &json!({}))
            .await
            .unwrap_err();

        match err {
            ClientError::Transport { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(server.uri(), Duration::from_secs(5)).unwrap();
        let err = transport
            .post::<_, Value>("/poll", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Parse(_)));
    }

    #[tokio::test]
    async fn test_connection_failure_is_network_error() {
        // Nothing listens on the discard port
        let transport = HttpTransport::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = transport
            .post::<_, Value>("/poll", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_put_payload_sends_content_headers() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/bucket/clip.mp4"))
            .and(header_eq("content-type", "video/mp4"))
            .and(header_eq("content-length", "5"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(server.uri(), Duration::from_secs(5)).unwrap();
        transport
            .put_payload(
                &format!("{}/bucket/clip.mp4", server.uri()),
                Payload::from_static(b"hello"),
                "video/mp4",
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_slow_gateway_call_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"ok": true}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let transport = HttpTransport::new(server.uri(), Duration::from_millis(100)).unwrap();
        let err = transport
            .post::<_, Value>("/poll", &json!({}))
            .await
            .unwrap_err();

        match err {
            ClientError::Network(e) => assert!(e.is_timeout()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_payload_upload_outlives_gateway_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/bucket/clip.mp4"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(server.uri(), Duration::from_millis(100))
            .unwrap()
            .with_transfer_timeout(Duration::from_secs(5));
        transport
            .put_payload(
                &format!("{}/bucket/clip.mp4", server.uri()),
                Payload::from_static(b"hello"),
                "video/mp4",
            )
            .await
            .unwrap();
    }
}
