//! Blob transfer
//!
//! Writes the file bytes to the destination authorized by an upload slot.
//! The transfer is all-or-nothing: no partial progress is tracked.

use async_trait::async_trait;
use montage_core::domain::upload::UploadSlot;
use std::sync::Arc;
use tracing::info;

use crate::error::{ClientError, Result};
use crate::file::Payload;
use crate::transport::HttpTransport;

/// Writes payloads to negotiated slots
#[async_trait]
pub trait BlobTransfer: Send + Sync {
    /// Streams `payload` to the slot's destination
    ///
    /// Fails with [`ClientError::Transfer`]; never retried here.
    async fn put(&self, slot: &UploadSlot, payload: Payload, content_type: &str) -> Result<()>;
}

/// HTTP implementation of BlobTransfer
///
/// The slot's write authorization is a presigned URL, so no extra
/// credentials are attached.
pub struct HttpBlobTransfer {
    transport: Arc<HttpTransport>,
}

impl HttpBlobTransfer {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl BlobTransfer for HttpBlobTransfer {
    async fn put(&self, slot: &UploadSlot, payload: Payload, content_type: &str) -> Result<()> {
        let len = payload.len();

        self.transport
            .put_payload(&slot.write_authorization, payload, content_type)
            .await
            .map_err(|e| ClientError::Transfer(e.to_string()))?;

        info!(resource_key = %slot.resource_key, bytes = len, "Payload stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{body_bytes, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn slot(server: &MockServer) -> UploadSlot {
        UploadSlot {
            write_authorization: format!("{}/uploads/u1/42-clip.mp4?sig=abc", server.uri()),
            resource_key: "u1/42-clip.mp4".to_string(),
            resource_location: "https://cdn/u1/42-clip.mp4".to_string(),
            job_id: "job-42".to_string(),
        }
    }

    fn transfer(server: &MockServer) -> HttpBlobTransfer {
        let transport = HttpTransport::new(server.uri(), Duration::from_secs(5)).unwrap();
        HttpBlobTransfer::new(Arc::new(transport))
    }

    #[tokio::test]
    async fn test_put_streams_bytes_to_presigned_url() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/uploads/u1/42-clip.mp4"))
            .and(header("content-type", "video/mp4"))
            .and(body_bytes(b"frames".to_vec()))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        transfer(&server)
            .put(&slot(&server), Payload::from_static(b"frames"), "video/mp4")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_rejected_put_is_transfer_error() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(403).set_body_string("SignatureDoesNotMatch"))
            .mount(&server)
            .await;

        let err = transfer(&server)
            .put(&slot(&server), Payload::from_static(b"frames"), "video/mp4")
            .await
            .unwrap_err();
        match err {
            ClientError::Transfer(message) => assert!(message.contains("403")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
