//! Montage HTTP Client
//!
//! Uploads a file through the Montage gateway and tracks the resulting
//! processing job until it finishes.
//!
//! An upload runs three phases in order:
//! 1. Negotiation: the gateway mints a presigned write URL and a job id
//! 2. Transfer: the file is streamed to that URL
//! 3. Polling: the job is queried at a fixed interval until it is terminal
//!
//! Callers only deal with [`UploadOrchestrator::upload`], which always
//! resolves to an [`UploadOutcome`].
//!
//! # Example
//!
//! ```no_run
//! use montage_client::{ClientConfig, GatewayClient, UploadFile};
//! use montage_core::domain::owner::OwnerKey;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = GatewayClient::new(ClientConfig::new("https://gateway.example.com/prod"))?;
//!     let owner = OwnerKey::from_email("jane@example.com").expect("non-empty email");
//!
//!     let file = UploadFile::from_path("clip.mp4").await?;
//!     let outcome = client.uploader().upload(file, &owner, None).await;
//!
//!     println!("succeeded: {}", outcome.succeeded());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod file;
pub mod negotiator;
pub mod orchestrator;
pub mod poller;
pub mod transfer;
pub mod transport;
mod videos;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use file::{Payload, UploadFile};
pub use montage_core::domain::upload::UploadOutcome;
pub use orchestrator::UploadOrchestrator;
pub use tokio_util::sync::CancellationToken;

use std::sync::Arc;

use crate::negotiator::HttpUploadNegotiator;
use crate::poller::HttpJobStatusSource;
use crate::transfer::HttpBlobTransfer;
use crate::transport::HttpTransport;

/// Client for the Montage gateway
///
/// Owns one transport shared by the upload pipeline and the video catalog:
/// - Uploads (negotiate, transfer, poll) through [`GatewayClient::uploader`]
/// - Catalog queries (list, playback URL, delete)
#[derive(Debug, Clone)]
pub struct GatewayClient {
    config: ClientConfig,
    transport: Arc<HttpTransport>,
}

impl GatewayClient {
    /// Create a new gateway client
    ///
    /// Validates `config` and builds an HTTP client whose gateway calls time
    /// out after `config.request_timeout` and whose payload uploads time out
    /// after `config.transfer_timeout`.
    ///
    /// # Example
    /// ```
    /// use montage_client::{ClientConfig, GatewayClient};
    ///
    /// let client = GatewayClient::new(ClientConfig::new("http://localhost:3000")).unwrap();
    /// assert_eq!(client.base_url(), "http://localhost:3000");
    /// ```
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(config.gateway_url.clone(), config.request_timeout)?
            .with_transfer_timeout(config.transfer_timeout);
        Ok(Self {
            config,
            transport: Arc::new(transport),
        })
    }

    /// Get the base URL of the gateway
    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build an upload orchestrator wired to this gateway
    pub fn uploader(&self) -> UploadOrchestrator {
        UploadOrchestrator::new(
            Arc::new(HttpUploadNegotiator::new(Arc::clone(&self.transport))),
            Arc::new(HttpBlobTransfer::new(Arc::clone(&self.transport))),
            Arc::new(HttpJobStatusSource::new(Arc::clone(&self.transport))),
            &self.config,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = GatewayClient::new(ClientConfig::new("http://localhost:3000")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = GatewayClient::new(ClientConfig::new("http://localhost:3000/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
    }

    #[test]
    fn test_client_rejects_invalid_config() {
        let err = GatewayClient::new(ClientConfig::new("localhost:3000")).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }
}
