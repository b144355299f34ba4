//! Upload negotiator
//!
//! Asks the gateway for a write credential, a destination and a tracking job
//! identifier for one named, typed file.

use async_trait::async_trait;
use montage_core::domain::upload::{UploadRequest, UploadSlot};
use montage_core::dto::upload::{CreateUploadTarget, UploadTargetReply};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{ClientError, Result};
use crate::transport::HttpTransport;

/// Gateway path that mints upload slots
pub const UPLOAD_TARGET_PATH: &str = "/get-upload-url";

/// Obtains upload slots
///
/// Not idempotent: every successful call allocates a new job server-side,
/// so callers must not retry blindly.
#[async_trait]
pub trait UploadNegotiator: Send + Sync {
    /// Requests a fresh slot for `req`
    ///
    /// Fails with [`ClientError::Negotiation`] when the reply is missing a
    /// field or the request itself failed.
    async fn request_slot(&self, req: &UploadRequest) -> Result<UploadSlot>;
}

/// HTTP implementation of UploadNegotiator
pub struct HttpUploadNegotiator {
    transport: Arc<HttpTransport>,
}

impl HttpUploadNegotiator {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl UploadNegotiator for HttpUploadNegotiator {
    async fn request_slot(&self, req: &UploadRequest) -> Result<UploadSlot> {
        debug!(file_name = %req.file_name, content_type = %req.content_type, "Requesting upload slot");

        let reply: UploadTargetReply = self
            .transport
            .post(UPLOAD_TARGET_PATH, &CreateUploadTarget::from(req))
            .await
            .map_err(|e| ClientError::Negotiation(e.to_string()))?;

        let slot = reply.into_slot().map_err(|missing| {
            ClientError::Negotiation(format!(
                "malformed reply, missing {}",
                missing.join(", ")
            ))
        })?;

        info!(job_id = %slot.job_id, resource_key = %slot.resource_key, "Upload slot obtained");

        Ok(slot)
    }
}
