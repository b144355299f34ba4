//! Upload orchestrator
//!
//! Runs one upload end to end: negotiate a slot, transfer the bytes, then
//! wait for the processing job. The three phases are strictly sequential and
//! every failure collapses into a failed [`UploadOutcome`].

use montage_core::domain::job::{JobState, JobStatus};
use montage_core::domain::owner::OwnerKey;
use montage_core::domain::upload::{UploadOutcome, UploadRequest, UploadSlot};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::file::UploadFile;
use crate::negotiator::UploadNegotiator;
use crate::poller::{JobPoller, JobStatusSource, PollPolicy};
use crate::transfer::BlobTransfer;

/// Sequences negotiation, transfer and polling for a single upload
///
/// Holds no state between calls, so concurrent uploads through one
/// orchestrator are independent.
pub struct UploadOrchestrator {
    negotiator: Arc<dyn UploadNegotiator>,
    transfer: Arc<dyn BlobTransfer>,
    poller: JobPoller,
    poll_interval: Duration,
    max_wait: Duration,
    max_upload_bytes: u64,
}

impl UploadOrchestrator {
    /// Creates an orchestrator from its collaborators
    pub fn new(
        negotiator: Arc<dyn UploadNegotiator>,
        transfer: Arc<dyn BlobTransfer>,
        status_source: Arc<dyn JobStatusSource>,
        config: &ClientConfig,
    ) -> Self {
        Self {
            negotiator,
            transfer,
            poller: JobPoller::new(status_source, PollPolicy::from(config)),
            poll_interval: config.poll_interval,
            max_wait: config.max_wait,
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    /// Uploads `file` for `owner_key` and waits for processing to finish
    ///
    /// Never returns a partial result: the outcome is either fully
    /// successful, with the slot's resource key and location, or failed with
    /// a human-readable reason. Cancelling `cancel` stops the transfer or the
    /// polling wait and yields a failed outcome.
    pub async fn upload(
        &self,
        file: UploadFile,
        owner_key: &OwnerKey,
        cancel: Option<CancellationToken>,
    ) -> UploadOutcome {
        let cancel = cancel.unwrap_or_default();
        let file_name = file.file_name.clone();

        match self.run(file, owner_key, &cancel).await {
            Ok(slot) => {
                info!(
                    file_name = %file_name,
                    resource_key = %slot.resource_key,
                    "Upload completed"
                );
                UploadOutcome::success(slot.resource_key, slot.resource_location)
                    .unwrap_or_else(|| {
                        UploadOutcome::failure("upload slot lost its resource fields")
                    })
            }
            Err(e) => {
                warn!(file_name = %file_name, "Upload failed: {}", e);
                UploadOutcome::failure(e.to_string())
            }
        }
    }

    async fn run(
        &self,
        file: UploadFile,
        owner_key: &OwnerKey,
        cancel: &CancellationToken,
    ) -> Result<UploadSlot> {
        self.check_file(&file)?;

        let request = UploadRequest {
            file_name: file.file_name.clone(),
            content_type: file.content_type.clone(),
            owner_key: owner_key.clone(),
        };

        // Negotiation is a single round trip and is never retried: a second
        // call would mint a second job.
        let slot = self
            .negotiator
            .request_slot(&request)
            .await
            .map_err(|e| match e {
                ClientError::Negotiation(_) => e,
                other => ClientError::Negotiation(other.to_string()),
            })?;

        let missing = slot.missing_fields();
        if !missing.is_empty() {
            return Err(ClientError::Negotiation(format!(
                "incomplete upload slot, missing {}",
                missing.join(", ")
            )));
        }

        info!(job_id = %slot.job_id, bytes = file.len(), "Transferring payload");
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ClientError::Cancelled),
            transferred = self.transfer.put(&slot, file.payload, &file.content_type) => {
                transferred.map_err(|e| match e {
                    ClientError::Transfer(_) => e,
                    other => ClientError::Transfer(other.to_string()),
                })?;
            }
        }

        let status = self
            .poller
            .wait_until_terminal(&slot.job_id, self.poll_interval, cancel)
            .await?;

        self.settle(status).map(|()| slot)
    }

    fn check_file(&self, file: &UploadFile) -> Result<()> {
        if file.file_name.trim().is_empty() {
            return Err(ClientError::InvalidRequest(
                "file name cannot be empty".to_string(),
            ));
        }

        if file.len() > self.max_upload_bytes {
            return Err(ClientError::InvalidRequest(format!(
                "file too large ({:.1} MB), limit is {} MB",
                file.len() as f64 / (1024.0 * 1024.0),
                self.max_upload_bytes / (1024 * 1024)
            )));
        }

        Ok(())
    }

    /// Maps a terminal status to success or the matching error
    fn settle(&self, status: JobStatus) -> Result<()> {
        match status.state {
            JobState::Succeeded => {
                if let Some(output) = &status.output {
                    info!(job_id = %status.job_id, output = %output, "Processing job output");
                }
                Ok(())
            }
            JobState::Cancelled => Err(ClientError::Cancelled),
            JobState::TimedOut if status.synthesized => Err(ClientError::TimedOut {
                waited: self.max_wait,
            }),
            state => Err(ClientError::JobFailed {
                state,
                message: status
                    .error_message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| "no error message reported".to_string()),
                cause: status.error_cause,
            }),
        }
    }
}
