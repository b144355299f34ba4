//! Upload domain types

use serde::{Deserialize, Serialize};

use crate::domain::owner::OwnerKey;

/// What the caller wants to upload, as sent to the negotiation endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub file_name: String,
    pub content_type: String,
    pub owner_key: OwnerKey,
}

/// Negotiated write destination plus tracking identifier for one upload attempt
///
/// A slot is minted per attempt and never reused. The `job_id` is the only
/// handle on the server-side processing job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSlot {
    /// Short-lived write credential (a presigned URL)
    pub write_authorization: String,
    pub resource_key: String,
    pub resource_location: String,
    pub job_id: String,
}

impl UploadSlot {
    /// Wire names of the fields that are empty or blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("writeAuthorization", &self.write_authorization),
            ("resourceKey", &self.resource_key),
            ("resourceLocation", &self.resource_location),
            ("jobId", &self.job_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Terminal result of one upload-and-poll operation
///
/// Either every success field is populated or `failure_reason` is. The
/// constructors are the only way to build one, which keeps that true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutcome {
    succeeded: bool,
    resource_key: String,
    resource_location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    failure_reason: Option<String>,
}

impl UploadOutcome {
    /// Successful outcome pointing at the stored resource
    ///
    /// Returns `None` when either field is blank.
    pub fn success(
        resource_key: impl Into<String>,
        resource_location: impl Into<String>,
    ) -> Option<Self> {
        let resource_key = resource_key.into();
        let resource_location = resource_location.into();
        if resource_key.trim().is_empty() || resource_location.trim().is_empty() {
            return None;
        }

        Some(Self {
            succeeded: true,
            resource_key,
            resource_location,
            failure_reason: None,
        })
    }

    /// Failed outcome
    ///
    /// A blank reason is replaced so callers always have something to show.
    pub fn failure(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        let reason = if reason.trim().is_empty() {
            "Upload failed".to_string()
        } else {
            reason
        };

        Self {
            succeeded: false,
            resource_key: String::new(),
            resource_location: String::new(),
            failure_reason: Some(reason),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    pub fn resource_key(&self) -> &str {
        &self.resource_key
    }

    pub fn resource_location(&self) -> &str {
        &self.resource_location
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }
}
