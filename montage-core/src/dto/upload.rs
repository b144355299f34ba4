//! Upload negotiation DTOs

use serde::{Deserialize, Serialize};

use crate::domain::upload::{UploadRequest, UploadSlot};

/// Body of the `get-upload-url` request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUploadTarget {
    pub user_key: String,
    pub file_name: String,
    pub content_type: String,
}

impl From<&UploadRequest> for CreateUploadTarget {
    fn from(req: &UploadRequest) -> Self {
        Self {
            user_key: req.owner_key.as_str().to_string(),
            file_name: req.file_name.clone(),
            content_type: req.content_type.clone(),
        }
    }
}

/// Reply of the `get-upload-url` request
///
/// Every field is optional on the wire so that a malformed reply can be
/// reported by field name instead of as an opaque parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTargetReply {
    #[serde(default, alias = "presignedUrl")]
    pub write_authorization: Option<String>,
    #[serde(default, alias = "s3Key")]
    pub resource_key: Option<String>,
    #[serde(default, alias = "s3Url")]
    pub resource_location: Option<String>,
    #[serde(default, alias = "jobID")]
    pub job_id: Option<String>,
}

impl UploadTargetReply {
    /// Converts into a slot, or lists the fields that are missing or empty
    pub fn into_slot(self) -> Result<UploadSlot, Vec<&'static str>> {
        let slot = UploadSlot {
            write_authorization: self.write_authorization.unwrap_or_default(),
            resource_key: self.resource_key.unwrap_or_default(),
            resource_location: self.resource_location.unwrap_or_default(),
            job_id: self.job_id.unwrap_or_default(),
        };

        let missing = slot.missing_fields();
        if missing.is_empty() {
            Ok(slot)
        } else {
            Err(missing)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::owner::OwnerKey;

    #[test]
    fn test_request_body_field_names() {
        let req = UploadRequest {
            file_name: "clip.mp4".to_string(),
            content_type: "video/mp4".to_string(),
            owner_key: OwnerKey::new("u1").unwrap(),
        };
        let json = serde_json::to_value(CreateUploadTarget::from(&req)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "userKey": "u1",
                "fileName": "clip.mp4",
                "contentType": "video/mp4"
            })
        );
    }

    #[test]
    fn test_reply_accepts_storage_names() {
        let reply: UploadTargetReply = serde_json::from_value(serde_json::json!({
            "presignedUrl": "https://bucket/put?sig=1",
            "s3Key": "u1/42-clip.mp4",
            "s3Url": "https://bucket/u1/42-clip.mp4",
            "jobID": "job-42"
        }))
        .unwrap();

        let slot = reply.into_slot().unwrap();
        assert_eq!(slot.write_authorization, "https://bucket/put?sig=1");
        assert_eq!(slot.job_id, "job-42");
    }

    #[test]
    fn test_reply_reports_missing_fields() {
        let reply = UploadTargetReply {
            write_authorization: Some("auth1".to_string()),
            resource_key: Some(String::new()),
            resource_location: Some("https://cdn/x".to_string()),
            job_id: None,
        };
        assert_eq!(reply.into_slot().unwrap_err(), vec!["resourceKey", "jobId"]);
    }
}
