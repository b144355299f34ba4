//! Stored video domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A processed video previously produced for an owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub video_id: Uuid,
    pub job_id: String,
    pub output_key: String,
    /// Backend timestamps carry no offset
    pub created_at: chrono::NaiveDateTime,
}

/// Time-limited playback link for a stored video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoUrl {
    pub video_id: Uuid,
    pub url: String,
    /// Seconds until `url` stops working
    pub expires_in: u64,
}

/// Acknowledgement of a deleted video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedVideo {
    pub video_id: Uuid,
    pub status: String,
    #[serde(default)]
    pub message: String,
}
