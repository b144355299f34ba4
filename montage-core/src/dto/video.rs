//! Video catalog DTOs
//!
//! All catalog calls go to one endpoint and are dispatched on `operation`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of a `videos` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation")]
pub enum VideoOperation {
    #[serde(rename = "listVideos", rename_all = "camelCase")]
    ListVideos { user_key: String },
    #[serde(rename = "getVideoURL", rename_all = "camelCase")]
    GetVideoUrl { video_id: Uuid },
    #[serde(rename = "deleteVideo", rename_all = "camelCase")]
    DeleteVideo { video_id: Uuid },
}

/// The catalog answers some failures with a 200 and an `error` body
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GatewayReply<T> {
    Rejected { error: String },
    Accepted(T),
}
