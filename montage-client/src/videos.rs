//! Video catalog endpoints

use montage_core::domain::owner::OwnerKey;
use montage_core::domain::video::{DeletedVideo, VideoRecord, VideoUrl};
use montage_core::dto::video::{GatewayReply, VideoOperation};
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use crate::GatewayClient;
use crate::error::{ClientError, Result};

/// Gateway path of the video catalog
pub const VIDEOS_PATH: &str = "/videos";

impl GatewayClient {
    // =============================================================================
    // Video Catalog
    // =============================================================================

    /// List the processed videos of an owner, newest first
    ///
    /// # Arguments
    /// * `owner_key` - Partition key the videos were uploaded under
    pub async fn list_videos(&self, owner_key: &OwnerKey) -> Result<Vec<VideoRecord>> {
        self.catalog(VideoOperation::ListVideos {
            user_key: owner_key.as_str().to_string(),
        })
        .await
    }

    /// Get a time-limited playback URL for a video
    ///
    /// # Arguments
    /// * `video_id` - The video UUID
    pub async fn get_video_url(&self, video_id: Uuid) -> Result<VideoUrl> {
        self.catalog(VideoOperation::GetVideoUrl { video_id }).await
    }

    /// Delete a video and its stored output
    ///
    /// # Arguments
    /// * `video_id` - The video UUID to delete
    pub async fn delete_video(&self, video_id: Uuid) -> Result<DeletedVideo> {
        self.catalog(VideoOperation::DeleteVideo { video_id }).await
    }

    async fn catalog<T: DeserializeOwned>(&self, operation: VideoOperation) -> Result<T> {
        debug!(?operation, "Calling video catalog");

        let reply: GatewayReply<T> = self.transport.post(VIDEOS_PATH, &operation).await?;

        match reply {
            GatewayReply::Accepted(value) => Ok(value),
            GatewayReply::Rejected { error } => Err(ClientError::NotFound(error)),
        }
    }
}
