//! Job polling DTOs

use serde::{Deserialize, Serialize};

/// Body of the `poll` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollRequest {
    pub job_id: String,
}
