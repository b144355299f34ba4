//! Error types for the Montage client

use montage_core::domain::job::JobState;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during an upload or a catalog call
#[derive(Debug, Error)]
pub enum ClientError {
    /// No response was received (connection refused, DNS, request timeout)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error("gateway returned status {status}: {body}")]
    Transport {
        /// HTTP status code
        status: u16,
        /// Response body, as text
        body: String,
    },

    /// The upload slot could not be obtained
    #[error("could not obtain an upload slot: {0}")]
    Negotiation(String),

    /// The file bytes could not be written to the slot
    #[error("file transfer failed: {0}")]
    Transfer(String),

    /// Status queries kept failing after the local retry budget
    #[error("status query for job {job_id} failed after {attempts} attempt(s): {source}")]
    Poll {
        job_id: String,
        attempts: u32,
        #[source]
        source: Box<ClientError>,
    },

    /// The backend reported a terminal failure for the job
    #[error("processing job ended as {state}: {message}{}", cause_suffix(.cause))]
    JobFailed {
        state: JobState,
        message: String,
        cause: Option<String>,
    },

    /// The caller cancelled the operation
    #[error("upload cancelled before the processing job finished")]
    Cancelled,

    /// The local polling budget ran out
    #[error("timed out after {}s waiting for the processing job", .waited.as_secs())]
    TimedOut { waited: Duration },

    /// Failed to parse a response body
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Resource not found
    #[error("resource not found: {0}")]
    NotFound(String),

    /// Invalid request (rejected before anything is sent)
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Local file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid client configuration
    #[error("invalid configuration: {0}")]
    Config(String),
}

fn cause_suffix(cause: &Option<String>) -> String {
    match cause {
        Some(cause) if !cause.trim().is_empty() => format!(" ({})", cause),
        _ => String::new(),
    }
}

impl ClientError {
    /// Create a transport error from status code and body
    pub fn transport(status: u16, body: impl Into<String>) -> Self {
        Self::Transport {
            status,
            body: body.into(),
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_)) || matches!(self, Self::Transport { status: 404, .. })
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Transport { status, .. } if *status >= 400 && *status < 500)
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Transport { status, .. } if *status >= 500)
    }

    /// Check if repeating the same request may succeed
    ///
    /// Covers network failures, 5xx, 408 and 429.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Transport { status, .. } if self.is_client_error() => {
                *status == 408 || *status == 429
            }
            _ => self.is_server_error(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(ClientError::transport(404, "").is_not_found());
        assert!(ClientError::transport(404, "").is_client_error());
        assert!(ClientError::transport(503, "").is_server_error());
        assert!(!ClientError::transport(503, "").is_client_error());
    }

    #[test]
    fn test_retryable_errors() {
        assert!(ClientError::transport(500, "").is_retryable());
        assert!(ClientError::transport(429, "").is_retryable());
        assert!(ClientError::transport(408, "").is_retryable());
        assert!(!ClientError::transport(400, "").is_retryable());
        assert!(!ClientError::transport(404, "").is_retryable());
        assert!(ClientError::transport(504, "").is_retryable());
        assert!(!ClientError::Parse("bad json".to_string()).is_retryable());
        assert!(!ClientError::Cancelled.is_retryable());
    }

    #[test]
    fn test_job_failed_message_includes_cause() {
        let err = ClientError::JobFailed {
            state: JobState::Failed,
            message: "codec error".to_string(),
            cause: Some("unsupported format".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "processing job ended as FAILED: codec error (unsupported format)"
        );

        let err = ClientError::JobFailed {
            state: JobState::Aborted,
            message: "stopped".to_string(),
            cause: None,
        };
        assert_eq!(err.to_string(), "processing job ended as ABORTED: stopped");
    }

    #[test]
    fn test_timed_out_message() {
        let err = ClientError::TimedOut {
            waited: Duration::from_secs(60),
        };
        assert!(err.to_string().contains("timed out after 60s"));
    }
}
