//! Processing job domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Processing job state
///
/// Serialized with the backend's upper-case names. The PascalCase spellings
/// are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    #[serde(alias = "Running")]
    Running,
    #[serde(alias = "Succeeded")]
    Succeeded,
    #[serde(alias = "Failed")]
    Failed,
    #[serde(alias = "TimedOut")]
    TimedOut,
    #[serde(alias = "Aborted")]
    Aborted,
    /// Job not visible yet, query again
    #[serde(
        rename = "PENDING_REDRIVE",
        alias = "PENDING_RETRY",
        alias = "PendingRetry"
    )]
    PendingRetry,
    /// Polling stopped by the caller; never reported by the backend
    #[serde(alias = "Cancelled")]
    Cancelled,
}

impl JobState {
    /// Terminal states admit no further transition
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Succeeded
                | JobState::Failed
                | JobState::TimedOut
                | JobState::Aborted
                | JobState::Cancelled
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Running => "RUNNING",
            JobState::Succeeded => "SUCCEEDED",
            JobState::Failed => "FAILED",
            JobState::TimedOut => "TIMED_OUT",
            JobState::Aborted => "ABORTED",
            JobState::PendingRetry => "PENDING_REDRIVE",
            JobState::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observation of a processing job, as returned by the poll endpoint
///
/// Field names follow the backend (`isComplete`, `startDate`, `error`, ...);
/// the longer names (`isTerminal`, `startedAt`, `errorMessage`, ...) are
/// accepted on input too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    #[serde(default, alias = "jobID")]
    pub job_id: String,
    #[serde(rename = "status")]
    pub state: JobState,
    #[serde(rename = "isComplete", alias = "isTerminal", default)]
    pub is_terminal: bool,
    #[serde(
        rename = "startDate",
        alias = "startedAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(
        rename = "stopDate",
        alias = "endedAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(
        rename = "error",
        alias = "errorMessage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub error_message: Option<String>,
    #[serde(
        rename = "cause",
        alias = "errorCause",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub error_cause: Option<String>,
    /// `false` when the backend does not know the job (yet)
    #[serde(default = "default_found")]
    pub found: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Produced by the client rather than reported by the backend
    #[serde(skip)]
    pub synthesized: bool,
}

fn default_found() -> bool {
    true
}

impl JobStatus {
    /// Brings the flags in line with the state
    ///
    /// An unknown job is always `PendingRetry`, whatever status came with it,
    /// and `is_terminal` is derived from the state rather than trusted.
    pub fn reconciled(mut self) -> Self {
        if !self.found {
            self.state = JobState::PendingRetry;
        }
        self.is_terminal = self.state.is_terminal();
        self
    }

    /// Terminal `TimedOut` status produced locally when the wait budget runs out
    pub fn timed_out(
        job_id: impl Into<String>,
        waited: std::time::Duration,
        started_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self::local_terminal(
            job_id.into(),
            JobState::TimedOut,
            started_at,
            format!(
                "timed out after {}s without a terminal status",
                waited.as_secs()
            ),
        )
    }

    /// Terminal `Cancelled` status produced locally when the caller gives up
    pub fn cancelled(job_id: impl Into<String>, started_at: Option<DateTime<Utc>>) -> Self {
        Self::local_terminal(
            job_id.into(),
            JobState::Cancelled,
            started_at,
            "polling cancelled by caller".to_string(),
        )
    }

    fn local_terminal(
        job_id: String,
        state: JobState,
        started_at: Option<DateTime<Utc>>,
        message: String,
    ) -> Self {
        Self {
            job_id,
            state,
            is_terminal: true,
            started_at,
            ended_at: Some(Utc::now()),
            output: None,
            error_message: Some(message),
            error_cause: None,
            found: true,
            message: None,
            synthesized: true,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.is_terminal
    }

    /// Compares two observations while ignoring server-assigned timestamps
    pub fn same_observation(&self, other: &JobStatus) -> bool {
        let strip = |status: &JobStatus| JobStatus {
            started_at: None,
            ended_at: None,
            ..status.clone()
        };
        strip(self) == strip(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(JobState::Succeeded.is_terminal());
        assert!(JobState::Failed.is_terminal());
        assert!(JobState::TimedOut.is_terminal());
        assert!(JobState::Aborted.is_terminal());
        assert!(JobState::Cancelled.is_terminal());
        assert!(!JobState::Running.is_terminal());
        assert!(!JobState::PendingRetry.is_terminal());
    }

    #[test]
    fn test_parses_backend_payload() {
        let status: JobStatus = serde_json::from_value(serde_json::json!({
            "jobId": "job-42",
            "status": "FAILED",
            "isComplete": true,
            "startDate": "2024-05-01T10:00:00.123000+00:00",
            "stopDate": "2024-05-01T10:02:00+00:00",
            "error": "codec error",
            "cause": "unsupported format"
        }))
        .unwrap();

        assert_eq!(status.job_id, "job-42");
        assert_eq!(status.state, JobState::Failed);
        assert!(status.is_terminal());
        assert!(status.found);
        assert_eq!(status.error_message.as_deref(), Some("codec error"));
        assert_eq!(status.error_cause.as_deref(), Some("unsupported format"));
        assert!(status.ended_at.is_some());
    }

    #[test]
    fn test_parses_long_field_names() {
        let status: JobStatus = serde_json::from_value(serde_json::json!({
            "status": "Succeeded",
            "isTerminal": true,
            "startedAt": "2024-05-01T10:00:00Z",
            "endedAt": "2024-05-01T10:01:00Z",
            "output": "{\"outputKey\":\"u1/out.mp4\"}"
        }))
        .unwrap();

        assert_eq!(status.state, JobState::Succeeded);
        assert!(status.is_terminal());
        assert!(status.started_at.is_some());
    }

    #[test]
    fn test_unknown_job_reconciles_to_pending_retry() {
        let status: JobStatus = serde_json::from_value(serde_json::json!({
            "jobId": "job-1",
            "status": "PENDING_REDRIVE",
            "isComplete": false,
            "found": false,
            "startDate": "2024-05-01T10:00:00+00:00",
            "message": "Execution not started yet"
        }))
        .unwrap();
        let status = status.reconciled();

        assert_eq!(status.state, JobState::PendingRetry);
        assert!(!status.is_terminal());
        assert!(!status.found);
    }

    #[test]
    fn test_reconcile_ignores_contradicting_flag() {
        let status = JobStatus {
            is_terminal: true,
            ..JobStatus::cancelled("job-1", None)
        };
        let status = JobStatus {
            state: JobState::Running,
            ..status
        }
        .reconciled();
        assert!(!status.is_terminal());
    }

    #[test]
    fn test_local_timeout_is_terminal() {
        let status = JobStatus::timed_out("job-1", std::time::Duration::from_secs(90), None);
        assert_eq!(status.state, JobState::TimedOut);
        assert!(status.is_terminal());
        assert!(status.synthesized);
        assert!(status.error_message.unwrap().contains("timed out"));
    }

    #[test]
    fn test_same_observation_ignores_timestamps() {
        let first = JobStatus {
            started_at: Some(Utc::now()),
            ..JobStatus::cancelled("job-1", None)
        };
        let second = JobStatus {
            started_at: None,
            ended_at: None,
            ..first.clone()
        };
        assert!(first.same_observation(&second));

        let different = JobStatus {
            state: JobState::Aborted,
            ..second
        };
        assert!(!first.same_observation(&different));
    }
}
