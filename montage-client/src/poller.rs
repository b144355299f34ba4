//! Job poller
//!
//! Tracks a processing job until it reaches a terminal state. Queries are
//! issued at a fixed interval (no backoff). Both the queries and the wait
//! between them are cut short by cancellation or by the `max_wait` deadline.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use montage_core::domain::job::JobStatus;
use montage_core::dto::job::PollRequest;
use std::sync::Arc;
use tokio::time::{self, Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::transport::HttpTransport;

/// Gateway path that reports job status
pub const POLL_PATH: &str = "/poll";

/// Source of job status observations
#[async_trait]
pub trait JobStatusSource: Send + Sync {
    /// Queries the current status of `job_id` once
    async fn query_status(&self, job_id: &str) -> Result<JobStatus>;
}

/// HTTP implementation of JobStatusSource
pub struct HttpJobStatusSource {
    transport: Arc<HttpTransport>,
}

impl HttpJobStatusSource {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl JobStatusSource for HttpJobStatusSource {
    async fn query_status(&self, job_id: &str) -> Result<JobStatus> {
        let mut status: JobStatus = self
            .transport
            .post(
                POLL_PATH,
                &PollRequest {
                    job_id: job_id.to_string(),
                },
            )
            .await?;

        if status.job_id.is_empty() {
            status.job_id = job_id.to_string();
        }

        Ok(status)
    }
}

/// Limits applied while waiting on a job
#[derive(Debug, Clone)]
pub struct PollPolicy {
    /// Give up (with a local `TimedOut`) after this long
    pub max_wait: Duration,
    /// Extra attempts for a transiently failing query
    pub retries: u32,
    /// Pause before each of those attempts
    pub retry_delay: Duration,
}

impl From<&ClientConfig> for PollPolicy {
    fn from(config: &ClientConfig) -> Self {
        Self {
            max_wait: config.max_wait,
            retries: config.poll_retries,
            retry_delay: config.retry_delay,
        }
    }
}

/// Waits for processing jobs to finish
pub struct JobPoller {
    source: Arc<dyn JobStatusSource>,
    policy: PollPolicy,
}

impl JobPoller {
    /// Creates a new job poller
    pub fn new(source: Arc<dyn JobStatusSource>, policy: PollPolicy) -> Self {
        Self { source, policy }
    }

    /// Polls `job_id` every `poll_interval` until it is terminal
    ///
    /// Always returns a terminal status: the backend's own, a local
    /// `TimedOut` once `max_wait` has elapsed, or a local `Cancelled` as soon
    /// as `cancel` fires. An unknown job (`found == false`) is treated as
    /// pending, not failed. Fails only when a single query keeps failing
    /// after the retry budget. A query still in flight at `max_wait` is
    /// dropped.
    pub async fn wait_until_terminal(
        &self,
        job_id: &str,
        poll_interval: Duration,
        cancel: &CancellationToken,
    ) -> Result<JobStatus> {
        let started = Instant::now();
        let deadline = started + self.policy.max_wait;
        let mut started_at = None;

        info!(
            job_id,
            ?poll_interval,
            max_wait = ?self.policy.max_wait,
            "Waiting for processing job"
        );

        loop {
            let status = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(job_id, "Polling cancelled");
                    return Ok(JobStatus::cancelled(job_id, started_at));
                }
                _ = time::sleep_until(deadline) => {
                    return Ok(self.timed_out(job_id, started, started_at));
                }
                queried = self.query_with_retry(job_id, deadline) => match queried? {
                    Some(status) => status.reconciled(),
                    None => return Ok(self.timed_out(job_id, started, started_at)),
                },
            };

            if status.found && status.started_at.is_some() {
                started_at = status.started_at;
            }

            if status.is_terminal() {
                info!(job_id, state = %status.state, "Processing job finished");
                return Ok(status);
            }

            debug!(job_id, state = %status.state, found = status.found, "Processing job still pending");

            let now = Instant::now();
            if now >= deadline {
                return Ok(self.timed_out(job_id, started, started_at));
            }

            let nap = poll_interval.min(deadline - now);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(job_id, "Polling cancelled");
                    return Ok(JobStatus::cancelled(job_id, started_at));
                }
                _ = time::sleep(nap) => {}
            }

            if Instant::now() >= deadline {
                return Ok(self.timed_out(job_id, started, started_at));
            }
        }
    }

    /// Performs one status query, retrying transient failures
    ///
    /// Yields `None` when the next retry could not start before `deadline`.
    async fn query_with_retry(
        &self,
        job_id: &str,
        deadline: Instant,
    ) -> Result<Option<JobStatus>> {
        let max_attempts = self.policy.retries + 1;
        let mut attempt = 0;

        loop {
            attempt += 1;

            match self.source.query_status(job_id).await {
                Ok(status) => return Ok(Some(status)),
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    if Instant::now() + self.policy.retry_delay >= deadline {
                        warn!(
                            job_id,
                            attempt,
                            "Status query failed, no time left to retry: {}",
                            e
                        );
                        return Ok(None);
                    }
                    warn!(
                        job_id,
                        attempt,
                        max_attempts,
                        "Status query failed, retrying: {}",
                        e
                    );
                    time::sleep(self.policy.retry_delay).await;
                }
                Err(e) => {
                    return Err(ClientError::Poll {
                        job_id: job_id.to_string(),
                        attempts: attempt,
                        source: Box::new(e),
                    });
                }
            }
        }
    }

    fn timed_out(
        &self,
        job_id: &str,
        started: Instant,
        started_at: Option<DateTime<Utc>>,
    ) -> JobStatus {
        let waited = started.elapsed();
        warn!(job_id, ?waited, "Gave up waiting for processing job");
        JobStatus::timed_out(job_id, waited, started_at)
    }
}
