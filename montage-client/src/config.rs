//! Client configuration
//!
//! Defines every tunable of an upload: gateway location, polling cadence,
//! the overall wait budget, per-request timeouts and the upload size limit.

use std::time::Duration;

use crate::error::{ClientError, Result};

/// Default pause between two status queries
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Default budget for waiting on a processing job
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(30 * 60);

/// Default limit for a single upload
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 300 * 1024 * 1024;

/// Default deadline for streaming one payload to storage
pub const DEFAULT_TRANSFER_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Client configuration
///
/// An explicit value owned by the caller. Nothing here is cached globally, so
/// two clients with different settings can coexist in one process.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Gateway base URL (e.g., "https://abc.execute-api.us-east-1.amazonaws.com/prod")
    pub gateway_url: String,

    /// How long to wait between two status queries
    pub poll_interval: Duration,

    /// Maximum time to wait for a processing job to reach a terminal state
    pub max_wait: Duration,

    /// Timeout applied to every individual gateway request
    pub request_timeout: Duration,

    /// Timeout for the payload upload to storage, which can take much longer
    /// than a gateway round trip
    pub transfer_timeout: Duration,

    /// Extra attempts for a status query that failed transiently
    pub poll_retries: u32,

    /// Pause before retrying a failed status query
    pub retry_delay: Duration,

    /// Largest file accepted for upload, in bytes
    pub max_upload_bytes: u64,
}

impl ClientConfig {
    /// Creates a new configuration with defaults
    pub fn new(gateway_url: impl Into<String>) -> Self {
        let gateway_url = gateway_url.into();
        Self {
            gateway_url: gateway_url.trim_end_matches('/').to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_wait: DEFAULT_MAX_WAIT,
            request_timeout: Duration::from_secs(30),
            transfer_timeout: DEFAULT_TRANSFER_TIMEOUT,
            poll_retries: 3,
            retry_delay: Duration::from_secs(1),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - MONTAGE_GATEWAY_URL (required)
    /// - everything read by [`ClientConfig::with_env_overrides`]
    pub fn from_env() -> Result<Self> {
        let gateway_url = std::env::var("MONTAGE_GATEWAY_URL").map_err(|_| {
            ClientError::Config("MONTAGE_GATEWAY_URL environment variable not set".to_string())
        })?;

        Self::new(gateway_url).with_env_overrides()
    }

    /// Applies the optional tunables found in the environment
    ///
    /// - MONTAGE_POLL_INTERVAL (seconds, default: 10)
    /// - MONTAGE_MAX_WAIT (seconds, default: 1800)
    /// - MONTAGE_REQUEST_TIMEOUT (seconds, default: 30)
    /// - MONTAGE_TRANSFER_TIMEOUT (seconds, default: 1800)
    /// - MONTAGE_POLL_RETRIES (default: 3)
    /// - MONTAGE_MAX_UPLOAD_MB (default: 300)
    ///
    /// A variable that is set but not a number is an error.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Same as [`ClientConfig::with_env_overrides`], reading from `lookup`
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(secs) = parse_var::<u64, _>(&lookup, "MONTAGE_POLL_INTERVAL")? {
            self.poll_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "MONTAGE_MAX_WAIT")? {
            self.max_wait = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "MONTAGE_REQUEST_TIMEOUT")? {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "MONTAGE_TRANSFER_TIMEOUT")? {
            self.transfer_timeout = Duration::from_secs(secs);
        }
        if let Some(retries) = parse_var::<u32, _>(&lookup, "MONTAGE_POLL_RETRIES")? {
            self.poll_retries = retries;
        }
        if let Some(mb) = parse_var::<u64, _>(&lookup, "MONTAGE_MAX_UPLOAD_MB")? {
            self.max_upload_bytes = mb.saturating_mul(1024 * 1024);
        }

        Ok(self)
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_transfer_timeout(mut self, timeout: Duration) -> Self {
        self.transfer_timeout = timeout;
        self
    }

    pub fn with_poll_retries(mut self, retries: u32, delay: Duration) -> Self {
        self.poll_retries = retries;
        self.retry_delay = delay;
        self
    }

    pub fn with_max_upload_bytes(mut self, bytes: u64) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.gateway_url.is_empty() {
            return Err(ClientError::Config("gateway_url cannot be empty".to_string()));
        }

        if !self.gateway_url.starts_with("http://") && !self.gateway_url.starts_with("https://") {
            return Err(ClientError::Config(
                "gateway_url must start with http:// or https://".to_string(),
            ));
        }

        if self.poll_interval.is_zero() {
            return Err(ClientError::Config(
                "poll_interval must be greater than 0".to_string(),
            ));
        }

        if self.max_wait < self.poll_interval {
            return Err(ClientError::Config(
                "max_wait must be at least one poll_interval".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(ClientError::Config(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        if self.transfer_timeout.is_zero() {
            return Err(ClientError::Config(
                "transfer_timeout must be greater than 0".to_string(),
            ));
        }

        if self.max_upload_bytes == 0 {
            return Err(ClientError::Config(
                "max_upload_bytes must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ClientError::Config(format!("{} must be a number, got {:?}", name, raw))),
    }
}
