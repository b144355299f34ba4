//! Configuration module
//!
//! Turns command-line flags into a client configuration and an owner key.

use anyhow::{Context, Result, anyhow};
use montage_client::ClientConfig;
use montage_core::domain::owner::OwnerKey;
use std::time::Duration;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Settings handed to the gateway client
    pub client: ClientConfig,
    /// Owner to act for, when one was given
    pub owner: Option<OwnerKey>,
}

impl Config {
    /// Build the configuration from parsed flags
    ///
    /// Environment tunables not exposed as flags (request and transfer
    /// timeouts, retry budget, size limit) are still honored.
    pub fn from_args(
        gateway_url: String,
        owner: Option<String>,
        email: Option<String>,
        poll_interval_secs: u64,
        max_wait_secs: u64,
    ) -> Result<Self> {
        Self::from_args_with(
            gateway_url,
            owner,
            email,
            poll_interval_secs,
            max_wait_secs,
            |name| std::env::var(name).ok(),
        )
    }

    fn from_args_with<F>(
        gateway_url: String,
        owner: Option<String>,
        email: Option<String>,
        poll_interval_secs: u64,
        max_wait_secs: u64,
        env: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let client = ClientConfig::new(gateway_url)
            .with_overrides_from(env)
            .context("Invalid environment configuration")?
            .with_poll_interval(Duration::from_secs(poll_interval_secs))
            .with_max_wait(Duration::from_secs(max_wait_secs));
        client.validate().context("Invalid gateway configuration")?;

        let owner = match (owner, email) {
            (Some(key), _) => {
                Some(OwnerKey::new(key).ok_or_else(|| anyhow!("--owner cannot be empty"))?)
            }
            (None, Some(email)) => Some(
                OwnerKey::from_email(&email).ok_or_else(|| anyhow!("--email cannot be empty"))?,
            ),
            (None, None) => None,
        };

        Ok(Self { client, owner })
    }

    /// The owner key, or an error explaining how to provide one
    pub fn require_owner(&self) -> Result<&OwnerKey> {
        self.owner
            .as_ref()
            .ok_or_else(|| anyhow!("an owner is required: pass --owner or --email"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_derives_owner_key() {
        let config = Config::from_args(
            "http://localhost:3000".to_string(),
            None,
            Some("jane@example.com".to_string()),
            5,
            60,
        )
        .unwrap();

        assert_eq!(config.require_owner().unwrap().as_str(), "jane_at_example.com");
        assert_eq!(config.client.poll_interval, Duration::from_secs(5));
        assert_eq!(config.client.max_wait, Duration::from_secs(60));
    }

    #[test]
    fn test_owner_is_optional_until_required() {
        let config =
            Config::from_args("http://localhost:3000".to_string(), None, None, 5, 60).unwrap();
        assert!(config.require_owner().is_err());
    }

    #[test]
    fn test_env_tunables_survive_gateway_flag() {
        let env = |name: &str| match name {
            "MONTAGE_REQUEST_TIMEOUT" => Some("600".to_string()),
            "MONTAGE_MAX_UPLOAD_MB" => Some("2048".to_string()),
            // Flags win over the environment
            "MONTAGE_POLL_INTERVAL" => Some("99".to_string()),
            _ => None,
        };

        let config = Config::from_args_with(
            "http://localhost:3000".to_string(),
            Some("u1".to_string()),
            None,
            5,
            60,
            env,
        )
        .unwrap();

        assert_eq!(config.client.request_timeout, Duration::from_secs(600));
        assert_eq!(config.client.max_upload_bytes, 2048 * 1024 * 1024);
        assert_eq!(config.client.poll_interval, Duration::from_secs(5));
    }

    #[test]
    fn test_malformed_env_tunable_is_reported() {
        let env = |name: &str| (name == "MONTAGE_REQUEST_TIMEOUT").then(|| "soon".to_string());

        let err = Config::from_args_with(
            "http://localhost:3000".to_string(),
            None,
            None,
            5,
            60,
            env,
        )
        .unwrap_err();

        assert!(format!("{:#}", err).contains("MONTAGE_REQUEST_TIMEOUT"));
    }

    #[test]
    fn test_invalid_flags_are_rejected() {
        assert!(Config::from_args("localhost".to_string(), None, None, 5, 60).is_err());
        assert!(Config::from_args("http://localhost".to_string(), None, None, 0, 60).is_err());
        assert!(
            Config::from_args(
                "http://localhost".to_string(),
                Some(" ".to_string()),
                None,
                5,
                60
            )
            .is_err()
        );
    }
}
