//! Owner key domain type

use serde::{Deserialize, Serialize};

/// Opaque per-user partition key
///
/// Scopes uploads and video listings on the gateway. The gateway treats it
/// as a plain path segment, so it must never be empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerKey(String);

impl OwnerKey {
    /// Wraps an already partition-safe key
    ///
    /// Returns `None` for an empty or blank key.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    /// Derives the key the gateway expects for an email address
    ///
    /// The storage backend does not accept `@` in object keys, so it is
    /// spelled out as `_at_`.
    pub fn from_email(email: &str) -> Option<Self> {
        Self::new(email.trim().replace('@', "_at_"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_email_replaces_at_sign() {
        let key = OwnerKey::from_email("jane.doe@example.com").unwrap();
        assert_eq!(key.as_str(), "jane.doe_at_example.com");
    }

    #[test]
    fn test_blank_keys_are_rejected() {
        assert!(OwnerKey::new("").is_none());
        assert!(OwnerKey::new("   ").is_none());
        assert!(OwnerKey::from_email(" ").is_none());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let key = OwnerKey::new("u1").unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"u1\"");
    }
}
