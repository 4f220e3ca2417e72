//! Security event types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type of security event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityEventType {
    // ===== Authentication =====
    /// A request failed to authenticate.
    AuthenticationFailed,

    // ===== Token lifecycle =====
    /// A token was issued.
    TokenIssued,
    /// A token was revoked.
    TokenRevoked,
    /// A token was deleted.
    TokenDeleted,
    /// A share was switched off.
    TokenDisabled,
    /// A share was switched back on.
    TokenEnabled,
}

impl std::fmt::Display for SecurityEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed => write!(f, "AUTH_FAILED"),
            Self::TokenIssued => write!(f, "TOKEN_ISSUED"),
            Self::TokenRevoked => write!(f, "TOKEN_REVOKED"),
            Self::TokenDeleted => write!(f, "TOKEN_DELETED"),
            Self::TokenDisabled => write!(f, "TOKEN_DISABLED"),
            Self::TokenEnabled => write!(f, "TOKEN_ENABLED"),
        }
    }
}

/// A security event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityEvent {
    /// Unique event ID.
    pub event_id: Uuid,

    /// When the event occurred.
    pub occurred_at: DateTime<Utc>,

    /// Event type.
    pub event_type: SecurityEventType,

    /// Authentication method (e.g. "token").
    pub method: String,

    /// Acting or affected user, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Scope tag of the token involved (e.g. "dashboard").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,

    /// Failure reason or free-text detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Remote address of the client.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_address: Option<String>,
}

impl SecurityEvent {
    /// Create a new event for `method`.
    pub fn new(event_type: SecurityEventType, method: impl Into<String>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            event_type,
            method: method.into(),
            user: None,
            token_type: None,
            reason: None,
            remote_address: None,
        }
    }

    /// Create a builder for an event.
    pub fn builder(event_type: SecurityEventType, method: impl Into<String>) -> SecurityEventBuilder {
        SecurityEventBuilder::new(event_type, method)
    }

    /// Format the event as a human-readable log line.
    ///
    /// Format: `[timestamp] EVENT_TYPE method=... [user=...] [remote=...] [reason="..."]`
    pub fn to_log_line(&self) -> String {
        let mut line = format!(
            "[{}] {} method={}",
            self.occurred_at.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
            self.event_type,
            self.method,
        );

        if let Some(ref user) = self.user {
            line.push_str(&format!(" user={}", user));
        }

        if let Some(ref token_type) = self.token_type {
            line.push_str(&format!(" token_type={}", token_type));
        }

        if let Some(ref remote) = self.remote_address {
            line.push_str(&format!(" remote={}", remote));
        }

        if let Some(ref reason) = self.reason {
            line.push_str(&format!(" reason=\"{}\"", reason.replace('"', "'")));
        }

        line
    }
}

/// Builder for creating security events.
#[derive(Debug)]
pub struct SecurityEventBuilder {
    event: SecurityEvent,
}

impl SecurityEventBuilder {
    /// Create a new builder with required fields.
    pub fn new(event_type: SecurityEventType, method: impl Into<String>) -> Self {
        Self {
            event: SecurityEvent::new(event_type, method),
        }
    }

    /// Set the user.
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.event.user = Some(user.into());
        self
    }

    /// Set the token type.
    pub fn token_type(mut self, token_type: impl Into<String>) -> Self {
        self.event.token_type = Some(token_type.into());
        self
    }

    /// Set the reason.
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.event.reason = Some(reason.into());
        self
    }

    /// Set the remote address.
    pub fn remote_address(mut self, remote: impl Into<String>) -> Self {
        self.event.remote_address = Some(remote.into());
        self
    }

    /// Build the event.
    pub fn build(self) -> SecurityEvent {
        self.event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_line() {
        let event = SecurityEvent::builder(SecurityEventType::AuthenticationFailed, "token")
            .reason("Invalid token: Could not find token")
            .remote_address("10.0.0.7")
            .build();

        let line = event.to_log_line();
        assert!(line.contains("AUTH_FAILED method=token"));
        assert!(line.contains("remote=10.0.0.7"));
        assert!(line.contains("reason=\"Invalid token: Could not find token\""));
        assert!(!line.contains("user="));
    }

    #[test]
    fn test_serialization_skips_empty_fields() {
        let event = SecurityEvent::builder(SecurityEventType::TokenIssued, "token")
            .user("alice")
            .token_type("dashboard")
            .build();

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event_type"], "token_issued");
        assert_eq!(value["user"], "alice");
        assert!(value.get("remote_address").is_none());
        assert!(value.get("reason").is_none());
    }
}
