//! Security logger implementation.
//!
//! Provides the main `SecurityLogger` type with helper methods for
//! authentication failures and token lifecycle events.

use cmkgui_core::{GuiConfig, SecurityLogConfig};
use std::sync::Arc;

use crate::error::AuditError;
use crate::event::{SecurityEvent, SecurityEventType};
use crate::storage::{ConsoleStorage, DualStorage, FileStorage, NullStorage, SecurityStorage};

/// The main security logger.
pub struct SecurityLogger {
    enabled: bool,
    storage: Arc<dyn SecurityStorage>,
}

impl SecurityLogger {
    /// Create a logger from the `security_log` section of the configuration.
    pub fn from_config(config: &GuiConfig) -> Result<Self, AuditError> {
        Self::new(&config.security_log, config.security_log_path())
    }

    /// Create a logger writing to `path`.
    pub fn new(config: &SecurityLogConfig, path: impl AsRef<std::path::Path>) -> Result<Self, AuditError> {
        let storage: Arc<dyn SecurityStorage> = if !config.enabled {
            Arc::new(NullStorage::new())
        } else if config.stdout {
            // Dual output: file + console
            Arc::new(DualStorage::new(path)?)
        } else {
            Arc::new(FileStorage::new(path)?)
        };

        Ok(Self {
            enabled: config.enabled,
            storage,
        })
    }

    /// Create a logger with a custom storage backend.
    pub fn with_storage(storage: Arc<dyn SecurityStorage>) -> Self {
        Self {
            enabled: true,
            storage,
        }
    }

    /// Create a disabled (no-op) logger.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            storage: Arc::new(NullStorage::new()),
        }
    }

    /// Create a console-only logger (useful for development).
    pub fn console_only() -> Self {
        Self {
            enabled: true,
            storage: Arc::new(ConsoleStorage::new()),
        }
    }

    /// Check if logging is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Log a security event.
    pub async fn log(&self, event: SecurityEvent) -> Result<(), AuditError> {
        if !self.enabled {
            return Ok(());
        }

        tracing::debug!(
            event_id = %event.event_id,
            event_type = %event.event_type,
            method = %event.method,
            remote = event.remote_address.as_deref().unwrap_or("-"),
            "Security event"
        );

        self.storage.store(event).await
    }

    /// Log a failed authentication.
    ///
    /// `reason` must not contain the token string itself.
    pub async fn log_authentication_failed(
        &self,
        reason: &str,
        method: &str,
        remote_address: Option<&str>,
    ) -> Result<(), AuditError> {
        let mut builder =
            SecurityEvent::builder(SecurityEventType::AuthenticationFailed, method).reason(reason);

        if let Some(remote) = remote_address {
            builder = builder.remote_address(remote);
        }

        self.log(builder.build()).await
    }

    /// Log the issuance of a token.
    pub async fn log_token_issued(&self, user: &str, token_type: &str) -> Result<(), AuditError> {
        self.log_lifecycle(SecurityEventType::TokenIssued, user, token_type)
            .await
    }

    /// Log the revocation of a token.
    pub async fn log_token_revoked(&self, user: &str, token_type: &str) -> Result<(), AuditError> {
        self.log_lifecycle(SecurityEventType::TokenRevoked, user, token_type)
            .await
    }

    /// Log the deletion of a token.
    pub async fn log_token_deleted(&self, user: &str, token_type: &str) -> Result<(), AuditError> {
        self.log_lifecycle(SecurityEventType::TokenDeleted, user, token_type)
            .await
    }

    /// Log switching a share off (`disabled = true`) or back on.
    pub async fn log_token_disabled(
        &self,
        user: &str,
        token_type: &str,
        disabled: bool,
    ) -> Result<(), AuditError> {
        let event_type = if disabled {
            SecurityEventType::TokenDisabled
        } else {
            SecurityEventType::TokenEnabled
        };
        self.log_lifecycle(event_type, user, token_type).await
    }

    async fn log_lifecycle(
        &self,
        event_type: SecurityEventType,
        user: &str,
        token_type: &str,
    ) -> Result<(), AuditError> {
        let event = SecurityEvent::builder(event_type, "token")
            .user(user)
            .token_type(token_type)
            .build();
        self.log(event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_disabled_logger() {
        let logger = SecurityLogger::disabled();
        assert!(!logger.is_enabled());

        // Should not error even when logging
        logger
            .log_authentication_failed("Invalid token: Could not parse token", "token", None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_authentication_failure_fields() {
        let storage = Arc::new(MemoryStorage::new());
        let logger = SecurityLogger::with_storage(storage.clone());

        logger
            .log_authentication_failed("dashboard token has expired", "token", Some("192.0.2.1"))
            .await
            .unwrap();

        let events = storage.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, SecurityEventType::AuthenticationFailed);
        assert_eq!(events[0].method, "token");
        assert_eq!(events[0].reason.as_deref(), Some("dashboard token has expired"));
        assert_eq!(events[0].remote_address.as_deref(), Some("192.0.2.1"));
    }

    #[tokio::test]
    async fn test_lifecycle_events() {
        let storage = Arc::new(MemoryStorage::new());
        let logger = SecurityLogger::with_storage(storage.clone());

        logger.log_token_issued("alice", "dashboard").await.unwrap();
        logger.log_token_disabled("alice", "dashboard", true).await.unwrap();
        logger.log_token_disabled("alice", "dashboard", false).await.unwrap();
        logger.log_token_revoked("alice", "dashboard").await.unwrap();
        logger.log_token_deleted("alice", "dashboard").await.unwrap();

        let types: Vec<_> = storage.events().iter().map(|e| e.event_type).collect();
        assert_eq!(
            types,
            vec![
                SecurityEventType::TokenIssued,
                SecurityEventType::TokenDisabled,
                SecurityEventType::TokenEnabled,
                SecurityEventType::TokenRevoked,
                SecurityEventType::TokenDeleted,
            ]
        );
    }

    #[tokio::test]
    async fn test_from_config_writes_file() {
        let dir = TempDir::new().unwrap();
        let mut config = GuiConfig::default();
        config.security_log.directory = dir.path().join("log");

        let logger = SecurityLogger::from_config(&config).unwrap();
        logger.log_token_issued("alice", "dashboard").await.unwrap();

        let content = std::fs::read_to_string(config.security_log_path()).unwrap();
        assert!(content.contains("\"token_issued\""));
    }
}
