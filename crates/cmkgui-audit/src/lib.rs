//! # cmkgui-audit
//!
//! Security event logging for cmkgui.
//!
//! This crate provides functionality for:
//! - Recording every failed token authentication with reason, method and remote address
//! - Recording token lifecycle changes (issued, revoked, deleted, disabled, enabled)
//! - Writing events as JSON Lines to a file and/or human-readable lines to stdout
//!
//! Token strings are never part of an event.
//!
//! ## Event Types
//!
//! | Event Type | Description |
//! |------------|-------------|
//! | `AuthenticationFailed` | Token missing, malformed, unknown, expired, revoked or disabled |
//! | `TokenIssued` | A share token was issued |
//! | `TokenRevoked` | A share token was revoked |
//! | `TokenDeleted` | A share token was deleted |
//! | `TokenDisabled` | A share was switched off by its owner |
//! | `TokenEnabled` | A share was switched back on |
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use cmkgui_audit::SecurityLogger;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let logger = SecurityLogger::console_only();
//!
//! logger
//!     .log_authentication_failed("Invalid token: Could not find token", "token", Some("10.0.0.7"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod event;
pub mod logger;
pub mod storage;

pub use error::AuditError;
pub use event::{SecurityEvent, SecurityEventBuilder, SecurityEventType};
pub use logger::SecurityLogger;
pub use storage::{
    ConsoleStorage, DualStorage, FileStorage, MemoryStorage, NullStorage, SecurityStorage,
};
