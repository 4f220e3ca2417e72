//! # cmkgui-token
//!
//! Bearer tokens for sharing GUI resources (e.g. dashboards) with people
//! who have no login.
//!
//! This crate provides functionality for:
//! - Issuing tokens with an optional expiry and a typed grant payload
//! - Verifying client-supplied token strings (`"0:<token_id>"`)
//! - Revoking and deleting tokens
//! - Persisting all tokens in one JSON document guarded by an advisory file lock
//!
//! ## Token Lifecycle
//!
//! | Step | Operation | Effect on the file |
//! |------|-----------|--------------------|
//! | Issue | [`TokenStore::issue`] | inserts a new record |
//! | Verify | [`TokenStore::verify`] | lock-free read, may touch `last_successful_verification` |
//! | Revoke | [`TokenStore::revoke`] | sets `revoked = true`, never undone |
//! | Delete | [`TokenStore::delete`] | removes the record |
//!
//! The store never reads the clock; callers pass `now`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use chrono::{Duration, Utc};
//! use cmkgui_token::{DashboardToken, TokenDetails, TokenStore};
//!
//! # fn example() -> Result<(), cmkgui_token::TokenError> {
//! let store = TokenStore::new("/omd/sites/prod/var/check_mk/web/token.store");
//! let now = Utc::now();
//!
//! let details = TokenDetails::Dashboard(DashboardToken::new("alice", "main", now));
//! let token = store.issue(details, "alice", now, Some(Duration::days(30)))?;
//!
//! let client_string = token.client_token().to_string();
//! let verified = store.verify(&client_string, Utc::now())?;
//! assert_eq!(verified.token_id, token.token_id);
//! # Ok(())
//! # }
//! ```

pub mod details;
pub mod error;
pub mod file;
pub mod store;
pub mod token;

pub use details::{DashboardToken, TokenDetails};
pub use error::TokenError;
pub use file::{FileLock, StoreFile};
pub use store::TokenStore;
pub use token::{AuthToken, TOKEN_VERSION, TokenId, TokenString, shared_dashboard_url};
