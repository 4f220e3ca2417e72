//! File-backed token store.
//!
//! All tokens live in one JSON object mapping `token_id` to the serialized
//! [`AuthToken`]. There is no in-memory cache: every operation reads the
//! file again, so several processes can share one store.
//!
//! Mutations run as read-modify-write while holding the file lock.
//! Verification reads without the lock; only the optional
//! `last_successful_verification` touch takes it.

use crate::details::TokenDetails;
use crate::error::TokenError;
use crate::file::{FileLock, StoreFile};
use crate::token::{AuthToken, TokenId, TokenString};
use chrono::{DateTime, Duration, Utc};
use cmkgui_core::GuiConfig;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

type TokenMap = BTreeMap<TokenId, AuthToken>;

/// Default bound on waiting for the file lock.
pub const DEFAULT_LOCK_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Default minimum time between two `last_successful_verification` writes.
pub const DEFAULT_TOUCH_INTERVAL_SECS: i64 = 300;

/// Durable store of issued tokens.
#[derive(Debug, Clone)]
pub struct TokenStore {
    file: StoreFile,
    touch_interval: Duration,
}

impl TokenStore {
    /// Create a store backed by the file at `path` with default timeouts.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: StoreFile::new(path, DEFAULT_LOCK_TIMEOUT),
            touch_interval: Duration::seconds(DEFAULT_TOUCH_INTERVAL_SECS),
        }
    }

    /// Create a store from the loaded configuration.
    pub fn from_config(config: &GuiConfig) -> Self {
        let touch_interval = match Duration::from_std(config.token_store.touch_interval()) {
            Ok(interval) => interval,
            Err(_) => {
                tracing::warn!(
                    touch_interval_secs = config.token_store.touch_interval_secs,
                    fallback_secs = DEFAULT_TOUCH_INTERVAL_SECS,
                    "touch interval out of range, using default"
                );
                Duration::seconds(DEFAULT_TOUCH_INTERVAL_SECS)
            }
        };
        Self {
            file: StoreFile::new(config.token_store_path(), config.token_store.lock_timeout()),
            touch_interval,
        }
    }

    /// Override the lock timeout.
    pub fn with_lock_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.file = StoreFile::new(self.file.path().to_path_buf(), timeout);
        self
    }

    /// Override the touch interval.
    pub fn with_touch_interval(mut self, interval: Duration) -> Self {
        self.touch_interval = interval;
        self
    }

    /// Path of the token file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Issue a new token and persist it.
    ///
    /// `valid_for = None` issues a token that never expires.
    pub fn issue(
        &self,
        details: TokenDetails,
        issuer: impl Into<String>,
        now: DateTime<Utc>,
        valid_for: Option<Duration>,
    ) -> Result<AuthToken, TokenError> {
        let valid_until = valid_for
            .map(|d| {
                now.checked_add_signed(d).ok_or_else(|| {
                    TokenError::InvalidValidity(format!("{d} from {now} is out of range"))
                })
            })
            .transpose()?;

        let token = AuthToken {
            issuer: issuer.into(),
            issued_at: now,
            valid_until,
            details,
            token_id: TokenId::generate(),
            revoked: false,
            last_successful_verification: None,
        };

        self.modify(|tokens| {
            tokens.insert(token.token_id.clone(), token.clone());
            Ok(())
        })?;

        Ok(token)
    }

    /// Verify a client-supplied token string.
    ///
    /// Checks, in order: syntax, version, existence, expiry, revocation.
    /// On success `last_successful_verification` is set to `now` if it was
    /// never set or is older than the touch interval. A failure to persist
    /// that timestamp does not fail the verification.
    pub fn verify(
        &self,
        user_provided_token: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthToken, TokenError> {
        let token_string: TokenString = user_provided_token.parse()?;

        let mut token = self
            .load()?
            .remove(token_string.token_id().as_str())
            .ok_or_else(TokenError::could_not_find)?;

        if token.is_expired(now) {
            return Err(TokenError::TokenExpired {
                token_type: token.token_type().to_string(),
            });
        }

        if token.revoked {
            return Err(TokenError::TokenRevoked {
                token_type: token.token_type().to_string(),
            });
        }

        if self.needs_touch(&token, now) {
            match self.touch(&token.token_id, now) {
                Ok(true) => token.last_successful_verification = Some(now),
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(
                        token_type = token.token_type(),
                        error = %e,
                        "Could not record successful token verification"
                    );
                }
            }
        }

        Ok(token)
    }

    /// Mark a token as revoked. Revoking twice is a no-op.
    pub fn revoke(&self, token_id: &str) -> Result<(), TokenError> {
        self.modify(|tokens| {
            let token = tokens
                .get_mut(token_id)
                .ok_or_else(|| TokenError::NotFound(token_id.to_string()))?;
            token.revoked = true;
            Ok(())
        })
    }

    /// Remove a token entirely. Afterwards it is indistinguishable from one
    /// that was never issued.
    pub fn delete(&self, token_id: &str) -> Result<(), TokenError> {
        self.modify(|tokens| {
            tokens
                .remove(token_id)
                .map(|_| ())
                .ok_or_else(|| TokenError::NotFound(token_id.to_string()))
        })
    }

    /// Change the grant payload of a token under the lock.
    ///
    /// Expiry, revocation and identity are not reachable from here.
    pub fn update_details<F>(&self, token_id: &str, update: F) -> Result<AuthToken, TokenError>
    where
        F: FnOnce(&mut TokenDetails),
    {
        self.modify(|tokens| {
            let token = tokens
                .get_mut(token_id)
                .ok_or_else(|| TokenError::NotFound(token_id.to_string()))?;
            update(&mut token.details);
            Ok(token.clone())
        })
    }

    /// Look up a token without any checks.
    pub fn get(&self, token_id: &str) -> Result<Option<AuthToken>, TokenError> {
        Ok(self.load()?.remove(token_id))
    }

    /// All tokens, oldest first.
    pub fn list(&self) -> Result<Vec<AuthToken>, TokenError> {
        let mut tokens: Vec<_> = self.load()?.into_values().collect();
        tokens.sort_by(|a, b| {
            a.issued_at
                .cmp(&b.issued_at)
                .then_with(|| a.token_id.cmp(&b.token_id))
        });
        Ok(tokens)
    }

    /// Tokens issued by `issuer`, oldest first.
    pub fn tokens_issued_by(&self, issuer: &str) -> Result<Vec<AuthToken>, TokenError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|t| t.issuer == issuer)
            .collect())
    }

    fn needs_touch(&self, token: &AuthToken, now: DateTime<Utc>) -> bool {
        match token.last_successful_verification {
            None => true,
            Some(last) => now - last > self.touch_interval,
        }
    }

    /// Persist `now` as last successful verification. Returns `false` if the
    /// token vanished or another process touched it in the meantime.
    fn touch(&self, token_id: &TokenId, now: DateTime<Utc>) -> Result<bool, TokenError> {
        self.modify(|tokens| match tokens.get_mut(token_id) {
            Some(token) if self.needs_touch(token, now) => {
                token.last_successful_verification = Some(now);
                Ok(true)
            }
            _ => Ok(false),
        })
    }

    fn load(&self) -> Result<TokenMap, TokenError> {
        match self.file.read()? {
            Some(bytes) if !bytes.iter().all(u8::is_ascii_whitespace) => {
                Ok(serde_json::from_slice(&bytes)?)
            }
            _ => Ok(TokenMap::new()),
        }
    }

    fn save(&self, lock: &FileLock, tokens: &TokenMap) -> Result<(), TokenError> {
        let bytes = serde_json::to_vec(tokens)?;
        self.file.write(lock, &bytes)
    }

    /// Read-modify-write under the exclusive lock. Nothing is written when
    /// `mutate` fails.
    fn modify<R, F>(&self, mutate: F) -> Result<R, TokenError>
    where
        F: FnOnce(&mut TokenMap) -> Result<R, TokenError>,
    {
        let lock = self.file.locked()?;
        let mut tokens = self.load()?;
        let result = mutate(&mut tokens)?;
        self.save(&lock, &tokens)?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::details::DashboardToken;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 20, 20, 20, 20).unwrap()
    }

    fn details() -> TokenDetails {
        TokenDetails::Dashboard(DashboardToken::new("owner", "unit-dashboard", now()))
    }

    #[test]
    fn test_first_verification_is_recorded() {
        let dir = TempDir::new().unwrap();
        let store = TokenStore::new(dir.path().join("token.store"));
        let token = store.issue(details(), "issuer", now(), None).unwrap();

        let verified = store
            .verify(&token.client_token().to_string(), now())
            .unwrap();
        assert_eq!(verified.last_successful_verification, Some(now()));

        let stored = store.get(token.token_id.as_str()).unwrap().unwrap();
        assert_eq!(stored.last_successful_verification, Some(now()));
    }

    #[test]
    fn test_touch_is_rate_limited() {
        let dir = TempDir::new().unwrap();
        let store = TokenStore::new(dir.path().join("token.store"));
        let token = store.issue(details(), "issuer", now(), None).unwrap();
        let client = token.client_token().to_string();

        store.verify(&client, now()).unwrap();

        // Within the interval the stored timestamp stays put.
        let later = now() + Duration::minutes(4);
        let verified = store.verify(&client, later).unwrap();
        assert_eq!(verified.last_successful_verification, Some(now()));

        // Exactly at the interval boundary nothing is written either.
        let boundary = now() + Duration::minutes(5);
        store.verify(&client, boundary).unwrap();
        let stored = store.get(token.token_id.as_str()).unwrap().unwrap();
        assert_eq!(stored.last_successful_verification, Some(now()));

        let much_later = now() + Duration::minutes(6);
        let verified = store.verify(&client, much_later).unwrap();
        assert_eq!(verified.last_successful_verification, Some(much_later));
    }

    #[test]
    fn test_from_config_out_of_range_touch_interval_uses_default() {
        let dir = TempDir::new().unwrap();
        let mut config = GuiConfig::default();
        config.var_dir = dir.path().to_path_buf();
        config.token_store.touch_interval_secs = u64::MAX;

        let store = TokenStore::from_config(&config);
        assert_eq!(store.touch_interval, Duration::seconds(DEFAULT_TOUCH_INTERVAL_SECS));
        assert_eq!(store.path(), dir.path().join("token.store"));

        config.token_store.touch_interval_secs = 60;
        let store = TokenStore::from_config(&config);
        assert_eq!(store.touch_interval, Duration::minutes(1));
    }

    #[test]
    fn test_verify_does_not_fail_when_touch_cannot_lock() {
        let dir = TempDir::new().unwrap();
        let store = TokenStore::new(dir.path().join("token.store"))
            .with_lock_timeout(std::time::Duration::from_millis(50));
        let token = store.issue(details(), "issuer", now(), None).unwrap();

        let blocker = StoreFile::new(store.path(), std::time::Duration::from_secs(1));
        let _held = blocker.locked().unwrap();

        let verified = store
            .verify(&token.client_token().to_string(), now())
            .unwrap();
        assert_eq!(verified.token_id, token.token_id);
        assert_eq!(verified.last_successful_verification, None);
    }

    #[test]
    fn test_update_details_keeps_identity() {
        let dir = TempDir::new().unwrap();
        let store = TokenStore::new(dir.path().join("token.store"));
        let token = store
            .issue(details(), "issuer", now(), Some(Duration::days(1)))
            .unwrap();

        let updated = store
            .update_details(token.token_id.as_str(), |details| {
                if let Some(dashboard) = details.as_dashboard_mut() {
                    dashboard.disabled = true;
                }
            })
            .unwrap();

        assert!(updated.details.is_disabled());
        assert_eq!(updated.valid_until, token.valid_until);
        assert_eq!(updated.issued_at, token.issued_at);
        assert!(!updated.revoked);
    }

    #[test]
    fn test_unknown_id_mutations_fail() {
        let dir = TempDir::new().unwrap();
        let store = TokenStore::new(dir.path().join("token.store"));

        assert!(matches!(store.revoke("nope"), Err(TokenError::NotFound(_))));
        assert!(matches!(store.delete("nope"), Err(TokenError::NotFound(_))));
        assert!(matches!(
            store.update_details("nope", |_| {}),
            Err(TokenError::NotFound(_))
        ));
    }

    #[test]
    fn test_empty_file_is_empty_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("token.store");
        std::fs::write(&path, b"").unwrap();

        let store = TokenStore::new(&path);
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("token.store");
        std::fs::write(&path, b"{not json").unwrap();

        let store = TokenStore::new(&path);
        let err = store.verify("0:foo", now()).unwrap_err();
        assert!(matches!(err, TokenError::Serialization(_)));
        assert!(!err.is_authentication_failure());
    }
}
