//! Shared application state.

use cmkgui_audit::SecurityLogger;
use cmkgui_token::TokenStore;
use std::sync::Arc;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    token_store: TokenStore,
    security_log: SecurityLogger,
}

impl AppState {
    pub fn new(token_store: TokenStore, security_log: SecurityLogger) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                token_store,
                security_log,
            }),
        }
    }

    pub fn token_store(&self) -> &TokenStore {
        &self.inner.token_store
    }

    pub fn security_log(&self) -> &SecurityLogger {
        &self.inner.security_log
    }

    /// Record a failed authentication. Logging failures never fail the request.
    pub async fn log_authentication_failed(&self, reason: &str, remote_address: &str) {
        if let Err(e) = self
            .inner
            .security_log
            .log_authentication_failed(reason, "token", Some(remote_address))
            .await
        {
            tracing::error!(error = %e, "Failed to write security event");
        }
    }
}
