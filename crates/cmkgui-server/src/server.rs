//! Share server implementation.

use crate::error::ServerError;
use crate::routes;
use crate::state::AppState;
use cmkgui_audit::SecurityLogger;
use cmkgui_core::{GuiConfig, ServerConfig};
use cmkgui_token::TokenStore;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Serves shared dashboard links.
pub struct ShareServer {
    config: ServerConfig,
    state: AppState,
}

impl ShareServer {
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Build the server, token store and security log from configuration.
    pub fn from_config(config: &GuiConfig) -> Result<Self, ServerError> {
        let security_log = SecurityLogger::from_config(config)
            .map_err(|e| ServerError::StartupFailed(e.to_string()))?;
        let state = AppState::new(TokenStore::from_config(config), security_log);
        Ok(Self::new(config.server.clone(), state))
    }

    /// Listen until Ctrl-C.
    pub async fn run(&self) -> Result<(), ServerError> {
        let addr = self.config.bind_address();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ServerError::StartupFailed(format!("Failed to bind to {}: {}", addr, e)))?;

        tracing::info!(
            address = %addr,
            token_store = %self.state.token_store().path().display(),
            "Share server listening"
        );

        let app = routes::create_router(self.state.clone());

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?;

        tracing::info!("Share server stopped");
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        self.config.bind_address()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_config() {
        let dir = TempDir::new().unwrap();
        let mut config = GuiConfig::default();
        config.var_dir = dir.path().to_path_buf();
        config.security_log.directory = dir.path().join("log");

        let server = ShareServer::from_config(&config).unwrap();
        assert_eq!(server.bind_address(), "127.0.0.1:5000");
    }
}
