//! Request handlers.

use crate::error::ServerError;
use crate::remote::RemoteAddr;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Query, State};
use chrono::{DateTime, Utc};
use cmkgui_token::{AuthToken, TokenError};
use serde::{Deserialize, Serialize};

/// Query string of a shared dashboard link.
#[derive(Debug, Deserialize)]
pub struct ShareQuery {
    #[serde(rename = "cmk-token")]
    pub token: Option<String>,
}

/// What an anonymous visitor learns about the shared dashboard.
#[derive(Debug, Serialize, Deserialize)]
pub struct SharedDashboard {
    pub token_id: String,
    pub issuer: String,
    pub owner: String,
    pub dashboard_name: String,
    pub comment: String,
    pub valid_until: Option<DateTime<Utc>>,
}

impl SharedDashboard {
    fn from_token(token: &AuthToken) -> Option<Self> {
        let dashboard = token.details.as_dashboard()?;
        Some(Self {
            token_id: token.token_id.to_string(),
            issuer: token.issuer.clone(),
            owner: dashboard.owner.clone(),
            dashboard_name: dashboard.dashboard_name.clone(),
            comment: dashboard.comment.clone(),
            valid_until: token.valid_until,
        })
    }
}

/// `GET /shared_dashboard.py?cmk-token=...`
pub async fn shared_dashboard(
    State(state): State<AppState>,
    remote: RemoteAddr,
    Query(query): Query<ShareQuery>,
) -> Result<Json<SharedDashboard>, ServerError> {
    let Some(token) = query.token.filter(|token| !token.is_empty()) else {
        state
            .log_authentication_failed("Missing token", remote.as_str())
            .await;
        return Err(ServerError::AuthenticationFailed);
    };

    let now = Utc::now();
    let store = state.token_store().clone();
    let verified = tokio::task::spawn_blocking(move || store.verify(&token, now))
        .await
        .map_err(|e| ServerError::Internal(format!("verification task failed: {}", e)))?;

    match verified {
        Ok(token) => {
            if token.details.is_disabled() {
                state
                    .log_authentication_failed("Token sharing disabled", remote.as_str())
                    .await;
                return Err(ServerError::Gone("sharing disabled".to_string()));
            }

            SharedDashboard::from_token(&token)
                .map(Json)
                .ok_or(ServerError::AuthenticationFailed)
        }
        Err(e @ TokenError::InvalidToken(_)) => {
            state
                .log_authentication_failed(&e.to_string(), remote.as_str())
                .await;
            Err(ServerError::AuthenticationFailed)
        }
        Err(e @ TokenError::TokenExpired { .. }) => {
            state
                .log_authentication_failed(&e.to_string(), remote.as_str())
                .await;
            Err(ServerError::Gone("link expired".to_string()))
        }
        Err(e @ TokenError::TokenRevoked { .. }) => {
            state
                .log_authentication_failed(&e.to_string(), remote.as_str())
                .await;
            Err(ServerError::Gone("link revoked".to_string()))
        }
        Err(e) => Err(ServerError::TokenStore(e)),
    }
}

/// `GET /health`
pub async fn health() -> &'static str {
    "ok"
}
