//! # cmkgui-server
//!
//! HTTP boundary for token-authenticated pages.
//!
//! Anonymous visitors open a shared dashboard with a link of the form
//! `/shared_dashboard.py?cmk-token=0:<token_id>`. The boundary:
//! - verifies the token against the [`cmkgui_token::TokenStore`]
//! - records every failed attempt in the security log
//! - answers unknown or malformed tokens with `401 Unauthorized`
//! - answers expired, revoked or disabled shares with a `410 Gone` page
//!
//! ## Tech Stack
//!
//! - Axum for HTTP server
//! - `tower-http` request tracing
//! - Blocking token store calls moved off the runtime with `spawn_blocking`

pub mod error;
pub mod handlers;
pub mod pages;
pub mod remote;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ServerError;
pub use remote::RemoteAddr;
pub use routes::create_router;
pub use server::ShareServer;
pub use state::AppState;
