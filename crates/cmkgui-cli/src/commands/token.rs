//! Token management commands.
//!
//! `cmkgui token issue` - Issue a dashboard share token.
//! `cmkgui token verify` - Verify a client token string.
//! `cmkgui token list` / `show` - Inspect issued tokens.
//! `cmkgui token revoke` / `delete` / `disable` / `enable` - Lifecycle changes.

use anyhow::Context;
use chrono::Utc;
use cmkgui_audit::SecurityLogger;
use cmkgui_core::GuiConfig;
use cmkgui_token::{AuthToken, DashboardToken, TokenDetails, TokenStore, shared_dashboard_url};

/// Parse a duration string like "24h", "7d", "2w", "90m" into chrono::Duration.
fn parse_duration(s: &str) -> anyhow::Result<chrono::Duration> {
    let s = s.trim().to_lowercase();

    let duration = if let Some(weeks) = s.strip_suffix('w') {
        chrono::Duration::try_weeks(weeks.parse()?)
    } else if let Some(days) = s.strip_suffix('d') {
        chrono::Duration::try_days(days.parse()?)
    } else if let Some(hours) = s.strip_suffix('h') {
        chrono::Duration::try_hours(hours.parse()?)
    } else if let Some(minutes) = s.strip_suffix('m') {
        chrono::Duration::try_minutes(minutes.parse()?)
    } else if let Some(seconds) = s.strip_suffix('s') {
        chrono::Duration::try_seconds(seconds.parse()?)
    } else {
        // Try parsing as hours if no suffix
        chrono::Duration::try_hours(s.parse()?)
    }
    .with_context(|| format!("Duration out of range: {}", s))?;

    anyhow::ensure!(duration > chrono::Duration::zero(), "Duration must be positive: {}", s);
    Ok(duration)
}

fn security_logger(config: &GuiConfig) -> anyhow::Result<SecurityLogger> {
    SecurityLogger::from_config(config).context("Failed to open security log")
}

fn state_label(token: &AuthToken) -> &'static str {
    if token.revoked {
        "revoked"
    } else if token.is_expired(Utc::now()) {
        "expired"
    } else if token.details.is_disabled() {
        "disabled"
    } else {
        "active"
    }
}

/// Issue a new dashboard share token.
pub async fn issue(
    config: &GuiConfig,
    user: &str,
    dashboard: String,
    owner: Option<String>,
    comment: Option<String>,
    expires: Option<String>,
) -> anyhow::Result<()> {
    let valid_for = expires.as_deref().map(parse_duration).transpose()?;
    let now = Utc::now();

    let mut details = DashboardToken::new(owner.unwrap_or_else(|| user.to_string()), dashboard, now);
    if let Some(comment) = comment {
        details = details.with_comment(comment);
    }

    let store = TokenStore::from_config(config);
    let token = store
        .issue(TokenDetails::Dashboard(details), user, now, valid_for)
        .context("Failed to issue token")?;

    security_logger(config)?
        .log_token_issued(user, token.token_type())
        .await?;

    let client_token = token.client_token();
    println!("✔ Token issued");
    println!("  Token: {}", client_token);
    println!(
        "  URL: {}",
        shared_dashboard_url(&config.server.public_base_url(), &client_token)
    );
    match token.valid_until {
        Some(until) => println!("  Valid until: {}", until.to_rfc3339()),
        None => println!("  Valid until: never"),
    }

    Ok(())
}

/// Verify a client token string against the store.
pub fn verify(config: &GuiConfig, token: &str) -> anyhow::Result<()> {
    let store = TokenStore::from_config(config);

    match store.verify(token, Utc::now()) {
        Ok(token) => {
            println!("✔ Token is valid");
            println!("  Issuer: {}", token.issuer);
            println!("  Type: {}", token.token_type());
            if let Some(dashboard) = token.details.as_dashboard() {
                println!("  Dashboard: {} (owner {})", dashboard.dashboard_name, dashboard.owner);
                if dashboard.disabled {
                    println!("  Note: sharing is disabled");
                }
            }
            Ok(())
        }
        Err(e) if e.is_authentication_failure() => anyhow::bail!("✗ Token rejected: {}", e),
        Err(e) => Err(e).context("Failed to read token store"),
    }
}

/// List issued tokens, optionally filtered by issuer.
pub fn list(config: &GuiConfig, issuer: Option<&str>) -> anyhow::Result<()> {
    let store = TokenStore::from_config(config);
    let tokens = match issuer {
        Some(issuer) => store.tokens_issued_by(issuer)?,
        None => store.list()?,
    };

    if tokens.is_empty() {
        println!("No tokens issued.");
        return Ok(());
    }

    println!(
        "{:<38} {:<12} {:<10} {:<24} {:<26} STATE",
        "TOKEN ID", "ISSUER", "TYPE", "DASHBOARD", "VALID UNTIL"
    );
    for token in &tokens {
        let dashboard = token
            .details
            .as_dashboard()
            .map(|d| d.dashboard_name.as_str())
            .unwrap_or("-");
        let valid_until = token
            .valid_until
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "never".to_string());
        println!(
            "{:<38} {:<12} {:<10} {:<24} {:<26} {}",
            token.token_id.as_str(),
            token.issuer,
            token.token_type(),
            dashboard,
            valid_until,
            state_label(token)
        );
    }

    Ok(())
}

/// Print one token as JSON.
pub fn show(config: &GuiConfig, token_id: &str) -> anyhow::Result<()> {
    let store = TokenStore::from_config(config);
    let token = store
        .get(token_id)?
        .with_context(|| format!("Token not found: {}", token_id))?;

    println!("{}", serde_json::to_string_pretty(&token)?);
    Ok(())
}

/// Revoke a token.
pub async fn revoke(config: &GuiConfig, user: &str, token_id: &str) -> anyhow::Result<()> {
    let store = TokenStore::from_config(config);
    let token = store
        .get(token_id)?
        .with_context(|| format!("Token not found: {}", token_id))?;
    store
        .revoke(token_id)
        .with_context(|| format!("Failed to revoke token {}", token_id))?;

    security_logger(config)?
        .log_token_revoked(user, token.token_type())
        .await?;

    println!("✔ Token revoked: {}", token_id);
    Ok(())
}

/// Delete a token.
pub async fn delete(config: &GuiConfig, user: &str, token_id: &str) -> anyhow::Result<()> {
    let store = TokenStore::from_config(config);
    let token = store
        .get(token_id)?
        .with_context(|| format!("Token not found: {}", token_id))?;
    store
        .delete(token_id)
        .with_context(|| format!("Failed to delete token {}", token_id))?;

    security_logger(config)?
        .log_token_deleted(user, token.token_type())
        .await?;

    println!("✔ Token deleted: {}", token_id);
    Ok(())
}

/// Switch a dashboard share off or back on.
pub async fn set_disabled(
    config: &GuiConfig,
    user: &str,
    token_id: &str,
    disabled: bool,
) -> anyhow::Result<()> {
    let store = TokenStore::from_config(config);
    let token = store
        .update_details(token_id, |details| {
            if let Some(dashboard) = details.as_dashboard_mut() {
                dashboard.disabled = disabled;
            }
        })
        .with_context(|| format!("Failed to update token {}", token_id))?;

    security_logger(config)?
        .log_token_disabled(user, token.token_type(), disabled)
        .await?;

    if disabled {
        println!("✔ Sharing disabled: {}", token_id);
    } else {
        println!("✔ Sharing enabled: {}", token_id);
    }
    Ok(())
}
