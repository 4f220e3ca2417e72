//! Token records and the client-facing token string.

use crate::details::TokenDetails;
use crate::error::TokenError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Version prefix of client token strings.
pub const TOKEN_VERSION: &str = "0";

/// Opaque token identifier (a stringified UUID v4).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(String);

impl TokenId {
    /// Generate a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TokenId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TokenId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for TokenId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One issued credential as persisted in the token file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthToken {
    /// User who issued the token.
    pub issuer: String,

    /// When the token was issued.
    pub issued_at: DateTime<Utc>,

    /// Expiry; `None` means the token never expires.
    pub valid_until: Option<DateTime<Utc>>,

    /// What the token grants access to.
    pub details: TokenDetails,

    /// Lookup key, also embedded in the client token string.
    pub token_id: TokenId,

    /// One-way revocation flag.
    #[serde(default)]
    pub revoked: bool,

    /// Last time a verification succeeded (updated at most once per touch interval).
    #[serde(default)]
    pub last_successful_verification: Option<DateTime<Utc>>,
}

impl AuthToken {
    /// Whether `now` is strictly past `valid_until`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.valid_until.is_some_and(|valid_until| now > valid_until)
    }

    /// Scope tag of the payload.
    pub fn token_type(&self) -> &'static str {
        self.details.type_name()
    }

    /// The string handed to the recipient.
    pub fn client_token(&self) -> TokenString {
        TokenString::new(self.token_id.clone())
    }
}

/// Client-facing token string: `"<version>:<token_id>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenString {
    token_id: TokenId,
}

impl TokenString {
    pub fn new(token_id: TokenId) -> Self {
        Self { token_id }
    }

    pub fn token_id(&self) -> &TokenId {
        &self.token_id
    }
}

impl FromStr for TokenString {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let (Some(version), Some(token_id), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::could_not_parse());
        };

        if version != TOKEN_VERSION {
            return Err(TokenError::invalid_version());
        }

        Ok(Self::new(TokenId::from(token_id)))
    }
}

impl fmt::Display for TokenString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", TOKEN_VERSION, self.token_id)
    }
}

/// URL of the shared dashboard page for `token`.
pub fn shared_dashboard_url(base_url: &str, token: &TokenString) -> String {
    format!(
        "{}/shared_dashboard.py?cmk-token={}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(&token.to_string())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::details::DashboardToken;
    use chrono::{Duration, TimeZone};

    fn sample_token(valid_until: Option<DateTime<Utc>>) -> AuthToken {
        let now = Utc.with_ymd_and_hms(2020, 1, 20, 20, 20, 20).unwrap();
        AuthToken {
            issuer: "issuer".to_string(),
            issued_at: now,
            valid_until,
            details: TokenDetails::Dashboard(DashboardToken::new("owner", "unit-dashboard", now)),
            token_id: TokenId::from("2a4f0e3c-5b7a-4a8e-9d0c-1f2e3d4c5b6a"),
            revoked: false,
            last_successful_verification: None,
        }
    }

    #[test]
    fn test_token_string_roundtrip() {
        let token = sample_token(None);
        let s = token.client_token().to_string();
        assert_eq!(s, "0:2a4f0e3c-5b7a-4a8e-9d0c-1f2e3d4c5b6a");

        let parsed: TokenString = s.parse().unwrap();
        assert_eq!(parsed.token_id(), &token.token_id);
    }

    #[test]
    fn test_token_string_parse_errors() {
        for input in ["invalid", "", "0:a:b", "0:a:"] {
            let err = input.parse::<TokenString>().unwrap_err();
            assert!(err.to_string().contains("Could not parse token"), "{input}");
        }

        let err = "invalid:also invalid".parse::<TokenString>().unwrap_err();
        assert!(err.to_string().contains("Invalid token version"));

        let err = "7:2a4f0e3c".parse::<TokenString>().unwrap_err();
        assert!(err.to_string().contains("Invalid token version"));
    }

    #[test]
    fn test_expiry_boundary() {
        let token = sample_token(None);
        assert!(!token.is_expired(token.issued_at + Duration::days(365 * 100)));

        let valid_until = token.issued_at + Duration::days(1);
        let token = sample_token(Some(valid_until));
        assert!(!token.is_expired(valid_until));
        assert!(token.is_expired(valid_until + Duration::seconds(1)));
    }

    #[test]
    fn test_serialized_record() {
        let token = sample_token(None);
        let value = serde_json::to_value(&token).unwrap();

        assert_eq!(value["issuer"], "issuer");
        assert_eq!(value["issued_at"], "2020-01-20T20:20:20Z");
        assert!(value["valid_until"].is_null());
        assert_eq!(value["details"]["type_"], "dashboard");
        assert_eq!(value["token_id"], "2a4f0e3c-5b7a-4a8e-9d0c-1f2e3d4c5b6a");
        assert_eq!(value["revoked"], false);
        assert!(value["last_successful_verification"].is_null());
    }

    #[test]
    fn test_shared_dashboard_url() {
        let token = TokenString::new(TokenId::from("abc"));
        assert_eq!(
            shared_dashboard_url("https://mon.example.com/prod/check_mk/", &token),
            "https://mon.example.com/prod/check_mk/shared_dashboard.py?cmk-token=0%3Aabc"
        );
    }
}
