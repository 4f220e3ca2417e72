//! Error types for the token crate.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during token operations.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Malformed token string or unknown token id.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token exists but `valid_until` has passed.
    #[error("{token_type} token has expired")]
    TokenExpired { token_type: String },

    /// Token exists but was revoked.
    #[error("{token_type} token has been revoked")]
    TokenRevoked { token_type: String },

    /// Mutation addressed a token id that is not in the store.
    #[error("token not found: {0}")]
    NotFound(String),

    /// `valid_for` pushed the expiry out of the representable range.
    #[error("invalid validity period: {0}")]
    InvalidValidity(String),

    /// Another process held the file lock for longer than the configured timeout.
    #[error("timed out after {waited:?} waiting for lock on {}", .path.display())]
    LockTimeout { path: PathBuf, waited: Duration },

    /// The token file is not valid JSON or has an unexpected shape.
    #[error("malformed token file: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error (reading/writing/locking the token file).
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl TokenError {
    pub(crate) fn could_not_parse() -> Self {
        Self::InvalidToken("Could not parse token".to_string())
    }

    pub(crate) fn invalid_version() -> Self {
        Self::InvalidToken("Invalid token version".to_string())
    }

    pub(crate) fn could_not_find() -> Self {
        Self::InvalidToken("Could not find token".to_string())
    }

    /// Whether this error is one of the authentication outcomes
    /// (invalid, expired, revoked) as opposed to a storage failure.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            Self::InvalidToken(_) | Self::TokenExpired { .. } | Self::TokenRevoked { .. }
        )
    }

    /// Scope tag of the token for expired/revoked failures.
    pub fn token_type(&self) -> Option<&str> {
        match self {
            Self::TokenExpired { token_type } | Self::TokenRevoked { token_type } => {
                Some(token_type)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_failure_classification() {
        assert!(TokenError::could_not_parse().is_authentication_failure());
        assert!(
            TokenError::TokenExpired {
                token_type: "dashboard".into()
            }
            .is_authentication_failure()
        );
        assert!(!TokenError::NotFound("x".into()).is_authentication_failure());
        assert!(
            !TokenError::IoError(std::io::Error::other("disk full")).is_authentication_failure()
        );
    }

    #[test]
    fn test_token_type() {
        let err = TokenError::TokenRevoked {
            token_type: "dashboard".into(),
        };
        assert_eq!(err.token_type(), Some("dashboard"));
        assert_eq!(TokenError::invalid_version().token_type(), None);
    }
}
