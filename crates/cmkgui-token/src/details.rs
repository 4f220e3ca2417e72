//! Grant payloads carried by tokens.
//!
//! The payload is a tagged union keyed by `type_`. Adding a new kind of
//! shareable resource means adding a variant here; the store never looks
//! inside the payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What a token grants access to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type_", rename_all = "snake_case")]
pub enum TokenDetails {
    /// Read-only access to one dashboard.
    Dashboard(DashboardToken),
}

impl TokenDetails {
    /// The scope tag as written in the `type_` field.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Dashboard(_) => "dashboard",
        }
    }

    /// Dashboard payload, if this is a dashboard token.
    pub fn as_dashboard(&self) -> Option<&DashboardToken> {
        match self {
            Self::Dashboard(d) => Some(d),
        }
    }

    /// Mutable dashboard payload, if this is a dashboard token.
    pub fn as_dashboard_mut(&mut self) -> Option<&mut DashboardToken> {
        match self {
            Self::Dashboard(d) => Some(d),
        }
    }

    /// Whether the owner switched the share off without revoking it.
    pub fn is_disabled(&self) -> bool {
        match self {
            Self::Dashboard(d) => d.disabled,
        }
    }
}

/// Payload of a shared dashboard token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardToken {
    /// Owner of the dashboard.
    pub owner: String,

    /// Dashboard name (unique per owner).
    pub dashboard_name: String,

    /// Free text shown in the share management UI.
    #[serde(default)]
    pub comment: String,

    /// Share switched off by its owner.
    #[serde(default)]
    pub disabled: bool,

    /// Owner of each linked view at the time of sharing, keyed by widget id.
    /// A widget whose view changed owner since then must not be rendered.
    #[serde(default)]
    pub view_owners: BTreeMap<String, String>,

    /// When `view_owners` was last synchronised with the dashboard.
    #[serde(default)]
    pub synced_at: Option<DateTime<Utc>>,
}

impl DashboardToken {
    /// Payload for sharing `dashboard_name` of `owner`.
    pub fn new(
        owner: impl Into<String>,
        dashboard_name: impl Into<String>,
        synced_at: DateTime<Utc>,
    ) -> Self {
        Self {
            owner: owner.into(),
            dashboard_name: dashboard_name.into(),
            comment: String::new(),
            disabled: false,
            view_owners: BTreeMap::new(),
            synced_at: Some(synced_at),
        }
    }

    /// Set the comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Record the owner of the view behind `widget_id`.
    pub fn with_view_owner(mut self, widget_id: impl Into<String>, owner: impl Into<String>) -> Self {
        self.view_owners.insert(widget_id.into(), owner.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_serialized_shape() {
        let synced = Utc.with_ymd_and_hms(2020, 1, 20, 20, 20, 20).unwrap();
        let details = TokenDetails::Dashboard(
            DashboardToken::new("owner", "unit-dashboard", synced).with_view_owner("w1", "alice"),
        );

        let value = serde_json::to_value(&details).unwrap();
        assert_eq!(value["type_"], "dashboard");
        assert_eq!(value["owner"], "owner");
        assert_eq!(value["dashboard_name"], "unit-dashboard");
        assert_eq!(value["disabled"], false);
        assert_eq!(value["view_owners"]["w1"], "alice");
        assert_eq!(value["synced_at"], "2020-01-20T20:20:20Z");
    }

    #[test]
    fn test_minimal_payload_parses() {
        let details: TokenDetails = serde_json::from_str(
            r#"{"type_": "dashboard", "owner": "owner", "dashboard_name": "unit-dashboard"}"#,
        )
        .unwrap();

        let dashboard = details.as_dashboard().unwrap();
        assert_eq!(dashboard.owner, "owner");
        assert!(dashboard.comment.is_empty());
        assert!(!details.is_disabled());
        assert!(dashboard.synced_at.is_none());
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result: Result<TokenDetails, _> =
            serde_json::from_str(r#"{"type_": "report", "owner": "owner"}"#);
        assert!(result.is_err());
    }
}
