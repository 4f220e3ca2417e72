//! Rule condition model.
//!
//! A condition that is absent matches everything. An explicit empty list of
//! host or service names matches nothing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Equality test against a single value: `"id"` or `{"$ne": "id"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueCondition {
    Is(String),
    IsNot {
        #[serde(rename = "$ne")]
        value: String,
    },
}

impl ValueCondition {
    pub fn value(&self) -> &str {
        match self {
            Self::Is(value) | Self::IsNot { value } => value,
        }
    }

    pub fn is_negated(&self) -> bool {
        matches!(self, Self::IsNot { .. })
    }
}

/// Condition on one host tag group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagCondition {
    /// At least one of the listed conditions holds.
    Or {
        #[serde(rename = "$or")]
        any: Vec<ValueCondition>,
    },
    /// None of the listed conditions holds.
    Nor {
        #[serde(rename = "$nor")]
        none: Vec<ValueCondition>,
    },
    Single(ValueCondition),
}

/// One host or service name pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NameEntry {
    Exact(String),
    Regex {
        #[serde(rename = "$regex")]
        pattern: String,
    },
}

impl NameEntry {
    pub fn text(&self) -> &str {
        match self {
            Self::Exact(text) | Self::Regex { pattern: text } => text,
        }
    }

    pub fn is_regex(&self) -> bool {
        matches!(self, Self::Regex { .. })
    }
}

/// A list of name patterns, optionally negated as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NameCondition {
    Negated {
        #[serde(rename = "$nor")]
        entries: Vec<NameEntry>,
    },
    Entries(Vec<NameEntry>),
}

impl NameCondition {
    /// Split into the negation flag and the entries.
    pub fn parts(&self) -> (bool, &[NameEntry]) {
        match self {
            Self::Negated { entries } => (true, entries),
            Self::Entries(entries) => (false, entries),
        }
    }
}

/// The match conditions of one rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConditions {
    /// Tag group id to condition.
    #[serde(default)]
    pub host_tags: BTreeMap<String, TagCondition>,

    #[serde(default)]
    pub host_labels: BTreeMap<String, ValueCondition>,

    #[serde(default)]
    pub host_name: Option<NameCondition>,

    #[serde(default)]
    pub service_description: Option<NameCondition>,

    #[serde(default)]
    pub service_labels: BTreeMap<String, ValueCondition>,
}

/// What the rules of a ruleset match besides the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Service,
    Item,
}

/// The parts of a ruleset definition the renderer needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rulespec {
    #[serde(default)]
    pub item_type: Option<ItemType>,

    /// Display name of the item, e.g. "Mount point".
    #[serde(default)]
    pub item_name: Option<String>,
}

impl Rulespec {
    /// A ruleset that only matches hosts.
    pub fn host_rule() -> Self {
        Self::default()
    }

    pub fn service_rule() -> Self {
        Self {
            item_type: Some(ItemType::Service),
            item_name: None,
        }
    }

    pub fn item_rule(item_name: Option<String>) -> Self {
        Self {
            item_type: Some(ItemType::Item),
            item_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_operators() {
        let conditions: RuleConditions = serde_json::from_str(
            r#"{
                "host_tags": {
                    "criticality": "prod",
                    "networking": {"$ne": "wan"},
                    "agent": {"$or": ["cmk-agent", {"$ne": "snmp"}]},
                    "site": {"$nor": ["a", "b"]}
                },
                "host_labels": {"os": {"$ne": "windows"}},
                "host_name": {"$nor": ["web01", {"$regex": "db.*"}]}
            }"#,
        )
        .unwrap();

        assert_eq!(
            conditions.host_tags["criticality"],
            TagCondition::Single(ValueCondition::Is("prod".to_string()))
        );
        assert_eq!(
            conditions.host_tags["networking"],
            TagCondition::Single(ValueCondition::IsNot {
                value: "wan".to_string()
            })
        );
        assert!(matches!(conditions.host_tags["agent"], TagCondition::Or { ref any } if any.len() == 2));
        assert!(matches!(conditions.host_tags["site"], TagCondition::Nor { ref none } if none.len() == 2));
        assert!(conditions.host_labels["os"].is_negated());

        let (negated, entries) = conditions.host_name.as_ref().unwrap().parts();
        assert!(negated);
        assert!(!entries[0].is_regex());
        assert!(entries[1].is_regex());
        assert_eq!(entries[1].text(), "db.*");

        assert!(conditions.service_description.is_none());
    }

    #[test]
    fn test_absent_and_empty_lists_differ() {
        let absent: RuleConditions = serde_json::from_str("{}").unwrap();
        let empty: RuleConditions = serde_json::from_str(r#"{"host_name": []}"#).unwrap();

        assert_eq!(absent.host_name, None);
        assert_eq!(empty.host_name, Some(NameCondition::Entries(vec![])));
    }

    #[test]
    fn test_rulespec_item_type() {
        let rulespec: Rulespec =
            serde_json::from_str(r#"{"item_type": "item", "item_name": "Mount point"}"#).unwrap();
        assert_eq!(rulespec, Rulespec::item_rule(Some("Mount point".to_string())));
    }
}
