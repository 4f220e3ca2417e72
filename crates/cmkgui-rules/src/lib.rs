//! # cmkgui-rules
//!
//! Renders the match conditions of a rule into short human-readable
//! sentences for the ruleset editor.
//!
//! Conditions are deserialized from the same document shape the rule files
//! use (`$ne`, `$or`, `$nor`, `$regex` operators). Rendering is pure: it only
//! consults the host tag vocabulary to turn tag ids into titles.
//!
//! ```rust
//! use cmkgui_rules::{RuleConditionRenderer, RuleConditions, Rulespec, TagVocabulary};
//!
//! let conditions: RuleConditions = serde_json::from_str(
//!     r#"{"host_name": ["web01", "web02"]}"#,
//! ).unwrap();
//!
//! let renderer = RuleConditionRenderer::new(TagVocabulary::default());
//! let lines = renderer.render(&Rulespec::host_rule(), &conditions);
//! assert_eq!(lines, vec!["Host name is web01 or web02"]);
//! ```

pub mod conditions;
pub mod renderer;
pub mod tags;

pub use conditions::{
    ItemType, NameCondition, NameEntry, RuleConditions, Rulespec, TagCondition, ValueCondition,
};
pub use renderer::RuleConditionRenderer;
pub use tags::{KnownTag, TagVocabulary};
