//! Rendering of rule conditions into sentences.

use crate::conditions::{
    ItemType, NameCondition, NameEntry, RuleConditions, Rulespec, TagCondition, ValueCondition,
};
use crate::tags::{KnownTag, TagVocabulary};
use std::collections::BTreeMap;

const NO_HOSTS: &str = "This rule does never apply due to an empty list of explicit hosts!";
const NO_SERVICES: &str = "This rule does never apply due to an empty list of explicit services!";

/// Turns [`RuleConditions`] into human-readable lines.
#[derive(Debug, Clone, Default)]
pub struct RuleConditionRenderer {
    tags: TagVocabulary,
}

impl RuleConditionRenderer {
    pub fn new(tags: TagVocabulary) -> Self {
        Self { tags }
    }

    /// Render all conditions of a rule.
    ///
    /// Lines come in a fixed order: host tags, host labels, host names,
    /// service names, service labels. Absent conditions produce no line.
    pub fn render(&self, rulespec: &Rulespec, conditions: &RuleConditions) -> Vec<String> {
        let mut rendered: Vec<String> = conditions
            .host_tags
            .values()
            .filter_map(|condition| self.tag_condition(condition))
            .collect();

        rendered.extend(label_conditions(&conditions.host_labels, "Host"));
        rendered.extend(conditions.host_name.as_ref().and_then(host_condition));
        rendered.extend(service_condition(rulespec, conditions.service_description.as_ref()));
        rendered.extend(label_conditions(&conditions.service_labels, "Service"));
        rendered
    }

    fn tag_condition(&self, condition: &TagCondition) -> Option<String> {
        match condition {
            TagCondition::Single(single) => Some(self.single_tag_condition(single)),
            TagCondition::Or { any } if !any.is_empty() => Some(
                any.iter()
                    .map(|single| self.single_tag_condition(single))
                    .collect::<Vec<_>>()
                    .join(" or "),
            ),
            TagCondition::Nor { none } if !none.is_empty() => Some(format!(
                "Neither {}",
                none.iter()
                    .map(|single| self.single_tag_condition(single))
                    .collect::<Vec<_>>()
                    .join(" nor ")
            )),
            _ => None,
        }
    }

    fn single_tag_condition(&self, condition: &ValueCondition) -> String {
        let negate = condition.is_negated();
        let tag_id = condition.value();

        match self.tags.get(tag_id) {
            Some(KnownTag::Grouped {
                group_title,
                title: Some(title),
            }) => {
                if negate {
                    format!("Host: {} is not {}", group_title, title)
                } else {
                    format!("Host: {} is {}", group_title, title)
                }
            }
            Some(KnownTag::Aux { title: Some(title) }) => {
                if negate {
                    format!("Host does not have tag {}", title)
                } else {
                    format!("Host has tag {}", title)
                }
            }
            // Unknown or untitled tags fall back to the raw id.
            _ => {
                if negate {
                    format!("Host has not the tag {}", tag_id)
                } else {
                    format!("Host has the tag {}", tag_id)
                }
            }
        }
    }
}

fn label_conditions(labels: &BTreeMap<String, ValueCondition>, object_title: &str) -> Option<String> {
    if labels.is_empty() {
        return None;
    }

    let rendered: Vec<String> = labels
        .iter()
        .map(|(key, condition)| {
            if condition.is_negated() {
                format!("not {}:{}", key, condition.value())
            } else {
                format!("{}:{}", key, condition.value())
            }
        })
        .collect();

    Some(format!("{} matching labels: {}", object_title, rendered.join(" and ")))
}

fn host_condition(condition: &NameCondition) -> Option<String> {
    let (negate, entries) = condition.parts();
    if entries.is_empty() {
        // `{"$nor": []}` excludes nothing.
        return (!negate).then(|| NO_HOSTS.to_string());
    }

    let regex_count = entries.iter().filter(|entry| entry.is_regex()).count();

    let text = if regex_count == 0 || regex_count == entries.len() {
        let verb = match (regex_count > 0, negate) {
            (true, true) => "is not one of regex",
            (true, false) => "matches one of regex",
            (false, true) => "is not one of",
            (false, false) => "is",
        };
        let names: Vec<String> = entries.iter().map(|entry| entry.text().to_string()).collect();
        format!("{} {}", verb, join_alternatives(&names))
    } else {
        let items: Vec<String> = entries
            .iter()
            .map(|entry| {
                let verb = match (entry.is_regex(), negate) {
                    (true, true) => "does not match regex",
                    (true, false) => "matches regex",
                    (false, true) => "is not",
                    (false, false) => "is",
                };
                format!("{} {}", verb, entry.text())
            })
            .collect();
        join_alternatives(&items)
    };

    Some(format!("Host name {}", text))
}

fn service_condition(rulespec: &Rulespec, condition: Option<&NameCondition>) -> Option<String> {
    let item_type = rulespec.item_type?;
    let condition = condition?;

    let subject = match item_type {
        ItemType::Service => "Service name",
        ItemType::Item => rulespec.item_name.as_deref().unwrap_or("Item"),
    };

    let (negate, entries) = condition.parts();
    if entries.is_empty() {
        return (!negate).then(|| NO_SERVICES.to_string());
    }

    let exact_count = entries.iter().filter(|entry| is_exact_match(entry)).count();

    let text = if exact_count == 0 || exact_count == entries.len() {
        let verb = match (exact_count > 0, negate) {
            (true, true) => "is not",
            (true, false) => "is",
            (false, true) => "does not begin with",
            (false, false) => "begins with",
        };
        let names: Vec<String> = entries
            .iter()
            .map(|entry| display_pattern(entry).to_string())
            .collect();
        format!("{} {}", verb, join_alternatives(&names))
    } else {
        let items: Vec<String> = entries
            .iter()
            .map(|entry| {
                let verb = match (is_exact_match(entry), negate) {
                    (true, true) => "is not",
                    (true, false) => "is",
                    (false, true) => "begins not with",
                    (false, false) => "begins with",
                };
                format!("{} {}", verb, display_pattern(entry))
            })
            .collect();
        join_alternatives(&items)
    };

    Some(format!("{} {}", subject, text))
}

/// Service patterns are prefix matches unless anchored with `$`. Plain names
/// are exact in every list, mixed or not.
fn is_exact_match(entry: &NameEntry) -> bool {
    match entry {
        NameEntry::Exact(_) => true,
        NameEntry::Regex { pattern } => pattern.ends_with('$'),
    }
}

fn display_pattern(entry: &NameEntry) -> &str {
    entry.text().trim_end_matches('$')
}

/// `a`, `a or b`, `a, b or c`.
fn join_alternatives(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [single] => single.clone(),
        [head @ .., last] => format!("{} or {}", head.join(", "), last),
    }
}
