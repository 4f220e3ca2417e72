//! Rule condition commands.
//!
//! `cmkgui rules describe <file>` - Print the human-readable conditions of a rule.

use anyhow::Context;
use cmkgui_core::GuiConfig;
use cmkgui_rules::{RuleConditionRenderer, RuleConditions, Rulespec, TagVocabulary};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// A rule file: the ruleset's item definition plus the rule's conditions.
#[derive(Debug, Deserialize)]
struct RuleFile {
    #[serde(default)]
    rulespec: Rulespec,

    #[serde(default)]
    conditions: RuleConditions,
}

fn render_file(config: &GuiConfig, path: &Path) -> anyhow::Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read rule file: {}", path.display()))?;
    let rule: RuleFile = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse rule file: {}", path.display()))?;

    let renderer = RuleConditionRenderer::new(TagVocabulary::from(&config.tags));
    Ok(renderer.render(&rule.rulespec, &rule.conditions))
}

/// Print the conditions of the rule in `path`.
pub fn describe(config: &GuiConfig, path: &Path) -> anyhow::Result<()> {
    let lines = render_file(config, path)?;

    if lines.is_empty() {
        println!("This rule applies to all hosts and services.");
        return Ok(());
    }

    for line in lines {
        println!("- {}", line);
    }
    Ok(())
}
