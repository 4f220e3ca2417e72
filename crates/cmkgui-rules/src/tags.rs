//! Lookup of host tag titles.

use cmkgui_core::TagConfig;
use std::collections::HashMap;

/// A tag id resolved against the configured vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnownTag {
    /// A choice inside a tag group.
    Grouped {
        group_title: String,
        title: Option<String>,
    },
    Aux {
        title: Option<String>,
    },
}

impl KnownTag {
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Grouped { title, .. } | Self::Aux { title } => title.as_deref(),
        }
    }
}

/// All tag ids known to the site.
#[derive(Debug, Clone, Default)]
pub struct TagVocabulary {
    tags: HashMap<String, KnownTag>,
}

impl TagVocabulary {
    /// Resolve a tag id. Group tags shadow aux tags with the same id.
    pub fn get(&self, tag_id: &str) -> Option<&KnownTag> {
        self.tags.get(tag_id)
    }
}

impl From<&TagConfig> for TagVocabulary {
    fn from(config: &TagConfig) -> Self {
        let mut tags = HashMap::new();

        for aux in &config.aux_tags {
            tags.insert(
                aux.id.clone(),
                KnownTag::Aux {
                    title: aux.title.clone(),
                },
            );
        }

        for group in &config.groups {
            for tag in &group.tags {
                tags.insert(
                    tag.id.clone(),
                    KnownTag::Grouped {
                        group_title: group.title.clone(),
                        title: tag.title.clone(),
                    },
                );
            }
        }

        Self { tags }
    }
}
