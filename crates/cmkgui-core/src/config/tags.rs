//! Host tag vocabulary.

use serde::{Deserialize, Serialize};

/// Host tag groups and auxiliary tags known to the site.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TagConfig {
    /// Tag groups (exactly one tag of a group applies to a host).
    #[serde(default)]
    pub groups: Vec<TagGroupConfig>,

    /// Auxiliary tags (implied by other tags, no group).
    #[serde(default)]
    pub aux_tags: Vec<AuxTagConfig>,
}

/// A tag group, e.g. "Criticality".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagGroupConfig {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<TagValueConfig>,
}

/// One choice inside a tag group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagValueConfig {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// An auxiliary tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuxTagConfig {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
}
