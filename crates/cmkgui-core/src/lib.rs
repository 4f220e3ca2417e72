//! # cmkgui-core
//!
//! Configuration types shared across the cmkgui crates.
//!
//! Everything is loaded from a single YAML file (`cmkgui.yaml` by default)
//! and every field has a default, so an empty file is a valid configuration.

// Configuration types shared across all cmkgui crates
pub mod config;

// Re-export commonly used config types for convenience
pub use config::{
    AuxTagConfig, ConfigError, GuiConfig, SecurityLogConfig, ServerConfig, TagConfig,
    TagGroupConfig, TagValueConfig, TokenStoreConfig,
};
