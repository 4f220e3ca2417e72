//! CLI command implementations for cmkgui.

pub mod rules;
pub mod serve;
pub mod token;
