//! Security event log configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for security event logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityLogConfig {
    /// Whether security events are recorded at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Also print events to stdout.
    #[serde(default)]
    pub stdout: bool,

    /// Directory holding the log file.
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// Log file name (JSON Lines).
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl Default for SecurityLogConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            stdout: false,
            directory: default_directory(),
            file_name: default_file_name(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_directory() -> PathBuf {
    PathBuf::from("var/log")
}

fn default_file_name() -> String {
    "security.log".to_string()
}
