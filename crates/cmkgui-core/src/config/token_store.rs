//! Token store configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Largest accepted `touch_interval_secs`: the interval must fit a signed
/// millisecond count.
pub const MAX_TOUCH_INTERVAL_SECS: u64 = i64::MAX as u64 / 1000;

/// Configuration for the on-disk token store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenStoreConfig {
    /// File name of the token document inside `var_dir`.
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// How long a mutation waits for the file lock before giving up.
    #[serde(default = "default_lock_timeout_secs")]
    pub lock_timeout_secs: u64,

    /// Minimum time between two writes of `last_successful_verification`
    /// for the same token.
    #[serde(default = "default_touch_interval_secs")]
    pub touch_interval_secs: u64,
}

impl Default for TokenStoreConfig {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
            lock_timeout_secs: default_lock_timeout_secs(),
            touch_interval_secs: default_touch_interval_secs(),
        }
    }
}

impl TokenStoreConfig {
    /// Lock timeout as a `Duration`.
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_secs(self.lock_timeout_secs)
    }

    /// Touch interval as a `Duration`.
    pub fn touch_interval(&self) -> Duration {
        Duration::from_secs(self.touch_interval_secs)
    }
}

fn default_file_name() -> String {
    "token.store".to_string()
}

fn default_lock_timeout_secs() -> u64 {
    10
}

fn default_touch_interval_secs() -> u64 {
    300
}
