//! # Configuration
//!
//! Journal configuration is managed by [`confique`], which handles layered
//! loading from TOML files with compiled defaults.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `fs_root_folder` | `laborjournal_data` | Root folder of the blob store |
//! | `retry_attempts` | `3` | Read attempts before an attachment counts as missing |
//! | `retry_delay_ms` | `1000` | Delay between read attempts |
//! | `credentials_file` | `credentials.json` | Credentials blob at the store root |

use crate::error::{JournalError, Result};
use crate::retry::RetryPolicy;
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct JournalConfig {
    /// Root folder of the blob store (a local data directory or the mount
    /// point of the remote share).
    #[config(default = "laborjournal_data")]
    pub fs_root_folder: String,

    /// Read attempts before an attachment counts as missing.
    #[config(default = 3)]
    pub retry_attempts: u32,

    /// Delay between attachment read attempts, in milliseconds.
    #[config(default = 1000)]
    pub retry_delay_ms: u64,

    /// Filename of the credentials blob at the store root.
    #[config(default = "credentials.json")]
    pub credentials_file: String,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            fs_root_folder: "laborjournal_data".to_string(),
            retry_attempts: 3,
            retry_delay_ms: 1000,
            credentials_file: "credentials.json".to_string(),
        }
    }
}

impl JournalConfig {
    /// Loads the config file if present, falling back to defaults otherwise.
    pub fn load(path: &Path) -> Result<Self> {
        let mut builder = JournalConfig::builder();
        if path.exists() {
            builder = builder.file(path);
        }
        builder
            .load()
            .map_err(|err| JournalError::Store(err.to_string()))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry_attempts,
            Duration::from_millis(self.retry_delay_ms),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = JournalConfig::default();
        assert_eq!(config.fs_root_folder, "laborjournal_data");
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.retry_delay_ms, 1000);
        assert_eq!(config.credentials_file, "credentials.json");
    }

    #[test]
    fn test_retry_policy_mapping() {
        let config = JournalConfig {
            retry_attempts: 5,
            retry_delay_ms: 250,
            ..Default::default()
        };
        let policy = config.retry_policy();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.delay, Duration::from_millis(250));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = JournalConfig::load(Path::new("/does/not/exist.toml")).unwrap();
        assert_eq!(config, JournalConfig::default());
    }
}
