//! Configuration management for papers2code

use crate::error::{ModerationError, Result};
use crate::types::UserId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default margin of confirm votes over dispute votes
pub const DEFAULT_CONFIRM_THRESHOLD: u32 = 3;

/// Default number of optimistic commit attempts
pub const DEFAULT_MAX_COMMIT_RETRIES: u32 = 5;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Moderation settings
    pub moderation: ModerationConfig,
    /// Storage settings
    pub storage: StorageConfig,
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| ModerationError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Render configuration as TOML text
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ModerationError::Config(e.to_string()))
    }

    /// Check all sections
    pub fn validate(&self) -> Result<()> {
        self.moderation.validate()
    }
}

/// Moderation engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    /// Confirm votes must exceed dispute votes by this much to confirm
    pub confirm_threshold: u32,
    /// Delete implementability votes when a flagged paper reverts to voting
    pub wipe_votes_on_revert: bool,
    /// Attempts at committing a vote before giving up on a contended paper
    pub max_commit_retries: u32,
    /// Users allowed to set admin implementability statuses
    pub owners: Vec<String>,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            confirm_threshold: DEFAULT_CONFIRM_THRESHOLD,
            wipe_votes_on_revert: true,
            max_commit_retries: DEFAULT_MAX_COMMIT_RETRIES,
            owners: Vec::new(),
        }
    }
}

impl ModerationConfig {
    /// Check threshold, retry and owner settings
    pub fn validate(&self) -> Result<()> {
        if self.confirm_threshold == 0 {
            return Err(ModerationError::Config(
                "moderation.confirm_threshold must be at least 1".to_string(),
            ));
        }
        if self.max_commit_retries == 0 {
            return Err(ModerationError::Config(
                "moderation.max_commit_retries must be at least 1".to_string(),
            ));
        }
        for owner in &self.owners {
            UserId::parse(owner.as_str()).map_err(|_| {
                ModerationError::Config(format!("moderation.owners contains invalid id: {}", owner))
            })?;
        }
        Ok(())
    }

    /// Check whether a user is an owner
    pub fn is_owner(&self, user: &UserId) -> bool {
        self.owners.iter().any(|o| o == user.as_str())
    }
}

/// Storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding paper documents
    pub data_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.moderation.confirm_threshold, 3);
        assert!(config.moderation.wipe_votes_on_revert);
        assert_eq!(config.moderation.max_commit_retries, 5);
        assert!(config.storage.data_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[moderation]"));

        let config2 = Config::from_toml(&toml).unwrap();
        assert_eq!(
            config.moderation.confirm_threshold,
            config2.moderation.confirm_threshold
        );
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::from_toml("[moderation]\nconfirm_threshold = 5\n").unwrap();
        assert_eq!(config.moderation.confirm_threshold, 5);
        assert_eq!(config.moderation.max_commit_retries, 5);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(Config::from_toml("[moderation]\nconfirm_threshold = 0\n").is_err());
        assert!(Config::from_toml("[moderation]\nowners = [\"bob\"]\n").is_err());
        assert!(Config::from_toml("moderation = 3").is_err());
    }

    #[test]
    fn test_is_owner() {
        let config = ModerationConfig {
            owners: vec!["65a1f0c2e4b0a1b2c3d4e5f6".to_string()],
            ..Default::default()
        };
        let owner = UserId::parse("65a1f0c2e4b0a1b2c3d4e5f6").unwrap();
        let other = UserId::parse("65a1f0c2e4b0a1b2c3d4e5f7").unwrap();
        assert!(config.is_owner(&owner));
        assert!(!config.is_owner(&other));
    }
}
