//! Shared command context: config loading, store and engine setup

use anyhow::{Context, Result};
use colored::Colorize;
use p2c_core::config::Config;
use p2c_core::moderation::{ModerationEngine, VoteOutcome};
use p2c_core::paper::{ImplementabilityStatus, PaperView};
use p2c_core::types::{PaperId, UserId};
use p2c_storage::FileSystemStore;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Project directory created by `init`
pub const PROJECT_DIR: &str = ".papers2code";

/// Options shared by every command
#[derive(Debug, Clone, Default)]
pub struct GlobalOpts {
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
}

impl GlobalOpts {
    /// Config file to read
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| Path::new(PROJECT_DIR).join("config.toml"))
    }

    /// Load the config file, falling back to defaults when it is absent
    pub fn load_config(&self) -> Result<Config> {
        let path = self.config_path();
        if !path.exists() {
            if self.config.is_some() {
                anyhow::bail!("Configuration file {} not found", path.display());
            }
            debug!("No config at {:?}, using defaults", path);
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Config::from_toml(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Open the paper store named by flags, config, or the project layout
    pub fn open_store(&self, config: &Config) -> Result<FileSystemStore> {
        let dir = self
            .data_dir
            .clone()
            .or_else(|| config.storage.data_dir.clone())
            .or_else(|| {
                let project = Path::new(PROJECT_DIR);
                project.exists().then(|| project.join("data"))
            });

        let store = match dir {
            Some(dir) => FileSystemStore::new(&dir)
                .with_context(|| format!("Failed to open data directory {}", dir.display()))?,
            None => FileSystemStore::default_location()
                .context("Failed to open default data directory")?,
        };
        debug!("Using data directory {:?}", store.base_dir());
        Ok(store)
    }

    /// Config plus an engine over the file store
    pub fn engine(&self) -> Result<ModerationEngine> {
        let config = self.load_config()?;
        let store = self.open_store(&config)?;
        Ok(ModerationEngine::new(store, config.moderation))
    }
}

pub fn parse_paper(id: &str) -> Result<PaperId> {
    PaperId::parse(id).with_context(|| format!("Invalid paper ID: {}", id))
}

pub fn parse_user(id: &str) -> Result<UserId> {
    UserId::parse(id).with_context(|| format!("Invalid user ID: {}", id))
}

/// Colored label for an implementability status
pub fn status_label(status: ImplementabilityStatus) -> colored::ColoredString {
    match status {
        ImplementabilityStatus::Voting => status.as_str().green(),
        ImplementabilityStatus::FlaggedNonImplementable => status.as_str().yellow(),
        ImplementabilityStatus::ConfirmedNonImplementable => status.as_str().red(),
        ImplementabilityStatus::AdminImplementable => status.as_str().cyan(),
        ImplementabilityStatus::AdminNonImplementable => status.as_str().magenta(),
    }
}

/// Print a paper the way `paper show` does
pub fn print_view(view: &PaperView) {
    let paper = &view.paper;
    println!("  ID: {}", paper.id.to_string().green());
    println!("  Title: {}", paper.title.bold());
    println!("  Source: {}", paper.source_url);
    println!("  Status: {}", paper.status);
    println!("  Implementability: {}", status_label(paper.implementability));
    println!(
        "  Votes: {} confirm, {} dispute, {} upvotes",
        paper.confirm_votes.to_string().red(),
        paper.dispute_votes.to_string().green(),
        paper.upvote_count.to_string().cyan()
    );
    if let Some(vote) = view.viewer_vote {
        println!("  Your vote: {}", vote);
    }
    if view.viewer_upvoted {
        println!("  You upvoted this paper");
    }
    println!(
        "  Updated: {} (version {})",
        paper.updated_at.format("%Y-%m-%d %H:%M:%S"),
        paper.version
    );
}

/// Print the result of a vote or override
pub fn print_outcome(outcome: &VoteOutcome, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    print_view(&outcome.view);
    if let Some(transition) = outcome.transition {
        println!();
        println!("{} Rule fired: {}", "→".blue(), transition.to_string().bold());
    }
    if outcome.wiped_votes > 0 {
        println!(
            "{} Vote history reset: {} implementability votes deleted",
            "⚠".yellow(),
            outcome.wiped_votes
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_default_config_uses_defaults() {
        let opts = GlobalOpts {
            config: Some(PathBuf::from("/nonexistent/config.toml")),
            data_dir: None,
        };
        assert!(opts.load_config().is_err());

        let opts = GlobalOpts::default();
        if !opts.config_path().exists() {
            assert_eq!(opts.load_config().unwrap().moderation.confirm_threshold, 3);
        }
    }

    #[test]
    fn test_explicit_config_and_data_dir() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");
        fs::write(&config_path, "[moderation]\nconfirm_threshold = 2\n").unwrap();

        let opts = GlobalOpts {
            config: Some(config_path),
            data_dir: Some(temp.path().join("data")),
        };
        let config = opts.load_config().unwrap();
        assert_eq!(config.moderation.confirm_threshold, 2);

        let store = opts.open_store(&config).unwrap();
        assert!(store.papers_dir().exists());
    }

    #[test]
    fn test_parse_ids() {
        assert!(parse_paper("0123456789abcdef01234567").is_ok());
        assert!(parse_user("nope").is_err());
    }
}
