//! Init command
//!
//! Initialize papers2code configuration and data directory.

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

use super::context::PROJECT_DIR;

/// Arguments for the init command
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Force overwrite existing configuration
    #[arg(long)]
    pub force: bool,

    /// Owner user IDs allowed to set admin statuses
    #[arg(long = "owner")]
    pub owners: Vec<String>,

    /// Directory to initialize (default: current directory)
    #[arg(long)]
    pub path: Option<PathBuf>,
}

/// Execute the init command
pub fn execute(args: InitArgs) -> Result<()> {
    use colored::Colorize;

    let project_dir = match args.path.clone() {
        Some(path) => path,
        None => std::env::current_dir().context("Failed to resolve current directory")?,
    };

    println!("Initializing papers2code in {}...", project_dir.display());

    let p2c_dir = project_dir.join(PROJECT_DIR);
    if p2c_dir.exists() && !args.force {
        eprintln!(
            "{} papers2code already initialized. Use --force to reinitialize.",
            "⚠".yellow()
        );
        return Ok(());
    }

    create_directory_structure(&p2c_dir)?;
    println!("{} Created {}/ directory", "✓".green(), PROJECT_DIR);

    let config = generate_config(&args.owners)?;
    let config_path = p2c_dir.join("config.toml");
    fs::write(&config_path, config).context("Failed to write config.toml")?;
    println!("{} Generated config.toml", "✓".green());

    if args.owners.is_empty() {
        eprintln!(
            "{} No owners configured; admin overrides are disabled until you add one.",
            "⚠".yellow()
        );
    }

    println!("\n{}", "Next steps:".bold());
    println!("  1. Review {}/config.toml", PROJECT_DIR);
    println!("  2. Register a paper:");
    println!(
        "     {}",
        "papers2code paper add --title <title> --url <url>".cyan()
    );

    Ok(())
}

fn create_directory_structure(p2c_dir: &Path) -> Result<()> {
    fs::create_dir_all(p2c_dir)?;
    fs::create_dir_all(p2c_dir.join("data"))?;
    Ok(())
}

fn generate_config(owners: &[String]) -> Result<String> {
    let mut config = p2c_core::config::Config::default();
    config.moderation.owners = owners.to_vec();
    config
        .validate()
        .context("Invalid owner ID passed to --owner")?;

    let body = config.to_toml()?;
    Ok(format!(
        "# papers2code configuration\n\
         #\n\
         # confirm_threshold: confirm votes must lead dispute votes by this much\n\
         # wipe_votes_on_revert: delete confirm/dispute votes when a flagged paper\n\
         #   reverts to voting (vote history is not recoverable)\n\n{}",
        body
    ))
}
