//! Config command
//!
//! Inspect papers2code configuration.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::fs;

use p2c_core::config::Config;

use super::context::GlobalOpts;

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show effective configuration
    Show {
        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration
    Validate,
}

/// Execute the config command
pub fn execute(cmd: ConfigCommand, globals: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => show_config(globals, json),
        ConfigCommand::Validate => validate_config(globals),
    }
}

fn show_config(globals: &GlobalOpts, as_json: bool) -> Result<()> {
    let config = globals.load_config()?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let path = globals.config_path();
    println!("{}", "Configuration:".bold().underline());
    if path.exists() {
        println!("{}", path.display().to_string().dimmed());
    } else {
        println!("{}", "(defaults, no config file)".dimmed());
    }
    println!();
    println!("{}", config.to_toml()?);

    if config.moderation.owners.is_empty() {
        eprintln!(
            "{} No owners configured; admin overrides will be rejected.",
            "⚠".yellow()
        );
    }
    Ok(())
}

fn validate_config(globals: &GlobalOpts) -> Result<()> {
    let config_path = globals.config_path();

    if !config_path.exists() {
        eprintln!(
            "{} Configuration not found at {}",
            "✗".red(),
            config_path.display()
        );
        if globals.config.is_some() {
            anyhow::bail!("Configuration file {} not found", config_path.display());
        }
        return Ok(());
    }

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;

    match Config::from_toml(&content) {
        Ok(config) => {
            println!("{} Configuration is valid.", "✓".green());
            println!(
                "  confirm_threshold = {}, owners = {}",
                config.moderation.confirm_threshold,
                config.moderation.owners.len()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("{} Configuration has errors:", "✗".red());
            eprintln!("  {}", e);
            anyhow::bail!("Invalid configuration")
        }
    }
}
