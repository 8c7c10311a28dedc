//! CLI commands module
//!
//! This module contains all CLI command implementations.

pub mod admin;
pub mod config;
pub mod context;
pub mod init;
pub mod paper;
pub mod upvote;
pub mod vote;
pub mod votes;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// papers2code - track which papers can be reimplemented
#[derive(Debug, Parser)]
#[command(name = "papers2code")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "PAPERS2CODE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Data directory (overrides the configured one)
    #[arg(long, global = true, env = "PAPERS2CODE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Initialize papers2code in the current directory
    Init(init::InitArgs),

    /// Register and inspect papers
    #[command(subcommand)]
    Paper(paper::PaperCommand),

    /// Cast or retract an implementability vote
    Vote(vote::VoteArgs),

    /// Upvote a paper, or remove an upvote
    Upvote(upvote::UpvoteArgs),

    /// Owner overrides of implementability
    #[command(subcommand)]
    Admin(admin::AdminCommand),

    /// List a user's votes
    Votes(votes::VotesArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Run the CLI application
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    setup_logging(cli.verbose);

    // Handle color output
    if cli.no_color {
        colored::control::set_override(false);
    }

    let globals = context::GlobalOpts {
        config: cli.config,
        data_dir: cli.data_dir,
    };

    // Dispatch to command handler
    match cli.command {
        Commands::Init(args) => init::execute(args),
        Commands::Paper(cmd) => paper::execute(cmd, &globals),
        Commands::Vote(args) => vote::execute(args, &globals),
        Commands::Upvote(args) => upvote::execute(args, &globals),
        Commands::Admin(cmd) => admin::execute(cmd, &globals),
        Commands::Votes(args) => votes::execute(args, &globals),
        Commands::Config(cmd) => config::execute(cmd, &globals),
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
