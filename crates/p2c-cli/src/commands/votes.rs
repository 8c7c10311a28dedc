//! Votes command

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use p2c_core::vote::ActionType;

use super::context::{self, GlobalOpts};

/// Arguments for the votes command
#[derive(Debug, Args)]
pub struct VotesArgs {
    /// User ID
    pub user: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the votes command
pub fn execute(args: VotesArgs, globals: &GlobalOpts) -> Result<()> {
    let user_id = context::parse_user(&args.user)?;
    let actions = globals.engine()?.user_votes(&user_id)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&actions)?);
        return Ok(());
    }

    if actions.is_empty() {
        println!("No votes found for {}.", user_id);
        return Ok(());
    }

    println!("{}", format!("Votes by {}:", user_id).bold().underline());
    println!();
    for action in &actions {
        let label = match action.action_type {
            ActionType::Upvote => action.action_type.as_str().cyan(),
            ActionType::ConfirmNonImplementable => action.action_type.as_str().red(),
            ActionType::DisputeNonImplementable => action.action_type.as_str().green(),
        };
        println!(
            "  {} {} ({})",
            action.paper_id.to_string().green(),
            label,
            action
                .updated_at
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
                .dimmed()
        );
    }
    Ok(())
}
