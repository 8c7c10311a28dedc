//! Upvote command

use anyhow::Result;
use clap::Args;

use p2c_core::vote::UpvoteAction;

use super::context::{self, GlobalOpts};

/// Arguments for the upvote command
#[derive(Debug, Args)]
pub struct UpvoteArgs {
    /// Paper ID
    pub paper: String,

    /// Upvoting user ID
    #[arg(long, short)]
    pub user: String,

    /// Remove the upvote instead
    #[arg(long)]
    pub remove: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the upvote command
pub fn execute(args: UpvoteArgs, globals: &GlobalOpts) -> Result<()> {
    let paper_id = context::parse_paper(&args.paper)?;
    let user_id = context::parse_user(&args.user)?;
    let action = if args.remove {
        UpvoteAction::None
    } else {
        UpvoteAction::Up
    };

    let outcome = globals.engine()?.set_upvote(&paper_id, &user_id, action)?;
    context::print_outcome(&outcome, args.json)
}
