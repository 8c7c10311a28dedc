//! Vote command
//!
//! Cast or retract a community implementability vote.

use anyhow::Result;
use clap::Args;

use p2c_core::vote::VoteAction;

use super::context::{self, GlobalOpts};

/// Arguments for the vote command
#[derive(Debug, Args)]
pub struct VoteArgs {
    /// confirm (not implementable), dispute (implementable) or retract
    #[arg(value_name = "ACTION")]
    pub action: VoteAction,

    /// Paper ID
    pub paper: String,

    /// Voting user ID
    #[arg(long, short)]
    pub user: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the vote command
pub fn execute(args: VoteArgs, globals: &GlobalOpts) -> Result<()> {
    let paper_id = context::parse_paper(&args.paper)?;
    let user_id = context::parse_user(&args.user)?;
    let engine = globals.engine()?;

    let outcome = engine.apply_vote(&paper_id, &user_id, args.action)?;
    context::print_outcome(&outcome, args.json)
}
