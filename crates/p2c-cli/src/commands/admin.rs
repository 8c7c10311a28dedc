//! Admin command
//!
//! Owner overrides of a paper's implementability status.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use p2c_core::paper::{AdminStatus, ImplementabilityStatus};

use super::context::{self, GlobalOpts};

/// Admin subcommands
#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Force a paper's implementability status
    Set {
        /// Paper ID
        paper: String,

        /// Owner user ID
        #[arg(long)]
        admin: String,

        /// voting, implementable or non-implementable
        #[arg(value_name = "STATUS")]
        status: AdminStatus,

        /// Skip confirmation
        #[arg(long, short)]
        yes: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Execute the admin command
pub fn execute(cmd: AdminCommand, globals: &GlobalOpts) -> Result<()> {
    match cmd {
        AdminCommand::Set {
            paper,
            admin,
            status,
            yes,
            json,
        } => {
            let paper_id = context::parse_paper(&paper)?;
            let admin_id = context::parse_user(&admin)?;
            let engine = globals.engine()?;

            if !yes {
                let current = engine.paper_view(&paper_id, None)?;
                let prompt = format!(
                    "Set '{}' from {} to {}?",
                    current.paper.title,
                    current.paper.implementability,
                    target_status(status)
                );
                let confirmed = dialoguer::Confirm::new()
                    .with_prompt(prompt)
                    .default(false)
                    .interact()?;
                if !confirmed {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let outcome = engine.set_admin_implementability(&paper_id, &admin_id, status)?;
            if !json {
                println!("{} Implementability updated", "✓".green());
            }
            context::print_outcome(&outcome, json)
        }
    }
}

fn target_status(status: AdminStatus) -> ImplementabilityStatus {
    match status {
        AdminStatus::Voting => ImplementabilityStatus::Voting,
        AdminStatus::Implementable => ImplementabilityStatus::AdminImplementable,
        AdminStatus::NonImplementable => ImplementabilityStatus::AdminNonImplementable,
    }
}
