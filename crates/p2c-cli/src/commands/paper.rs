//! Paper command
//!
//! Register and inspect tracked papers.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use p2c_core::moderation::ModerationEngine;

use super::context::{self, GlobalOpts};

/// Paper subcommands
#[derive(Debug, Subcommand)]
pub enum PaperCommand {
    /// Register a paper
    Add {
        /// Paper title
        #[arg(long)]
        title: String,

        /// Source URL (the paper ID is derived from it)
        #[arg(long)]
        url: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List tracked papers, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Limit number of papers
        #[arg(long, short, default_value = "20")]
        limit: usize,
    },

    /// Show paper details
    Show {
        /// Paper ID
        id: String,

        /// Show the paper as this user sees it
        #[arg(long)]
        as_user: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare a paper's counters with its vote records
    Audit {
        /// Paper ID
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Execute the paper command
pub fn execute(cmd: PaperCommand, globals: &GlobalOpts) -> Result<()> {
    let engine = globals.engine()?;

    match cmd {
        PaperCommand::Add { title, url, json } => add_paper(&engine, &title, &url, json),
        PaperCommand::List { json, limit } => list_papers(&engine, json, limit),
        PaperCommand::Show { id, as_user, json } => {
            show_paper(&engine, &id, as_user.as_deref(), json)
        }
        PaperCommand::Audit { id, json } => audit_paper(&engine, &id, json),
    }
}

fn add_paper(engine: &ModerationEngine, title: &str, url: &str, as_json: bool) -> Result<()> {
    let paper = engine
        .register_paper(title, url)
        .context("Failed to register paper")?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&paper)?);
        return Ok(());
    }

    println!("{} Registered paper {}", "✓".green(), paper.id.to_string().green());
    println!("  Title: {}", paper.title.bold());
    Ok(())
}

fn list_papers(engine: &ModerationEngine, as_json: bool, limit: usize) -> Result<()> {
    let papers = engine.list_papers()?;
    let total = papers.len();
    let papers: Vec<_> = papers.into_iter().take(limit).collect();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&papers)?);
        return Ok(());
    }

    if papers.is_empty() {
        println!("No papers found.");
        return Ok(());
    }

    println!("{}", "Papers:".bold().underline());
    println!();
    for paper in &papers {
        let age = chrono::Utc::now()
            .signed_duration_since(paper.updated_at)
            .num_hours();
        let age_str = if age < 1 {
            "just now".to_string()
        } else if age < 24 {
            format!("{}h ago", age)
        } else {
            format!("{}d ago", age / 24)
        };

        println!(
            "  {} {} [{}] {}/{} votes, {} upvotes ({})",
            paper.id.to_string().green(),
            paper.title,
            context::status_label(paper.implementability),
            paper.confirm_votes.to_string().red(),
            paper.dispute_votes.to_string().green(),
            paper.upvote_count.to_string().cyan(),
            age_str.dimmed()
        );
    }

    if total > limit {
        println!(
            "\n  {} Showing {} of {} papers. Use --limit to show more.",
            "ℹ".blue(),
            limit,
            total
        );
    }
    Ok(())
}

fn show_paper(
    engine: &ModerationEngine,
    id: &str,
    as_user: Option<&str>,
    as_json: bool,
) -> Result<()> {
    let paper_id = context::parse_paper(id)?;
    let viewer = as_user.map(context::parse_user).transpose()?;
    let view = engine
        .paper_view(&paper_id, viewer.as_ref())
        .with_context(|| format!("Paper '{}' not found", id))?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("{}", "Paper Details".bold().underline());
    println!();
    context::print_view(&view);
    Ok(())
}

fn audit_paper(engine: &ModerationEngine, id: &str, as_json: bool) -> Result<()> {
    let paper_id = context::parse_paper(id)?;
    let report = engine.audit(&paper_id)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "Vote Audit".bold().underline());
    println!();
    println!("  {:<10} {:>8} {:>8}", "", "counter", "ledger");
    let rows = [
        ("confirm", report.counters.confirm, report.ledger.confirm),
        ("dispute", report.counters.dispute, report.ledger.dispute),
        ("upvote", report.counters.upvote, report.ledger.upvote),
    ];
    for (name, counter, ledger) in rows {
        let line = format!("  {:<10} {:>8} {:>8}", name, counter, ledger);
        if counter == ledger {
            println!("{}", line);
        } else {
            println!("{}", line.red());
        }
    }

    for user in &report.multi_voters {
        println!("  {} {} holds more than one vote", "⚠".yellow(), user);
    }
    for user in &report.multi_upvoters {
        println!("  {} {} holds more than one upvote", "⚠".yellow(), user);
    }

    println!();
    if report.is_consistent() {
        println!("{} Counters match the vote records", "✓".green());
    } else {
        println!("{} Counters have drifted from the vote records", "✗".red());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use p2c_core::config::ModerationConfig;
    use p2c_core::store::MemoryStore;

    #[test]
    fn test_show_rejects_bad_id() {
        let engine = ModerationEngine::new(MemoryStore::new(), ModerationConfig::default());
        assert!(show_paper(&engine, "not-an-id", None, true).is_err());
    }

    #[test]
    fn test_add_then_audit() {
        let engine = ModerationEngine::new(MemoryStore::new(), ModerationConfig::default());
        add_paper(&engine, "Paper", "https://example.org/p", true).unwrap();
        let id = engine.list_papers().unwrap()[0].id.to_string();
        audit_paper(&engine, &id, false).unwrap();
        assert!(add_paper(&engine, "Paper", "https://example.org/p", true).is_err());
    }
}
