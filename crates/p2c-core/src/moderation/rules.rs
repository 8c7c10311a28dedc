//! Threshold rules for community implementability votes
//!
//! Rules are an ordered table of (guard, transition) pairs. Evaluation walks
//! the table top to bottom and stops at the first guard that holds, so the
//! table order is the precedence.

use crate::paper::{ConfirmedBy, ImplementabilityStatus, Paper, PaperStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inputs to status recomputation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleContext {
    pub confirm_votes: u32,
    pub dispute_votes: u32,
    pub status: ImplementabilityStatus,
    pub confirm_threshold: u32,
}

impl RuleContext {
    pub fn from_paper(paper: &Paper, confirm_threshold: u32) -> Self {
        Self {
            confirm_votes: paper.confirm_votes,
            dispute_votes: paper.dispute_votes,
            status: paper.implementability,
            confirm_threshold,
        }
    }
}

/// Status change produced by a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Community confirmed the paper as non-implementable
    Confirm,
    /// Flag cleared, tally restarts
    RevertToVoting,
    /// Visible but unconfirmed
    Flag,
}

impl Transition {
    /// Write the transition's status fields onto a paper
    ///
    /// Counter and ledger effects of [`Transition::RevertToVoting`] are left
    /// to the caller.
    pub fn apply(self, paper: &mut Paper) {
        match self {
            Transition::Confirm => {
                paper.implementability = ImplementabilityStatus::ConfirmedNonImplementable;
                paper.confirmed_by = Some(ConfirmedBy::Community);
                paper.status = PaperStatus::NotImplementable;
            }
            Transition::RevertToVoting => {
                paper.implementability = ImplementabilityStatus::Voting;
                paper.confirmed_by = None;
                paper.status = PaperStatus::NotStarted;
            }
            Transition::Flag => {
                paper.implementability = ImplementabilityStatus::FlaggedNonImplementable;
            }
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Confirm => f.write_str("confirm"),
            Transition::RevertToVoting => f.write_str("revert-to-voting"),
            Transition::Flag => f.write_str("flag"),
        }
    }
}

/// One entry of the rule table
pub struct Rule {
    pub name: &'static str,
    guard: fn(&RuleContext) -> bool,
    pub transition: Transition,
}

impl Rule {
    pub fn matches(&self, ctx: &RuleContext) -> bool {
        (self.guard)(ctx)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("transition", &self.transition)
            .finish()
    }
}

fn confirm_wins(ctx: &RuleContext) -> bool {
    ctx.confirm_votes > 0
        && u64::from(ctx.confirm_votes)
            >= u64::from(ctx.dispute_votes) + u64::from(ctx.confirm_threshold)
}

// Only a flagged paper reverts; a confirmed one stays confirmed under disputes.
fn flag_cleared(ctx: &RuleContext) -> bool {
    ctx.status == ImplementabilityStatus::FlaggedNonImplementable
        && (ctx.dispute_votes >= ctx.confirm_votes || ctx.confirm_votes == 0)
}

fn first_flag(ctx: &RuleContext) -> bool {
    ctx.confirm_votes > 0
        && !matches!(
            ctx.status,
            ImplementabilityStatus::FlaggedNonImplementable
                | ImplementabilityStatus::ConfirmedNonImplementable
        )
}

/// The rule table, in precedence order
pub const RULES: [Rule; 3] = [
    Rule {
        name: "confirm-wins",
        guard: confirm_wins,
        transition: Transition::Confirm,
    },
    Rule {
        name: "revert-to-voting",
        guard: flag_cleared,
        transition: Transition::RevertToVoting,
    },
    Rule {
        name: "flag",
        guard: first_flag,
        transition: Transition::Flag,
    },
];

/// First matching rule, or `None` when nothing fires or the status is admin-locked
pub fn recompute_status(ctx: &RuleContext) -> Option<&'static Rule> {
    if ctx.status.is_admin_locked() {
        return None;
    }
    RULES.iter().find(|rule| rule.matches(ctx))
}
