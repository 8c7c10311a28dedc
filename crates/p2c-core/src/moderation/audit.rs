//! Consistency audit of counters against the vote ledger

use crate::paper::Paper;
use crate::types::{PaperId, UserId};
use crate::vote::{ActionType, UserAction};
use serde::Serialize;
use std::collections::HashMap;

/// Vote totals for one paper
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub confirm: u32,
    pub dispute: u32,
    pub upvote: u32,
}

impl Tally {
    fn from_paper(paper: &Paper) -> Self {
        Self {
            confirm: paper.confirm_votes,
            dispute: paper.dispute_votes,
            upvote: paper.upvote_count,
        }
    }

    fn from_ledger(actions: &[UserAction]) -> Self {
        let mut tally = Tally::default();
        for action in actions {
            match action.action_type {
                ActionType::ConfirmNonImplementable => tally.confirm += 1,
                ActionType::DisputeNonImplementable => tally.dispute += 1,
                ActionType::Upvote => tally.upvote += 1,
            }
        }
        tally
    }
}

/// Divergences between a paper's counters and its ledger
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub paper_id: PaperId,
    /// Counters stored on the paper
    pub counters: Tally,
    /// Counts recomputed from ledger records
    pub ledger: Tally,
    /// Users holding more than one live implementability vote
    pub multi_voters: Vec<UserId>,
    /// Users holding more than one upvote
    pub multi_upvoters: Vec<UserId>,
}

impl AuditReport {
    pub fn build(paper: &Paper, actions: &[UserAction]) -> Self {
        let mut votes: HashMap<&UserId, u32> = HashMap::new();
        let mut upvotes: HashMap<&UserId, u32> = HashMap::new();
        for action in actions.iter().filter(|a| a.paper_id == paper.id) {
            let bucket = if action.action_type == ActionType::Upvote {
                &mut upvotes
            } else {
                &mut votes
            };
            *bucket.entry(&action.user_id).or_insert(0) += 1;
        }

        let repeated = |map: HashMap<&UserId, u32>| {
            let mut users: Vec<UserId> = map
                .into_iter()
                .filter(|(_, n)| *n > 1)
                .map(|(u, _)| u.clone())
                .collect();
            users.sort();
            users
        };

        let own: Vec<UserAction> = actions
            .iter()
            .filter(|a| a.paper_id == paper.id)
            .cloned()
            .collect();

        Self {
            paper_id: paper.id.clone(),
            counters: Tally::from_paper(paper),
            ledger: Tally::from_ledger(&own),
            multi_voters: repeated(votes),
            multi_upvoters: repeated(upvotes),
        }
    }

    /// No counter drift and no user with duplicate live votes
    pub fn is_consistent(&self) -> bool {
        self.counters == self.ledger && self.multi_voters.is_empty() && self.multi_upvoters.is_empty()
    }
}
