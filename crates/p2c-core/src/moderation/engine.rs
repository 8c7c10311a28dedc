//! Moderation engine: applies votes and admin overrides to papers

use super::audit::AuditReport;
use super::rules::{recompute_status, RuleContext, Transition};
use crate::config::ModerationConfig;
use crate::error::{ModerationError, Result};
use crate::paper::{AdminStatus, ConfirmedBy, ImplementabilityStatus, Paper, PaperStatus, PaperView};
use crate::store::{ActionChange, CommitReceipt, ModerationStore, PaperCommit};
use crate::types::{PaperId, UserId};
use crate::vote::{ActionType, UpvoteAction, UserAction, VoteAction, VoteKind};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Result of a successful vote or override
#[derive(Debug, Clone, Serialize)]
pub struct VoteOutcome {
    /// Paper after the change, seen by the caller
    pub view: PaperView,
    /// Status transition that fired, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<Transition>,
    /// Ledger records deleted by a revert-to-voting
    pub wiped_votes: usize,
}

enum Plan {
    Unchanged(Paper),
    Commit {
        commit: PaperCommit,
        transition: Option<Transition>,
    },
}

struct Applied {
    paper: Paper,
    transition: Option<Transition>,
    wiped: usize,
}

/// Engine for community implementability moderation
pub struct ModerationEngine {
    /// Storage backend
    store: Arc<dyn ModerationStore>,
    /// Thresholds, owners, retry policy
    config: ModerationConfig,
}

impl ModerationEngine {
    /// Create a new engine with the given store
    pub fn new(store: impl ModerationStore + 'static, config: ModerationConfig) -> Self {
        Self {
            store: Arc::new(store),
            config,
        }
    }

    /// Create a new engine with shared storage
    pub fn with_store(store: Arc<dyn ModerationStore>, config: ModerationConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &ModerationConfig {
        &self.config
    }

    /// Get access to the underlying store
    pub fn store(&self) -> &dyn ModerationStore {
        self.store.as_ref()
    }

    /// Register a paper for tracking
    pub fn register_paper(&self, title: &str, source_url: &str) -> Result<Paper> {
        let title = title.trim();
        let source_url = source_url.trim();
        if title.is_empty() {
            return Err(ModerationError::Validation(
                "Paper title cannot be empty".to_string(),
            ));
        }
        if source_url.is_empty() {
            return Err(ModerationError::Validation(
                "Paper source URL cannot be empty".to_string(),
            ));
        }

        let paper = Paper::new(title, source_url);
        self.store
            .insert_paper(&paper)
            .map_err(|e| log_failure(&paper.id, "register", e))?;
        info!(paper = %paper.id, "Registered paper '{}'", paper.title);
        Ok(paper)
    }

    /// List papers, newest first
    pub fn list_papers(&self) -> Result<Vec<Paper>> {
        let mut papers = self.store.list_papers()?;
        papers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(papers)
    }

    /// A paper as seen by an optional viewer
    pub fn paper_view(&self, paper_id: &PaperId, viewer: Option<&UserId>) -> Result<PaperView> {
        let paper = self
            .store
            .load_paper(paper_id)
            .map_err(|e| log_failure(paper_id, "view", e))?;
        self.view_of(paper, viewer)
    }

    /// Every ledger record cast by a user, oldest first
    pub fn user_votes(&self, user_id: &UserId) -> Result<Vec<UserAction>> {
        let mut actions = self.store.actions_for_user(user_id)?;
        actions.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(actions)
    }

    /// Compare a paper's counters with its ledger
    pub fn audit(&self, paper_id: &PaperId) -> Result<AuditReport> {
        let load = || -> Result<AuditReport> {
            let paper = self.store.load_paper(paper_id)?;
            let actions = self.store.actions_for_paper(paper_id)?;
            Ok(AuditReport::build(&paper, &actions))
        };
        load().map_err(|e| log_failure(paper_id, "audit", e))
    }

    /// Apply a community confirm, dispute or retract
    pub fn apply_vote(
        &self,
        paper_id: &PaperId,
        user_id: &UserId,
        action: VoteAction,
    ) -> Result<VoteOutcome> {
        debug!(paper = %paper_id, user = %user_id, %action, "Applying vote");
        let applied = self.run(paper_id, |paper| self.plan_vote(paper, user_id, action))?;
        self.outcome(applied, Some(user_id))
    }

    /// Force an implementability status as an owner
    pub fn set_admin_implementability(
        &self,
        paper_id: &PaperId,
        admin_id: &UserId,
        status: AdminStatus,
    ) -> Result<VoteOutcome> {
        if !self.config.is_owner(admin_id) {
            warn!(paper = %paper_id, user = %admin_id, "Rejected admin status change from non-owner");
            return Err(ModerationError::Forbidden(admin_id.to_string()));
        }

        let applied = self.run(paper_id, |paper| Ok(self.plan_admin(paper, status)))?;
        info!(
            paper = %paper_id,
            admin = %admin_id,
            status = %applied.paper.implementability,
            "Owner set implementability"
        );
        self.outcome(applied, Some(admin_id))
    }

    /// Add or remove a popularity vote
    ///
    /// Upvoting twice, or removing an absent upvote, returns the current view.
    pub fn set_upvote(
        &self,
        paper_id: &PaperId,
        user_id: &UserId,
        action: UpvoteAction,
    ) -> Result<VoteOutcome> {
        let applied = self.run(paper_id, |paper| {
            let existing = self
                .store
                .find_action(user_id, &paper.id, &[ActionType::Upvote])?;
            let mut next = paper.clone();
            let change = match (action, existing) {
                (UpvoteAction::Up, None) => {
                    next.upvote_count = next.upvote_count.saturating_add(1);
                    ActionChange::Insert(UserAction::new(
                        user_id.clone(),
                        paper.id.clone(),
                        ActionType::Upvote,
                    ))
                }
                (UpvoteAction::None, Some(record)) => {
                    next.upvote_count = decrement(next.upvote_count, &paper.id, "upvote");
                    ActionChange::Delete(record.id)
                }
                _ => return Ok(Plan::Unchanged(paper)),
            };
            Ok(Plan::Commit {
                commit: PaperCommit {
                    expected_version: paper.version,
                    paper: next,
                    action: change,
                    wipe: Vec::new(),
                },
                transition: None,
            })
        })?;
        self.outcome(applied, Some(user_id))
    }

    fn plan_vote(&self, paper: Paper, user_id: &UserId, action: VoteAction) -> Result<Plan> {
        if paper.is_admin_locked() {
            return Err(ModerationError::AdminLocked {
                paper: paper.id.to_string(),
                status: paper.implementability.to_string(),
            });
        }

        let existing = self
            .store
            .find_action(user_id, &paper.id, &ActionType::IMPLEMENTABILITY)?;
        let live = existing
            .as_ref()
            .and_then(|a| a.action_type.vote_kind().map(|kind| (a, kind)));

        let mut next = paper.clone();
        let change = match (action.kind(), live) {
            (Some(kind), None) => {
                bump(&mut next, kind);
                ActionChange::Insert(UserAction::new(
                    user_id.clone(),
                    paper.id.clone(),
                    kind.action_type(),
                ))
            }
            (Some(kind), Some((_, current))) if current == kind => {
                return Err(ModerationError::DuplicateVote {
                    user: user_id.to_string(),
                    paper: paper.id.to_string(),
                    vote: kind.to_string(),
                });
            }
            (Some(kind), Some((record, current))) => {
                bump(&mut next, kind);
                drop_vote(&mut next, current);
                ActionChange::Update {
                    id: record.id.clone(),
                    action_type: kind.action_type(),
                }
            }
            (None, Some((record, current))) => {
                drop_vote(&mut next, current);
                ActionChange::Delete(record.id.clone())
            }
            (None, None) => {
                return Err(ModerationError::NothingToRetract {
                    user: user_id.to_string(),
                    paper: paper.id.to_string(),
                });
            }
        };

        let (transition, wipe) = self.recompute(&mut next);
        Ok(Plan::Commit {
            commit: PaperCommit {
                expected_version: paper.version,
                paper: next,
                action: change,
                wipe,
            },
            transition,
        })
    }

    fn plan_admin(&self, paper: Paper, status: AdminStatus) -> Plan {
        let mut next = paper.clone();
        let mut transition = None;
        let mut wipe = Vec::new();

        match status {
            AdminStatus::NonImplementable => {
                next.implementability = ImplementabilityStatus::AdminNonImplementable;
                next.confirmed_by = Some(ConfirmedBy::Owner);
                next.status = PaperStatus::NotImplementable;
            }
            AdminStatus::Implementable => {
                next.implementability = ImplementabilityStatus::AdminImplementable;
                next.confirmed_by = None;
                clear_not_implementable(&mut next);
            }
            AdminStatus::Voting => {
                next.implementability = ImplementabilityStatus::Voting;
                next.confirmed_by = None;
                clear_not_implementable(&mut next);
                (transition, wipe) = self.recompute(&mut next);
            }
        }

        Plan::Commit {
            commit: PaperCommit {
                expected_version: paper.version,
                paper: next,
                action: ActionChange::None,
                wipe,
            },
            transition,
        }
    }

    /// Run the rule table against planned counts
    fn recompute(&self, paper: &mut Paper) -> (Option<Transition>, Vec<ActionType>) {
        let ctx = RuleContext::from_paper(paper, self.config.confirm_threshold);
        let Some(rule) = recompute_status(&ctx) else {
            return (None, Vec::new());
        };

        rule.transition.apply(paper);
        let mut wipe = Vec::new();
        if rule.transition == Transition::RevertToVoting && self.config.wipe_votes_on_revert {
            paper.confirm_votes = 0;
            paper.dispute_votes = 0;
            wipe = ActionType::IMPLEMENTABILITY.to_vec();
        }
        (Some(rule.transition), wipe)
    }

    /// Read, plan and commit, re-planning on version conflicts
    fn run<F>(&self, paper_id: &PaperId, plan: F) -> Result<Applied>
    where
        F: FnMut(Paper) -> Result<Plan>,
    {
        self.commit_with_retries(paper_id, plan)
            .map_err(|e| log_failure(paper_id, "commit", e))
    }

    fn commit_with_retries<F>(&self, paper_id: &PaperId, mut plan: F) -> Result<Applied>
    where
        F: FnMut(Paper) -> Result<Plan>,
    {
        let attempts = self.config.max_commit_retries.max(1);
        for attempt in 1..=attempts {
            let paper = self.store.load_paper(paper_id)?;
            let before = paper.implementability;

            let (commit, transition) = match plan(paper)? {
                Plan::Unchanged(paper) => {
                    return Ok(Applied {
                        paper,
                        transition: None,
                        wiped: 0,
                    })
                }
                Plan::Commit { commit, transition } => (commit, transition),
            };

            match self.store.commit(commit) {
                Ok(CommitReceipt { paper, wiped }) => {
                    if let Some(t) = transition {
                        info!(
                            paper = %paper_id,
                            rule = %t,
                            from = %before,
                            to = %paper.implementability,
                            "Implementability transition"
                        );
                    }
                    if wiped > 0 {
                        warn!(
                            paper = %paper_id,
                            wiped,
                            "Deleted implementability vote history on revert to voting"
                        );
                    }
                    return Ok(Applied {
                        paper,
                        transition,
                        wiped,
                    });
                }
                Err(ModerationError::VersionConflict {
                    expected, found, ..
                }) => {
                    warn!(
                        paper = %paper_id,
                        attempt,
                        expected,
                        found,
                        "Paper changed underneath vote, re-planning"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(ModerationError::ConcurrentModification {
            paper: paper_id.to_string(),
            attempts,
        })
    }

    fn outcome(&self, applied: Applied, viewer: Option<&UserId>) -> Result<VoteOutcome> {
        Ok(VoteOutcome {
            view: self.view_of(applied.paper, viewer)?,
            transition: applied.transition,
            wiped_votes: applied.wiped,
        })
    }

    fn view_of(&self, paper: Paper, viewer: Option<&UserId>) -> Result<PaperView> {
        let Some(user) = viewer else {
            return Ok(PaperView::anonymous(paper));
        };

        let viewer_vote = self
            .store
            .find_action(user, &paper.id, &ActionType::IMPLEMENTABILITY)?
            .and_then(|a| a.action_type.vote_kind());
        let viewer_upvoted = self
            .store
            .find_action(user, &paper.id, &[ActionType::Upvote])?
            .is_some();

        Ok(PaperView {
            paper,
            viewer_vote,
            viewer_upvoted,
        })
    }
}

/// Log store and internal failures; caller mistakes pass through quietly
fn log_failure(paper: &PaperId, operation: &str, err: ModerationError) -> ModerationError {
    if !err.kind().is_user_error() {
        error!(paper = %paper, operation, error = %err, "Moderation store failure");
    }
    err
}

fn bump(paper: &mut Paper, kind: VoteKind) {
    match kind {
        VoteKind::Confirm => paper.confirm_votes = paper.confirm_votes.saturating_add(1),
        VoteKind::Dispute => paper.dispute_votes = paper.dispute_votes.saturating_add(1),
    }
}

fn drop_vote(paper: &mut Paper, kind: VoteKind) {
    let id = paper.id.clone();
    match kind {
        VoteKind::Confirm => paper.confirm_votes = decrement(paper.confirm_votes, &id, "confirm"),
        VoteKind::Dispute => paper.dispute_votes = decrement(paper.dispute_votes, &id, "dispute"),
    }
}

fn decrement(count: u32, paper: &PaperId, counter: &str) -> u32 {
    if count == 0 {
        warn!(paper = %paper, counter, "Counter already zero while removing a vote record");
    }
    count.saturating_sub(1)
}

fn clear_not_implementable(paper: &mut Paper) {
    if paper.status == PaperStatus::NotImplementable {
        paper.status = PaperStatus::NotStarted;
    }
}
