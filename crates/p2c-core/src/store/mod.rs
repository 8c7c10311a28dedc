//! Storage seam for papers and the vote ledger
//!
//! Reads are plain lookups. Every write goes through [`ModerationStore::commit`],
//! which applies a paper update, at most one ledger change and an optional
//! ledger wipe as one unit, guarded by the paper version the caller read.

pub mod document;
pub mod memory;

pub use document::{DocumentMigrator, PaperDocument, CURRENT_SCHEMA_VERSION};
pub use memory::MemoryStore;

use crate::error::{ModerationError, Result};
use crate::paper::Paper;
use crate::types::{ActionId, PaperId, UserId};
use crate::vote::{ActionType, UserAction};

/// Change to a single ledger record
#[derive(Debug, Clone, PartialEq)]
pub enum ActionChange {
    None,
    Insert(UserAction),
    /// Flip an existing record to another type
    Update {
        id: ActionId,
        action_type: ActionType,
    },
    Delete(ActionId),
}

/// One atomic write against a paper document
#[derive(Debug, Clone)]
pub struct PaperCommit {
    /// Version the change was planned against
    pub expected_version: u64,
    /// New paper state; the store assigns the version
    pub paper: Paper,
    /// Ledger record change
    pub action: ActionChange,
    /// Delete every ledger record of these types for the paper
    pub wipe: Vec<ActionType>,
}

impl PaperCommit {
    /// Commit that only rewrites paper fields
    pub fn paper_only(expected_version: u64, paper: Paper) -> Self {
        Self {
            expected_version,
            paper,
            action: ActionChange::None,
            wipe: Vec::new(),
        }
    }

    /// Apply this commit to a stored paper and its ledger
    ///
    /// Leaves `current` and `actions` untouched when it fails.
    pub fn apply_to(
        self,
        current: &mut Paper,
        actions: &mut Vec<UserAction>,
    ) -> Result<CommitReceipt> {
        if current.version != self.expected_version {
            return Err(ModerationError::VersionConflict {
                paper: current.id.to_string(),
                expected: self.expected_version,
                found: current.version,
            });
        }
        if self.paper.id != current.id {
            return Err(ModerationError::Validation(format!(
                "Commit for paper {} applied to paper {}",
                self.paper.id, current.id
            )));
        }

        let mut next_actions = actions.clone();
        match self.action {
            ActionChange::None => {}
            ActionChange::Insert(action) => next_actions.push(action),
            ActionChange::Update { id, action_type } => {
                let record = next_actions
                    .iter_mut()
                    .find(|a| a.id == id)
                    .ok_or_else(|| missing_record(&current.id, &id))?;
                record.set_action_type(action_type);
            }
            ActionChange::Delete(id) => {
                let pos = next_actions
                    .iter()
                    .position(|a| a.id == id)
                    .ok_or_else(|| missing_record(&current.id, &id))?;
                next_actions.remove(pos);
            }
        }

        let before = next_actions.len();
        if !self.wipe.is_empty() {
            next_actions.retain(|a| !self.wipe.contains(&a.action_type));
        }
        let wiped = before - next_actions.len();

        let mut paper = self.paper;
        paper.version = current.version + 1;
        paper.touch();

        *current = paper.clone();
        *actions = next_actions;

        Ok(CommitReceipt { paper, wiped })
    }
}

fn missing_record(paper: &PaperId, id: &ActionId) -> ModerationError {
    ModerationError::Unavailable(format!(
        "Ledger for paper {} has no vote record {}",
        paper, id
    ))
}

/// Result of a successful commit
#[derive(Debug, Clone)]
pub struct CommitReceipt {
    /// Stored paper, with its new version
    pub paper: Paper,
    /// Number of ledger records removed by the wipe
    pub wiped: usize,
}

/// Trait for paper and vote ledger storage implementations
pub trait ModerationStore: Send + Sync {
    /// Register a new paper
    fn insert_paper(&self, paper: &Paper) -> Result<()>;

    /// Find a paper by ID
    fn find_paper(&self, id: &PaperId) -> Result<Option<Paper>>;

    /// List all papers
    fn list_papers(&self) -> Result<Vec<Paper>>;

    /// All ledger records for a paper
    fn actions_for_paper(&self, paper: &PaperId) -> Result<Vec<UserAction>>;

    /// All ledger records cast by a user
    fn actions_for_user(&self, user: &UserId) -> Result<Vec<UserAction>>;

    /// Atomically apply a commit if the paper is still at the expected version
    fn commit(&self, commit: PaperCommit) -> Result<CommitReceipt>;

    /// Load a paper, failing when it does not exist
    fn load_paper(&self, id: &PaperId) -> Result<Paper> {
        self.find_paper(id)?
            .ok_or_else(|| ModerationError::PaperNotFound(id.to_string()))
    }

    /// Find the live record of one of `types` for (user, paper)
    ///
    /// When a ledger holds more than one match, the most recently changed wins.
    fn find_action(
        &self,
        user: &UserId,
        paper: &PaperId,
        types: &[ActionType],
    ) -> Result<Option<UserAction>> {
        let actions = self.actions_for_paper(paper)?;
        Ok(actions
            .into_iter()
            .filter(|a| &a.user_id == user && types.contains(&a.action_type))
            .max_by_key(|a| a.updated_at))
    }
}
