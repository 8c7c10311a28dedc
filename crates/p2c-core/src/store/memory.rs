//! In-memory store

use super::{CommitReceipt, ModerationStore, PaperCommit};
use crate::error::{ModerationError, Result};
use crate::paper::Paper;
use crate::types::{PaperId, UserId};
use crate::vote::UserAction;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

#[derive(Debug, Default)]
struct Documents {
    papers: HashMap<PaperId, Paper>,
    actions: HashMap<PaperId, Vec<UserAction>>,
}

/// In-memory paper and ledger storage
///
/// Commits are serialized by a write lock, so a commit and its version check
/// are atomic with respect to every other commit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<Documents>,
}

impl MemoryStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Documents>> {
        self.documents
            .read()
            .map_err(|_| ModerationError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Documents>> {
        self.documents
            .write()
            .map_err(|_| ModerationError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl ModerationStore for MemoryStore {
    fn insert_paper(&self, paper: &Paper) -> Result<()> {
        let mut docs = self.write()?;
        if docs.papers.contains_key(&paper.id) {
            return Err(ModerationError::PaperExists(paper.id.to_string()));
        }
        docs.papers.insert(paper.id.clone(), paper.clone());
        docs.actions.insert(paper.id.clone(), Vec::new());
        debug!("Inserted paper {}", paper.id);
        Ok(())
    }

    fn find_paper(&self, id: &PaperId) -> Result<Option<Paper>> {
        Ok(self.read()?.papers.get(id).cloned())
    }

    fn list_papers(&self) -> Result<Vec<Paper>> {
        Ok(self.read()?.papers.values().cloned().collect())
    }

    fn actions_for_paper(&self, paper: &PaperId) -> Result<Vec<UserAction>> {
        Ok(self
            .read()?
            .actions
            .get(paper)
            .cloned()
            .unwrap_or_default())
    }

    fn actions_for_user(&self, user: &UserId) -> Result<Vec<UserAction>> {
        Ok(self
            .read()?
            .actions
            .values()
            .flatten()
            .filter(|a| &a.user_id == user)
            .cloned()
            .collect())
    }

    fn commit(&self, commit: PaperCommit) -> Result<CommitReceipt> {
        let mut guard = self.write()?;
        let docs = &mut *guard;
        let id = commit.paper.id.clone();
        let current = docs
            .papers
            .get_mut(&id)
            .ok_or_else(|| ModerationError::PaperNotFound(id.to_string()))?;
        let actions = docs.actions.entry(id.clone()).or_default();

        let receipt = commit.apply_to(current, actions)?;
        debug!("Committed paper {} at version {}", id, receipt.paper.version);
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ActionChange;
    use crate::vote::ActionType;

    fn user() -> UserId {
        UserId::parse("65a1f0c2e4b0a1b2c3d4e5f6").unwrap()
    }

    #[test]
    fn test_insert_and_find() {
        let store = MemoryStore::new();
        let paper = Paper::new("T", "https://example.org/a");

        store.insert_paper(&paper).unwrap();
        assert_eq!(store.find_paper(&paper.id).unwrap(), Some(paper.clone()));
        assert_eq!(store.list_papers().unwrap().len(), 1);
        assert!(matches!(
            store.insert_paper(&paper),
            Err(ModerationError::PaperExists(_))
        ));
    }

    #[test]
    fn test_load_missing_paper() {
        let store = MemoryStore::new();
        let id = PaperId::from_source("https://example.org/missing");
        assert!(matches!(
            store.load_paper(&id),
            Err(ModerationError::PaperNotFound(_))
        ));
    }

    #[test]
    fn test_commit_and_find_action() {
        let store = MemoryStore::new();
        let paper = Paper::new("T", "https://example.org/a");
        store.insert_paper(&paper).unwrap();

        let action = UserAction::new(user(), paper.id.clone(), ActionType::ConfirmNonImplementable);
        let mut next = paper.clone();
        next.confirm_votes = 1;
        store
            .commit(PaperCommit {
                expected_version: 0,
                paper: next,
                action: ActionChange::Insert(action.clone()),
                wipe: Vec::new(),
            })
            .unwrap();

        let found = store
            .find_action(&user(), &paper.id, &ActionType::IMPLEMENTABILITY)
            .unwrap();
        assert_eq!(found.map(|a| a.id), Some(action.id));
        assert!(store
            .find_action(&user(), &paper.id, &[ActionType::Upvote])
            .unwrap()
            .is_none());
        assert_eq!(store.actions_for_user(&user()).unwrap().len(), 1);
        assert_eq!(store.load_paper(&paper.id).unwrap().version, 1);
    }

    #[test]
    fn test_stale_commit_rejected() {
        let store = MemoryStore::new();
        let paper = Paper::new("T", "https://example.org/a");
        store.insert_paper(&paper).unwrap();

        store
            .commit(PaperCommit::paper_only(0, paper.clone()))
            .unwrap();
        let err = store
            .commit(PaperCommit::paper_only(0, paper.clone()))
            .unwrap_err();
        assert!(matches!(err, ModerationError::VersionConflict { .. }));
    }
}
