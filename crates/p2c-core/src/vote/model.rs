//! Vote data models

use crate::error::ModerationError;
use crate::types::{ActionId, PaperId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of record stored in the vote ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Upvote,
    ConfirmNonImplementable,
    DisputeNonImplementable,
}

impl ActionType {
    /// Record types counted by the implementability tally
    pub const IMPLEMENTABILITY: [ActionType; 2] = [
        ActionType::ConfirmNonImplementable,
        ActionType::DisputeNonImplementable,
    ];

    /// The implementability vote this record represents, if any
    pub fn vote_kind(&self) -> Option<VoteKind> {
        match self {
            ActionType::ConfirmNonImplementable => Some(VoteKind::Confirm),
            ActionType::DisputeNonImplementable => Some(VoteKind::Dispute),
            ActionType::Upvote => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Upvote => "upvote",
            ActionType::ConfirmNonImplementable => "confirm_non_implementable",
            ActionType::DisputeNonImplementable => "dispute_non_implementable",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One side of the implementability vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteKind {
    /// The paper is not implementable
    Confirm,
    /// The paper is implementable
    Dispute,
}

impl VoteKind {
    /// Ledger record type for this vote
    pub fn action_type(self) -> ActionType {
        match self {
            VoteKind::Confirm => ActionType::ConfirmNonImplementable,
            VoteKind::Dispute => ActionType::DisputeNonImplementable,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VoteKind::Confirm => "confirm",
            VoteKind::Dispute => "dispute",
        }
    }
}

impl fmt::Display for VoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A community implementability vote request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteAction {
    Confirm,
    Dispute,
    Retract,
}

impl VoteAction {
    /// The vote being cast, `None` for a retraction
    pub fn kind(self) -> Option<VoteKind> {
        match self {
            VoteAction::Confirm => Some(VoteKind::Confirm),
            VoteAction::Dispute => Some(VoteKind::Dispute),
            VoteAction::Retract => None,
        }
    }
}

impl FromStr for VoteAction {
    type Err = ModerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "confirm" | "flag" => Ok(VoteAction::Confirm),
            "dispute" => Ok(VoteAction::Dispute),
            "retract" | "remove" => Ok(VoteAction::Retract),
            other => Err(ModerationError::Validation(format!(
                "Invalid vote action: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for VoteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteAction::Confirm => f.write_str("confirm"),
            VoteAction::Dispute => f.write_str("dispute"),
            VoteAction::Retract => f.write_str("retract"),
        }
    }
}

/// A popularity vote request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpvoteAction {
    Up,
    None,
}

/// A record in the vote ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAction {
    /// Unique record identifier
    pub id: ActionId,
    /// Who voted
    pub user_id: UserId,
    /// Which paper
    pub paper_id: PaperId,
    /// What kind of vote
    pub action_type: ActionType,
    /// When the vote was first cast
    pub created_at: DateTime<Utc>,
    /// When the vote last changed type
    pub updated_at: DateTime<Utc>,
}

impl UserAction {
    /// Create a new ledger record
    pub fn new(user_id: UserId, paper_id: PaperId, action_type: ActionType) -> Self {
        let now = Utc::now();
        Self {
            id: ActionId::new(),
            user_id,
            paper_id,
            action_type,
            created_at: now,
            updated_at: now,
        }
    }

    /// Flip the record in place
    pub fn set_action_type(&mut self, action_type: ActionType) {
        self.action_type = action_type;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_kind_round_trip() {
        for kind in [VoteKind::Confirm, VoteKind::Dispute] {
            assert_eq!(kind.action_type().vote_kind(), Some(kind));
        }
        assert_eq!(ActionType::Upvote.vote_kind(), None);
    }

    #[test]
    fn test_vote_action_parse() {
        assert_eq!("confirm".parse::<VoteAction>().unwrap(), VoteAction::Confirm);
        assert_eq!("Flag".parse::<VoteAction>().unwrap(), VoteAction::Confirm);
        assert_eq!(" dispute ".parse::<VoteAction>().unwrap(), VoteAction::Dispute);
        assert_eq!("retract".parse::<VoteAction>().unwrap(), VoteAction::Retract);
        let err = "upvote".parse::<VoteAction>().unwrap_err();
        assert!(matches!(err, ModerationError::Validation(_)));
    }

    #[test]
    fn test_action_type_serialization() {
        let json = serde_json::to_string(&ActionType::ConfirmNonImplementable).unwrap();
        assert_eq!(json, "\"confirm_non_implementable\"");
    }

    #[test]
    fn test_set_action_type_keeps_identity() {
        let user = UserId::parse("65a1f0c2e4b0a1b2c3d4e5f6").unwrap();
        let paper = PaperId::from_source("https://example.org/p");
        let mut action = UserAction::new(user, paper, ActionType::ConfirmNonImplementable);
        let id = action.id.clone();
        action.set_action_type(ActionType::DisputeNonImplementable);
        assert_eq!(action.id, id);
        assert_eq!(action.action_type, ActionType::DisputeNonImplementable);
    }
}
