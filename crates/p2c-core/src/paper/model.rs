//! Paper data models

use crate::types::PaperId;
use crate::vote::VoteKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A tracked research paper and its moderation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    /// Unique paper identifier
    pub id: PaperId,
    /// Paper title
    pub title: String,
    /// Where the paper lives (abstract page, DOI)
    pub source_url: String,
    /// Reimplementation progress
    #[serde(default)]
    pub status: PaperStatus,
    /// Community or owner verdict on implementability
    #[serde(default)]
    pub implementability: ImplementabilityStatus,
    /// Who confirmed the paper as non-implementable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_by: Option<ConfirmedBy>,
    /// Live "not implementable" votes
    #[serde(default)]
    pub confirm_votes: u32,
    /// Live "implementable" votes
    #[serde(default)]
    pub dispute_votes: u32,
    /// Popularity votes
    #[serde(default)]
    pub upvote_count: u32,
    /// Bumped on every committed write
    #[serde(default)]
    pub version: u64,
    /// When the paper was registered
    pub created_at: DateTime<Utc>,
    /// When the paper was last written
    pub updated_at: DateTime<Utc>,
}

impl Paper {
    /// Register a new paper; the id is derived from the source URL
    pub fn new(title: impl Into<String>, source_url: impl Into<String>) -> Self {
        let source_url = source_url.into();
        let now = Utc::now();
        Self {
            id: PaperId::from_source(&source_url),
            title: title.into(),
            source_url,
            status: PaperStatus::default(),
            implementability: ImplementabilityStatus::default(),
            confirmed_by: None,
            confirm_votes: 0,
            dispute_votes: 0,
            upvote_count: 0,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark paper as updated
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Whether community votes are currently suspended
    pub fn is_admin_locked(&self) -> bool {
        self.implementability.is_admin_locked()
    }
}

/// Reimplementation progress of a paper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaperStatus {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Completed")]
    Completed,
    #[serde(rename = "Not Implementable")]
    NotImplementable,
}

impl PaperStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaperStatus::NotStarted => "Not Started",
            PaperStatus::InProgress => "In Progress",
            PaperStatus::Completed => "Completed",
            PaperStatus::NotImplementable => "Not Implementable",
        }
    }
}

impl fmt::Display for PaperStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Implementability verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImplementabilityStatus {
    /// Open for community votes, nothing flagged
    #[default]
    Voting,
    /// At least one confirm vote, not yet over the threshold
    FlaggedNonImplementable,
    /// Community votes crossed the confirm threshold
    ConfirmedNonImplementable,
    /// Owner declared the paper implementable
    AdminImplementable,
    /// Owner declared the paper not implementable
    AdminNonImplementable,
}

impl ImplementabilityStatus {
    /// Owner-set statuses suspend community recomputation
    pub fn is_admin_locked(&self) -> bool {
        matches!(
            self,
            ImplementabilityStatus::AdminImplementable | ImplementabilityStatus::AdminNonImplementable
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImplementabilityStatus::Voting => "voting",
            ImplementabilityStatus::FlaggedNonImplementable => "flagged_non_implementable",
            ImplementabilityStatus::ConfirmedNonImplementable => "confirmed_non_implementable",
            ImplementabilityStatus::AdminImplementable => "admin_implementable",
            ImplementabilityStatus::AdminNonImplementable => "admin_non_implementable",
        }
    }
}

impl fmt::Display for ImplementabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Statuses an owner may force
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminStatus {
    /// Hand the paper back to community voting
    Voting,
    Implementable,
    NonImplementable,
}

impl FromStr for AdminStatus {
    type Err = crate::ModerationError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "voting" => Ok(AdminStatus::Voting),
            "implementable" => Ok(AdminStatus::Implementable),
            "non-implementable" | "not-implementable" => Ok(AdminStatus::NonImplementable),
            other => Err(crate::ModerationError::Validation(format!(
                "Invalid admin status: {}",
                other
            ))),
        }
    }
}

/// Who confirmed a paper as non-implementable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmedBy {
    Community,
    Owner,
}

/// A paper as seen by one viewer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperView {
    #[serde(flatten)]
    pub paper: Paper,
    /// The viewer's live implementability vote
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewer_vote: Option<VoteKind>,
    /// Whether the viewer has upvoted
    #[serde(default)]
    pub viewer_upvoted: bool,
}

impl PaperView {
    /// View without a viewer
    pub fn anonymous(paper: Paper) -> Self {
        Self {
            paper,
            viewer_vote: None,
            viewer_upvoted: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_paper_defaults() {
        let paper = Paper::new("Attention Is All You Need", "https://arxiv.org/abs/1706.03762");
        assert_eq!(paper.status, PaperStatus::NotStarted);
        assert_eq!(paper.implementability, ImplementabilityStatus::Voting);
        assert_eq!(paper.confirm_votes, 0);
        assert_eq!(paper.version, 0);
        assert_eq!(paper.id, PaperId::from_source("https://arxiv.org/abs/1706.03762"));
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&PaperStatus::NotImplementable).unwrap();
        assert_eq!(json, "\"Not Implementable\"");
        let json = serde_json::to_string(&ImplementabilityStatus::FlaggedNonImplementable).unwrap();
        assert_eq!(json, "\"flagged_non_implementable\"");
    }

    #[test]
    fn test_admin_lock() {
        assert!(ImplementabilityStatus::AdminImplementable.is_admin_locked());
        assert!(ImplementabilityStatus::AdminNonImplementable.is_admin_locked());
        assert!(!ImplementabilityStatus::ConfirmedNonImplementable.is_admin_locked());
        assert!(!ImplementabilityStatus::Voting.is_admin_locked());
    }

    #[test]
    fn test_admin_status_parse() {
        assert_eq!("voting".parse::<AdminStatus>().unwrap(), AdminStatus::Voting);
        assert_eq!(
            "non_implementable".parse::<AdminStatus>().unwrap(),
            AdminStatus::NonImplementable
        );
        assert!("maybe".parse::<AdminStatus>().is_err());
    }

    #[test]
    fn test_view_flattens_paper() {
        let view = PaperView::anonymous(Paper::new("T", "https://example.org/p"));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["title"], "T");
        assert_eq!(json["viewer_upvoted"], false);
        assert!(json.get("viewer_vote").is_none());
    }
}
