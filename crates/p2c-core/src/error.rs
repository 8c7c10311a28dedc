//! Error types for papers2code

use thiserror::Error;

/// Main error type for papers2code
#[derive(Debug, Error)]
pub enum ModerationError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Malformed input (ids, actions, statuses)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Paper not found
    #[error("Paper not found: {0}")]
    PaperNotFound(String),

    /// Paper already registered
    #[error("Paper already exists: {0}")]
    PaperExists(String),

    /// Same vote type cast twice
    #[error("Duplicate vote: user {user} already voted '{vote}' on paper {paper}")]
    DuplicateVote {
        user: String,
        paper: String,
        vote: String,
    },

    /// Retract without a live vote
    #[error("No vote to retract for user {user} on paper {paper}")]
    NothingToRetract { user: String, paper: String },

    /// Community vote on an admin-locked paper
    #[error("Implementability of paper {paper} is locked by an owner ({status})")]
    AdminLocked { paper: String, status: String },

    /// Admin operation by a non-owner
    #[error("User {0} is not allowed to set implementability status")]
    Forbidden(String),

    /// Optimistic concurrency check failed
    #[error("Paper {paper} was modified concurrently (expected version {expected}, found {found})")]
    VersionConflict {
        paper: String,
        expected: u64,
        found: u64,
    },

    /// Commit retries exhausted
    #[error("Paper {paper} is under heavy concurrent modification, gave up after {attempts} attempts")]
    ConcurrentModification { paper: String, attempts: u32 },

    /// Store cannot be reached or is corrupt
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Unsupported document schema version
    #[error("Unsupported schema version: {0}")]
    UnsupportedSchemaVersion(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ModerationError>,
    },
}

/// Coarse error classification for callers that translate to status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Forbidden,
    Conflict,
    Unavailable,
    Internal,
}

impl ErrorKind {
    /// HTTP status code for this kind
    pub fn http_status(self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::Internal => 500,
            ErrorKind::Unavailable => 503,
        }
    }

    /// Whether the caller caused the error
    pub fn is_user_error(self) -> bool {
        matches!(
            self,
            ErrorKind::Validation | ErrorKind::NotFound | ErrorKind::Forbidden | ErrorKind::Conflict
        )
    }
}

impl ModerationError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ModerationError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ModerationError::Validation(_) | ModerationError::Config(_) => ErrorKind::Validation,
            ModerationError::PaperNotFound(_) => ErrorKind::NotFound,
            ModerationError::Forbidden(_) => ErrorKind::Forbidden,
            ModerationError::PaperExists(_)
            | ModerationError::DuplicateVote { .. }
            | ModerationError::NothingToRetract { .. }
            | ModerationError::AdminLocked { .. }
            | ModerationError::VersionConflict { .. }
            | ModerationError::ConcurrentModification { .. } => ErrorKind::Conflict,
            ModerationError::Io(_) | ModerationError::Unavailable(_) => ErrorKind::Unavailable,
            ModerationError::Serde(_) | ModerationError::UnsupportedSchemaVersion(_) => {
                ErrorKind::Internal
            }
            ModerationError::WithContext { source, .. } => source.kind(),
        }
    }
}

/// Result type alias for papers2code
pub type Result<T> = std::result::Result<T, ModerationError>;
