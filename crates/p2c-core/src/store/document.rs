//! Paper document format and schema migration

use crate::error::{ModerationError, Result};
use crate::paper::Paper;
use crate::vote::UserAction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Current schema version
pub const CURRENT_SCHEMA_VERSION: &str = "1.0";

/// A paper together with its vote ledger, as persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperDocument {
    /// Schema version for migration
    pub schema_version: String,
    /// The paper record
    pub paper: Paper,
    /// Ledger records for this paper
    #[serde(default)]
    pub actions: Vec<UserAction>,
    /// Extra fields for forward compatibility
    #[serde(flatten, default)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl PaperDocument {
    /// Create a document with current schema version
    pub fn new(paper: Paper, actions: Vec<UserAction>) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION.to_string(),
            paper,
            actions,
            extra: HashMap::new(),
        }
    }

    /// Parse schema version as (major, minor)
    pub fn parse_version(&self) -> Option<(u32, u32)> {
        let (major, minor) = self.schema_version.split_once('.')?;
        Some((major.parse().ok()?, minor.parse().ok()?))
    }
}

/// Document schema migrator
pub struct DocumentMigrator;

impl DocumentMigrator {
    /// Migrate a document to the current schema version
    pub fn migrate(mut doc: PaperDocument) -> Result<PaperDocument> {
        let (major, _minor) = doc.parse_version().ok_or_else(|| {
            ModerationError::UnsupportedSchemaVersion(doc.schema_version.clone())
        })?;

        if major != 1 {
            return Err(ModerationError::UnsupportedSchemaVersion(format!(
                "{} (expected 1.x)",
                doc.schema_version
            )));
        }

        // 1.x documents share a layout; unknown fields survive in `extra`.
        doc.schema_version = CURRENT_SCHEMA_VERSION.to_string();
        Ok(doc)
    }

    /// Check if a document needs migration
    pub fn needs_migration(doc: &PaperDocument) -> bool {
        doc.schema_version != CURRENT_SCHEMA_VERSION
    }
}
