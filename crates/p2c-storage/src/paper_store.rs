//! File system storage for papers and their vote ledgers

use p2c_core::error::{ModerationError, Result};
use p2c_core::paper::Paper;
use p2c_core::store::{
    CommitReceipt, DocumentMigrator, ModerationStore, PaperCommit, PaperDocument,
    CURRENT_SCHEMA_VERSION,
};
use p2c_core::types::{PaperId, UserId};
use p2c_core::vote::UserAction;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

/// File system based paper storage
///
/// Each paper and its ledger live in one JSON document, so a commit is a
/// single atomic file replacement. Writers inside one process are
/// serialized; separate processes sharing a data directory are not.
pub struct FileSystemStore {
    /// Base directory for storage
    base_dir: PathBuf,
    /// Papers subdirectory
    papers_dir: PathBuf,
    /// Serializes read-check-write sequences
    write_lock: Mutex<()>,
}

impl FileSystemStore {
    /// Create a new file system store
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        let papers_dir = base_dir.join("papers");

        let store = Self {
            base_dir,
            papers_dir,
            write_lock: Mutex::new(()),
        };

        store.ensure_dirs()?;
        Ok(store)
    }

    /// Create storage in the platform data directory (~/.papers2code fallback)
    pub fn default_location() -> Result<Self> {
        let base_dir = directories::ProjectDirs::from("org", "papers2code", "papers2code")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".papers2code")
            });

        Self::new(base_dir)
    }

    /// Ensure required directories exist
    fn ensure_dirs(&self) -> Result<()> {
        if !self.papers_dir.exists() {
            fs::create_dir_all(&self.papers_dir).map_err(|e| {
                ModerationError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to create papers directory: {}", e),
                ))
            })?;
            debug!("Created papers directory: {:?}", self.papers_dir);
        }
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| ModerationError::Unavailable("paper store lock poisoned".to_string()))
    }

    /// Get the path for a paper document
    fn paper_path(&self, id: &PaperId) -> PathBuf {
        self.papers_dir.join(format!("{}.json", id))
    }

    /// Get a temporary path for atomic writes
    fn temp_path(&self, id: &PaperId) -> PathBuf {
        self.papers_dir.join(format!(".{}.json.tmp", id))
    }

    /// Write a document atomically (write to temp, then rename)
    fn atomic_write(&self, doc: &PaperDocument) -> Result<()> {
        let id = &doc.paper.id;
        let temp_path = self.temp_path(id);
        let final_path = self.paper_path(id);

        write_temp(&temp_path, |writer| {
            serde_json::to_writer_pretty(writer, doc)?;
            Ok(())
        })?;

        fs::rename(&temp_path, &final_path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            error!("Failed to replace paper document {:?}: {}", final_path, e);
            ModerationError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to rename temp file: {}", e),
            ))
        })?;

        debug!("Saved paper {} (version {}) to {:?}", id, doc.paper.version, final_path);
        Ok(())
    }

    /// Read and parse a paper document
    fn read_document(&self, path: &Path) -> Result<PaperDocument> {
        let file = fs::File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                let id = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("unknown");
                ModerationError::PaperNotFound(id.to_string())
            } else {
                ModerationError::Io(e)
            }
        })?;

        let reader = BufReader::new(file);
        let doc: PaperDocument = serde_json::from_reader(reader).map_err(|e| {
            error!("Corrupt paper document {:?}: {}", path, e);
            ModerationError::from(e).with_context(format!("Failed to parse {}", path.display()))
        })?;

        if DocumentMigrator::needs_migration(&doc) {
            info!(
                "Migrating paper document from version {} to {}",
                doc.schema_version, CURRENT_SCHEMA_VERSION
            );
            return DocumentMigrator::migrate(doc)
                .map_err(|e| e.with_context(format!("Failed to migrate {}", path.display())));
        }
        Ok(doc)
    }

    fn find_document(&self, id: &PaperId) -> Result<Option<PaperDocument>> {
        match self.read_document(&self.paper_path(id)) {
            Ok(doc) => Ok(Some(doc)),
            Err(ModerationError::PaperNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Read every paper document, skipping unreadable ones
    fn all_documents(&self) -> Result<Vec<PaperDocument>> {
        let mut docs = Vec::new();

        let entries = fs::read_dir(&self.papers_dir).map_err(|e| {
            ModerationError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read papers directory: {}", e),
            ))
        })?;

        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("Failed to read directory entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();

            // Skip non-json files and temp files
            if !path.extension().map(|e| e == "json").unwrap_or(false) {
                continue;
            }
            if path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with('.'))
                .unwrap_or(false)
            {
                continue;
            }

            match self.read_document(&path) {
                Ok(doc) => docs.push(doc),
                Err(e) => {
                    warn!("Failed to read paper document {:?}: {}", path, e);
                }
            }
        }

        Ok(docs)
    }

    /// Get base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get papers directory
    pub fn papers_dir(&self) -> &PathBuf {
        &self.papers_dir
    }
}

/// Fill a temp file, removing it again if anything fails
fn write_temp<F>(temp_path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<fs::File>) -> Result<()>,
{
    let temp_file = fs::File::create(temp_path).map_err(|e| {
        error!("Failed to create temp file {:?}: {}", temp_path, e);
        ModerationError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to create temp file: {}", e),
        ))
    })?;

    let mut writer = BufWriter::new(temp_file);
    let written = write(&mut writer).and_then(|_| writer.flush().map_err(ModerationError::from));
    drop(writer);

    if let Err(e) = written {
        let _ = fs::remove_file(temp_path);
        error!("Failed to write temp file {:?}: {}", temp_path, e);
        return Err(e);
    }
    Ok(())
}

impl ModerationStore for FileSystemStore {
    fn insert_paper(&self, paper: &Paper) -> Result<()> {
        let _guard = self.lock()?;
        if self.paper_path(&paper.id).exists() {
            return Err(ModerationError::PaperExists(paper.id.to_string()));
        }
        self.atomic_write(&PaperDocument::new(paper.clone(), Vec::new()))
    }

    fn find_paper(&self, id: &PaperId) -> Result<Option<Paper>> {
        Ok(self.find_document(id)?.map(|doc| doc.paper))
    }

    fn list_papers(&self) -> Result<Vec<Paper>> {
        Ok(self
            .all_documents()?
            .into_iter()
            .map(|doc| doc.paper)
            .collect())
    }

    fn actions_for_paper(&self, paper: &PaperId) -> Result<Vec<UserAction>> {
        Ok(self
            .find_document(paper)?
            .map(|doc| doc.actions)
            .unwrap_or_default())
    }

    fn actions_for_user(&self, user: &UserId) -> Result<Vec<UserAction>> {
        Ok(self
            .all_documents()?
            .into_iter()
            .flat_map(|doc| doc.actions)
            .filter(|a| &a.user_id == user)
            .collect())
    }

    fn commit(&self, commit: PaperCommit) -> Result<CommitReceipt> {
        let _guard = self.lock()?;
        let path = self.paper_path(&commit.paper.id);
        let mut doc = self.read_document(&path)?;

        let receipt = commit.apply_to(&mut doc.paper, &mut doc.actions)?;
        self.atomic_write(&doc)?;
        Ok(receipt)
    }
}
