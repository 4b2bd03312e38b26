//! Filesystem-backed session store.
//!
//! The store directory IS the store: one `<ID>.json` file per session, no
//! in-memory index. Every operation re-derives state from the filesystem,
//! so the directory is the single source of truth and the unit of
//! persistence.
//!
//! All writes follow the temp-fsync-rename pattern: a reader can never
//! observe a half-written record, and concurrent updates to the same id
//! degrade to last-write-wins rather than corruption.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::errors::StoreError;
use crate::session::{NewSession, SessionId, SessionPatch, SessionRecord};

/// Subdirectory for in-flight writes. Its name can never collide with a
/// session file (ids are uppercase-only) and `list` filters it out anyway.
const TMP_DIR: &str = ".tmp";

/// Stores session records as flat JSON files under a root directory.
pub struct FileStore {
    /// Root directory holding one `<ID>.json` file per session.
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory (and the
    /// `.tmp/` staging directory) if absent.
    ///
    /// Directories are created with mode `0o750` on Unix so records are
    /// readable only by the owning user and group.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        create_dir_restricted(&root)?;
        create_dir_restricted(&root.join(TMP_DIR))?;
        Ok(Self { root })
    }

    /// Validate a candidate, assign it a fresh id, and persist it.
    ///
    /// Any caller-supplied id is discarded. Nothing is read before the
    /// write, so concurrent creates cannot interfere with each other.
    pub fn create(&self, candidate: NewSession) -> Result<SessionRecord, StoreError> {
        let host = candidate
            .host
            .ok_or_else(|| StoreError::InvalidInput("host is required".to_string()))?;
        if candidate.port == 0 {
            return Err(StoreError::InvalidInput(
                "port must be non-zero".to_string(),
            ));
        }
        let options = candidate
            .options
            .ok_or_else(|| StoreError::InvalidInput("options are required".to_string()))?;

        let record = SessionRecord {
            id: SessionId::generate(),
            host,
            port: candidate.port,
            options,
        };
        self.write_record(&record)?;
        debug!(id = %record.id, "session created");
        Ok(record)
    }

    /// Load the record for `id`.
    ///
    /// `NotFound` when no file exists, `Io` when it cannot be read, and
    /// `Decode` when its content is not a complete record. There is no
    /// partial decode.
    pub fn find(&self, id: &SessionId) -> Result<SessionRecord, StoreError> {
        let data = match std::fs::read(self.record_path(id)) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound { id: id.clone() })
            }
            Err(err) => return Err(StoreError::Io(err)),
        };
        let record = serde_json::from_slice(&data)?;
        Ok(record)
    }

    /// Enumerate the ids of every session file in the store directory.
    ///
    /// Entries whose name does not match `<6-char-ID>.json` are foreign
    /// files and silently skipped. Order follows directory enumeration and
    /// is unspecified. Only enumeration failure itself is an error.
    pub fn list(&self) -> Result<Vec<SessionId>, StoreError> {
        let mut ids = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if let Some(id) = entry.file_name().to_str().and_then(SessionId::from_file_name) {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    /// Load every decodable session record.
    ///
    /// Per-file failures are not fatal: an unreadable or corrupt file is
    /// logged and skipped so one bad record cannot take down the whole
    /// listing. Only directory enumeration failure fails the call.
    pub fn find_all(&self) -> Result<Vec<SessionRecord>, StoreError> {
        let mut records = Vec::new();
        for id in self.list()? {
            match self.find(&id) {
                Ok(record) => records.push(record),
                Err(err) => {
                    warn!(id = %id, error = %err, "skipping unreadable session file");
                }
            }
        }
        Ok(records)
    }

    /// Merge `patch` into the stored record for `id` and persist the result.
    ///
    /// Read-merge-write with `find`'s error classification; the patch can
    /// change `host` and `port` only (see [`SessionRecord::apply`]). The
    /// rewrite is atomic, but two concurrent updates to the same id race
    /// and the last rename wins.
    pub fn update(&self, id: &SessionId, patch: SessionPatch) -> Result<(), StoreError> {
        let mut record = self.find(id)?;
        record.apply(&patch);
        self.write_record(&record)?;
        debug!(id = %id, "session updated");
        Ok(())
    }

    /// Absolute path of the record file for `id`.
    ///
    /// The id alphabet contains no path separators or dots, so the join
    /// cannot escape the store root.
    fn record_path(&self, id: &SessionId) -> PathBuf {
        self.root.join(id.file_name())
    }

    /// Serialize `record` and atomically replace its file: write to a
    /// staging file under `.tmp/`, fsync, then rename into place.
    fn write_record(&self, record: &SessionRecord) -> Result<(), StoreError> {
        let data = serde_json::to_vec(record)?;

        let staging = self
            .root
            .join(TMP_DIR)
            .join(format!("{}-{:016x}", record.id, rand::random::<u64>()));
        let mut file = std::fs::File::create(&staging)?;
        file.write_all(&data)?;
        file.sync_all()?;

        std::fs::rename(&staging, self.record_path(&record.id))?;
        Ok(())
    }
}

/// Create a directory (and any missing parents) if it does not exist, with
/// group-restricted permissions on Unix.
fn create_dir_restricted(path: &Path) -> std::io::Result<()> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o750);
    }
    builder.create(path)
}
