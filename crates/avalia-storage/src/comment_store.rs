//! File system storage for comments

use crate::file::{
    check_schema, ensure_dir, lock_path, read_json, write_json_atomic, FileLock,
    CURRENT_SCHEMA_VERSION,
};
use avalia_core::comment::Comment;
use avalia_core::error::Result;
use avalia_core::repository::{CommentRepository, MemoryRepository, RootFilter, StoreSnapshot};
use avalia_core::types::CommentId;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const COMMENTS_FILE: &str = "comments.json";

/// On-disk layout of `comments.json`
#[derive(Debug, Serialize, Deserialize)]
struct CommentsFile {
    schema_version: String,
    next_id: u64,
    comments: Vec<Comment>,
}

impl CommentsFile {
    fn new(snapshot: StoreSnapshot) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION.to_string(),
            next_id: snapshot.next_id,
            comments: snapshot.comments,
        }
    }

    fn into_snapshot(self) -> StoreSnapshot {
        StoreSnapshot {
            next_id: self.next_id,
            comments: self.comments,
        }
    }
}

/// Comment repository persisted to one JSON file
///
/// Reads are served from the copy last synced with disk. Each write holds a
/// mutex and an exclusive lock on `.comments.json.lock`, reloads the file,
/// applies to memory, then rewrites the file. Version checks therefore run
/// against what is on disk, even with several processes sharing the data
/// directory. If the file cannot be written the memory state is rolled back.
pub struct FileSystemRepository {
    base_dir: PathBuf,
    path: PathBuf,
    lock_path: PathBuf,
    inner: MemoryRepository,
    write_lock: Mutex<()>,
}

impl FileSystemRepository {
    /// Open (or create) the store under `base_dir`
    pub fn open(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        ensure_dir(&base_dir)?;
        let path = base_dir.join(COMMENTS_FILE);

        let inner = match read_snapshot(&path)? {
            Some(snapshot) => {
                let repository = MemoryRepository::from_snapshot(snapshot)?;
                debug!("Loaded {} comments from {:?}", repository.len(), path);
                repository
            }
            None => MemoryRepository::new(),
        };

        Ok(Self {
            base_dir,
            lock_path: lock_path(&path),
            path,
            inner,
            write_lock: Mutex::new(()),
        })
    }

    /// Open the store in the default data directory
    pub fn default_location() -> Result<Self> {
        Self::open(crate::file::default_data_dir())
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path of the comments file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace memory with the file contents; call with the file lock held
    fn reload(&self) -> Result<()> {
        let snapshot = read_snapshot(&self.path)?.unwrap_or_default();
        self.inner.restore(snapshot)
    }

    fn persist(&self) -> Result<()> {
        write_json_atomic(&self.path, &CommentsFile::new(self.inner.snapshot()))
    }

    fn write<T>(&self, op: impl FnOnce(&MemoryRepository) -> Result<T>) -> Result<T> {
        self.write_if(op, |_| true)
    }

    /// Apply `op` to the freshly loaded state and persist it when `changed`
    /// says so, rolling memory back on a write failure
    fn write_if<T>(
        &self,
        op: impl FnOnce(&MemoryRepository) -> Result<T>,
        changed: impl FnOnce(&T) -> bool,
    ) -> Result<T> {
        let _guard = self.write_lock.lock();
        let _lock = FileLock::acquire(&self.lock_path)?;
        self.reload()?;
        let before = self.inner.snapshot();

        let value = op(&self.inner)?;
        if !changed(&value) {
            return Ok(value);
        }
        if let Err(err) = self.persist() {
            warn!("Failed to persist comments, rolling back: {}", err);
            self.inner.restore(before)?;
            return Err(err);
        }
        Ok(value)
    }
}

/// Read `comments.json`, rejecting incompatible schemas
fn read_snapshot(path: &Path) -> Result<Option<StoreSnapshot>> {
    match read_json::<CommentsFile>(path)? {
        Some(file) => {
            check_schema(path, &file.schema_version)?;
            Ok(Some(file.into_snapshot()))
        }
        None => Ok(None),
    }
}

impl CommentRepository for FileSystemRepository {
    /// Reserve an id; the reservation is persisted so no other process
    /// sharing the file can hand it out again
    fn next_id(&self) -> Result<CommentId> {
        self.write(|inner| inner.next_id())
    }

    fn insert(&self, comment: Comment) -> Result<Comment> {
        self.write(|inner| inner.insert(comment))
    }

    fn load(&self, id: CommentId) -> Result<Option<Comment>> {
        self.inner.load(id)
    }

    fn save(&self, comment: &Comment) -> Result<Comment> {
        self.write(|inner| inner.save(comment))
    }

    fn delete_subtree(&self, id: CommentId) -> Result<usize> {
        self.write_if(|inner| inner.delete_subtree(id), |removed| *removed > 0)
    }

    fn children(&self, id: CommentId) -> Result<Vec<Comment>> {
        self.inner.children(id)
    }

    fn count_descendants(&self, id: CommentId) -> Result<usize> {
        self.inner.count_descendants(id)
    }

    fn find_roots(&self, filter: &RootFilter) -> Result<Vec<Comment>> {
        self.inner.find_roots(filter)
    }

    fn count_roots(&self, filter: &RootFilter) -> Result<u64> {
        self.inner.count_roots(filter)
    }

    fn exists(&self, id: CommentId) -> Result<bool> {
        self.inner.exists(id)
    }
}
