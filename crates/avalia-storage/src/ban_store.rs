//! File system storage for account bans

use crate::file::{
    check_schema, ensure_dir, lock_path, read_json, write_json_atomic, FileLock,
    CURRENT_SCHEMA_VERSION,
};
use avalia_core::ban::{AccountBanService, BanRecord, BanRegistry, BanRequest};
use avalia_core::error::Result;
use avalia_core::types::UserKey;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const BANS_FILE: &str = "bans.json";

#[derive(Debug, Serialize, Deserialize)]
struct BansFile {
    schema_version: String,
    bans: Vec<BanRecord>,
}

/// Ban registry persisted to `bans.json`
///
/// Writes reload the file under an exclusive lock on `.bans.json.lock`
/// before applying, so concurrent processes never drop each other's bans.
pub struct FileBanRegistry {
    path: PathBuf,
    lock_path: PathBuf,
    inner: BanRegistry,
    write_lock: Mutex<()>,
}

impl FileBanRegistry {
    /// Open (or create) the registry under `base_dir`
    pub fn open(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        ensure_dir(base_dir)?;
        let path = base_dir.join(BANS_FILE);

        let inner = match read_records(&path)? {
            Some(records) => {
                debug!("Loaded {} bans from {:?}", records.len(), path);
                BanRegistry::from_records(records)
            }
            None => BanRegistry::new(),
        };

        Ok(Self {
            lock_path: lock_path(&path),
            path,
            inner,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        let file = BansFile {
            schema_version: CURRENT_SCHEMA_VERSION.to_string(),
            bans: self.inner.records(),
        };
        write_json_atomic(&self.path, &file)
    }

    /// Apply a change and persist it; undo the change if persisting fails
    fn write(&self, op: impl FnOnce(&BanRegistry) -> Result<bool>) -> Result<bool> {
        let _guard = self.write_lock.lock();
        let _lock = FileLock::acquire(&self.lock_path)?;
        self.inner.replace(read_records(&self.path)?.unwrap_or_default());
        let before = self.inner.records();

        let changed = op(&self.inner)?;
        if !changed {
            return Ok(false);
        }
        if let Err(err) = self.persist() {
            warn!("Failed to persist bans, rolling back: {}", err);
            self.inner.replace(before);
            return Err(err);
        }
        Ok(true)
    }
}

/// Read `bans.json`, rejecting incompatible schemas
fn read_records(path: &Path) -> Result<Option<Vec<BanRecord>>> {
    match read_json::<BansFile>(path)? {
        Some(file) => {
            check_schema(path, &file.schema_version)?;
            Ok(Some(file.bans))
        }
        None => Ok(None),
    }
}

impl AccountBanService for FileBanRegistry {
    fn ban(&self, request: BanRequest) -> Result<bool> {
        self.write(|inner| inner.ban(request))
    }

    fn unban(&self, user: &UserKey) -> Result<bool> {
        self.write(|inner| inner.unban(user))
    }

    fn is_banned(&self, user: &UserKey) -> Result<bool> {
        self.inner.is_banned(user)
    }

    fn list(&self) -> Result<Vec<BanRecord>> {
        self.inner.list()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn request(user: &str) -> BanRequest {
        BanRequest::new(
            UserKey::new(user),
            UserKey::new("admin@unb.br"),
            Some("ofensas".to_string()),
        )
        .unwrap()
    }

    #[test]
    fn test_bans_survive_reopen() {
        let temp = TempDir::new().unwrap();
        let registry = FileBanRegistry::open(temp.path()).unwrap();
        assert!(registry.ban(request("ana@unb.br")).unwrap());
        assert!(registry.ban(request("bia@unb.br")).unwrap());
        assert!(registry.unban(&UserKey::new("bia@unb.br")).unwrap());

        let reopened = FileBanRegistry::open(temp.path()).unwrap();
        let bans = reopened.list().unwrap();
        assert_eq!(bans.len(), 1);
        assert_eq!(bans[0].user, UserKey::new("ana@unb.br"));
        assert_eq!(bans[0].reason.as_deref(), Some("ofensas"));
    }

    #[test]
    fn test_two_handles_keep_both_bans() {
        let temp = TempDir::new().unwrap();
        let first = FileBanRegistry::open(temp.path()).unwrap();
        let second = FileBanRegistry::open(temp.path()).unwrap();

        assert!(first.ban(request("ana@unb.br")).unwrap());
        assert!(second.ban(request("bia@unb.br")).unwrap());
        // The second handle saw the first ban when it wrote
        assert!(!second.ban(request("ana@unb.br")).unwrap());

        let reopened = FileBanRegistry::open(temp.path()).unwrap();
        assert_eq!(reopened.list().unwrap().len(), 2);
    }

    #[test]
    fn test_noop_unban_does_not_write() {
        let temp = TempDir::new().unwrap();
        let registry = FileBanRegistry::open(temp.path()).unwrap();

        assert!(!registry.unban(&UserKey::new("ana@unb.br")).unwrap());
        assert!(!registry.path().exists());
    }

    #[test]
    fn test_failed_write_rolls_back() {
        let temp = TempDir::new().unwrap();
        let registry = FileBanRegistry::open(temp.path()).unwrap();
        fs::create_dir(crate::file::temp_path(registry.path())).unwrap();

        assert!(registry.ban(request("ana@unb.br")).is_err());
        assert!(!registry.is_banned(&UserKey::new("ana@unb.br")).unwrap());
    }
}
