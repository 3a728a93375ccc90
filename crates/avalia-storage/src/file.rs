//! Versioned JSON files with atomic replacement

use avalia_core::error::{AvaliaError, Result};
use avalia_core::types::ProtocolVersion;
use fs4::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Current schema version of stored files
pub const CURRENT_SCHEMA_VERSION: &str = "1.0";

/// Default data directory (platform data dir, or `~/.avalia`)
pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("br", "avalia", "avalia")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".avalia")
        })
}

/// Create `dir` if missing
pub(crate) fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| {
            AvaliaError::Io(e).with_context(format!(
                "Failed to create data directory {}",
                dir.display()
            ))
        })?;
        debug!("Created data directory: {:?}", dir);
    }
    Ok(())
}

/// Reject files written by an incompatible schema
pub(crate) fn check_schema(path: &Path, schema_version: &str) -> Result<()> {
    let current = ProtocolVersion::V1_0;
    let version = ProtocolVersion::parse(schema_version).ok_or_else(|| {
        AvaliaError::Storage(format!(
            "Invalid schema version {:?} in {}",
            schema_version,
            path.display()
        ))
    })?;

    if !version.is_compatible(&current) {
        return Err(AvaliaError::Storage(format!(
            "Incompatible schema version {} in {} (expected {}.x)",
            schema_version,
            path.display(),
            current.major
        )));
    }
    if version != current {
        info!(
            "Reading {} written with schema {}, will rewrite as {}",
            path.display(),
            schema_version,
            CURRENT_SCHEMA_VERSION
        );
    }
    Ok(())
}

/// Read and parse a JSON file; `None` when it does not exist
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(AvaliaError::Io(e).with_context(format!("Failed to open {}", path.display())))
        }
    };

    let value = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AvaliaError::Serde(e).with_context(format!("Failed to parse {}", path.display())))?;
    Ok(Some(value))
}

/// Temporary sibling used while writing `path`
pub(crate) fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("data.json");
    path.with_file_name(format!(".{}.tmp", name))
}

/// Lock file guarding writes to `path`
pub(crate) fn lock_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("data.json");
    path.with_file_name(format!(".{}.lock", name))
}

/// Exclusive lock on a lock file, shared by every process using the data dir
///
/// Held for a whole read-modify-write cycle and released on drop.
pub(crate) struct FileLock {
    file: fs::File,
    path: PathBuf,
}

impl FileLock {
    /// Block until the lock on `path` is ours
    pub(crate) fn acquire(path: &Path) -> Result<Self> {
        let file = fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)
            .map_err(|e| {
                AvaliaError::Io(e).with_context(format!("Failed to open lock file {}", path.display()))
            })?;

        FileExt::lock_exclusive(&file).map_err(|e| {
            AvaliaError::Io(e).with_context(format!("Failed to lock {}", path.display()))
        })?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!("Failed to unlock {}: {}", self.path.display(), e);
        }
    }
}

/// Write `value` to a temp file, then rename over `path`
pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let temp = temp_path(path);

    let file = fs::File::create(&temp).map_err(|e| {
        AvaliaError::Io(e).with_context(format!("Failed to create temp file {}", temp.display()))
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    drop(writer);

    fs::rename(&temp, path).map_err(|e| {
        let _ = fs::remove_file(&temp);
        AvaliaError::Io(e).with_context(format!("Failed to replace {}", path.display()))
    })?;

    debug!("Wrote {:?}", path);
    Ok(())
}
