//! avalia-storage - File-backed storage for avalia
//!
//! JSON files with a schema version header, written atomically. Comments
//! live in `comments.json` and bans in `bans.json` under one data directory.

mod ban_store;
mod comment_store;
mod file;

pub use ban_store::FileBanRegistry;
pub use comment_store::FileSystemRepository;
pub use file::{default_data_dir, CURRENT_SCHEMA_VERSION};
