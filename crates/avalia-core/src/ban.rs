//! Account banning collaborator
//!
//! The engine never touches user records itself. `ban_author_of` resolves a
//! comment's author and hands the request to an [`AccountBanService`].

use crate::error::{AvaliaError, Result};
use crate::types::UserKey;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Longest accepted ban reason, in characters
pub const MAX_REASON_LENGTH: usize = 500;

/// A request to ban one account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanRequest {
    pub user: UserKey,
    pub banned_by: UserKey,
    pub reason: Option<String>,
}

impl BanRequest {
    /// Build a request; a blank reason is dropped
    pub fn new(user: UserKey, banned_by: UserKey, reason: Option<String>) -> Result<Self> {
        let reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());

        if let Some(reason) = &reason {
            if reason.chars().count() > MAX_REASON_LENGTH {
                return Err(AvaliaError::Validation(format!(
                    "Ban reason exceeds maximum length of {} characters",
                    MAX_REASON_LENGTH
                )));
            }
        }

        Ok(Self {
            user,
            banned_by,
            reason,
        })
    }
}

/// A ban in effect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanRecord {
    pub user: UserKey,
    pub banned_by: UserKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub banned_at: DateTime<Utc>,
}

/// Account-banning service consumed by the engine
pub trait AccountBanService: Send + Sync {
    /// Ban an account; `false` when it was already banned
    fn ban(&self, request: BanRequest) -> Result<bool>;

    /// Lift a ban; `false` when the account was not banned
    fn unban(&self, user: &UserKey) -> Result<bool>;

    fn is_banned(&self, user: &UserKey) -> Result<bool>;

    /// Bans in effect, ordered by user key
    fn list(&self) -> Result<Vec<BanRecord>>;
}

/// In-memory ban registry
#[derive(Debug, Default)]
pub struct BanRegistry {
    records: RwLock<BTreeMap<UserKey, BanRecord>>,
}

impl BanRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore from stored records; later duplicates win
    pub fn from_records(records: impl IntoIterator<Item = BanRecord>) -> Self {
        let registry = Self::new();
        registry.replace(records);
        registry
    }

    /// Swap in a new set of records
    pub fn replace(&self, records: impl IntoIterator<Item = BanRecord>) {
        *self.records.write() = records
            .into_iter()
            .map(|record| (record.user.clone(), record))
            .collect();
    }

    /// Copy of all records, ordered by user key
    pub fn records(&self) -> Vec<BanRecord> {
        self.records.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl AccountBanService for BanRegistry {
    fn ban(&self, request: BanRequest) -> Result<bool> {
        let mut records = self.records.write();
        if records.contains_key(&request.user) {
            return Ok(false);
        }
        let record = BanRecord {
            user: request.user.clone(),
            banned_by: request.banned_by,
            reason: request.reason,
            banned_at: Utc::now(),
        };
        records.insert(request.user, record);
        Ok(true)
    }

    fn unban(&self, user: &UserKey) -> Result<bool> {
        Ok(self.records.write().remove(user).is_some())
    }

    fn is_banned(&self, user: &UserKey) -> Result<bool> {
        Ok(self.records.read().contains_key(user))
    }

    fn list(&self) -> Result<Vec<BanRecord>> {
        Ok(self.records())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(user: &str, reason: Option<&str>) -> BanRequest {
        BanRequest::new(
            UserKey::new(user),
            UserKey::new("admin@unb.br"),
            reason.map(str::to_string),
        )
        .unwrap()
    }

    #[test]
    fn test_ban_once() {
        let registry = BanRegistry::new();
        assert!(registry.ban(request("ana@unb.br", Some("spam"))).unwrap());
        assert!(!registry.ban(request("ana@unb.br", None)).unwrap());
        assert!(registry.is_banned(&UserKey::new("ana@unb.br")).unwrap());

        let records = registry.list().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].reason.as_deref(), Some("spam"));
    }

    #[test]
    fn test_unban() {
        let registry = BanRegistry::new();
        registry.ban(request("ana@unb.br", None)).unwrap();

        assert!(registry.unban(&UserKey::new("ana@unb.br")).unwrap());
        assert!(!registry.unban(&UserKey::new("ana@unb.br")).unwrap());
        assert!(!registry.is_banned(&UserKey::new("ana@unb.br")).unwrap());
    }

    #[test]
    fn test_blank_reason_dropped() {
        assert_eq!(request("ana@unb.br", Some("   ")).reason, None);
    }

    #[test]
    fn test_long_reason_rejected() {
        let result = BanRequest::new(
            UserKey::new("ana@unb.br"),
            UserKey::new("admin@unb.br"),
            Some("x".repeat(MAX_REASON_LENGTH + 1)),
        );
        assert!(matches!(result, Err(AvaliaError::Validation(_))));
    }

    #[test]
    fn test_from_records() {
        let registry = BanRegistry::new();
        registry.ban(request("bia@unb.br", None)).unwrap();
        registry.ban(request("ana@unb.br", None)).unwrap();

        let restored = BanRegistry::from_records(registry.records());
        let users: Vec<String> = restored
            .records()
            .into_iter()
            .map(|r| r.user.to_string())
            .collect();
        assert_eq!(users, vec!["ana@unb.br", "bia@unb.br"]);
    }
}
