//! Community report ("denúncia") ledger

use crate::types::UserKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Set of users who reported a comment, plus the escalation flag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLedger {
    #[serde(default)]
    reporters: BTreeSet<UserKey>,
    #[serde(default)]
    reported: bool,
}

impl ReportLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a report from `user`
    ///
    /// Returns `false` without changing anything when `user` already
    /// reported. Raises `reported` once the count reaches `threshold`.
    pub fn add(&mut self, user: &UserKey, threshold: usize) -> bool {
        if !self.reporters.insert(user.clone()) {
            return false;
        }
        if self.reporters.len() >= threshold {
            self.reported = true;
        }
        true
    }

    pub fn count(&self) -> usize {
        self.reporters.len()
    }

    pub fn contains(&self, user: &UserKey) -> bool {
        self.reporters.contains(user)
    }

    /// Escalated past the threshold
    pub fn is_reported(&self) -> bool {
        self.reported
    }

    /// At least one report on file
    pub fn has_reports(&self) -> bool {
        !self.reporters.is_empty()
    }

    pub fn reporters(&self) -> impl Iterator<Item = &UserKey> {
        self.reporters.iter()
    }
}
