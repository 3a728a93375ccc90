//! Per-user vote ledger with switch/cancel semantics

use crate::types::UserKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Direction of a single vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteChoice {
    Up,
    Down,
}

impl VoteChoice {
    /// Map the `isUpvote` flag used by callers
    pub fn from_upvote(is_upvote: bool) -> Self {
        if is_upvote {
            VoteChoice::Up
        } else {
            VoteChoice::Down
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            VoteChoice::Up => VoteChoice::Down,
            VoteChoice::Down => VoteChoice::Up,
        }
    }
}

/// What a given user currently has recorded on a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteState {
    #[default]
    None,
    Up,
    Down,
}

impl VoteState {
    /// Numeric form used by views: 1 for up, -1 for down, 0 for none
    pub fn as_i8(self) -> i8 {
        match self {
            VoteState::None => 0,
            VoteState::Up => 1,
            VoteState::Down => -1,
        }
    }
}

impl From<VoteChoice> for VoteState {
    fn from(choice: VoteChoice) -> Self {
        match choice {
            VoteChoice::Up => VoteState::Up,
            VoteChoice::Down => VoteState::Down,
        }
    }
}

/// Transition applied by a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VoteOutcome {
    /// First vote by this user
    Added { choice: VoteChoice },
    /// Same direction again: the vote was withdrawn
    Cancelled { choice: VoteChoice },
    /// Opposite direction: the vote moved
    Switched { from: VoteChoice, to: VoteChoice },
}

/// Counters and caller state after a vote, returned to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub outcome: VoteOutcome,
    pub up_votes: u32,
    pub down_votes: u32,
    pub state: VoteState,
}

/// One-vote-per-user ledger
///
/// `up_votes + down_votes` always equals the number of entries in `voters`.
/// The counters are rebuilt from `voters` on deserialization, so a stored
/// file cannot smuggle in inconsistent totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VoteLedger {
    voters: BTreeMap<UserKey, VoteChoice>,
    up_votes: u32,
    down_votes: u32,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a vote from `user`
    pub fn apply(&mut self, user: &UserKey, choice: VoteChoice) -> VoteOutcome {
        match self.voters.get(user).copied() {
            None => {
                self.voters.insert(user.clone(), choice);
                self.increment(choice);
                VoteOutcome::Added { choice }
            }
            Some(previous) if previous == choice => {
                self.voters.remove(user);
                self.decrement(choice);
                VoteOutcome::Cancelled { choice }
            }
            Some(previous) => {
                self.decrement(previous);
                self.increment(choice);
                self.voters.insert(user.clone(), choice);
                VoteOutcome::Switched {
                    from: previous,
                    to: choice,
                }
            }
        }
    }

    /// Current vote of `user`
    pub fn state_of(&self, user: &UserKey) -> VoteState {
        self.voters
            .get(user)
            .copied()
            .map(VoteState::from)
            .unwrap_or_default()
    }

    pub fn up_votes(&self) -> u32 {
        self.up_votes
    }

    pub fn down_votes(&self) -> u32 {
        self.down_votes
    }

    /// Number of users with a recorded vote
    pub fn voter_count(&self) -> usize {
        self.voters.len()
    }

    /// `up - down`
    pub fn balance(&self) -> i64 {
        i64::from(self.up_votes) - i64::from(self.down_votes)
    }

    /// Check the counter/entry invariant
    pub fn is_consistent(&self) -> bool {
        let up = self.voters.values().filter(|c| **c == VoteChoice::Up).count();
        let down = self.voters.len() - up;
        up == self.up_votes as usize && down == self.down_votes as usize
    }

    fn increment(&mut self, choice: VoteChoice) {
        match choice {
            VoteChoice::Up => self.up_votes += 1,
            VoteChoice::Down => self.down_votes += 1,
        }
    }

    fn decrement(&mut self, choice: VoteChoice) {
        match choice {
            VoteChoice::Up => self.up_votes = self.up_votes.saturating_sub(1),
            VoteChoice::Down => self.down_votes = self.down_votes.saturating_sub(1),
        }
    }

    fn from_voters(voters: BTreeMap<UserKey, VoteChoice>) -> Self {
        let up_votes = voters.values().filter(|c| **c == VoteChoice::Up).count() as u32;
        let down_votes = voters.len() as u32 - up_votes;
        Self {
            voters,
            up_votes,
            down_votes,
        }
    }
}

// Counters are derived, so only the voter map is read back
impl<'de> Deserialize<'de> for VoteLedger {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct VoteLedgerHelper {
            #[serde(default)]
            voters: BTreeMap<UserKey, VoteChoice>,
        }

        let helper = VoteLedgerHelper::deserialize(deserializer)?;
        Ok(VoteLedger::from_voters(helper.voters))
    }
}
