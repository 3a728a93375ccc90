//! Comment data models

use super::alarm::{AlarmPolicy, AlarmSnapshot};
use super::builder::CommentBuilder;
use super::reports::ReportLedger;
use super::votes::{VoteChoice, VoteLedger, VoteOutcome, VoteState};
use crate::error::{AvaliaError, Result};
use crate::types::{CommentId, DisciplineKey, ProfessorKey, UserKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a root comment lives: a discipline, optionally scoped to a professor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Venue {
    pub discipline: DisciplineKey,
    /// `None` means a general discipline comment
    pub professor: Option<ProfessorKey>,
}

impl Venue {
    pub fn new(discipline: DisciplineKey, professor: Option<ProfessorKey>) -> Self {
        Self {
            discipline,
            professor,
        }
    }
}

/// Placement of a comment in the tree
///
/// Replies store only their parent; their venue is inherited from the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Placement {
    /// Top-level comment on a venue
    Root(Venue),
    /// Reply to another comment
    Reply { parent: CommentId },
}

impl Placement {
    pub fn is_root(&self) -> bool {
        matches!(self, Placement::Root(_))
    }

    pub fn parent(&self) -> Option<CommentId> {
        match self {
            Placement::Root(_) => None,
            Placement::Reply { parent } => Some(*parent),
        }
    }

    pub fn venue(&self) -> Option<&Venue> {
        match self {
            Placement::Root(venue) => Some(venue),
            Placement::Reply { .. } => None,
        }
    }
}

/// A comment on a discipline or professor, or a reply to another comment
///
/// All engagement and moderation state is private and only changes through
/// the methods below, which keep the ledgers consistent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    id: CommentId,
    author: UserKey,
    text: String,
    placement: Placement,
    created_at: DateTime<Utc>,
    #[serde(default)]
    edited: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    edited_at: Option<DateTime<Utc>>,
    #[serde(default)]
    votes: VoteLedger,
    #[serde(default)]
    reports: ReportLedger,
    #[serde(default)]
    alarming: bool,
    /// Optimistic concurrency stamp, bumped by the repository on every save
    #[serde(default)]
    version: u64,
}

impl Comment {
    /// Factory for new comments
    ///
    /// Exactly one of `discipline` or `parent` must be given; `professor`
    /// is only allowed together with `discipline`.
    pub fn create(
        id: CommentId,
        author: UserKey,
        text: impl Into<String>,
        discipline: Option<DisciplineKey>,
        professor: Option<ProfessorKey>,
        parent: Option<CommentId>,
    ) -> Result<Self> {
        let mut builder = CommentBuilder::new(author).text(text);
        if let Some(discipline) = discipline {
            builder = builder.discipline(discipline);
        }
        if let Some(professor) = professor {
            builder = builder.professor(professor);
        }
        if let Some(parent) = parent {
            builder = builder.parent(parent);
        }
        builder.build(id)
    }

    pub(crate) fn from_parts(
        id: CommentId,
        author: UserKey,
        text: String,
        placement: Placement,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            author,
            text,
            placement,
            created_at,
            edited: false,
            edited_at: None,
            votes: VoteLedger::new(),
            reports: ReportLedger::new(),
            alarming: false,
            version: 0,
        }
    }

    pub fn id(&self) -> CommentId {
        self.id
    }

    pub fn author(&self) -> &UserKey {
        &self.author
    }

    pub fn is_authored_by(&self, user: &UserKey) -> bool {
        &self.author == user
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn is_root(&self) -> bool {
        self.placement.is_root()
    }

    pub fn parent_id(&self) -> Option<CommentId> {
        self.placement.parent()
    }

    /// Venue of a root comment; replies return `None` (resolve via the root)
    pub fn venue(&self) -> Option<&Venue> {
        self.placement.venue()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_edited(&self) -> bool {
        self.edited
    }

    pub fn edited_at(&self) -> Option<DateTime<Utc>> {
        self.edited_at
    }

    /// Replace the text
    ///
    /// Ownership is checked by the caller, not here.
    pub fn edit(&mut self, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(AvaliaError::Validation(
                "Comment text cannot be empty".to_string(),
            ));
        }
        self.text = text;
        self.edited = true;
        self.edited_at = Some(Utc::now());
        Ok(())
    }

    // Votes

    pub fn vote(&mut self, user: &UserKey, choice: VoteChoice) -> VoteOutcome {
        self.votes.apply(user, choice)
    }

    pub fn has_voted(&self, user: &UserKey) -> VoteState {
        self.votes.state_of(user)
    }

    pub fn up_votes(&self) -> u32 {
        self.votes.up_votes()
    }

    pub fn down_votes(&self) -> u32 {
        self.votes.down_votes()
    }

    pub fn votes(&self) -> &VoteLedger {
        &self.votes
    }

    // Reports

    /// Record a report; `false` when `user` already reported
    pub fn add_report(&mut self, user: &UserKey, threshold: usize) -> bool {
        self.reports.add(user, threshold)
    }

    pub fn report_count(&self) -> usize {
        self.reports.count()
    }

    pub fn has_reports(&self) -> bool {
        self.reports.has_reports()
    }

    pub fn is_reported(&self) -> bool {
        self.reports.is_reported()
    }

    pub fn has_reported(&self, user: &UserKey) -> bool {
        self.reports.contains(user)
    }

    pub fn reports(&self) -> &ReportLedger {
        &self.reports
    }

    // Alarm

    pub fn is_alarming(&self) -> bool {
        self.alarming
    }

    /// Public state handed to alarm policies
    pub fn snapshot(&self) -> AlarmSnapshot<'_> {
        AlarmSnapshot {
            text: &self.text,
            up_votes: self.votes.up_votes(),
            down_votes: self.votes.down_votes(),
            report_count: self.reports.count(),
            edited: self.edited,
            is_reply: !self.is_root(),
        }
    }

    /// Re-evaluate the alarm flag; returns the new value
    pub fn update_alarm_status(&mut self, policy: &dyn AlarmPolicy) -> bool {
        self.alarming = policy.is_alarming(&self.snapshot());
        self.alarming
    }

    /// Admin override clearing the alarm flag
    pub fn mark_safe(&mut self) {
        self.alarming = false;
    }

    // Concurrency

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Set the concurrency stamp. Only repository implementations call this.
    pub fn stamp_version(&mut self, version: u64) {
        self.version = version;
    }

    /// Verify the structural invariants of a stored comment
    pub fn check_invariants(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(AvaliaError::Validation(format!(
                "Comment {} has empty text",
                self.id
            )));
        }
        if !self.votes.is_consistent() {
            return Err(AvaliaError::Validation(format!(
                "Comment {} has vote counters out of sync with its voters",
                self.id
            )));
        }
        if self.parent_id() == Some(self.id) {
            return Err(AvaliaError::Validation(format!(
                "Comment {} is its own parent",
                self.id
            )));
        }
        if self.edited != self.edited_at.is_some() {
            return Err(AvaliaError::Validation(format!(
                "Comment {} has inconsistent edit state",
                self.id
            )));
        }
        Ok(())
    }
}
