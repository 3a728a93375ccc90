//! Comment system module
//!
//! The comment aggregate, its vote and report ledgers, the alarm policy,
//! validation, and the parent/children index.

pub mod alarm;
pub mod builder;
pub mod index;
pub mod model;
pub mod reports;
pub mod validator;
pub mod votes;

pub use alarm::{AlarmAnalysis, AlarmPolicy, AlarmSnapshot, HeuristicAlarmPolicy};
pub use builder::CommentBuilder;
pub use index::ChildIndex;
pub use model::{Comment, Placement, Venue};
pub use reports::ReportLedger;
pub use validator::CommentValidator;
pub use votes::{VoteChoice, VoteLedger, VoteOutcome, VoteState, VoteTally};
