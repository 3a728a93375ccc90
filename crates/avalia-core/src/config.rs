//! Configuration management for avalia

use crate::error::{AvaliaError, Result};
use crate::types::UserKey;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Report escalation and retry settings
    pub moderation: ModerationConfig,
    /// Comment content settings
    pub comments: CommentConfig,
    /// Alarm heuristic settings
    pub alarm: AlarmConfig,
    /// Admin query settings
    pub queries: QueryConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AvaliaError::Io(e).with_context(format!("Failed to read {}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Render as pretty TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.moderation.escalation_threshold == 0 {
            return Err(AvaliaError::Config(
                "moderation.escalation_threshold must be at least 1".to_string(),
            ));
        }
        if self.comments.max_length == 0 {
            return Err(AvaliaError::Config(
                "comments.max_length must be at least 1".to_string(),
            ));
        }
        if self.queries.default_page_size == 0 || self.queries.max_page_size == 0 {
            return Err(AvaliaError::Config(
                "queries page sizes must be at least 1".to_string(),
            ));
        }
        if self.queries.default_page_size > self.queries.max_page_size {
            return Err(AvaliaError::Config(format!(
                "queries.default_page_size ({}) exceeds queries.max_page_size ({})",
                self.queries.default_page_size, self.queries.max_page_size
            )));
        }
        for (name, value) in [
            ("alarm.caps_ratio", self.alarm.caps_ratio),
            ("alarm.downvote_ratio", self.alarm.downvote_ratio),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AvaliaError::Config(format!(
                    "{} must be between 0 and 1, got {}",
                    name, value
                )));
            }
        }
        if self.alarm.score_threshold <= 0.0 {
            return Err(AvaliaError::Config(
                "alarm.score_threshold must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Moderation-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    /// Distinct reports needed to mark a comment as reported
    pub escalation_threshold: usize,
    /// Extra attempts after a concurrent-write conflict
    pub max_retries: u32,
    /// Accounts allowed to moderate
    pub admins: Vec<UserKey>,
}

impl ModerationConfig {
    pub fn is_admin(&self, user: &UserKey) -> bool {
        self.admins.iter().any(|admin| admin == user)
    }
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            escalation_threshold: 3,
            max_retries: 3,
            admins: Vec::new(),
        }
    }
}

/// Comment content configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentConfig {
    /// Maximum comment length in characters
    pub max_length: usize,
}

impl Default for CommentConfig {
    fn default() -> Self {
        Self { max_length: 2000 }
    }
}

/// Alarm heuristic configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmConfig {
    /// Score at or above which a comment is alarming
    pub score_threshold: f32,
    /// Terms that flag a comment on their own (case-insensitive)
    pub blocked_terms: Vec<String>,
    /// URLs tolerated before the text looks like link spam
    pub max_urls: usize,
    /// Upper-case share of letters considered shouting
    pub caps_ratio: f32,
    /// Shortest text checked for shouting
    pub caps_min_length: usize,
    /// Length of a run of one repeated character considered noise
    pub repeated_run: usize,
    /// Texts longer than this many characters are unusual
    pub max_length: usize,
    /// Votes needed before the downvote ratio is considered
    pub min_votes_for_ratio: u32,
    /// Downvote share that marks a comment as badly received
    pub downvote_ratio: f32,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            score_threshold: 0.7,
            blocked_terms: vec![
                "idiota".to_string(),
                "imbecil".to_string(),
                "burro".to_string(),
                "lixo".to_string(),
                "otario".to_string(),
                "otário".to_string(),
            ],
            max_urls: 3,
            caps_ratio: 0.8,
            caps_min_length: 30,
            repeated_run: 6,
            max_length: 1500,
            min_votes_for_ratio: 5,
            downvote_ratio: 0.8,
        }
    }
}

/// Admin query configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Page size used when the caller gives none
    pub default_page_size: usize,
    /// Largest page size accepted
    pub max_page_size: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}
