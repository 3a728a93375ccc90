//! Alarm heuristic ("alarmante")
//!
//! Alarm evaluation is a pure function of a comment snapshot. The engine
//! only calls it when a comment is created or its text is edited, so an admin
//! "mark safe" sticks until the text changes again.

use crate::config::AlarmConfig;
use once_cell::sync::Lazy;
use regex::Regex;

/// URL pattern for detecting links in content
static URL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://[^\s\])<>]+").expect("Invalid URL regex"));

/// Public state of a comment seen by an alarm policy
#[derive(Debug, Clone, Copy)]
pub struct AlarmSnapshot<'a> {
    pub text: &'a str,
    pub up_votes: u32,
    pub down_votes: u32,
    pub report_count: usize,
    pub edited: bool,
    pub is_reply: bool,
}

/// Decides whether a comment is alarming
///
/// Implementations must be deterministic and free of side effects.
pub trait AlarmPolicy: Send + Sync {
    fn is_alarming(&self, snapshot: &AlarmSnapshot<'_>) -> bool;
}

impl<F> AlarmPolicy for F
where
    F: Fn(&AlarmSnapshot<'_>) -> bool + Send + Sync,
{
    fn is_alarming(&self, snapshot: &AlarmSnapshot<'_>) -> bool {
        self(snapshot)
    }
}

/// Result of alarm analysis
#[derive(Debug, Clone)]
pub struct AlarmAnalysis {
    /// Accumulated score, 0.0 for clean text
    pub score: f32,
    /// Whether the score reached the threshold
    pub is_alarming: bool,
    /// Signals that contributed to the score
    pub reasons: Vec<String>,
}

/// Default scoring policy
///
/// A blocked term alone is enough to flag a comment; the softer signals
/// (links, shouting, character runs, length, a badly received vote ratio)
/// need to stack up.
#[derive(Debug, Clone)]
pub struct HeuristicAlarmPolicy {
    config: AlarmConfig,
    blocked: Option<Regex>,
}

impl HeuristicAlarmPolicy {
    pub fn new(config: AlarmConfig) -> Self {
        let blocked = blocked_terms_regex(&config.blocked_terms);
        Self { config, blocked }
    }

    /// Score a snapshot and explain the result
    pub fn analyze(&self, snapshot: &AlarmSnapshot<'_>) -> AlarmAnalysis {
        let mut score = 0.0f32;
        let mut reasons = Vec::new();
        let text = snapshot.text;

        if let Some(blocked) = &self.blocked {
            let hits: Vec<String> = blocked
                .find_iter(text)
                .map(|m| m.as_str().to_lowercase())
                .collect();
            if !hits.is_empty() {
                score += 1.0;
                reasons.push(format!("Blocked terms: {}", hits.join(", ")));
            }
        }

        let url_count = URL_REGEX.find_iter(text).count();
        if url_count > self.config.max_urls {
            score += 0.4;
            reasons.push(format!("Excessive URLs: {}", url_count));
        }

        let char_count = text.chars().count();
        if char_count >= self.config.caps_min_length {
            let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
            if !letters.is_empty() {
                let upper = letters.iter().filter(|c| c.is_uppercase()).count();
                let ratio = upper as f32 / letters.len() as f32;
                if ratio > self.config.caps_ratio {
                    score += 0.4;
                    reasons.push("Excessive capitalization".to_string());
                }
            }
        }

        if self.config.repeated_run > 1 && longest_run(text) >= self.config.repeated_run {
            score += 0.4;
            reasons.push("Repeated characters".to_string());
        }

        if char_count > self.config.max_length {
            score += 0.4;
            reasons.push(format!("Unusually long: {} characters", char_count));
        }

        let total_votes = snapshot.up_votes + snapshot.down_votes;
        if total_votes >= self.config.min_votes_for_ratio && total_votes > 0 {
            let ratio = snapshot.down_votes as f32 / total_votes as f32;
            if ratio >= self.config.downvote_ratio {
                score += 0.4;
                reasons.push(format!(
                    "Badly received: {} of {} votes down",
                    snapshot.down_votes, total_votes
                ));
            }
        }

        AlarmAnalysis {
            score,
            is_alarming: score >= self.config.score_threshold,
            reasons,
        }
    }

    pub fn config(&self) -> &AlarmConfig {
        &self.config
    }
}

impl Default for HeuristicAlarmPolicy {
    fn default() -> Self {
        Self::new(AlarmConfig::default())
    }
}

impl AlarmPolicy for HeuristicAlarmPolicy {
    fn is_alarming(&self, snapshot: &AlarmSnapshot<'_>) -> bool {
        self.analyze(snapshot).is_alarming
    }
}

fn blocked_terms_regex(terms: &[String]) -> Option<Regex> {
    let alternatives: Vec<String> = terms
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(regex::escape)
        .collect();
    if alternatives.is_empty() {
        return None;
    }
    // Terms come from escaped config values, so the pattern always compiles
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives.join("|"))).ok()
}

/// Length of the longest run of one repeated non-whitespace character
fn longest_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    let mut previous: Option<char> = None;

    for c in text.chars() {
        if c.is_whitespace() {
            previous = None;
            current = 0;
            continue;
        }
        if previous == Some(c) {
            current += 1;
        } else {
            previous = Some(c);
            current = 1;
        }
        longest = longest.max(current);
    }

    longest
}
