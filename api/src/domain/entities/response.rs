//! Response domain entity
//!
//! One observed engagement event on a posted piece of content.
//! Responses are created when an engagement is observed and never mutated.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::Prospect;

/// Social platform content is posted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linkedin,
    Twitter,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Linkedin, Platform::Twitter];

    /// Hard character limit for a single post
    pub fn char_limit(&self) -> usize {
        match self {
            Platform::Linkedin => 3000,
            Platform::Twitter => 280,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Linkedin => write!(f, "linkedin"),
            Platform::Twitter => write!(f, "twitter"),
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linkedin" => Ok(Platform::Linkedin),
            "twitter" | "x" => Ok(Platform::Twitter),
            _ => Err(format!("Unknown platform: {}. Use: linkedin, twitter", s)),
        }
    }
}

/// How interested the author of a response appears to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterestLevel {
    None = 0,
    Low = 1,
    Medium = 2,
    High = 3,
}

impl InterestLevel {
    pub fn value(&self) -> u8 {
        *self as u8
    }

    /// Upper-case name recorded on CRM records
    pub fn name(&self) -> &'static str {
        match self {
            InterestLevel::None => "NONE",
            InterestLevel::Low => "LOW",
            InterestLevel::Medium => "MEDIUM",
            InterestLevel::High => "HIGH",
        }
    }
}

impl std::fmt::Display for InterestLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name().to_lowercase())
    }
}

impl std::str::FromStr for InterestLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "0" => Ok(InterestLevel::None),
            "low" | "1" => Ok(InterestLevel::Low),
            "medium" | "2" => Ok(InterestLevel::Medium),
            "high" | "3" => Ok(InterestLevel::High),
            _ => Err(format!(
                "Unknown interest level: {}. Use: none, low, medium, high",
                s
            )),
        }
    }
}

/// An engagement on posted content by someone at a prospect company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub prospect: Prospect,
    pub platform: Platform,
    pub content: String,
    pub interest_level: InterestLevel,
    pub timestamp: DateTime<Utc>,
    pub is_decision_maker: bool,
}

fn high_intent_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)\b(demo|pricing|price|quote|interested|sign me up|call me|contact me|dm me|talk to (sales|someone)|switch(ing)? provider)\b",
        )
        .expect("static regex")
    })
}

fn medium_intent_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(\b(how|what|which|more info|learn more|details|tell me more|curious)\b|\?)")
            .expect("static regex")
    })
}

/// Estimate interest from the text of a comment or reply
///
/// Purchase signals ("demo", "pricing") are high, questions are medium,
/// any other non-empty text is low.
pub fn classify_interest(text: &str) -> InterestLevel {
    let text = text.trim();
    if text.is_empty() {
        InterestLevel::None
    } else if high_intent_pattern().is_match(text) {
        InterestLevel::High
    } else if medium_intent_pattern().is_match(text) {
        InterestLevel::Medium
    } else {
        InterestLevel::Low
    }
}
