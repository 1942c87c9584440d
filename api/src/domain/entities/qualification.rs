//! Qualification rules and criteria
//!
//! Typed configuration for scoring responses and deciding which ones qualify.

use serde::{Deserialize, Serialize};

use super::InterestLevel;

/// Weights applied to each scoring dimension
///
/// Each weight is expected in [0, 1] and the sum is expected to be at most 1.
/// Configuration rejects weights outside [0, 1]; the sum is only clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub interest_level: f64,
    pub company_size: f64,
    pub decision_maker: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            interest_level: 0.4,
            company_size: 0.3,
            decision_maker: 0.3,
        }
    }
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.interest_level + self.company_size + self.decision_maker
    }
}

/// Score bands used to grade a qualified lead
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteThresholds {
    pub fast_track: f64,
    pub normal: f64,
    pub nurture: f64,
}

impl Default for RouteThresholds {
    fn default() -> Self {
        Self {
            fast_track: 0.8,
            normal: 0.6,
            nurture: 0.4,
        }
    }
}

/// Grade of a lead according to `RouteThresholds`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadGrade {
    FastTrack,
    Normal,
    Nurture,
    Cold,
}

impl RouteThresholds {
    pub fn grade(&self, score: f64) -> LeadGrade {
        if score >= self.fast_track {
            LeadGrade::FastTrack
        } else if score >= self.normal {
            LeadGrade::Normal
        } else if score >= self.nurture {
            LeadGrade::Nurture
        } else {
            LeadGrade::Cold
        }
    }
}

impl std::fmt::Display for LeadGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeadGrade::FastTrack => write!(f, "fast_track"),
            LeadGrade::Normal => write!(f, "normal"),
            LeadGrade::Nurture => write!(f, "nurture"),
            LeadGrade::Cold => write!(f, "cold"),
        }
    }
}

/// Rules a router scores responses with
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct QualificationRules {
    #[serde(default)]
    pub weights: ScoringWeights,
    #[serde(default)]
    pub thresholds: RouteThresholds,
}

/// Per-call criteria a response must meet to become a lead
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualificationCriteria {
    #[serde(default = "default_minimum_score")]
    pub minimum_score: f64,
    /// Optional floor on the observed interest level
    #[serde(default)]
    pub minimum_interest: Option<InterestLevel>,
    /// Only accept responses from decision makers
    #[serde(default)]
    pub require_decision_maker: bool,
}

fn default_minimum_score() -> f64 {
    0.7
}

impl Default for QualificationCriteria {
    fn default() -> Self {
        Self {
            minimum_score: default_minimum_score(),
            minimum_interest: None,
            require_decision_maker: false,
        }
    }
}
