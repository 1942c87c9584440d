//! Nurture sequence domain entity
//!
//! A per-lead outreach state machine keyed by the CRM deal id.
//!
//! States: `active` -> `paused` (negative response) -> `active` (resume),
//! and `active`/`paused` -> `completed` (last step executed or terminal event).
//! The step index only ever moves forward, one executed step at a time.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::LeadData;
use crate::error::DomainError;

/// CRM deal identifier; doubles as the sequence identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DealId(pub i64);

impl From<i64> for DealId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for DealId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How warm a lead is; selects the step template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentTier {
    HighIntent,
    #[default]
    MediumIntent,
    LowIntent,
}

impl std::fmt::Display for IntentTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntentTier::HighIntent => write!(f, "high_intent"),
            IntentTier::MediumIntent => write!(f, "medium_intent"),
            IntentTier::LowIntent => write!(f, "low_intent"),
        }
    }
}

impl std::str::FromStr for IntentTier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high_intent" | "high" => Ok(IntentTier::HighIntent),
            "medium_intent" | "medium" => Ok(IntentTier::MediumIntent),
            "low_intent" | "low" => Ok(IntentTier::LowIntent),
            _ => Err(DomainError::Configuration(format!(
                "Unknown intent tier: {}. Use: high_intent, medium_intent, low_intent",
                s
            ))),
        }
    }
}

/// Kind of outreach a step performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    PersonalizedContent,
    CaseStudy,
    DemoInvitation,
    EducationalContent,
    SocialProof,
    ValueProposition,
    ThoughtLeadership,
    SoftPitch,
}

impl StepType {
    /// Steps whose generated content is published to LinkedIn
    pub fn delivers_content(&self) -> bool {
        matches!(
            self,
            StepType::PersonalizedContent | StepType::CaseStudy | StepType::EducationalContent
        )
    }
}

impl std::fmt::Display for StepType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StepType::PersonalizedContent => "personalized_content",
            StepType::CaseStudy => "case_study",
            StepType::DemoInvitation => "demo_invitation",
            StepType::EducationalContent => "educational_content",
            StepType::SocialProof => "social_proof",
            StepType::ValueProposition => "value_proposition",
            StepType::ThoughtLeadership => "thought_leadership",
            StepType::SoftPitch => "soft_pitch",
        };
        write!(f, "{}", name)
    }
}

/// Static definition of one step in a tier's template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTemplate {
    pub delay_days: i64,
    pub step_type: StepType,
    pub template: &'static str,
}

const HIGH_INTENT_STEPS: [StepTemplate; 3] = [
    StepTemplate {
        delay_days: 1,
        step_type: StepType::PersonalizedContent,
        template: "value_proposition",
    },
    StepTemplate {
        delay_days: 3,
        step_type: StepType::CaseStudy,
        template: "industry_specific",
    },
    StepTemplate {
        delay_days: 7,
        step_type: StepType::DemoInvitation,
        template: "product_demo",
    },
];

const MEDIUM_INTENT_STEPS: [StepTemplate; 3] = [
    StepTemplate {
        delay_days: 2,
        step_type: StepType::EducationalContent,
        template: "industry_insights",
    },
    StepTemplate {
        delay_days: 5,
        step_type: StepType::SocialProof,
        template: "testimonials",
    },
    StepTemplate {
        delay_days: 10,
        step_type: StepType::ValueProposition,
        template: "cost_savings",
    },
];

const LOW_INTENT_STEPS: [StepTemplate; 3] = [
    StepTemplate {
        delay_days: 3,
        step_type: StepType::ThoughtLeadership,
        template: "industry_trends",
    },
    StepTemplate {
        delay_days: 7,
        step_type: StepType::EducationalContent,
        template: "best_practices",
    },
    StepTemplate {
        delay_days: 14,
        step_type: StepType::SoftPitch,
        template: "discovery_invitation",
    },
];

impl IntentTier {
    pub fn templates(&self) -> &'static [StepTemplate] {
        match self {
            IntentTier::HighIntent => &HIGH_INTENT_STEPS,
            IntentTier::MediumIntent => &MEDIUM_INTENT_STEPS,
            IntentTier::LowIntent => &LOW_INTENT_STEPS,
        }
    }
}

/// A scheduled step of a running sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceStep {
    pub index: usize,
    pub step_type: StepType,
    pub template: String,
    pub delay_days: i64,
    pub execute_at: DateTime<Utc>,
    pub executed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceStatus {
    Active,
    Paused,
    Completed,
}

impl std::fmt::Display for SequenceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SequenceStatus::Active => write!(f, "active"),
            SequenceStatus::Paused => write!(f, "paused"),
            SequenceStatus::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for SequenceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(SequenceStatus::Active),
            "paused" => Ok(SequenceStatus::Paused),
            "completed" => Ok(SequenceStatus::Completed),
            _ => Err(format!("Unknown sequence status: {}", s)),
        }
    }
}

/// Whether a step may run right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepReadiness {
    Ready,
    AlreadyExecuted,
    Paused,
    Completed,
    NotDue { execute_at: DateTime<Utc> },
}

/// Classification of an inbound reply to sequence content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSentiment {
    Positive,
    Negative,
    Other,
}

/// Exact, case-sensitive match; anything else is `Other`
impl From<&str> for ResponseSentiment {
    fn from(s: &str) -> Self {
        match s {
            "positive" => ResponseSentiment::Positive,
            "negative" => ResponseSentiment::Negative,
            _ => ResponseSentiment::Other,
        }
    }
}

/// A lead's nurture sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NurtureSequence {
    pub id: DealId,
    pub intent_tier: IntentTier,
    pub company: String,
    pub industry: String,
    pub steps: Vec<SequenceStep>,
    pub current_step: usize,
    pub status: SequenceStatus,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NurtureSequence {
    /// Build an active sequence with every step scheduled relative to `now`
    pub fn start(id: DealId, intent_tier: IntentTier, lead: &LeadData, now: DateTime<Utc>) -> Self {
        let steps = intent_tier
            .templates()
            .iter()
            .enumerate()
            .map(|(index, template)| SequenceStep {
                index,
                step_type: template.step_type,
                template: template.template.to_string(),
                delay_days: template.delay_days,
                execute_at: now + Duration::days(template.delay_days),
                executed_at: None,
            })
            .collect();

        Self {
            id,
            intent_tier,
            company: lead.company.clone(),
            industry: lead.industry.clone(),
            steps,
            current_step: 0,
            status: SequenceStatus::Active,
            started_at: now,
            updated_at: now,
        }
    }

    /// The next step to execute, if any remain
    pub fn next_step(&self) -> Option<&SequenceStep> {
        self.steps.get(self.current_step)
    }

    /// When the next step should fire; `None` unless the sequence is active
    pub fn next_run_at(&self) -> Option<DateTime<Utc>> {
        if self.status != SequenceStatus::Active {
            return None;
        }
        self.next_step().map(|s| s.execute_at)
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_run_at().is_some_and(|at| at <= now)
    }

    /// Decide whether step `index` may run at `now`
    pub fn check_step(&self, index: usize, now: DateTime<Utc>) -> Result<StepReadiness, DomainError> {
        let step = self.steps.get(index).ok_or_else(|| {
            DomainError::Validation(format!(
                "sequence {} has no step {} ({} steps)",
                self.id,
                index,
                self.steps.len()
            ))
        })?;

        if index < self.current_step {
            return Ok(StepReadiness::AlreadyExecuted);
        }
        match self.status {
            SequenceStatus::Completed => return Ok(StepReadiness::Completed),
            SequenceStatus::Paused => return Ok(StepReadiness::Paused),
            SequenceStatus::Active => {}
        }
        if index > self.current_step {
            return Err(DomainError::Conflict(format!(
                "sequence {} step {} cannot run before step {}",
                self.id, index, self.current_step
            )));
        }
        if now < step.execute_at {
            return Ok(StepReadiness::NotDue {
                execute_at: step.execute_at,
            });
        }
        Ok(StepReadiness::Ready)
    }

    /// Record that the current step ran and move to the next one
    pub fn mark_executed(&mut self, index: usize, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.status != SequenceStatus::Active || index != self.current_step {
            return Err(DomainError::Conflict(format!(
                "sequence {} cannot mark step {} executed (status: {}, current step: {})",
                self.id, index, self.status, self.current_step
            )));
        }

        self.steps[index].executed_at = Some(now);
        self.current_step += 1;
        if self.current_step == self.steps.len() {
            self.status = SequenceStatus::Completed;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Stop automatic step execution. Returns whether the status changed.
    pub fn pause(&mut self, now: DateTime<Utc>) -> Result<bool, DomainError> {
        match self.status {
            SequenceStatus::Active => {
                self.status = SequenceStatus::Paused;
                self.updated_at = now;
                Ok(true)
            }
            SequenceStatus::Paused => Ok(false),
            SequenceStatus::Completed => Err(DomainError::Conflict(format!(
                "sequence {} is completed and cannot be paused",
                self.id
            ))),
        }
    }

    /// Re-enable step execution; overdue steps become due immediately.
    pub fn resume(&mut self, now: DateTime<Utc>) -> Result<bool, DomainError> {
        match self.status {
            SequenceStatus::Paused => {
                self.status = SequenceStatus::Active;
                self.updated_at = now;
                Ok(true)
            }
            SequenceStatus::Active => Ok(false),
            SequenceStatus::Completed => Err(DomainError::Conflict(format!(
                "sequence {} is completed and cannot be resumed",
                self.id
            ))),
        }
    }

    /// Terminal external event (deal won, lost, or handed to sales)
    pub fn complete(&mut self, now: DateTime<Utc>) -> bool {
        if self.status == SequenceStatus::Completed {
            return false;
        }
        self.status = SequenceStatus::Completed;
        self.updated_at = now;
        true
    }
}
