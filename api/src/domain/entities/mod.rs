//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod deal_value;
pub mod industry;
pub mod lead;
pub mod prospect;
pub mod qualification;
pub mod response;
pub mod sequence;

pub use deal_value::expected_deal_value;
pub use industry::IndustryProfile;
pub use lead::{LeadData, LeadRecord, LeadRoute};
pub use prospect::{is_decision_maker_title, DecisionMaker, Prospect};
pub use qualification::{
    LeadGrade, QualificationCriteria, QualificationRules, RouteThresholds, ScoringWeights,
};
pub use response::{classify_interest, InterestLevel, Platform, Response};
pub use sequence::{
    DealId, IntentTier, NurtureSequence, ResponseSentiment, SequenceStatus, SequenceStep,
    StepReadiness, StepTemplate, StepType,
};
