//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, ports, and external systems.

pub mod campaign_service;
pub mod content_service;
pub mod lead_router;
pub mod nurture_config;
pub mod nurture_service;
pub mod prospect_service;
pub mod scoring;
pub mod social_service;

pub use campaign_service::{CampaignReport, CampaignRequest, CampaignRuns, CampaignService};
pub use content_service::{ContentService, GeneratedPosts, PostRequest};
pub use lead_router::{LeadRouter, SequenceStarter};
pub use nurture_service::{DueStep, NurtureService, SkipReason, StepOutcome};
pub use prospect_service::{ProspectSearch, ProspectService};
pub use social_service::SocialService;
