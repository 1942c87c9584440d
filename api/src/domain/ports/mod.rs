//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod content;
pub mod crm;
pub mod notifier;
pub mod prospects;
pub mod repositories;
pub mod social;

pub use content::{CompletionClient, CompletionRequest};
pub use crm::{CrmClient, NewActivity, NewDeal, NewOrganization, NewPerson};
pub use notifier::{LeadNotifier, SdrNotification};
pub use prospects::{ProspectFilters, ProspectPage, ProspectSource};
pub use repositories::SequenceRepository;
pub use social::{EngagementSignal, PostId, PostedContent, SocialPoster};
