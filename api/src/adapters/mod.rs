//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod enrichment;
pub mod http;
pub mod openai;
pub mod pipedrive;
pub mod postgres;
pub mod social;
pub mod webhook;

pub use enrichment::EnrichmentClient;
pub use openai::OpenAiClient;
pub use pipedrive::PipedriveClient;
pub use postgres::PostgresSequenceRepository;
pub use social::SocialClient;
pub use webhook::WebhookNotifier;
