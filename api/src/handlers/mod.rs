//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod campaigns;
pub mod content;
pub mod leads;
pub mod prospects;
pub mod scheduler;
pub mod sequences;

pub use campaigns::run_campaign;
pub use content::create_posts;
pub use leads::route_leads;
pub use prospects::search_prospects;
pub use scheduler::execute_step;
pub use sequences::{
    complete_sequence, get_sequence, list_due_steps, pause_sequence, record_response,
    resume_sequence, start_sequence,
};
