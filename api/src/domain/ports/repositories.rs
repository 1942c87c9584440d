//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{DealId, NurtureSequence};
use crate::error::DomainError;

/// Repository for nurture sequence state
#[async_trait]
pub trait SequenceRepository: Send + Sync {
    /// Find a sequence by its deal id
    async fn find_by_id(&self, id: &DealId) -> Result<Option<NurtureSequence>, DomainError>;

    /// Insert or replace a sequence
    async fn save(&self, sequence: &NurtureSequence) -> Result<(), DomainError>;

    /// Active sequences whose next step is due at or before `now`, oldest first
    async fn find_due(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<NurtureSequence>, DomainError>;
}
