//! PostgreSQL adapter for SequenceRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::domain::entities::{DealId, NurtureSequence, SequenceStatus, SequenceStep};
use crate::domain::ports::SequenceRepository;
use crate::entity::nurture_sequences;
use crate::error::DomainError;

/// PostgreSQL implementation of SequenceRepository
pub struct PostgresSequenceRepository {
    db: DatabaseConnection,
}

impl PostgresSequenceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SequenceRepository for PostgresSequenceRepository {
    async fn find_by_id(&self, id: &DealId) -> Result<Option<NurtureSequence>, DomainError> {
        let result = nurture_sequences::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.map(NurtureSequence::try_from).transpose()
    }

    async fn save(&self, sequence: &NurtureSequence) -> Result<(), DomainError> {
        let model = to_active_model(sequence)?;

        nurture_sequences::Entity::insert(model)
            .on_conflict(
                OnConflict::column(nurture_sequences::Column::DealId)
                    .update_columns([
                        nurture_sequences::Column::Status,
                        nurture_sequences::Column::CurrentStep,
                        nurture_sequences::Column::Steps,
                        nurture_sequences::Column::NextRunAt,
                        nurture_sequences::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn find_due(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<NurtureSequence>, DomainError> {
        let results = nurture_sequences::Entity::find()
            .filter(nurture_sequences::Column::Status.eq(SequenceStatus::Active.to_string()))
            .filter(nurture_sequences::Column::NextRunAt.lte(now.fixed_offset()))
            .order_by_asc(nurture_sequences::Column::NextRunAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        results.into_iter().map(NurtureSequence::try_from).collect()
    }
}

fn to_active_model(
    sequence: &NurtureSequence,
) -> Result<nurture_sequences::ActiveModel, DomainError> {
    let steps = serde_json::to_value(&sequence.steps)
        .map_err(|e| DomainError::Internal(format!("failed to encode steps: {}", e)))?;

    Ok(nurture_sequences::ActiveModel {
        deal_id: Set(sequence.id.0),
        intent_tier: Set(sequence.intent_tier.to_string()),
        status: Set(sequence.status.to_string()),
        current_step: Set(sequence.current_step as i32),
        steps: Set(steps),
        company: Set(sequence.company.clone()),
        industry: Set(sequence.industry.clone()),
        next_run_at: Set(sequence.next_run_at().map(|t| t.fixed_offset())),
        started_at: Set(sequence.started_at.fixed_offset()),
        updated_at: Set(sequence.updated_at.fixed_offset()),
    })
}

/// Convert SeaORM model to domain entity
impl TryFrom<nurture_sequences::Model> for NurtureSequence {
    type Error = DomainError;

    fn try_from(model: nurture_sequences::Model) -> Result<Self, Self::Error> {
        let deal_id = model.deal_id;
        let corrupt = |field: &str, detail: String| {
            DomainError::Database(format!(
                "nurture_sequences row {} has invalid {}: {}",
                deal_id, field, detail
            ))
        };

        let intent_tier = model
            .intent_tier
            .parse()
            .map_err(|e: DomainError| corrupt("intent_tier", e.to_string()))?;
        let status = model
            .status
            .parse()
            .map_err(|e: String| corrupt("status", e))?;
        let steps: Vec<SequenceStep> = serde_json::from_value(model.steps)
            .map_err(|e| corrupt("steps", e.to_string()))?;
        let current_step =
            usize::try_from(model.current_step).map_err(|e| corrupt("current_step", e.to_string()))?;

        Ok(NurtureSequence {
            id: DealId(deal_id),
            intent_tier,
            company: model.company,
            industry: model.industry,
            steps,
            current_step,
            status,
            started_at: model.started_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::IntentTier;
    use crate::test_utils::test_sequence;

    fn row_for(sequence: &NurtureSequence) -> nurture_sequences::Model {
        nurture_sequences::Model {
            deal_id: sequence.id.0,
            intent_tier: sequence.intent_tier.to_string(),
            status: sequence.status.to_string(),
            current_step: sequence.current_step as i32,
            steps: serde_json::to_value(&sequence.steps).unwrap(),
            company: sequence.company.clone(),
            industry: sequence.industry.clone(),
            next_run_at: sequence.next_run_at().map(|t| t.fixed_offset()),
            started_at: sequence.started_at.fixed_offset(),
            updated_at: sequence.updated_at.fixed_offset(),
        }
    }

    #[test]
    fn row_converts_back_to_sequence() {
        let sequence = test_sequence(IntentTier::HighIntent);
        let restored = NurtureSequence::try_from(row_for(&sequence)).unwrap();
        assert_eq!(restored, sequence);
    }

    #[test]
    fn unknown_status_is_reported_as_database_error() {
        let sequence = test_sequence(IntentTier::LowIntent);
        let mut row = row_for(&sequence);
        row.status = "archived".to_string();

        let err = NurtureSequence::try_from(row).unwrap_err();
        assert!(matches!(err, DomainError::Database(_)));
        assert!(err.to_string().contains("status"));
    }

    #[test]
    fn paused_sequence_has_no_next_run() {
        let mut sequence = test_sequence(IntentTier::MediumIntent);
        sequence.pause(Utc::now()).unwrap();

        let model = to_active_model(&sequence).unwrap();
        assert_eq!(model.next_run_at.unwrap(), None);
        assert_eq!(model.status.unwrap(), "paused");
    }
}
