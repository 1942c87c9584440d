//! `nurture_sequences` table

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "nurture_sequences")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub deal_id: i64,
    pub intent_tier: String,
    pub status: String,
    pub current_step: i32,
    #[sea_orm(column_type = "JsonBinary")]
    pub steps: Json,
    pub company: String,
    pub industry: String,
    /// Execute time of the next step while active, NULL otherwise
    pub next_run_at: Option<DateTimeWithTimeZone>,
    pub started_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
