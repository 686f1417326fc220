use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Committed dispatch of an approved request: per item, the batches the
/// operator drew from, plus dispatcher identity. The committed quantities
/// are the authoritative record of the inventory decrement applied in the
/// same transaction.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "dispatch_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Approval-history record this dispatch fulfils.
    pub history_id: Uuid,
    /// item-id -> {name, qty, batches: [{batch_id, batch_number, location,
    /// inventory_type, quantity}]}
    #[sea_orm(column_type = "Json")]
    pub items: Json,
    pub reference_code: String,
    pub dispatched_by: String,
    pub dispatched_by_name: String,
    pub dispatched_by_role: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
